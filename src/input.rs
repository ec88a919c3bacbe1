//! Key mapping from browser `KeyboardEvent.key` values to game actions.
//!
//! Arrow keys or WASD move, space collects. Everything else is left alone so
//! the browser keeps its default behaviour for it.

use crate::sim::{Action, Direction};

/// Map a `KeyboardEvent.key` string to an action
pub fn action_for_key(key: &str) -> Option<Action> {
    let action = match key {
        "ArrowUp" => Action::MoveHero(Direction::Up),
        "ArrowDown" => Action::MoveHero(Direction::Down),
        "ArrowLeft" => Action::MoveHero(Direction::Left),
        "ArrowRight" => Action::MoveHero(Direction::Right),
        " " => Action::CollectAttempt,
        _ => match key.to_ascii_lowercase().as_str() {
            "w" => Action::MoveHero(Direction::Up),
            "s" => Action::MoveHero(Direction::Down),
            "a" => Action::MoveHero(Direction::Left),
            "d" => Action::MoveHero(Direction::Right),
            _ => return None,
        },
    };
    Some(action)
}

/// Whether the page should suppress the browser default for this key
pub fn is_handled(key: &str) -> bool {
    action_for_key(key).is_some()
}
