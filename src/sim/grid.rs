//! Level board generation
//!
//! Each cell is rolled independently: number, then obstacle, then power-up,
//! falling through to empty. The hero's cell is always cleared afterwards so
//! a level never starts with the hero boxed in.

use rand::Rng;

use super::state::{Board, Cell, Position, PowerUpKind, Rule};
use crate::consts::*;

/// Chance that a cell left over after the number and obstacle rolls holds a
/// power-up. Grows with the level and is capped so empty cells stay possible.
pub fn powerup_chance(level: u32) -> f64 {
    (POWERUP_BASE_CHANCE + level as f64 * POWERUP_CHANCE_PER_LEVEL).min(POWERUP_CHANCE_MAX)
}

/// Build a fresh board for `level` under `rule`, with `hero`'s cell empty.
pub fn generate<R: Rng + ?Sized>(level: u32, rule: &Rule, hero: Position, rng: &mut R) -> Board {
    let mut board = Board::empty();
    let max_value = rule.max_board_value();
    let powerup = powerup_chance(level);

    for y in 0..GRID_ROWS {
        for x in 0..GRID_COLS {
            let cell = if rng.random_bool(NUMBER_CHANCE) {
                Cell::Number(rng.random_range(1..=max_value))
            } else if rng.random_bool(OBSTACLE_CHANCE) {
                Cell::Obstacle
            } else if rng.random_bool(powerup) {
                let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
                Cell::PowerUp(kind)
            } else {
                Cell::Empty
            };
            board.set(Position::new(x as u8, y as u8), cell);
        }
    }

    board.clear(hero);

    log::debug!(
        "Generated level {} board: {} numbers, {} obstacles, {} power-ups",
        level,
        board.iter().filter(|(_, c)| matches!(c, Cell::Number(_))).count(),
        board.iter().filter(|(_, c)| *c == Cell::Obstacle).count(),
        board.iter().filter(|(_, c)| matches!(c, Cell::PowerUp(_))).count(),
    );

    board
}
