//! Renderer-facing view of the game state
//!
//! A [`Snapshot`] is taken after every transition and handed to whatever
//! draws the game (the page hook in the browser, stdout on native).

use std::fmt;

use serde::Serialize;

use crate::sim::rules;
use crate::sim::{Board, Cell, Enemy, GamePhase, GameState, Position, PowerUpKind, PowerUps, Rule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub level: u32,
    pub lives: u8,
    pub score: u32,
    pub phase: GamePhase,
    pub rule: Rule,
    pub rule_title: &'static str,
    pub rule_description: String,
    pub progress: String,
    pub collected: Vec<u32>,
    pub hero: Position,
    pub board: Option<Board>,
    pub enemies: Vec<Enemy>,
    pub power_ups: PowerUps,
    /// Cells worth collecting right now; filled only while math boost runs
    pub hints: Vec<Position>,
}

impl Snapshot {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            level: state.level,
            lives: state.lives,
            score: state.score,
            phase: state.phase,
            rule: state.rule,
            rule_title: state.rule.intro_title(),
            rule_description: state.rule.description(),
            progress: state.rule.progress(&state.collected),
            collected: state.collected.clone(),
            hero: state.hero,
            board: state.board.clone(),
            enemies: state.enemies.clone(),
            power_ups: state.power_ups,
            hints: hints(state),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Number cells the math boost highlights
fn hints(state: &GameState) -> Vec<Position> {
    if state.power_ups.math_boost == 0 {
        return Vec::new();
    }
    let Some(board) = state.board.as_ref() else {
        return Vec::new();
    };
    board
        .iter()
        .filter_map(|(pos, cell)| match cell {
            Cell::Number(n) if rules::accepts(&state.rule, &state.collected, n) => Some(pos),
            _ => None,
        })
        .collect()
}

/// Text board: `H` hero, `E` enemy, `#` obstacle, `T`/`M`/`S` power-ups,
/// numbers as-is, `.` empty
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Level {}  Lives {}  Score {}  [{:?}]",
            self.level, self.lives, self.score, self.phase
        )?;
        writeln!(f, "{}  ({})", self.rule_description, self.progress)?;

        let Some(board) = self.board.as_ref() else {
            return writeln!(f, "{}", self.rule_title);
        };
        for (y, row) in board.rows().iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let pos = Position::new(x as u8, y as u8);
                let glyph = if pos == self.hero {
                    "H".to_string()
                } else if self.enemies.iter().any(|e| e.pos == pos) {
                    "E".to_string()
                } else {
                    match cell {
                        Cell::Empty => ".".to_string(),
                        Cell::Obstacle => "#".to_string(),
                        Cell::Number(n) => n.to_string(),
                        Cell::PowerUp(PowerUpKind::TimeFreeze) => "T".to_string(),
                        Cell::PowerUp(PowerUpKind::MathBoost) => "M".to_string(),
                        Cell::PowerUp(PowerUpKind::Shield) => "S".to_string(),
                    }
                };
                write!(f, "{:>3}", glyph)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
