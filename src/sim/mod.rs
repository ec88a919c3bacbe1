//! Deterministic game-state engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Randomness only through an injected `rand::Rng`
//! - One action per transition, applied completely
//! - No timers, rendering or platform dependencies

pub mod enemy;
pub mod grid;
pub mod powerup;
pub mod rules;
pub mod state;
pub mod tick;

pub use rules::{Outcome, evaluate, rule_for_level};
pub use state::{
    Board, Cell, Direction, Enemy, GamePhase, GameState, Position, PowerUpKind, PowerUps, Rule,
};
pub use tick::{Action, BlockReason, GameEvent, TickKind, apply, transition};
