//! Hero Math - a grid arcade game for practicing arithmetic
//!
//! Core modules:
//! - `sim`: Deterministic game-state engine (grid, rules, enemies, power-ups)
//! - `game`: Timer-owning controller that feeds ticks and input into `sim`
//! - `input`: Keyboard mapping
//! - `settings`: Timer periods, seed and log level
//! - `snapshot`: Serializable view of the state for renderers

pub mod game;
pub mod input;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use game::Game;
pub use settings::{Settings, SettingsError};
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Board columns (x in 0..GRID_COLS)
    pub const GRID_COLS: usize = 5;
    /// Board rows (y in 0..GRID_ROWS)
    pub const GRID_ROWS: usize = 6;

    /// Hero spawn cell at the start of every level
    pub const HERO_SPAWN: (u8, u8) = (2, 5);

    /// Lives at the start of a run
    pub const STARTING_LIVES: u8 = 3;

    /// Power-up durations in seconds (one decay tick per second)
    pub const TIME_FREEZE_SECS: u32 = 10;
    pub const MATH_BOOST_SECS: u32 = 15;
    pub const SHIELD_SECS: u32 = 8;

    /// Score deltas
    pub const LEVEL_COMPLETE_BONUS: i32 = 100;
    pub const ADDITION_PROGRESS_POINTS: i32 = 10;
    pub const MULTIPLE_PROGRESS_POINTS: i32 = 20;
    pub const POWERUP_POINTS: i32 = 15;
    pub const PENALTY_POINTS: i32 = -5;

    /// Valid multiples must not exceed this value
    pub const MULTIPLES_CEILING: u32 = 12;
    /// Valid multiples needed to clear a multiples level
    pub const MULTIPLES_REQUIRED: usize = 3;

    /// Grid generation probabilities
    pub const NUMBER_CHANCE: f64 = 0.6;
    pub const OBSTACLE_CHANCE: f64 = 0.3;
    pub const POWERUP_BASE_CHANCE: f64 = 0.1;
    pub const POWERUP_CHANCE_PER_LEVEL: f64 = 0.05;
    /// Upper bound on the power-up chance so empty cells never vanish
    pub const POWERUP_CHANCE_MAX: f64 = 0.5;

    /// Default timer periods (milliseconds)
    pub const ENEMY_STEP_MS: u32 = 1000;
    pub const POWERUP_DECAY_MS: u32 = 1000;
    pub const LEVEL_ADVANCE_DELAY_MS: u32 = 2000;
}
