//! Game state and core simulation types
//!
//! Everything a renderer needs to draw a frame lives in [`GameState`]. The
//! state is replaced wholesale on reset and mutated only through
//! [`super::tick::apply`].

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of a run. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Level intro card is showing, waiting for the start button
    Intro,
    /// Active gameplay
    Playing,
    /// Rule satisfied, waiting for the delayed advance to the next level
    LevelComplete,
    /// Out of lives; only a reset leaves this phase
    GameOver,
}

/// Movement direction for the hero and enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Grid cell coordinates, always inside the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
}

impl Position {
    pub const MAX_X: u8 = (GRID_COLS - 1) as u8;
    pub const MAX_Y: u8 = (GRID_ROWS - 1) as u8;

    /// Create a position, clamping into the board
    pub fn new(x: u8, y: u8) -> Self {
        Self {
            x: x.min(Self::MAX_X),
            y: y.min(Self::MAX_Y),
        }
    }

    pub fn spawn() -> Self {
        Self::new(HERO_SPAWN.0, HERO_SPAWN.1)
    }

    /// Neighbouring cell in `dir`, clamped to the board edge
    pub fn step(self, dir: Direction) -> Self {
        match dir {
            Direction::Up => Self::new(self.x, self.y.saturating_sub(1)),
            Direction::Down => Self::new(self.x, self.y.saturating_add(1)),
            Direction::Left => Self::new(self.x.saturating_sub(1), self.y),
            Direction::Right => Self::new(self.x.saturating_add(1), self.y),
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    /// Enemies stop moving
    TimeFreeze,
    /// Cells that satisfy the rule are highlighted
    MathBoost,
    /// Enemy contact is harmless
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::TimeFreeze,
        PowerUpKind::MathBoost,
        PowerUpKind::Shield,
    ];

    /// Countdown length in seconds when picked up
    pub fn duration_secs(self) -> u32 {
        match self {
            PowerUpKind::TimeFreeze => TIME_FREEZE_SECS,
            PowerUpKind::MathBoost => MATH_BOOST_SECS,
            PowerUpKind::Shield => SHIELD_SECS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::TimeFreeze => "Time Freeze",
            PowerUpKind::MathBoost => "Math Boost",
            PowerUpKind::Shield => "Shield",
        }
    }
}

/// Contents of one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Number(u32),
    Obstacle,
    PowerUp(PowerUpKind),
}

/// 6 rows x 5 columns of cells, indexed `[y][x]`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; GRID_COLS]; GRID_ROWS],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.y as usize][pos.x as usize]
    }

    pub fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.y as usize][pos.x as usize] = cell;
    }

    /// Clear a collected cell back to empty
    pub fn clear(&mut self, pos: Position) {
        self.set(pos, Cell::Empty);
    }

    pub fn rows(&self) -> &[[Cell; GRID_COLS]; GRID_ROWS] {
        &self.cells
    }

    /// All cells with their positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &cell)| (Position::new(x as u8, y as u8), cell))
        })
    }
}

/// A patrolling enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Position,
    pub direction: Direction,
}

impl Enemy {
    pub fn new(x: u8, y: u8, direction: Direction) -> Self {
        Self {
            pos: Position::new(x, y),
            direction,
        }
    }
}

/// Remaining seconds on each power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PowerUps {
    pub time_freeze: u32,
    pub math_boost: u32,
    pub shield: u32,
}

/// The arithmetic win condition for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    /// Collect numbers summing exactly to `target`
    Addition { target: u32 },
    /// Pick the single number `n` with `secondary - n == target`
    Subtraction { secondary: u32, target: u32 },
    /// Collect three multiples of `target` no larger than 12
    Multiples { target: u32 },
}

impl Default for Rule {
    fn default() -> Self {
        Rule::Addition { target: 10 }
    }
}

/// Complete game state (deterministic given the injected RNG)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Current level (1-based)
    pub level: u32,
    /// Player lives
    pub lives: u8,
    /// Score (never negative)
    pub score: u32,
    /// Active rule
    pub rule: Rule,
    /// Numbers gathered toward the rule this level
    pub collected: Vec<u32>,
    /// Hero cell
    pub hero: Position,
    /// Board, `None` until the level is started
    pub board: Option<Board>,
    /// Enemies, in spawn order
    pub enemies: Vec<Enemy>,
    /// Power-up countdowns
    pub power_ups: PowerUps,
    /// Current phase
    pub phase: GamePhase,
}

impl GameState {
    /// Initial state of a run: level 1 intro with the default addition rule
    pub fn new() -> Self {
        Self {
            level: 1,
            lives: STARTING_LIVES,
            score: 0,
            rule: Rule::default(),
            collected: Vec::new(),
            hero: Position::spawn(),
            board: None,
            enemies: super::enemy::roster_for_level(1),
            power_ups: PowerUps::default(),
            phase: GamePhase::Intro,
        }
    }

    /// Cell under `pos`; a board that has not been generated yet is all empty
    pub fn cell(&self, pos: Position) -> Cell {
        self.board.as_ref().map_or(Cell::Empty, |b| b.get(pos))
    }

    pub fn enemy_at(&self, pos: Position) -> bool {
        self.enemies.iter().any(|e| e.pos == pos)
    }

    pub fn shielded(&self) -> bool {
        self.power_ups.shield > 0
    }

    pub fn frozen(&self) -> bool {
        self.power_ups.time_freeze > 0
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.rule, Rule::Addition { target: 10 });
        assert_eq!(state.hero, Position::new(2, 5));
        assert_eq!(state.enemies.len(), 2);
        assert!(state.board.is_none());
        assert_eq!(state.phase, GamePhase::Intro);
    }

    #[test]
    fn test_step_clamps_to_board() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.step(Direction::Up), corner);
        assert_eq!(corner.step(Direction::Left), corner);

        let far = Position::new(4, 5);
        assert_eq!(far.step(Direction::Right), far);
        assert_eq!(far.step(Direction::Down), far);
        assert_eq!(far.step(Direction::Up), Position::new(4, 4));
    }

    #[test]
    fn test_position_new_clamps() {
        assert_eq!(Position::new(9, 9), Position::new(4, 5));
    }

    #[test]
    fn test_board_set_and_iter() {
        let mut board = Board::empty();
        board.set(Position::new(1, 2), Cell::Number(7));
        assert_eq!(board.get(Position::new(1, 2)), Cell::Number(7));
        assert_eq!(board.iter().count(), GRID_COLS * GRID_ROWS);
        assert_eq!(
            board.iter().filter(|(_, c)| *c != Cell::Empty).count(),
            1
        );
        board.clear(Position::new(1, 2));
        assert_eq!(board, Board::empty());
    }

    #[test]
    fn test_cell_serializes_tagged() {
        let json = serde_json::to_string(&Cell::Number(4)).unwrap();
        assert_eq!(json, r#"{"type":"number","value":4}"#);
        let json = serde_json::to_string(&Cell::PowerUp(PowerUpKind::Shield)).unwrap();
        assert_eq!(json, r#"{"type":"power_up","value":"shield"}"#);
    }
}
