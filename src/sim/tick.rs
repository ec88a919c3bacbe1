//! Game state transitions
//!
//! Every input and every timer firing becomes an [`Action`]. [`apply`]
//! advances the state by exactly one action and reports what happened as a
//! list of [`GameEvent`]s; it never fails and never leaves the state half
//! updated.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy;
use super::grid;
use super::rules::{self, Outcome};
use super::state::{Cell, Direction, GamePhase, GameState, Position, PowerUpKind, Rule};
use crate::consts::*;

/// Periodic timer sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickKind {
    /// Enemy patrol step
    Enemy,
    /// One second of power-up decay
    PowerUp,
}

/// Everything that can change the game state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "arg", rename_all = "snake_case")]
pub enum Action {
    MoveHero(Direction),
    CollectAttempt,
    Tick(TickKind),
    StartLevel,
    AdvanceLevel,
    Reset,
}

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockReason {
    Edge,
    Obstacle,
}

/// Observable result of a transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Action not allowed in the current phase; state untouched
    ActionIgnored { action: Action },
    HeroMoved { to: Position },
    MoveBlocked { reason: BlockReason },
    /// Collect pressed on an empty cell
    NothingToCollect,
    NumberCollected { value: u32, outcome: Outcome },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    EnemiesMoved,
    PowerUpsDecayed,
    /// Enemy contact without a shield, or a rule penalty
    LifeLost { lives_left: u8 },
    BoardRegenerated,
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    LevelAdvanced { level: u32, rule: Rule },
    GameOver { score: u32 },
    GameReset,
}

/// Apply one action to `state` in place.
pub fn apply<R: Rng + ?Sized>(state: &mut GameState, action: Action, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !allowed(state.phase, action) {
        log::debug!("Ignoring {:?} during {:?}", action, state.phase);
        events.push(GameEvent::ActionIgnored { action });
        return events;
    }

    match action {
        Action::MoveHero(dir) => move_hero(state, dir, &mut events),
        Action::CollectAttempt => collect(state, rng, &mut events),
        Action::Tick(TickKind::Enemy) => step_enemies(state, &mut events),
        Action::Tick(TickKind::PowerUp) => decay_power_ups(state, &mut events),
        Action::StartLevel => start_level(state, rng, &mut events),
        Action::AdvanceLevel => advance_level(state, rng, &mut events),
        Action::Reset => {
            *state = GameState::new();
            log::info!("Game reset");
            events.push(GameEvent::GameReset);
        }
    }

    events
}

/// Pure form of [`apply`]: returns the next state and leaves `state` alone.
pub fn transition<R: Rng + ?Sized>(
    state: &GameState,
    action: Action,
    rng: &mut R,
) -> (GameState, Vec<GameEvent>) {
    let mut next = state.clone();
    let events = apply(&mut next, action, rng);
    (next, events)
}

/// Phase gating for each action
fn allowed(phase: GamePhase, action: Action) -> bool {
    match action {
        Action::Reset => true,
        Action::StartLevel => phase == GamePhase::Intro,
        Action::AdvanceLevel => phase == GamePhase::LevelComplete,
        Action::MoveHero(_) | Action::CollectAttempt | Action::Tick(_) => {
            phase == GamePhase::Playing
        }
    }
}

fn move_hero(state: &mut GameState, dir: Direction, events: &mut Vec<GameEvent>) {
    let target = state.hero.step(dir);

    if target == state.hero {
        events.push(GameEvent::MoveBlocked {
            reason: BlockReason::Edge,
        });
        return;
    }
    if state.cell(target) == Cell::Obstacle {
        events.push(GameEvent::MoveBlocked {
            reason: BlockReason::Obstacle,
        });
        return;
    }

    // Walking into an enemy costs a life and the hero stays put
    if state.enemy_at(target) && !state.shielded() {
        log::info!("Hero walked into an enemy at {:?}", target);
        lose_lives(state, 1, events);
        return;
    }

    state.hero = target;
    events.push(GameEvent::HeroMoved { to: target });
}

fn collect<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    let pos = state.hero;
    match state.cell(pos) {
        Cell::Number(value) => {
            let outcome = rules::evaluate(&state.rule, &state.collected, value);
            state.collected = outcome.collected().to_vec();
            state.score = state.score.saturating_add_signed(outcome.score_delta());

            if outcome.consumes() {
                clear_cell(state, pos);
            }

            let completed = matches!(outcome, Outcome::LevelComplete { .. });
            let lives_lost = outcome.lives_lost();
            events.push(GameEvent::NumberCollected { value, outcome });

            if lives_lost > 0 {
                // An overshot sum gets a fresh board to build from
                if matches!(state.rule, Rule::Addition { .. }) {
                    state.board = Some(grid::generate(state.level, &state.rule, pos, rng));
                    events.push(GameEvent::BoardRegenerated);
                }
                lose_lives(state, lives_lost, events);
            } else if completed {
                log::info!("Level {} complete (score {})", state.level, state.score);
                state.phase = GamePhase::LevelComplete;
                events.push(GameEvent::LevelComplete { level: state.level });
            }
        }
        Cell::PowerUp(kind) => {
            clear_cell(state, pos);
            state.power_ups.activate(kind);
            state.score = state.score.saturating_add_signed(POWERUP_POINTS);
            log::debug!("Activated {} for {}s", kind.label(), kind.duration_secs());
            events.push(GameEvent::PowerUpCollected { kind });
        }
        Cell::Empty | Cell::Obstacle => events.push(GameEvent::NothingToCollect),
    }
}

fn clear_cell(state: &mut GameState, pos: Position) {
    if let Some(board) = state.board.as_mut() {
        board.clear(pos);
    }
}

fn step_enemies(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.frozen() {
        events.push(GameEvent::ActionIgnored {
            action: Action::Tick(TickKind::Enemy),
        });
        return;
    }

    enemy::advance_all(&mut state.enemies);
    events.push(GameEvent::EnemiesMoved);

    if state.enemy_at(state.hero) && !state.shielded() {
        log::info!("Enemy caught the hero at {:?}", state.hero);
        lose_lives(state, 1, events);
    }
}

fn decay_power_ups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let before = state.power_ups;
    state.power_ups.tick();
    events.push(GameEvent::PowerUpsDecayed);

    for kind in PowerUpKind::ALL {
        if before.remaining(kind) > 0 && state.power_ups.remaining(kind) == 0 {
            log::debug!("{} expired", kind.label());
            events.push(GameEvent::PowerUpExpired { kind });
        }
    }
}

fn start_level<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    state.board = Some(grid::generate(state.level, &state.rule, state.hero, rng));
    state.phase = GamePhase::Playing;
    log::info!("Level {} started: {}", state.level, state.rule.description());
    events.push(GameEvent::LevelStarted { level: state.level });
}

fn advance_level<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, events: &mut Vec<GameEvent>) {
    state.level += 1;
    state.rule = rules::rule_for_level(state.level, rng);
    state.collected.clear();
    state.hero = Position::spawn();
    state.enemies = enemy::roster_for_level(state.level);
    state.board = None;
    state.phase = GamePhase::Intro;
    log::info!("Advanced to level {} with {:?}", state.level, state.rule);
    events.push(GameEvent::LevelAdvanced {
        level: state.level,
        rule: state.rule,
    });
}

fn lose_lives(state: &mut GameState, n: u8, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(n);
    events.push(GameEvent::LifeLost {
        lives_left: state.lives,
    });
    if state.lives == 0 {
        state.phase = GamePhase::GameOver;
        log::info!("Game over at level {} with score {}", state.level, state.score);
        events.push(GameEvent::GameOver { score: state.score });
    }
}
