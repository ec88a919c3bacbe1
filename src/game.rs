//! Game controller
//!
//! Owns the single [`GameState`], the RNG and the three timers that drive it:
//! - enemy steps, running only while a level is in play and time is not frozen
//! - power-up decay, running only while a level is in play and a power-up is active
//! - the one-shot delay from level complete to the next level
//!
//! After every transition the timers are re-checked against their enabling
//! condition and cancelled as soon as it no longer holds, so a tick can never
//! land on a state it was not scheduled for.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::input;
use crate::settings::Settings;
use crate::sim::{Action, GameEvent, GamePhase, GameState, TickKind, tick};
use crate::snapshot::Snapshot;

/// Countdown timer measured in milliseconds of game time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    period_ms: u32,
    elapsed_ms: u32,
    armed: bool,
}

impl Timer {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            elapsed_ms: 0,
            armed: false,
        }
    }

    /// Start counting a full period from now
    pub fn arm(&mut self) {
        self.armed = true;
        self.elapsed_ms = 0;
    }

    pub fn cancel(&mut self) {
        self.armed = false;
        self.elapsed_ms = 0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Milliseconds until the next firing, if armed
    pub fn remaining_ms(&self) -> Option<u32> {
        self.armed.then(|| self.period_ms - self.elapsed_ms)
    }

    fn advance(&mut self, dt_ms: u32) {
        if self.armed {
            self.elapsed_ms = (self.elapsed_ms + dt_ms).min(self.period_ms);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerSlot {
    Enemy,
    PowerUp,
    LevelAdvance,
}

impl TimerSlot {
    const ALL: [TimerSlot; 3] = [TimerSlot::Enemy, TimerSlot::PowerUp, TimerSlot::LevelAdvance];

    fn action(self) -> Action {
        match self {
            TimerSlot::Enemy => Action::Tick(TickKind::Enemy),
            TimerSlot::PowerUp => Action::Tick(TickKind::PowerUp),
            TimerSlot::LevelAdvance => Action::AdvanceLevel,
        }
    }

    fn periodic(self) -> bool {
        !matches!(self, TimerSlot::LevelAdvance)
    }
}

/// Which timers are currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerStatus {
    pub enemy: bool,
    pub power_up: bool,
    pub level_advance: bool,
}

/// Sole owner and mutator of the game state
#[derive(Debug, Clone)]
pub struct Game {
    state: GameState,
    rng: Pcg32,
    settings: Settings,
    enemy_timer: Timer,
    powerup_timer: Timer,
    advance_timer: Timer,
}

impl Game {
    /// New run. `fallback_seed` is used unless the settings pin a seed.
    pub fn new(settings: Settings, fallback_seed: u64) -> Self {
        Self::from_state(settings, GameState::new(), fallback_seed)
    }

    /// Controller around an existing state, with timers matching its phase
    pub fn from_state(settings: Settings, state: GameState, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        log::info!("Game initialized with seed: {}", seed);
        let mut game = Self {
            state,
            rng: Pcg32::seed_from_u64(seed),
            enemy_timer: Timer::new(settings.enemy_step_ms),
            powerup_timer: Timer::new(settings.powerup_decay_ms),
            advance_timer: Timer::new(settings.level_advance_delay_ms),
            settings,
        };
        game.sync_timers(&[]);
        game
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_state(&self.state)
    }

    pub fn timers(&self) -> TimerStatus {
        TimerStatus {
            enemy: self.enemy_timer.is_armed(),
            power_up: self.powerup_timer.is_armed(),
            level_advance: self.advance_timer.is_armed(),
        }
    }

    /// Apply one action and bring the timers in line with the new state
    pub fn dispatch(&mut self, action: Action) -> Vec<GameEvent> {
        let events = tick::apply(&mut self.state, action, &mut self.rng);
        self.sync_timers(&events);
        events
    }

    /// Feed a `KeyboardEvent.key`; `None` when the key is not bound
    pub fn handle_key(&mut self, key: &str) -> Option<Vec<GameEvent>> {
        input::action_for_key(key).map(|action| self.dispatch(action))
    }

    pub fn start_level(&mut self) -> Vec<GameEvent> {
        self.dispatch(Action::StartLevel)
    }

    pub fn reset(&mut self) -> Vec<GameEvent> {
        self.dispatch(Action::Reset)
    }

    /// Let `dt_ms` of time pass, firing due timers in the order they come due.
    pub fn update(&mut self, dt_ms: u32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut budget = dt_ms;

        loop {
            match self.next_due() {
                Some((slot, remaining)) if remaining <= budget => {
                    self.advance_timers(remaining);
                    budget -= remaining;

                    let timer = self.timer_mut(slot);
                    if slot.periodic() {
                        timer.arm();
                    } else {
                        timer.cancel();
                    }
                    events.extend(self.dispatch(slot.action()));
                }
                _ => {
                    self.advance_timers(budget);
                    break;
                }
            }
        }

        events
    }

    fn next_due(&self) -> Option<(TimerSlot, u32)> {
        TimerSlot::ALL
            .iter()
            .filter_map(|&slot| self.timer(slot).remaining_ms().map(|ms| (slot, ms)))
            .min_by_key(|&(_, ms)| ms)
    }

    fn advance_timers(&mut self, dt_ms: u32) {
        for slot in TimerSlot::ALL {
            self.timer_mut(slot).advance(dt_ms);
        }
    }

    fn timer(&self, slot: TimerSlot) -> &Timer {
        match slot {
            TimerSlot::Enemy => &self.enemy_timer,
            TimerSlot::PowerUp => &self.powerup_timer,
            TimerSlot::LevelAdvance => &self.advance_timer,
        }
    }

    fn timer_mut(&mut self, slot: TimerSlot) -> &mut Timer {
        match slot {
            TimerSlot::Enemy => &mut self.enemy_timer,
            TimerSlot::PowerUp => &mut self.powerup_timer,
            TimerSlot::LevelAdvance => &mut self.advance_timer,
        }
    }

    fn enabled(&self, slot: TimerSlot) -> bool {
        let state = &self.state;
        match slot {
            TimerSlot::Enemy => state.is_playing() && !state.frozen(),
            TimerSlot::PowerUp => state.is_playing() && state.power_ups.any_active(),
            TimerSlot::LevelAdvance => state.phase == GamePhase::LevelComplete,
        }
    }

    fn sync_timers(&mut self, events: &[GameEvent]) {
        // A fresh pickup restarts the decay period
        let picked_up = events
            .iter()
            .any(|e| matches!(e, GameEvent::PowerUpCollected { .. }));

        for slot in TimerSlot::ALL {
            let enabled = self.enabled(slot);
            let timer = self.timer_mut(slot);
            match (enabled, timer.is_armed()) {
                (true, false) => {
                    timer.arm();
                    log::debug!("{:?} timer armed", slot);
                }
                (false, true) => {
                    timer.cancel();
                    log::debug!("{:?} timer cancelled", slot);
                }
                (true, true) if slot == TimerSlot::PowerUp && picked_up => timer.arm(),
                _ => {}
            }
        }
    }
}
