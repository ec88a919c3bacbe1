//! Power-up countdowns

use super::state::{PowerUpKind, PowerUps};

impl PowerUps {
    /// Start (or restart) a power-up at its full duration. Re-collecting the
    /// same kind resets the countdown instead of stacking.
    pub fn activate(&mut self, kind: PowerUpKind) {
        *self.slot_mut(kind) = kind.duration_secs();
    }

    /// One second of decay on every counter, floored at zero
    pub fn tick(&mut self) {
        self.time_freeze = self.time_freeze.saturating_sub(1);
        self.math_boost = self.math_boost.saturating_sub(1);
        self.shield = self.shield.saturating_sub(1);
    }

    pub fn remaining(&self, kind: PowerUpKind) -> u32 {
        match kind {
            PowerUpKind::TimeFreeze => self.time_freeze,
            PowerUpKind::MathBoost => self.math_boost,
            PowerUpKind::Shield => self.shield,
        }
    }

    pub fn any_active(&self) -> bool {
        self.time_freeze > 0 || self.math_boost > 0 || self.shield > 0
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> &mut u32 {
        match kind {
            PowerUpKind::TimeFreeze => &mut self.time_freeze,
            PowerUpKind::MathBoost => &mut self.math_boost,
            PowerUpKind::Shield => &mut self.shield,
        }
    }
}

/// Pure form of [`PowerUps::tick`]
pub fn tick(power_ups: PowerUps) -> PowerUps {
    let mut next = power_ups;
    next.tick();
    next
}
