//! Game settings
//!
//! Timer periods, an optional fixed seed and the log level. Settings are read
//! once at startup (a `data-settings` attribute in the browser, a JSON file on
//! native) and never written back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings text is not valid JSON for [`Settings`]
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A timer period of zero would fire forever
    #[error("{0} must be greater than zero")]
    ZeroPeriod(&'static str),
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Milliseconds between enemy steps
    pub enemy_step_ms: u32,
    /// Milliseconds per power-up countdown second
    pub powerup_decay_ms: u32,
    /// Pause on the level-complete screen before the next level
    pub level_advance_delay_ms: u32,
    /// Fixed RNG seed (clock-seeded when absent)
    pub seed: Option<u64>,
    /// `log` level name: error, warn, info, debug, trace, off
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enemy_step_ms: ENEMY_STEP_MS,
            powerup_decay_ms: POWERUP_DECAY_MS,
            level_advance_delay_ms: LEVEL_ADVANCE_DELAY_MS,
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Parse and validate settings JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.enemy_step_ms == 0 {
            return Err(SettingsError::ZeroPeriod("enemy_step_ms"));
        }
        if self.powerup_decay_ms == 0 {
            return Err(SettingsError::ZeroPeriod("powerup_decay_ms"));
        }
        if self.level_advance_delay_ms == 0 {
            return Err(SettingsError::ZeroPeriod("level_advance_delay_ms"));
        }
        Ok(())
    }

    /// Parsed log level, `Info` when unrecognised
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Settings from optional JSON, falling back to defaults on error.
    ///
    /// The error is handed back rather than logged because the log level
    /// itself comes from these settings.
    pub fn resolve(json: Option<&str>) -> (Self, Option<SettingsError>) {
        match json.map(Self::from_json) {
            Some(Ok(settings)) => (settings, None),
            Some(Err(e)) => (Self::default(), Some(e)),
            None => (Self::default(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.enemy_step_ms, 1000);
        assert_eq!(s.powerup_decay_ms, 1000);
        assert_eq!(s.level_advance_delay_ms, 2000);
        assert_eq!(s.seed, None);
        assert_eq!(s.log_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let s = Settings::from_json(r#"{"seed": 7, "enemy_step_ms": 500}"#).unwrap();
        assert_eq!(s.seed, Some(7));
        assert_eq!(s.enemy_step_ms, 500);
        assert_eq!(s.level_advance_delay_ms, 2000);
    }

    #[test]
    fn test_rejects_zero_period() {
        let err = Settings::from_json(r#"{"powerup_decay_ms": 0}"#).unwrap_err();
        assert!(matches!(err, SettingsError::ZeroPeriod("powerup_decay_ms")));
        assert_eq!(err.to_string(), "powerup_decay_ms must be greater than zero");
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_resolve_falls_back() {
        let (s, err) = Settings::resolve(None);
        assert_eq!(s, Settings::default());
        assert!(err.is_none());

        let (s, err) = Settings::resolve(Some(r#"{"enemy_step_ms": 0}"#));
        assert_eq!(s, Settings::default());
        assert!(matches!(err, Some(SettingsError::ZeroPeriod("enemy_step_ms"))));

        let (s, err) = Settings::resolve(Some(r#"{"log_level": "debug"}"#));
        assert!(err.is_none());
        assert_eq!(s.log_level_filter(), log::LevelFilter::Debug);
        assert_eq!(Settings { log_level: "loud".into(), ..s }.log_level_filter(), log::LevelFilter::Info);
    }
}
