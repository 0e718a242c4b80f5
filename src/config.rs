//! Configuration loading
//!
//! Optional `dailies.toml` in the data directory. Everything has a default;
//! the file only exists to move the weekly reset boundary or to override the
//! rotating timer table. Timer anchors are RFC 3339 strings, e.g.
//!
//! ```toml
//! weekly_reset_day = "sunday"
//!
//! [[timers]]
//! id = "Baro Ki'Teer"
//! anchor = "2025-07-11T13:00:00Z"
//! period_days = 14
//! presence_hours = 48
//! ```
//!
//! A malformed file is rejected at startup, before the reconciler or
//! calculator ever run.

use chrono::{DateTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::catalog::RotatingTimer;
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Weekday of the weekly reset boundary (UTC)
    #[serde(default = "default_weekly_reset_day")]
    pub weekly_reset_day: String,

    /// Override for the rotating timer table; empty means builtin
    #[serde(default)]
    pub timers: Vec<TimerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            weekly_reset_day: default_weekly_reset_day(),
            timers: Vec::new(),
        }
    }
}

fn default_weekly_reset_day() -> String {
    "sunday".to_string()
}

/// One rotating timer definition in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    pub id: String,
    pub anchor: DateTime<Utc>,
    pub period_days: i64,
    #[serde(default)]
    pub presence_hours: i64,
}

impl From<&TimerConfig> for RotatingTimer {
    fn from(timer: &TimerConfig) -> Self {
        RotatingTimer::new(
            timer.id.clone(),
            timer.anchor,
            timer.period_days,
            timer.presence_hours,
        )
    }
}

impl Config {
    /// Load and validate a configuration file
    ///
    /// A file that does not parse is as much a configuration error as one
    /// that fails validation.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|err| Error::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the storage's config file, or defaults when missing
    ///
    /// A present-but-invalid file is an error, not a silent fallback; a
    /// mistyped reset day or timer period should never go unnoticed.
    pub fn load_from_storage(storage: &Storage) -> Result<Self> {
        let path = storage.config_file();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse the configured weekly reset day
    pub fn reset_weekday(&self) -> Result<Weekday> {
        self.weekly_reset_day.trim().parse::<Weekday>().map_err(|_| {
            Error::InvalidConfig(format!(
                "weekly_reset_day: invalid weekday '{}'",
                self.weekly_reset_day
            ))
        })
    }

    /// Rotating timer override, if any
    pub fn timer_overrides(&self) -> Option<Vec<RotatingTimer>> {
        if self.timers.is_empty() {
            None
        } else {
            Some(self.timers.iter().map(RotatingTimer::from).collect())
        }
    }

    fn validate(&self) -> Result<()> {
        self.reset_weekday()?;
        for timer in &self.timers {
            RotatingTimer::from(timer).validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert_eq!(cfg.weekly_reset_day, "sunday");
        assert_eq!(cfg.reset_weekday().unwrap(), Weekday::Sun);
        assert!(cfg.timer_overrides().is_none());
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dailies.toml");
        let content = r#"
weekly_reset_day = "monday"

[[timers]]
id = "Baro Ki'Teer"
anchor = "2025-07-11T13:00:00Z"
period_days = 14
presence_hours = 48

[[timers]]
id = "Tenet Weapon Reset"
anchor = "2025-07-03T00:00:00Z"
period_days = 4
"#;
        fs::write(&path, content.trim()).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.reset_weekday().unwrap(), Weekday::Mon);
        let timers = cfg.timer_overrides().expect("timers");
        assert_eq!(timers.len(), 2);
        assert_eq!(timers[0].presence_hours, 48);
        // presence_hours defaults to zero when omitted.
        assert_eq!(timers[1].presence_hours, 0);
    }

    #[test]
    fn invalid_weekday_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dailies.toml");
        fs::write(&path, "weekly_reset_day = \"someday\"").expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn syntax_error_is_invalid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dailies.toml");
        fs::write(&path, "weekly_reset_day = [").expect("write config");

        let err = Config::load(&path).expect_err("syntax error");
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(err.exit_code(), crate::error::exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn invalid_timer_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dailies.toml");
        let content = r#"
[[timers]]
id = "Broken"
anchor = "2025-07-03T00:00:00Z"
period_days = 0
"#;
        fs::write(&path, content.trim()).expect("write config");

        let err = Config::load(&path).expect_err("invalid config");
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn missing_file_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = Storage::new(dir.path().to_path_buf());
        let cfg = Config::load_from_storage(&storage).expect("defaults");
        assert_eq!(cfg.weekly_reset_day, "sunday");
    }
}
