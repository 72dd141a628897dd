//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Polling granularity of the countdown
//! - Completion alert behaviour (pulse count, spacing, jitter, sound)
//!
//! Configuration is stored at `~/.config/eggtimer/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_dir;
use crate::alert::AlertPlan;
use crate::error::ConfigError;

/// Bounds for the polling interval. Finer than the display granularity,
/// coarse enough to keep idle CPU negligible.
pub const MIN_TICK_INTERVAL_MS: u64 = 10;
pub const MAX_TICK_INTERVAL_MS: u64 = 500;
pub const MAX_ALERT_PULSES: u32 = 20;

/// Countdown polling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Completion alert configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_pulses")]
    pub pulses: u32,
    #[serde(default = "default_pulse_spacing_ms")]
    pub pulse_spacing_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    /// Shell command used to play the alert sound (optional).
    /// If unset or failing, a terminal bell is used instead.
    #[serde(default)]
    pub sound_command: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/eggtimer/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub alert: AlertConfig,
}

fn default_tick_interval_ms() -> u64 {
    100
}
fn default_true() -> bool {
    true
}
fn default_pulses() -> u32 {
    3
}
fn default_pulse_spacing_ms() -> u64 {
    600
}
fn default_jitter_ms() -> u64 {
    250
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pulses: default_pulses(),
            pulse_spacing_ms: default_pulse_spacing_ms(),
            jitter_ms: default_jitter_ms(),
            sound_command: None,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ if value.is_empty() => serde_json::Value::Null,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default on-disk location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/eggtimer"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if nothing exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content)?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value in memory by dot-separated key, validating the result.
    /// The config is left untouched on error.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by key and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// or is out of range, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tick = self.timer.tick_interval_ms;
        if !(MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS).contains(&tick) {
            return Err(ConfigError::InvalidValue {
                key: "timer.tick_interval_ms".into(),
                message: format!(
                    "{tick} is outside {MIN_TICK_INTERVAL_MS}..={MAX_TICK_INTERVAL_MS}"
                ),
            });
        }
        if self.alert.pulses > MAX_ALERT_PULSES {
            return Err(ConfigError::InvalidValue {
                key: "alert.pulses".into(),
                message: format!("{} exceeds {MAX_ALERT_PULSES}", self.alert.pulses),
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timer.tick_interval_ms)
    }

    pub fn alert_plan(&self) -> AlertPlan {
        AlertPlan {
            pulses: if self.alert.enabled { self.alert.pulses } else { 0 },
            spacing: Duration::from_millis(self.alert.pulse_spacing_ms),
            jitter: Duration::from_millis(self.alert.jitter_ms),
        }
    }
}
