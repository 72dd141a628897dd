//! Core error types for eggtimer-core.
//!
//! Errors are grouped by concern with thiserror; `CoreError` wraps them all
//! for callers that do not care which layer failed.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Core error type for eggtimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Alert delivery errors
    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Input validation errors raised before a session is created.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Zero-length countdowns are never started.
    #[error("Invalid duration: {duration:?} (a countdown must be longer than zero)")]
    InvalidDuration { duration: Duration },

    /// Preset name lookup failed
    #[error("Unknown preset '{name}' (expected one of: Soft, Medium, Hard)")]
    UnknownPreset { name: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Alert delivery errors. These stay on the presentation side and never
/// reach the timer engine.
#[derive(Error, Debug)]
pub enum AlertError {
    /// No sound could be located or opened
    #[error("Sound unavailable: {0}")]
    SoundUnavailable(String),

    /// The external player command exited unsuccessfully
    #[error("Alert command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
