mod config;

pub use config::{
    AlertConfig, Config, TimerConfig, MAX_ALERT_PULSES, MAX_TICK_INTERVAL_MS,
    MIN_TICK_INTERVAL_MS,
};

use std::path::PathBuf;

/// Returns `~/.config/eggtimer[-dev]/` based on EGGTIMER_ENV.
///
/// Set EGGTIMER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("EGGTIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("eggtimer-dev")
    } else {
        base_dir.join("eggtimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
