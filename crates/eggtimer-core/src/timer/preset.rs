use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Built-in egg doneness presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    Soft,
    Medium,
    Hard,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Soft, Preset::Medium, Preset::Hard];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Soft => "Soft",
            Preset::Medium => "Medium",
            Preset::Hard => "Hard",
        }
    }

    pub fn duration_secs(self) -> u64 {
        match self {
            Preset::Soft => 6 * 60,
            Preset::Medium => 8 * 60,
            Preset::Hard => 12 * 60,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::from_secs(self.duration_secs())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive lookup by preset name.
impl FromStr for Preset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ValidationError::UnknownPreset {
                name: name.to_string(),
            })
    }
}

/// Largest value a minutes or seconds picker offers.
pub const PICKER_MAX: u32 = 59;

/// Validate a `(minutes, seconds)` picker selection into a countdown length.
///
/// Each component must be in `0..=59` and the pair must not be `0:00`.
pub fn custom_duration(minutes: u32, seconds: u32) -> Result<Duration, ValidationError> {
    if minutes > PICKER_MAX {
        return Err(ValidationError::InvalidValue {
            field: "minutes".into(),
            message: format!("{minutes} is outside 0..={PICKER_MAX}"),
        });
    }
    if seconds > PICKER_MAX {
        return Err(ValidationError::InvalidValue {
            field: "seconds".into(),
            message: format!("{seconds} is outside 0..={PICKER_MAX}"),
        });
    }
    let duration = Duration::from_secs(u64::from(minutes) * 60 + u64::from(seconds));
    if duration.is_zero() {
        return Err(ValidationError::InvalidDuration { duration });
    }
    Ok(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_durations() {
        assert_eq!(Preset::Soft.duration(), Duration::from_secs(360));
        assert_eq!(Preset::Medium.duration(), Duration::from_secs(480));
        assert_eq!(Preset::Hard.duration(), Duration::from_secs(720));
    }

    #[test]
    fn preset_lookup_ignores_case() {
        assert_eq!("soft".parse::<Preset>(), Ok(Preset::Soft));
        assert_eq!(" MEDIUM ".parse::<Preset>(), Ok(Preset::Medium));
        assert_eq!("Hard".parse::<Preset>(), Ok(Preset::Hard));
    }

    #[test]
    fn unknown_preset_is_rejected() {
        let err = "runny".parse::<Preset>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownPreset {
                name: "runny".into()
            }
        );
    }

    #[test]
    fn custom_duration_bounds() {
        assert_eq!(custom_duration(3, 30), Ok(Duration::from_secs(210)));
        assert_eq!(custom_duration(0, 1), Ok(Duration::from_secs(1)));
        assert_eq!(custom_duration(59, 59), Ok(Duration::from_secs(3599)));
        assert!(matches!(
            custom_duration(0, 0),
            Err(ValidationError::InvalidDuration { .. })
        ));
        assert!(matches!(
            custom_duration(60, 0),
            Err(ValidationError::InvalidValue { .. })
        ));
        assert!(matches!(
            custom_duration(1, 60),
            Err(ValidationError::InvalidValue { .. })
        ));
    }
}
