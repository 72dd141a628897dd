use crate::error::ValidationError;

/// Render whole seconds as `MM:SS`.
///
/// Minutes are not wrapped at 60, so `3661` renders as `61:01`.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Parse `MM:SS` (or a bare number of seconds) back into whole seconds.
pub fn parse_mmss(input: &str) -> Result<u64, ValidationError> {
    let invalid = |message: String| ValidationError::InvalidValue {
        field: "duration".into(),
        message,
    };
    let input = input.trim();

    let Some((min, sec)) = input.split_once(':') else {
        return input
            .parse::<u64>()
            .map_err(|_| invalid(format!("'{input}' is not MM:SS or a number of seconds")));
    };

    let minutes: u64 = min
        .parse()
        .map_err(|_| invalid(format!("'{min}' is not a number of minutes")))?;
    let seconds: u64 = sec
        .parse()
        .map_err(|_| invalid(format!("'{sec}' is not a number of seconds")))?;
    if seconds >= 60 {
        return Err(invalid(format!("seconds part {seconds} must be below 60")));
    }
    minutes
        .checked_mul(60)
        .and_then(|m| m.checked_add(seconds))
        .ok_or_else(|| invalid(format!("'{input}' is too large")))
}
