//! Human-readable TTL parsing ("5 minutes", "30 seconds", "1h 30m").

use jobportal_core::{JobPortalError, JobPortalResult};
use std::time::Duration;

/// Parses a human-readable duration.
///
/// Accepts anything `humantime` accepts, plus whitespace between the
/// number and its unit (`"5 minutes"`). A bare number is read as seconds.
/// Zero durations are rejected because a zero TTL would never serve a hit.
pub fn parse_ttl(input: &str) -> JobPortalResult<Duration> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(JobPortalError::Configuration("TTL must not be empty".to_string()));
    }

    let duration = if let Ok(secs) = trimmed.parse::<u64>() {
        Duration::from_secs(secs)
    } else {
        humantime::parse_duration(&join_units(trimmed)).map_err(|e| {
            JobPortalError::Configuration(format!("Invalid TTL '{}': {}", input, e))
        })?
    };

    if duration.is_zero() {
        return Err(JobPortalError::Configuration(format!("TTL '{}' must be positive", input)));
    }
    Ok(duration)
}

/// Glues each number to the unit that follows it: `"1 hour 30 minutes"`
/// becomes `"1hour 30minutes"`.
fn join_units(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_digit = false;
    for token in input.split_whitespace() {
        let starts_alpha = token.chars().next().is_some_and(char::is_alphabetic);
        if !out.is_empty() && !(last_was_digit && starts_alpha) {
            out.push(' ');
        }
        out.push_str(token);
        last_was_digit = token.chars().last().is_some_and(|c| c.is_ascii_digit());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spaced_units() {
        assert_eq!(parse_ttl("5 minutes").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_ttl("30 seconds").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_ttl("1 hour 30 minutes").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn test_parse_compact_units() {
        assert_eq!(parse_ttl("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_ttl("10m").unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn test_bare_number_is_seconds() {
        assert_eq!(parse_ttl("45").unwrap(), Duration::from_secs(45));
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(parse_ttl("").is_err());
        assert!(parse_ttl("0").is_err());
        assert!(parse_ttl("five minutes").is_err());
    }

    #[test]
    fn test_join_units() {
        assert_eq!(join_units("1 hour 30 minutes"), "1hour 30minutes");
        assert_eq!(join_units("1h 30m"), "1h 30m");
    }
}
