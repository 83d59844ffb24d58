//! Logging initialization.
//!
//! The subscriber is only compiled in with the `telemetry` feature so that
//! library crates can depend on `jobportal-core` without pulling in
//! `tracing-subscriber`.

#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::JobPortalResult;

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Parses `json`; anything else is pretty output.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Default filter directives used when `RUST_LOG` is not set.
#[must_use]
pub fn default_directives(log_level: &str) -> String {
    format!("{log_level},jobportal_cache=debug,jobportal_rest=debug,tower_http=debug")
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`.
#[cfg(feature = "telemetry")]
pub fn init_logging(log_level: &str, format: LogFormat) -> JobPortalResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
    };

    result.map_err(|e| crate::JobPortalError::Internal(format!("Failed to init logging: {}", e)))?;

    tracing::info!(log_level = %log_level, format = ?format, "Logging initialized");
    Ok(())
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_logging(_log_level: &str, _format: LogFormat) -> JobPortalResult<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("anything"), LogFormat::Pretty);
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(
            default_directives("warn"),
            "warn,jobportal_cache=debug,jobportal_rest=debug,tower_http=debug"
        );
    }
}
