//! # Telemetry
//!
//! Structured logging setup.
//!
//! ## Log Levels
//! - `RUST_LOG=debug` - Show debug messages
//! - `RUST_LOG=mesa_service=trace` - Trace the service crate only
//! - unset - fall back to the configured `[logging] filter`

use tracing_subscriber::EnvFilter;

use crate::config::{default_log_filter, LoggingSettings};

/// Builds the filter: `RUST_LOG` first, then the configured directive, then
/// the built-in default.
pub fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.filter))
        .unwrap_or_else(|_| EnvFilter::new(default_log_filter()))
}

/// Installs the global fmt subscriber.
///
/// Returns false if a subscriber was already installed, so tests and
/// embedding hosts may call this more than once.
pub fn init_tracing(settings: &LoggingSettings) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(settings))
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        let settings = LoggingSettings::default();
        let _ = init_tracing(&settings);
        assert!(!init_tracing(&settings));
    }

    #[test]
    fn test_bad_filter_falls_back() {
        let settings = LoggingSettings {
            filter: "mesa=notalevel[".into(),
        };
        // Must not panic.
        let _ = build_filter(&settings);
    }
}
