//! Log output for test runs.
//!
//! Helpers emit `tracing` events and spans: one `activity` span per activity,
//! a `debug` event per finished poll and a `warn` event per recorded failure.
//! Nothing is printed until a subscriber is installed; tests that want the
//! output call [`init_test_logging`].
//!
//! The filter comes from `APPTEST_LOG`, then `RUST_LOG`, and defaults to
//! `warn`:
//! - `APPTEST_LOG=debug` - every poll outcome
//! - `APPTEST_LOG=apptest=info` - activity spans around failures

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable read before `RUST_LOG`
pub const ENV_LOG: &str = "APPTEST_LOG";

const DEFAULT_FILTER: &str = "warn";

fn filter_from(apptest_log: Option<String>, rust_log: Option<String>) -> EnvFilter {
    apptest_log
        .or(rust_log)
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a subscriber that writes through the test harness's capture.
///
/// Returns `false` when a global subscriber was already installed, so every
/// test can call it.
pub fn init_test_logging() -> bool {
    let filter = filter_from(
        std::env::var(ENV_LOG).ok(),
        std::env::var(EnvFilter::DEFAULT_ENV).ok(),
    );

    let layer = fmt::layer()
        .with_test_writer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        let filter = filter_from(None, None);
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_apptest_log_wins() {
        let filter = filter_from(Some("debug".to_string()), Some("error".to_string()));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_rust_log_fallback() {
        let filter = filter_from(None, Some("apptest=info".to_string()));
        assert_eq!(filter.to_string(), "apptest=info");
    }

    #[test]
    fn test_invalid_directives_fall_back() {
        let filter = filter_from(Some("apptest=verbose".to_string()), None);
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn test_second_init_is_noop() {
        init_test_logging();
        assert!(!init_test_logging());
    }
}
