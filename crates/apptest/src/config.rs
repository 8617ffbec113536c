//! Configuration
//!
//! One explicit value, owned by a [`TestContext`](crate::context::TestContext),
//! replaces a process-wide mutable default timeout. Suites build it in code,
//! from a YAML file, or from `APPTEST_*` environment variables.

use crate::poll::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS};
use crate::report::FailureMode;
use crate::result::{AppTestError, AppTestResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding the default timeout (milliseconds)
pub const ENV_DEFAULT_TIMEOUT_MS: &str = "APPTEST_DEFAULT_TIMEOUT_MS";

/// Environment variable overriding the poll interval (milliseconds)
pub const ENV_POLL_INTERVAL_MS: &str = "APPTEST_POLL_INTERVAL_MS";

/// Environment variable selecting the failure mode (`collect` or `fail_fast`)
pub const ENV_FAILURE_MODE: &str = "APPTEST_FAILURE_MODE";

/// Sub-millisecond durations round up so a short non-zero wait never becomes
/// an immediate check.
fn millis_rounded_up(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}

/// Configuration shared by every helper run through a context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppTestConfig {
    /// Timeout for helpers that do not receive one explicitly
    pub default_timeout_ms: u64,
    /// Interval between condition evaluations
    pub poll_interval_ms: u64,
    /// Whether a failed assertion stops the test
    pub failure_mode: FailureMode,
}

impl Default for AppTestConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: DEFAULT_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            failure_mode: FailureMode::Collect,
        }
    }
}

impl AppTestConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default timeout, rounded up to whole milliseconds
    #[must_use]
    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = millis_rounded_up(timeout);
        self
    }

    /// Set the poll interval, rounded up to whole milliseconds
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = millis_rounded_up(interval);
        self
    }

    /// Set the failure mode
    #[must_use]
    pub const fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    /// Default timeout as a `Duration`
    #[must_use]
    pub const fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// Poll interval as a `Duration`
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Wait options derived from this config
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::new()
            .with_timeout(self.default_timeout())
            .with_poll_interval(self.poll_interval())
    }

    /// Check that values are usable
    pub fn validate(&self) -> AppTestResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(AppTestError::invalid_config(
                "poll_interval_ms must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> AppTestResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a YAML config file
    pub fn load(path: impl AsRef<Path>) -> AppTestResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overridden by `APPTEST_*` environment variables
    pub fn from_env() -> AppTestResult<Self> {
        Self::default().merge_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the `APPTEST_*` variable names
    pub fn merge_env<F>(mut self, lookup: F) -> AppTestResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_DEFAULT_TIMEOUT_MS) {
            self.default_timeout_ms = parse_millis(ENV_DEFAULT_TIMEOUT_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = parse_millis(ENV_POLL_INTERVAL_MS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_FAILURE_MODE) {
            self.failure_mode = raw.trim().parse()?;
        }
        self.validate()?;
        Ok(self)
    }
}

fn parse_millis(key: &str, raw: &str) -> AppTestResult<u64> {
    raw.trim().parse().map_err(|_| {
        AppTestError::invalid_config(format!(
            "{key}: '{raw}' is not a whole number of milliseconds"
        ))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    mod defaults {
        use super::*;

        #[test]
        fn test_default_timeout_is_eight_seconds() {
            let config = AppTestConfig::default();
            assert_eq!(config.default_timeout(), Duration::from_secs(8));
            assert_eq!(config.poll_interval(), Duration::from_millis(50));
            assert_eq!(config.failure_mode, FailureMode::Collect);
        }

        #[test]
        fn test_builders() {
            let config = AppTestConfig::new()
                .with_default_timeout(Duration::from_secs(3))
                .with_poll_interval(Duration::from_millis(10))
                .with_failure_mode(FailureMode::FailFast);
            assert_eq!(config.default_timeout_ms, 3_000);
            assert_eq!(config.poll_interval_ms, 10);
            assert_eq!(config.failure_mode, FailureMode::FailFast);
        }

        #[test]
        fn test_builders_round_up_to_whole_millis() {
            let config = AppTestConfig::new()
                .with_default_timeout(Duration::from_micros(900))
                .with_poll_interval(Duration::from_micros(1_500));
            assert_eq!(config.default_timeout_ms, 1);
            assert_eq!(config.poll_interval_ms, 2);
            assert!(config.validate().is_ok());

            let exact = AppTestConfig::new().with_default_timeout(Duration::from_millis(5));
            assert_eq!(exact.default_timeout_ms, 5);

            let zero = AppTestConfig::new().with_default_timeout(Duration::ZERO);
            assert_eq!(zero.default_timeout_ms, 0);
        }

        #[test]
        fn test_huge_duration_saturates() {
            let config = AppTestConfig::new().with_default_timeout(Duration::MAX);
            assert_eq!(config.default_timeout_ms, u64::MAX);
        }

        #[test]
        fn test_wait_options() {
            let config = AppTestConfig::new().with_default_timeout(Duration::from_secs(2));
            let opts = config.wait_options();
            assert_eq!(opts.timeout(), Duration::from_secs(2));
            assert_eq!(opts.poll_interval(), Duration::from_millis(50));
        }

        #[test]
        fn test_validate_rejects_zero_interval() {
            let config = AppTestConfig::new().with_poll_interval(Duration::ZERO);
            assert!(matches!(
                config.validate(),
                Err(AppTestError::InvalidConfig { .. })
            ));
        }
    }

    mod yaml {
        use super::*;

        #[test]
        fn test_partial_document_keeps_defaults() {
            let config = AppTestConfig::from_yaml_str("default_timeout_ms: 3000\n").unwrap();
            assert_eq!(config.default_timeout_ms, 3_000);
            assert_eq!(config.poll_interval_ms, DEFAULT_POLL_INTERVAL_MS);
        }

        #[test]
        fn test_failure_mode_snake_case() {
            let config = AppTestConfig::from_yaml_str("failure_mode: fail_fast\n").unwrap();
            assert_eq!(config.failure_mode, FailureMode::FailFast);
        }

        #[test]
        fn test_invalid_yaml() {
            let err = AppTestConfig::from_yaml_str("default_timeout_ms: [").unwrap_err();
            assert!(matches!(err, AppTestError::Yaml(_)));
        }

        #[test]
        fn test_zero_interval_rejected() {
            let err = AppTestConfig::from_yaml_str("poll_interval_ms: 0\n").unwrap_err();
            assert!(matches!(err, AppTestError::InvalidConfig { .. }));
        }

        #[test]
        fn test_load_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "default_timeout_ms: 1500\npoll_interval_ms: 20").unwrap();
            let config = AppTestConfig::load(file.path()).unwrap();
            assert_eq!(config.default_timeout(), Duration::from_millis(1_500));
            assert_eq!(config.poll_interval(), Duration::from_millis(20));
        }

        #[test]
        fn test_load_missing_file() {
            let dir = tempfile::tempdir().unwrap();
            let err = AppTestConfig::load(dir.path().join("missing.yaml")).unwrap_err();
            assert!(matches!(err, AppTestError::Io(_)));
        }
    }

    mod environment {
        use super::*;

        #[test]
        fn test_no_overrides() {
            let config = AppTestConfig::default().merge_env(env(&[])).unwrap();
            assert_eq!(config, AppTestConfig::default());
        }

        #[test]
        fn test_overrides() {
            let config = AppTestConfig::default()
                .merge_env(env(&[
                    (ENV_DEFAULT_TIMEOUT_MS, "5000"),
                    (ENV_POLL_INTERVAL_MS, " 25 "),
                    (ENV_FAILURE_MODE, "fail_fast"),
                ]))
                .unwrap();
            assert_eq!(config.default_timeout_ms, 5_000);
            assert_eq!(config.poll_interval_ms, 25);
            assert_eq!(config.failure_mode, FailureMode::FailFast);
        }

        #[test]
        fn test_bad_number() {
            let err = AppTestConfig::default()
                .merge_env(env(&[(ENV_DEFAULT_TIMEOUT_MS, "eight")]))
                .unwrap_err();
            assert!(err.to_string().contains(ENV_DEFAULT_TIMEOUT_MS));
        }

        #[test]
        fn test_bad_mode() {
            let err = AppTestConfig::default()
                .merge_env(env(&[(ENV_FAILURE_MODE, "sometimes")]))
                .unwrap_err();
            assert!(matches!(err, AppTestError::InvalidConfig { .. }));
        }
    }
}
