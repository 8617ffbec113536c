//! Result and error types for apptest.
//!
//! Assertion failures are not errors: they are recorded by a
//! [`Reporter`](crate::report::Reporter) and the test keeps running. The
//! types here cover the fallible library surface around them: loading
//! configuration, exporting reports, and turning a collector's failures into
//! a single `Result` at the end of a test.

use thiserror::Error;

/// Result type for apptest operations
pub type AppTestResult<T> = Result<T, AppTestError>;

/// Errors that can occur in apptest
#[derive(Debug, Error)]
pub enum AppTestError {
    /// One or more assertions failed during the test
    #[error("{count} assertion(s) failed:\n{details}")]
    AssertionsFailed {
        /// Number of recorded failures
        count: usize,
        /// One numbered line per failure
        details: String,
    },

    /// Configuration value out of range or unparsable
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl AppTestError {
    /// Create an invalid-configuration error
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
