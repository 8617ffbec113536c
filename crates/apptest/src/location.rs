//! Source locations for failure attribution.

use serde::Serialize;
use std::fmt;
use std::panic::Location;

/// Where in the test code an assertion was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    /// Source file path as seen by the compiler
    pub file: &'static str,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl SourceLocation {
    /// Location of the caller.
    ///
    /// Every public helper is `#[track_caller]`, so this resolves to the test
    /// code that invoked the helper rather than the helper itself.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(Location::caller())
    }
}

impl From<&'static Location<'static>> for SourceLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn helper() -> SourceLocation {
        SourceLocation::caller()
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let expected_line = line!() + 1;
        let location = helper();
        assert_eq!(location.line, expected_line);
        assert!(location.file.ends_with("location.rs"));
    }

    #[test]
    fn test_display() {
        let location = SourceLocation {
            file: "tests/login.rs",
            line: 12,
            column: 5,
        };
        assert_eq!(location.to_string(), "tests/login.rs:12:5");
    }
}
