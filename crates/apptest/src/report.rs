//! Failure reporting and activities
//!
//! A [`Reporter`] is the seam between the helpers and the test harness:
//! helpers record failures and group their steps into named activities, and
//! the reporter decides what a failure means for the running test.
//!
//! [`FailureCollector`] is the default reporter. In [`FailureMode::Collect`]
//! a failed assertion is recorded and the test keeps going, so one run
//! surfaces every broken expectation; [`FailureMode::FailFast`] panics on the
//! first failure, the way a plain `assert!` would.
//!
//! ```
//! use apptest::report::{FailureCollector, Reporter};
//! use apptest::location::SourceLocation;
//! use apptest::report::AssertionFailure;
//!
//! let collector = FailureCollector::new();
//! collector.run_activity("Log in", || {
//!     collector.record_failure(AssertionFailure::new(
//!         "Button 'Log in' should be hittable",
//!         SourceLocation::caller(),
//!     ));
//! });
//! assert_eq!(collector.failure_count(), 1);
//! assert_eq!(collector.failures()[0].activity.as_deref(), Some("Log in"));
//! assert!(collector.verify().is_err());
//! ```

use crate::location::SourceLocation;
use crate::result::{AppTestError, AppTestResult};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant};
use uuid::Uuid;

// =============================================================================
// FAILURE MODE
// =============================================================================

/// What a failed assertion does to the running test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Record the failure and keep running
    #[default]
    Collect,
    /// Panic on the first failure
    FailFast,
}

impl FromStr for FailureMode {
    type Err = AppTestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collect" => Ok(Self::Collect),
            "fail_fast" | "fail-fast" => Ok(Self::FailFast),
            other => Err(AppTestError::invalid_config(format!(
                "unknown failure mode '{other}', expected 'collect' or 'fail_fast'"
            ))),
        }
    }
}

// =============================================================================
// FAILURE AND ACTIVITY RECORDS
// =============================================================================

/// A single assertion failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssertionFailure {
    /// Message describing the failure
    pub message: String,
    /// Test code that made the assertion
    pub location: SourceLocation,
    /// Innermost activity running when the failure was recorded
    pub activity: Option<String>,
    /// How long the assertion waited before failing
    pub elapsed: Duration,
}

impl AssertionFailure {
    /// Create a new assertion failure
    #[must_use]
    pub fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
            activity: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Set how long the assertion waited
    #[must_use]
    pub const fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// A named group of test steps
#[derive(Debug, Clone, Serialize)]
pub struct Activity {
    /// Unique activity id
    pub id: String,
    /// Activity name as shown in reports
    pub name: String,
    /// Id of the enclosing activity
    pub parent_id: Option<String>,
    /// Nesting depth, 0 for top-level activities
    pub depth: usize,
    #[serde(skip)]
    started: Option<Instant>,
    /// Time spent in the activity, once finished
    pub duration: Option<Duration>,
    /// Failures recorded while this was the innermost activity
    pub failures: usize,
}

impl Activity {
    fn start(name: &str, parent_id: Option<String>, depth: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            parent_id,
            depth,
            started: Some(Instant::now()),
            duration: None,
            failures: 0,
        }
    }

    fn finish(&mut self) {
        if let Some(started) = self.started {
            self.duration = Some(started.elapsed());
        }
    }

    /// Whether the activity body has returned
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.duration.is_some()
    }
}

/// Counts of assertions by outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssertionSummary {
    /// Assertions checked
    pub total: usize,
    /// Assertions that passed
    pub passed: usize,
    /// Assertions that failed
    pub failed: usize,
}

// =============================================================================
// REPORTER
// =============================================================================

/// Receives assertion outcomes and activity boundaries
pub trait Reporter {
    /// Record a failed assertion
    fn record_failure(&self, failure: AssertionFailure);

    /// Record a passed assertion
    fn record_pass(&self) {}

    /// Run `body` as a named activity and return its result
    fn run_activity<T>(&self, name: &str, body: impl FnOnce() -> T) -> T;

    /// Snapshot of the failures recorded so far
    fn failures(&self) -> Vec<AssertionFailure>;
}

#[derive(Debug, Default)]
struct CollectorState {
    failures: Vec<AssertionFailure>,
    activities: Vec<Activity>,
    open: Vec<usize>,
    passed: usize,
}

/// Reporter that keeps every failure and activity in memory
#[derive(Debug, Default)]
pub struct FailureCollector {
    mode: FailureMode,
    state: RefCell<CollectorState>,
}

impl FailureCollector {
    /// Create a collector in [`FailureMode::Collect`]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector with a specific mode
    #[must_use]
    pub fn with_mode(mode: FailureMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Current failure mode
    #[must_use]
    pub const fn mode(&self) -> FailureMode {
        self.mode
    }

    /// Number of recorded failures
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.state.borrow().failures.len()
    }

    /// Snapshot of activities in start order
    #[must_use]
    pub fn activities(&self) -> Vec<Activity> {
        self.state.borrow().activities.clone()
    }

    /// Whether no failure has been recorded
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.state.borrow().failures.is_empty()
    }

    /// Counts of passed and failed assertions
    #[must_use]
    pub fn summary(&self) -> AssertionSummary {
        let state = self.state.borrow();
        AssertionSummary {
            total: state.passed + state.failures.len(),
            passed: state.passed,
            failed: state.failures.len(),
        }
    }

    /// `Ok` when nothing failed, otherwise every failure in one error
    pub fn verify(&self) -> AppTestResult<()> {
        let state = self.state.borrow();
        if state.failures.is_empty() {
            return Ok(());
        }
        let details = state
            .failures
            .iter()
            .enumerate()
            .map(|(i, failure)| format!("  {}. {failure}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        Err(AppTestError::AssertionsFailed {
            count: state.failures.len(),
            details,
        })
    }

    /// Forget every failure, activity and pass count
    pub fn clear(&self) {
        *self.state.borrow_mut() = CollectorState::default();
    }

    /// Summary, failures and activities as pretty JSON
    pub fn to_json(&self) -> AppTestResult<String> {
        let state = self.state.borrow();
        let report = ReportExport {
            summary: AssertionSummary {
                total: state.passed + state.failures.len(),
                passed: state.passed,
                failed: state.failures.len(),
            },
            failures: &state.failures,
            activities: &state.activities,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Write the JSON report to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> AppTestResult<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    fn open_activity(&self, name: &str) -> usize {
        let mut state = self.state.borrow_mut();
        let parent_id = state
            .open
            .last()
            .map(|&index| state.activities[index].id.clone());
        let depth = state.open.len();
        state.activities.push(Activity::start(name, parent_id, depth));
        let index = state.activities.len() - 1;
        state.open.push(index);
        index
    }

    fn close_activity(&self, index: usize) {
        let mut state = self.state.borrow_mut();
        if let Some(position) = state.open.iter().rposition(|&open| open == index) {
            state.open.truncate(position);
        }
        if let Some(activity) = state.activities.get_mut(index) {
            activity.finish();
        }
    }
}

/// Closes an open activity when dropped, including while unwinding from a
/// fail-fast panic.
struct ActivityGuard<'a> {
    collector: &'a FailureCollector,
    index: usize,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        self.collector.close_activity(self.index);
    }
}

impl Reporter for FailureCollector {
    fn record_failure(&self, mut failure: AssertionFailure) {
        {
            let mut state = self.state.borrow_mut();
            if let Some(&index) = state.open.last() {
                let activity = &mut state.activities[index];
                activity.failures += 1;
                failure.activity = Some(activity.name.clone());
            }
            tracing::warn!(
                file = failure.location.file,
                line = failure.location.line,
                elapsed_ms = failure.elapsed.as_millis() as u64,
                "{}",
                failure.message
            );
            state.failures.push(failure.clone());
        }

        if self.mode == FailureMode::FailFast {
            panic!("{failure}");
        }
    }

    fn record_pass(&self) {
        self.state.borrow_mut().passed += 1;
    }

    fn run_activity<T>(&self, name: &str, body: impl FnOnce() -> T) -> T {
        let _guard = ActivityGuard {
            collector: self,
            index: self.open_activity(name),
        };
        let span = tracing::info_span!("activity", name);
        span.in_scope(body)
    }

    fn failures(&self) -> Vec<AssertionFailure> {
        self.state.borrow().failures.clone()
    }
}

#[derive(Serialize)]
struct ReportExport<'a> {
    summary: AssertionSummary,
    failures: &'a [AssertionFailure],
    activities: &'a [Activity],
}

// =============================================================================
// TESTS
// =============================================================================
