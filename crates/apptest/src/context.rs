//! Test context
//!
//! A [`TestContext`] owns the configuration and the reporter for one test.
//! Helpers are reached through handles it hands out:
//!
//! ```
//! use apptest::mock::MockElement;
//! use apptest::TestContext;
//!
//! let ctx = TestContext::new();
//! let button = MockElement::new("Button 'Log in'").with_label("Log in");
//!
//! ctx.element(&button)
//!     .assert_exists()
//!     .assert_has_label("Log in")
//!     .tap_when_ready();
//!
//! assert!(ctx.reporter().verify().is_ok());
//! ```

use crate::app::AppHandle;
use crate::config::AppTestConfig;
use crate::element::ElementHandle;
use crate::host::{Application, Element, ElementQuery};
use crate::location::SourceLocation;
use crate::poll::{Awaitable, PollOutcome, WaitOptions};
use crate::query::QueryHandle;
use crate::report::{AssertionFailure, FailureCollector, Reporter};
use std::time::Duration;

/// Configuration and reporter shared by the helpers of one test
#[derive(Debug)]
pub struct TestContext<R: Reporter = FailureCollector> {
    config: AppTestConfig,
    reporter: R,
}

impl Default for TestContext<FailureCollector> {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext<FailureCollector> {
    /// Context with the default configuration and a collecting reporter
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AppTestConfig::default())
    }

    /// Context with `config`; the collector follows `config.failure_mode`
    #[must_use]
    pub fn with_config(config: AppTestConfig) -> Self {
        let reporter = FailureCollector::with_mode(config.failure_mode);
        Self { config, reporter }
    }
}

impl<R: Reporter> TestContext<R> {
    /// Context with a custom reporter
    pub const fn with_reporter(config: AppTestConfig, reporter: R) -> Self {
        Self { config, reporter }
    }

    /// Current configuration
    #[must_use]
    pub const fn config(&self) -> &AppTestConfig {
        &self.config
    }

    /// Change the timeout used by handles created from now on
    pub fn set_default_timeout(&mut self, timeout: Duration) {
        self.config = self.config.clone().with_default_timeout(timeout);
    }

    /// The reporter failures and activities go to
    #[must_use]
    pub const fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Wait options every new handle starts from
    #[must_use]
    pub fn wait_options(&self) -> WaitOptions {
        self.config.wait_options()
    }

    /// Helpers for an element
    pub fn element<'a, E: Element>(&'a self, element: &'a E) -> ElementHandle<'a, E, R> {
        ElementHandle::new(self, element)
    }

    /// Helpers for an element query
    pub fn query<'a, Q: ElementQuery>(&'a self, query: &'a Q) -> QueryHandle<'a, Q, R> {
        QueryHandle::new(self, query)
    }

    /// Helpers for an application
    pub fn app<'a, A: Application>(&'a self, app: &'a A) -> AppHandle<'a, A, R> {
        AppHandle::new(self, app)
    }

    /// Run `body` as a named activity
    pub fn run<T>(&self, name: &str, body: impl FnOnce() -> T) -> T {
        self.reporter.run_activity(name, body)
    }

    /// Wait for `condition` to hold for `subject` and record a failure with
    /// `message` if it never does within the default timeout.
    ///
    /// ```
    /// use apptest::mock::MockElement;
    /// use apptest::host::Element;
    /// use apptest::TestContext;
    ///
    /// let ctx = TestContext::new();
    /// let field = MockElement::new("Text field").with_value("hello");
    /// ctx.assert_condition(&field, |f| f.string_value().as_deref() == Some("hello"), || {
    ///     "field should say hello".to_string()
    /// });
    /// assert!(ctx.reporter().all_passed());
    /// ```
    #[track_caller]
    pub fn assert_condition<S, F>(
        &self,
        subject: &S,
        condition: F,
        message: impl FnOnce() -> String,
    ) -> PollOutcome
    where
        S: Awaitable + ?Sized,
        F: Fn(&S) -> bool,
    {
        let location = SourceLocation::caller();
        self.check(subject, condition, &self.wait_options(), message, location)
    }

    pub(crate) fn check<S, F>(
        &self,
        subject: &S,
        condition: F,
        options: &WaitOptions,
        message: impl FnOnce() -> String,
        location: SourceLocation,
    ) -> PollOutcome
    where
        S: Awaitable + ?Sized,
        F: Fn(&S) -> bool,
    {
        let report = subject.wait_until(&condition, options);
        tracing::debug!(
            satisfied = report.is_satisfied(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            evaluations = report.evaluations,
            timeout_ms = options.timeout().as_millis() as u64,
            "poll finished"
        );
        self.record(report.outcome, report.elapsed, message, location)
    }

    /// Record a pass or a failure for a wait that has already finished
    pub(crate) fn record(
        &self,
        outcome: PollOutcome,
        elapsed: Duration,
        message: impl FnOnce() -> String,
        location: SourceLocation,
    ) -> PollOutcome {
        if outcome.is_satisfied() {
            self.reporter.record_pass();
        } else {
            self.reporter
                .record_failure(AssertionFailure::new(message(), location).with_elapsed(elapsed));
        }
        outcome
    }
}
