//! Application helpers

use crate::context::TestContext;
use crate::host::{Application, ApplicationState};
use crate::location::SourceLocation;
use crate::poll::{Awaitable, WaitOptions};
use crate::report::{FailureCollector, Reporter};
use std::time::Duration;

/// Fluent helpers for an application
#[derive(Debug)]
pub struct AppHandle<'a, A: Application, R: Reporter = FailureCollector> {
    context: &'a TestContext<R>,
    app: &'a A,
    options: WaitOptions,
    message: Option<String>,
}

impl<'a, A: Application, R: Reporter> AppHandle<'a, A, R> {
    pub(crate) fn new(context: &'a TestContext<R>, app: &'a A) -> Self {
        Self {
            context,
            app,
            options: context.wait_options(),
            message: None,
        }
    }

    /// Wait up to `timeout` instead of the context default
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options = self.options.with_timeout(timeout);
        self
    }

    /// Check each condition once, without waiting
    #[must_use]
    pub fn immediately(self) -> Self {
        self.with_timeout(Duration::ZERO)
    }

    /// Report `message` instead of the default failure messages
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The application behind this handle
    #[must_use]
    pub const fn app(&self) -> &'a A {
        self.app
    }

    fn check(
        &self,
        location: SourceLocation,
        condition: impl Fn(&A) -> bool,
        default_message: impl FnOnce() -> String,
    ) {
        self.context.check(
            self.app,
            condition,
            &self.options,
            || self.message.clone().unwrap_or_else(default_message),
            location,
        );
    }

    /// Assert the application is in the foreground
    #[track_caller]
    pub fn assert_is_in_foreground(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is in foreground", self.app), || {
                self.check(
                    location,
                    |app| app.state() == ApplicationState::RunningForeground,
                    || format!("{} should be in foreground", self.app),
                );
            });
        self
    }

    /// Assert the application is not in the foreground
    #[track_caller]
    pub fn assert_is_not_in_foreground(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is NOT in foreground", self.app), || {
                self.check(
                    location,
                    |app| app.state() != ApplicationState::RunningForeground,
                    || format!("{} should not be in foreground", self.app),
                );
            });
        self
    }

    /// Assert the application reaches `state`
    #[track_caller]
    pub fn assert_state(&self, state: ApplicationState) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is {state}", self.app), || {
                self.check(
                    location,
                    |app| app.state() == state,
                    || format!("{} should be {state} but is {}", self.app, self.app.state()),
                );
            });
        self
    }

    /// Send the application to the background and wait until it gets there.
    ///
    /// Not reaching a background state in time is logged, not recorded as a
    /// failure.
    pub fn move_to_background(&self) -> &Self {
        self.context
            .run(&format!("Move {} to background", self.app), || {
                self.app.send_to_background();
                let report = self
                    .app
                    .wait_until(&|app: &A| app.state().is_background(), &self.options);
                if !report.is_satisfied() {
                    tracing::warn!(
                        app = %self.app,
                        state = %self.app.state(),
                        timeout_ms = self.options.timeout().as_millis() as u64,
                        "application did not reach the background"
                    );
                }
            });
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::AppTestConfig;
    use crate::mock::MockApplication;

    fn quick_context() -> TestContext {
        TestContext::with_config(
            AppTestConfig::new()
                .with_default_timeout(Duration::from_millis(60))
                .with_poll_interval(Duration::from_millis(5)),
        )
    }

    mod foreground {
        use super::*;

        #[test]
        fn test_in_foreground() {
            let ctx = quick_context();
            let app = MockApplication::new("Application 'Shop'");
            ctx.app(&app)
                .assert_is_in_foreground()
                .assert_is_not_in_foreground();
            assert_eq!(
                ctx.reporter().failures()[0].message,
                "Application 'Shop' should not be in foreground"
            );
        }

        #[test]
        fn test_background_app_fails_foreground_check() {
            let ctx = quick_context();
            let app = MockApplication::new("Shop").with_state(ApplicationState::RunningBackground);
            ctx.app(&app).assert_is_in_foreground();
            assert_eq!(
                ctx.reporter().failures()[0].message,
                "Shop should be in foreground"
            );
        }

        #[test]
        fn test_waits_for_launch() {
            let ctx = TestContext::new();
            let app = MockApplication::new("Shop").with_state(ApplicationState::NotRunning);
            app.schedule_state(Duration::from_millis(30), ApplicationState::RunningForeground);
            ctx.app(&app).assert_is_in_foreground();
            assert!(ctx.reporter().all_passed());
        }

        #[test]
        fn test_activity_names() {
            let ctx = TestContext::new();
            let app = MockApplication::new("Shop");
            ctx.app(&app).assert_is_in_foreground();
            assert_eq!(
                ctx.reporter().activities()[0].name,
                "Assert Shop is in foreground"
            );
        }
    }

    mod state {
        use super::*;

        #[test]
        fn test_assert_state() {
            let ctx = quick_context();
            let app = MockApplication::new("Shop").with_state(ApplicationState::NotRunning);
            ctx.app(&app)
                .assert_state(ApplicationState::NotRunning)
                .assert_state(ApplicationState::RunningForeground);
            assert_eq!(
                ctx.reporter().failures()[0].message,
                "Shop should be running in foreground but is not running"
            );
        }
    }

    mod background {
        use super::*;

        #[test]
        fn test_move_to_background() {
            let ctx = TestContext::new();
            let app = MockApplication::new("Shop");
            ctx.app(&app).move_to_background();
            assert!(app.state().is_background());
            assert_eq!(app.background_requests(), 1);
            assert_eq!(
                ctx.reporter().activities()[0].name,
                "Move Shop to background"
            );
        }

        #[test]
        fn test_timeout_is_not_a_failure() {
            let ctx = quick_context();
            let app = MockApplication::new("Shop").ignoring_background_requests();
            ctx.app(&app).move_to_background();
            assert_eq!(app.state(), ApplicationState::RunningForeground);
            assert!(ctx.reporter().all_passed());
        }

        #[test]
        fn test_suspended_counts_as_background() {
            let ctx = TestContext::new();
            let app = MockApplication::new("Shop")
                .with_background_state(ApplicationState::RunningBackgroundSuspended);
            ctx.app(&app).move_to_background().assert_is_not_in_foreground();
            assert!(ctx.reporter().all_passed());
        }
    }
}
