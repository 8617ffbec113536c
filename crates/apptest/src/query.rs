//! Element query helpers

use crate::context::TestContext;
use crate::host::ElementQuery;
use crate::location::SourceLocation;
use crate::poll::WaitOptions;
use crate::report::{FailureCollector, Reporter};
use std::time::Duration;

/// Fluent helpers for an element query
#[derive(Debug)]
pub struct QueryHandle<'a, Q: ElementQuery, R: Reporter = FailureCollector> {
    context: &'a TestContext<R>,
    query: &'a Q,
    options: WaitOptions,
    message: Option<String>,
}

impl<'a, Q: ElementQuery, R: Reporter> QueryHandle<'a, Q, R> {
    pub(crate) fn new(context: &'a TestContext<R>, query: &'a Q) -> Self {
        Self {
            context,
            query,
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

    /// The query behind this handle
    #[must_use]
    pub const fn query(&self) -> &'a Q {
        self.query
    }

    fn check(
        &self,
        location: SourceLocation,
        condition: impl Fn(&Q) -> bool,
        default_message: impl FnOnce() -> String,
    ) {
        self.context.check(
            self.query,
            condition,
            &self.options,
            || self.message.clone().unwrap_or_else(default_message),
            location,
        );
    }

    /// Assert the query resolves to exactly `count` elements
    #[track_caller]
    pub fn assert_has_count(&self, count: usize) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} has {count} results", self.query), || {
                self.check(
                    location,
                    |q| q.count() == count,
                    || {
                        format!(
                            "{} should return {count} results but returned {}",
                            self.query,
                            self.query.count()
                        )
                    },
                );
            });
        self
    }

    /// Assert the query resolves to no elements
    #[track_caller]
    pub fn assert_not_exists(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} has no results", self.query), || {
                self.check(
                    location,
                    |q| q.count() == 0,
                    || {
                        format!(
                            "{} should return no results but returned {}",
                            self.query,
                            self.query.count()
                        )
                    },
                );
            });
        self
    }

    /// Assert the query resolves to at least `count` elements
    #[track_caller]
    pub fn assert_count_at_least(&self, count: usize) -> &Self {
        let location = SourceLocation::caller();
        self.context.run(
            &format!("Assert {} has at least {count} results", self.query),
            || {
                self.check(
                    location,
                    |q| q.count() >= count,
                    || {
                        format!(
                            "{} should return at least {count} results but returned {}",
                            self.query,
                            self.query.count()
                        )
                    },
                );
            },
        );
        self
    }
}
