//! apptest: auto-waiting assertions and actions for UI automation tests
//!
//! A thin layer over a host UI-automation runtime. The host supplies
//! elements, element queries and application proxies through the traits in
//! [`host`]; apptest adds chainable helpers on top of them that wait for a
//! condition instead of checking it once, name every step for the test
//! report, and attribute failures to the calling test code.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  test code                                                   │
//! │    ctx.element(&button).assert_exists().tap_when_ready()     │
//! └──────────────┬───────────────────────────────────────────────┘
//!                │
//! ┌──────────────▼──────────────┐     ┌─────────────────────────┐
//! │ TestContext                 │────►│ Reporter                │
//! │  AppTestConfig (8 s default)│     │  failures + activities  │
//! │  Element/Query/App handles  │     └─────────────────────────┘
//! └──────────────┬──────────────┘
//!                │ Awaitable::wait_until (condition poller)
//! ┌──────────────▼──────────────┐
//! │ host traits                 │
//! │  Element, ElementQuery,     │
//! │  Application, Coordinate    │
//! └─────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use apptest::prelude::*;
//! use std::time::Duration;
//!
//! let ctx = TestContext::new();
//! let spinner = MockElement::new("Activity indicator");
//! let rows = MockQuery::new("Rows query", vec![MockElement::new("Row 1")]);
//!
//! spinner.schedule_exists(Duration::from_millis(20), false);
//! ctx.element(&spinner).assert_not_exists();
//! ctx.query(&rows).assert_has_count(1);
//!
//! assert!(ctx.reporter().verify().is_ok());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod activity;
pub mod app;
pub mod config;
pub mod context;
pub mod element;
pub mod host;
pub mod location;
pub mod logging;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod offset;
pub mod poll;
pub mod query;
pub mod report;
mod result;

pub use app::AppHandle;
pub use config::AppTestConfig;
pub use context::TestContext;
pub use element::ElementHandle;
pub use host::{
    Application, ApplicationState, AttributeValue, Coordinate, Element, ElementQuery, ElementType,
};
pub use location::SourceLocation;
pub use offset::NormalizedOffset;
pub use poll::{poll_until, Awaitable, PollOutcome, PollReport, WaitOptions, DEFAULT_TIMEOUT_MS};
pub use query::QueryHandle;
pub use report::{
    Activity, AssertionFailure, AssertionSummary, FailureCollector, FailureMode, Reporter,
};
pub use result::{AppTestError, AppTestResult};

/// Everything a test file usually needs
pub mod prelude {
    pub use super::activity;
    pub use super::app::*;
    pub use super::config::*;
    pub use super::context::*;
    pub use super::element::*;
    pub use super::host::*;
    pub use super::location::*;
    #[cfg(any(test, feature = "mock"))]
    pub use super::mock::*;
    pub use super::offset::*;
    pub use super::poll::*;
    pub use super::query::*;
    pub use super::report::*;
    pub use super::result::*;
}
