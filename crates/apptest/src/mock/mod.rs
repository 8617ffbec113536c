//! In-memory host for testing helpers and page objects
//!
//! Implements every host trait without a UI-automation runtime. State can be
//! changed right away (`set_*`) or scheduled to change after a delay
//! (`schedule_*`), which is how tests exercise the waiting behavior of the
//! helpers.
//!
//! ```
//! use apptest::mock::MockElement;
//! use apptest::TestContext;
//! use std::time::Duration;
//!
//! let ctx = TestContext::new();
//! let alert = MockElement::missing("Alert 'Saved'");
//! alert.schedule_exists(Duration::from_millis(20), true);
//!
//! ctx.element(&alert).assert_exists();
//! assert!(ctx.reporter().all_passed());
//! ```

pub mod app;
pub mod element;
pub mod timeline;

pub use app::MockApplication;
pub use element::{MockAction, MockCoordinate, MockElement, MockQuery};
pub use timeline::Timeline;
