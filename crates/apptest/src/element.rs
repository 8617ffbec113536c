//! Element helpers
//!
//! Every assertion waits for its condition up to the handle's timeout, runs
//! inside an activity named after it, and returns the handle so calls chain.
//! A failure is recorded with the location of the calling test code.

use crate::context::TestContext;
use crate::host::{AttributeValue, Coordinate, Element};
use crate::location::SourceLocation;
use crate::offset::NormalizedOffset;
use crate::poll::{PollOutcome, WaitOptions};
use crate::report::{FailureCollector, Reporter};
use std::time::{Duration, Instant};

/// Fluent helpers for one element
#[derive(Debug)]
pub struct ElementHandle<'a, E: Element, R: Reporter = FailureCollector> {
    context: &'a TestContext<R>,
    element: &'a E,
    options: WaitOptions,
    message: Option<String>,
}

impl<'a, E: Element, R: Reporter> ElementHandle<'a, E, R> {
    pub(crate) fn new(context: &'a TestContext<R>, element: &'a E) -> Self {
        Self {
            context,
            element,
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

    /// The element behind this handle
    #[must_use]
    pub const fn element(&self) -> &'a E {
        self.element
    }

    /// Timeout applied by this handle
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.options.timeout()
    }

    fn check(
        &self,
        location: SourceLocation,
        condition: impl Fn(&E) -> bool,
        default_message: impl FnOnce() -> String,
    ) -> PollOutcome {
        self.context.check(
            self.element,
            condition,
            &self.options,
            || self.message.clone().unwrap_or_else(default_message),
            location,
        )
    }

    fn assert_existence(
        &self,
        location: SourceLocation,
        wait_for_idle: bool,
        default_message: impl FnOnce() -> String,
    ) {
        let start = Instant::now();
        let checked_directly = !wait_for_idle && self.element.exists();
        let found = checked_directly || self.element.wait_for_existence(self.options.timeout());
        let elapsed = start.elapsed();
        // The host's wait does its own polling, so there is no evaluation count here.
        tracing::debug!(
            satisfied = found,
            elapsed_ms = elapsed.as_millis() as u64,
            host_wait = !checked_directly,
            timeout_ms = self.options.timeout().as_millis() as u64,
            "existence check finished"
        );
        self.context.record(
            PollOutcome::from(found),
            elapsed,
            || self.message.clone().unwrap_or_else(default_message),
            location,
        );
    }

    // =========================================================================
    // EXISTENCE
    // =========================================================================

    /// Assert the element exists, waiting for it to appear.
    ///
    /// An element that already exists passes without waiting.
    #[track_caller]
    pub fn assert_exists(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} exists", self.element), || {
                self.assert_existence(location, false, || {
                    format!("{} should be visible", self.element)
                });
            });
        self
    }

    /// Assert the element exists, always going through the host's
    /// wait-for-existence so the application gets a chance to go idle
    #[track_caller]
    pub fn assert_exists_after_idle(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} exists", self.element), || {
                self.assert_existence(location, true, || {
                    format!("{} should be visible", self.element)
                });
            });
        self
    }

    /// Assert the element does not exist, waiting for it to disappear
    #[track_caller]
    pub fn assert_not_exists(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} does NOT exist", self.element), || {
                self.check(
                    location,
                    |e| !e.exists(),
                    || format!("{} should NOT exist", self.element),
                );
            });
        self
    }

    // =========================================================================
    // INTERACTIVITY
    // =========================================================================

    /// Assert the element is hittable
    #[track_caller]
    pub fn assert_is_hittable(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is hittable", self.element), || {
                self.check(location, E::is_hittable, || {
                    format!("{} should be hittable", self.element)
                });
            });
        self
    }

    /// Assert the element is not hittable
    #[track_caller]
    pub fn assert_is_not_hittable(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is NOT hittable", self.element), || {
                self.check(
                    location,
                    |e| !e.is_hittable(),
                    || format!("{} should NOT be hittable", self.element),
                );
            });
        self
    }

    /// Assert the element is enabled
    #[track_caller]
    pub fn assert_is_enabled(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is enabled", self.element), || {
                self.check(location, E::is_enabled, || {
                    format!("{} should be enabled", self.element)
                });
            });
        self
    }

    /// Assert the element is disabled
    #[track_caller]
    pub fn assert_is_disabled(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is NOT enabled", self.element), || {
                self.check(
                    location,
                    |e| !e.is_enabled(),
                    || format!("{} should NOT be enabled", self.element),
                );
            });
        self
    }

    /// Assert the element exists, is enabled and is hittable
    #[track_caller]
    pub fn assert_is_interactive(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is interactive", self.element), || {
                self.check(
                    location,
                    |e| e.exists() && e.is_enabled() && e.is_hittable(),
                    || format!("{} should be enabled and hittable", self.element),
                );
            });
        self
    }

    // =========================================================================
    // CONTENT
    // =========================================================================

    /// Assert the label equals `label`
    #[track_caller]
    pub fn assert_has_label(&self, label: &str) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} has label '{label}'", self.element), || {
                self.check(
                    location,
                    |e| e.label() == label,
                    || {
                        format!(
                            "{} has incorrect label. Expected: '{label}' but found: '{}'",
                            self.element,
                            self.element.label()
                        )
                    },
                );
            });
        self
    }

    /// Assert the label contains `text`
    #[track_caller]
    pub fn assert_contains_text(&self, text: &str) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} contains text '{text}'", self.element), || {
                self.check(
                    location,
                    |e| e.label().contains(text),
                    || {
                        format!(
                            "{} doesn't contain substring '{text}' in its label: '{}'",
                            self.element,
                            self.element.label()
                        )
                    },
                );
            });
        self
    }

    /// Assert the value attribute equals `value`
    #[track_caller]
    pub fn assert_has_value(&self, value: impl Into<AttributeValue>) -> &Self {
        let location = SourceLocation::caller();
        let expected = value.into();
        self.context
            .run(&format!("Assert {} has value '{expected}'", self.element), || {
                self.check(
                    location,
                    |e| e.value().as_ref() == Some(&expected),
                    || {
                        format!(
                            "{} has incorrect value. Expected '{expected}' but found '{}'",
                            self.element,
                            display_value(self.element.value())
                        )
                    },
                );
            });
        self
    }

    /// Assert the placeholder equals `placeholder`
    #[track_caller]
    pub fn assert_has_placeholder(&self, placeholder: &str) -> &Self {
        let location = SourceLocation::caller();
        self.context.run(
            &format!("Assert {} has placeholder '{placeholder}'", self.element),
            || {
                self.check(
                    location,
                    |e| e.placeholder_value().as_deref() == Some(placeholder),
                    || {
                        format!(
                            "{} has incorrect placeholder value. Expected '{placeholder}' but found '{}'",
                            self.element,
                            self.element.placeholder_value().unwrap_or_default()
                        )
                    },
                );
            },
        );
        self
    }

    /// Assert the title equals `title`
    #[track_caller]
    pub fn assert_has_title(&self, title: &str) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} has title '{title}'", self.element), || {
                self.check(
                    location,
                    |e| e.title() == title,
                    || {
                        format!(
                            "{} has incorrect title. Expected '{title}' but found '{}'",
                            self.element,
                            self.element.title()
                        )
                    },
                );
            });
        self
    }

    // =========================================================================
    // SELECTION
    // =========================================================================

    /// Assert the element is selected
    #[track_caller]
    pub fn assert_is_selected(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is selected", self.element), || {
                self.check(location, E::is_selected, || {
                    format!("{} should be selected", self.element)
                });
            });
        self
    }

    /// Assert the element is not selected
    #[track_caller]
    pub fn assert_is_not_selected(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is NOT selected", self.element), || {
                self.check(
                    location,
                    |e| !e.is_selected(),
                    || format!("{} should NOT be selected", self.element),
                );
            });
        self
    }

    /// Assert the switch is on
    #[track_caller]
    pub fn assert_is_on(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is on", self.element), || {
                self.check(location, E::is_on, || {
                    format!("{} should be on", self.element)
                });
            });
        self
    }

    /// Assert the switch is off
    #[track_caller]
    pub fn assert_is_off(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Assert {} is off", self.element), || {
                self.check(
                    location,
                    |e| !e.is_on(),
                    || format!("{} should be off", self.element),
                );
            });
        self
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Wait until the element exists and can be interacted with
    #[track_caller]
    pub fn wait_for_interactivity(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context.run(
            &format!("Wait for {} to be interactive", self.element),
            || self.wait_for_interactivity_at(location),
        );
        self
    }

    fn wait_for_interactivity_at(&self, location: SourceLocation) {
        self.context
            .run(&format!("Assert {} exists", self.element), || {
                self.assert_existence(location, true, || {
                    "Element should exist to be interactive.".to_string()
                });
            });
        self.context
            .run(&format!("Assert {} is interactive", self.element), || {
                self.check(
                    location,
                    |e| e.exists() && e.is_enabled() && e.is_hittable(),
                    || format!("{} should be enabled and hittable", self.element),
                );
            });
    }

    /// Wait for interactivity, then tap
    #[track_caller]
    pub fn tap_when_ready(&self) -> &Self {
        let location = SourceLocation::caller();
        self.context
            .run(&format!("Tap {} when ready", self.element), || {
                self.context.run(
                    &format!("Wait for {} to be interactive", self.element),
                    || self.wait_for_interactivity_at(location),
                );
                self.element.tap();
            });
        self
    }

    /// Type `text` one character at a time
    pub fn slow_type_text(&self, text: &str) -> &Self {
        self.context
            .run(&format!("Slow type text \"{text}\""), || {
                let mut buffer = [0u8; 4];
                for character in text.chars() {
                    self.element.type_text(character.encode_utf8(&mut buffer));
                }
            });
        self
    }

    /// Tap at `offset` within the element
    pub fn tap_at(&self, offset: NormalizedOffset) -> &Self {
        self.element.coordinate(offset).tap();
        self
    }

    /// Double tap at `offset` within the element
    pub fn double_tap_at(&self, offset: NormalizedOffset) -> &Self {
        self.element.coordinate(offset).double_tap();
        self
    }

    /// Press and hold at `offset` for `duration`
    pub fn press_at(&self, offset: NormalizedOffset, duration: Duration) -> &Self {
        self.element.coordinate(offset).press(duration);
        self
    }

    /// Drag from one point of the element to another
    pub fn drag(
        &self,
        from: NormalizedOffset,
        to: NormalizedOffset,
        press_duration: Duration,
    ) -> &Self {
        let start = self.element.coordinate(from);
        let end = self.element.coordinate(to);
        start.press_and_drag_to(press_duration, &end);
        self
    }

    /// Drag this element's center onto `target`'s center
    pub fn drag_to(&self, target: &E, press_duration: Duration) -> &Self {
        let start = self.element.coordinate(NormalizedOffset::CENTER);
        let end = target.coordinate(NormalizedOffset::CENTER);
        start.press_and_drag_to(press_duration, &end);
        self
    }
}

fn display_value(value: Option<AttributeValue>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}
