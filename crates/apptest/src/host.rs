//! Host collaborators
//!
//! The UI-automation runtime (an accessibility bridge, a device driver, a
//! WebDriver session, ...) implements these traits. apptest never locates
//! elements, computes hit points or drives the application itself: it only
//! reads the state exposed here and calls the actions.
//!
//! `Display` on every subject is the human description used in activity
//! names and failure messages (`"Button 'Log in'"`, `"Cells query"`).

use crate::offset::NormalizedOffset;
use crate::poll::{Awaitable, WaitOptions};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// =============================================================================
// ATTRIBUTE VALUE
// =============================================================================

/// The raw `value` attribute of an element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Text fields, labels with values, pickers
    Text(String),
    /// Sliders, steppers, switches reported as 0/1
    Integer(i64),
    /// Switches and checkboxes reported as booleans
    Bool(bool),
}

impl AttributeValue {
    /// The value as text, if it is text
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The value as an integer, if it is an integer
    #[must_use]
    pub const fn int_value(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Whether the value encodes an "on" switch state
    #[must_use]
    pub fn is_on(&self) -> bool {
        match self {
            Self::Text(text) => text == "1",
            Self::Integer(value) => *value == 1,
            Self::Bool(value) => *value,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

// =============================================================================
// ELEMENT TYPE
// =============================================================================

/// The host's raw element-type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ElementType(pub u32);

impl ElementType {
    /// Matches every element
    pub const ANY: Self = Self(0);
    /// System banner notifications
    pub const BANNER_NOTIFICATION: Self = Self(83);

    /// Whether `other` satisfies a query for `self`
    #[must_use]
    pub const fn matches(self, other: Self) -> bool {
        self.0 == Self::ANY.0 || self.0 == other.0
    }
}

// =============================================================================
// APPLICATION STATE
// =============================================================================

/// Lifecycle state of an application under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApplicationState {
    /// State could not be determined
    #[default]
    Unknown,
    /// Not launched
    NotRunning,
    /// In the background and suspended
    RunningBackgroundSuspended,
    /// In the background
    RunningBackground,
    /// Frontmost and receiving events
    RunningForeground,
}

impl ApplicationState {
    /// Whether the application is in one of the background states
    #[must_use]
    pub const fn is_background(&self) -> bool {
        matches!(
            self,
            Self::RunningBackground | Self::RunningBackgroundSuspended
        )
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::NotRunning => "not running",
            Self::RunningBackgroundSuspended => "suspended in background",
            Self::RunningBackground => "running in background",
            Self::RunningForeground => "running in foreground",
        };
        f.write_str(name)
    }
}

// =============================================================================
// TRAITS
// =============================================================================

/// A screen point resolved against an element
pub trait Coordinate {
    /// Tap at this point
    fn tap(&self);

    /// Double tap at this point
    fn double_tap(&self);

    /// Press and hold for `duration`
    fn press(&self, duration: Duration);

    /// Press for `duration`, then drag to `target` and release
    fn press_and_drag_to(&self, duration: Duration, target: &Self);
}

/// A UI element handle
pub trait Element: Awaitable + fmt::Display + Sized {
    /// Coordinate type produced by [`coordinate`](Element::coordinate)
    type Coordinate: Coordinate;
    /// Query type produced by [`descendants`](Element::descendants)
    type Query: ElementQuery<Element = Self>;

    /// Whether the element is in the UI hierarchy
    fn exists(&self) -> bool;

    /// Whether a tap at the element's hit point would reach it
    fn is_hittable(&self) -> bool;

    /// Whether the element accepts interaction
    fn is_enabled(&self) -> bool;

    /// Whether the element is selected
    fn is_selected(&self) -> bool;

    /// Accessibility label
    fn label(&self) -> String;

    /// Raw value attribute
    fn value(&self) -> Option<AttributeValue>;

    /// Placeholder shown while the element has no value
    fn placeholder_value(&self) -> Option<String>;

    /// Title attribute
    fn title(&self) -> String;

    /// Tap the element's hit point
    fn tap(&self);

    /// Double tap the element's hit point
    fn double_tap(&self);

    /// Type text into the element
    fn type_text(&self, text: &str);

    /// Point at `offset` within the element's frame
    fn coordinate(&self, offset: NormalizedOffset) -> Self::Coordinate;

    /// Descendants of the given type
    fn descendants(&self, element_type: ElementType) -> Self::Query;

    /// Wait until the element exists.
    ///
    /// Hosts that can wait for the application to go idle before checking
    /// should override this; the provided version polls `exists`.
    fn wait_for_existence(&self, timeout: Duration) -> bool {
        self.wait_until(
            &|element: &Self| element.exists(),
            &WaitOptions::new().with_timeout(timeout),
        )
        .is_satisfied()
    }

    /// The raw value as text
    fn string_value(&self) -> Option<String> {
        self.value()
            .and_then(|value| value.string_value().map(str::to_string))
    }

    /// The raw value as an integer
    fn int_value(&self) -> Option<i64> {
        self.value().and_then(|value| value.int_value())
    }

    /// Whether the element is a switch in the "on" position
    fn is_on(&self) -> bool {
        self.value().is_some_and(|value| value.is_on())
    }

    /// Banner notifications below this element
    fn banner_notifications(&self) -> Self::Query {
        self.descendants(ElementType::BANNER_NOTIFICATION)
    }
}

/// A query that resolves to zero or more elements
pub trait ElementQuery: Awaitable + fmt::Display + Sized {
    /// Element type the query resolves to
    type Element: Element;

    /// Number of matches right now
    fn count(&self) -> usize;

    /// The element at `index` among the matches.
    ///
    /// Like host runtimes, this returns a handle even when the index is out of
    /// range; the handle simply does not exist.
    fn element_bound_by(&self, index: usize) -> Self::Element;

    /// Descendants of every match, filtered by type
    fn descendants(&self, element_type: ElementType) -> Self;

    /// The element at `index`
    fn get(&self, index: usize) -> Self::Element {
        self.element_bound_by(index)
    }

    /// The last match, if there is one
    fn last_match(&self) -> Option<Self::Element> {
        self.count()
            .checked_sub(1)
            .map(|index| self.element_bound_by(index))
    }

    /// The first match satisfying `predicate`
    fn first_where<P>(&self, predicate: P) -> Option<Self::Element>
    where
        P: Fn(&Self::Element) -> bool,
    {
        (0..self.count())
            .map(|index| self.element_bound_by(index))
            .find(|element| predicate(element))
    }

    /// Every current match, in order
    fn elements(&self) -> Vec<Self::Element> {
        (0..self.count())
            .map(|index| self.element_bound_by(index))
            .collect()
    }

    /// Banner notifications below the matches
    fn banner_notifications(&self) -> Self {
        self.descendants(ElementType::BANNER_NOTIFICATION)
    }
}

/// Proxy for an application under test
pub trait Application: Awaitable + fmt::Display {
    /// Current lifecycle state
    fn state(&self) -> ApplicationState;

    /// Ask the system to move the application to the background
    fn send_to_background(&self);

    /// Wait until the application reaches `state`
    fn wait_for_state(&self, state: ApplicationState, timeout: Duration) -> bool {
        self.wait_until(
            &|app: &Self| app.state() == state,
            &WaitOptions::new().with_timeout(timeout),
        )
        .is_satisfied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod attribute_value {
        use super::*;

        #[test]
        fn test_accessors() {
            let text = AttributeValue::from("hello");
            assert_eq!(text.string_value(), Some("hello"));
            assert_eq!(text.int_value(), None);

            let number = AttributeValue::from(42);
            assert_eq!(number.int_value(), Some(42));
            assert_eq!(number.string_value(), None);
        }

        #[test]
        fn test_is_on() {
            assert!(AttributeValue::from("1").is_on());
            assert!(AttributeValue::from(1).is_on());
            assert!(AttributeValue::from(true).is_on());
            assert!(!AttributeValue::from("0").is_on());
            assert!(!AttributeValue::from(0).is_on());
            assert!(!AttributeValue::from("on").is_on());
        }

        #[test]
        fn test_display() {
            assert_eq!(AttributeValue::from("x").to_string(), "x");
            assert_eq!(AttributeValue::from(7).to_string(), "7");
            assert_eq!(AttributeValue::from(false).to_string(), "false");
        }

        #[test]
        fn test_untagged_json() {
            let value: AttributeValue = serde_json::from_str("3").unwrap();
            assert_eq!(value, AttributeValue::Integer(3));
        }
    }

    mod element_type {
        use super::*;

        #[test]
        fn test_any_matches_everything() {
            assert!(ElementType::ANY.matches(ElementType(9)));
            assert!(ElementType::ANY.matches(ElementType::BANNER_NOTIFICATION));
        }

        #[test]
        fn test_specific_type() {
            assert!(ElementType::BANNER_NOTIFICATION.matches(ElementType(83)));
            assert!(!ElementType::BANNER_NOTIFICATION.matches(ElementType(9)));
        }
    }

    mod application_state {
        use super::*;

        #[test]
        fn test_background_states() {
            assert!(ApplicationState::RunningBackground.is_background());
            assert!(ApplicationState::RunningBackgroundSuspended.is_background());
            assert!(!ApplicationState::RunningForeground.is_background());
            assert!(!ApplicationState::NotRunning.is_background());
        }

        #[test]
        fn test_display() {
            assert_eq!(
                ApplicationState::RunningForeground.to_string(),
                "running in foreground"
            );
            assert_eq!(ApplicationState::default(), ApplicationState::Unknown);
        }
    }
}
