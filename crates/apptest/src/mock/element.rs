//! Mock elements, coordinates and queries.

use super::timeline::Timeline;
use crate::host::{AttributeValue, Coordinate, Element, ElementQuery, ElementType};
use crate::offset::NormalizedOffset;
use crate::poll::{Awaitable, WaitOptions};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// An action performed on a mock element
#[derive(Debug, Clone, PartialEq)]
pub enum MockAction {
    /// `tap` on the element
    Tap,
    /// `double_tap` on the element
    DoubleTap,
    /// `type_text` on the element
    TypeText(String),
    /// Tap at a coordinate
    TapAt(NormalizedOffset),
    /// Double tap at a coordinate
    DoubleTapAt(NormalizedOffset),
    /// Press at a coordinate
    PressAt {
        /// Where
        offset: NormalizedOffset,
        /// How long
        duration: Duration,
    },
    /// Press at a coordinate and drag to another one
    Drag {
        /// Start, relative to this element
        from: NormalizedOffset,
        /// End, relative to `target`
        to: NormalizedOffset,
        /// Description of the element the drag ends on
        target: String,
        /// Press duration before dragging
        duration: Duration,
    },
}

#[derive(Debug)]
struct ElementState {
    description: String,
    element_type: Cell<ElementType>,
    exists: Timeline<bool>,
    hittable: Timeline<bool>,
    enabled: Timeline<bool>,
    selected: Timeline<bool>,
    label: Timeline<String>,
    value: Timeline<Option<AttributeValue>>,
    placeholder: Timeline<Option<String>>,
    title: Timeline<String>,
    children: RefCell<Vec<MockElement>>,
    actions: RefCell<Vec<MockAction>>,
    existence_waits: Cell<usize>,
}

/// An element with scripted state.
///
/// Clones share state, so a test can keep one clone while a query or page
/// object holds another.
#[derive(Debug, Clone)]
pub struct MockElement {
    inner: Rc<ElementState>,
}

impl MockElement {
    /// An existing, enabled, hittable element
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(ElementState {
                description: description.into(),
                element_type: Cell::new(ElementType::ANY),
                exists: Timeline::new(true),
                hittable: Timeline::new(true),
                enabled: Timeline::new(true),
                selected: Timeline::new(false),
                label: Timeline::default(),
                value: Timeline::default(),
                placeholder: Timeline::default(),
                title: Timeline::default(),
                children: RefCell::new(Vec::new()),
                actions: RefCell::new(Vec::new()),
                existence_waits: Cell::new(0),
            }),
        }
    }

    /// An element that is not in the hierarchy yet
    pub fn missing(description: impl Into<String>) -> Self {
        let element = Self::new(description);
        element.inner.exists.set(false);
        element
    }

    /// Set the label
    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.inner.label.set(label.into());
        self
    }

    /// Set the value attribute
    #[must_use]
    pub fn with_value(self, value: impl Into<AttributeValue>) -> Self {
        self.inner.value.set(Some(value.into()));
        self
    }

    /// Set the placeholder
    #[must_use]
    pub fn with_placeholder(self, placeholder: impl Into<String>) -> Self {
        self.inner.placeholder.set(Some(placeholder.into()));
        self
    }

    /// Set the title
    #[must_use]
    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.inner.title.set(title.into());
        self
    }

    /// Set the element type
    #[must_use]
    pub fn with_type(self, element_type: ElementType) -> Self {
        self.inner.element_type.set(element_type);
        self
    }

    /// Set hittability
    #[must_use]
    pub fn hittable(self, hittable: bool) -> Self {
        self.inner.hittable.set(hittable);
        self
    }

    /// Set whether the element is enabled
    #[must_use]
    pub fn enabled(self, enabled: bool) -> Self {
        self.inner.enabled.set(enabled);
        self
    }

    /// Set whether the element is selected
    #[must_use]
    pub fn selected(self, selected: bool) -> Self {
        self.inner.selected.set(selected);
        self
    }

    /// Add a child element
    #[must_use]
    pub fn with_child(self, child: Self) -> Self {
        self.inner.children.borrow_mut().push(child);
        self
    }

    /// Description used by `Display`
    #[must_use]
    pub fn description(&self) -> &str {
        &self.inner.description
    }

    /// The element's type
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.inner.element_type.get()
    }

    /// Actions performed so far, in order
    #[must_use]
    pub fn actions(&self) -> Vec<MockAction> {
        self.inner.actions.borrow().clone()
    }

    /// How many times `wait_for_existence` was called
    #[must_use]
    pub fn existence_waits(&self) -> usize {
        self.inner.existence_waits.get()
    }

    /// Make the element appear or disappear now
    pub fn set_exists(&self, exists: bool) {
        self.inner.exists.set(exists);
    }

    /// Make the element appear or disappear after `after`
    pub fn schedule_exists(&self, after: Duration, exists: bool) {
        self.inner.exists.schedule(after, exists);
    }

    /// Change hittability now
    pub fn set_hittable(&self, hittable: bool) {
        self.inner.hittable.set(hittable);
    }

    /// Change hittability after `after`
    pub fn schedule_hittable(&self, after: Duration, hittable: bool) {
        self.inner.hittable.schedule(after, hittable);
    }

    /// Enable or disable now
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.set(enabled);
    }

    /// Enable or disable after `after`
    pub fn schedule_enabled(&self, after: Duration, enabled: bool) {
        self.inner.enabled.schedule(after, enabled);
    }

    /// Select or deselect now
    pub fn set_selected(&self, selected: bool) {
        self.inner.selected.set(selected);
    }

    /// Select or deselect after `after`
    pub fn schedule_selected(&self, after: Duration, selected: bool) {
        self.inner.selected.schedule(after, selected);
    }

    /// Change the label now
    pub fn set_label(&self, label: impl Into<String>) {
        self.inner.label.set(label.into());
    }

    /// Change the label after `after`
    pub fn schedule_label(&self, after: Duration, label: impl Into<String>) {
        self.inner.label.schedule(after, label.into());
    }

    /// Change the value now
    pub fn set_value(&self, value: impl Into<AttributeValue>) {
        self.inner.value.set(Some(value.into()));
    }

    /// Change the value after `after`
    pub fn schedule_value(&self, after: Duration, value: impl Into<AttributeValue>) {
        self.inner.value.schedule(after, Some(value.into()));
    }

    fn record(&self, action: MockAction) {
        tracing::trace!(element = %self.inner.description, ?action, "mock action");
        self.inner.actions.borrow_mut().push(action);
    }

    fn collect_descendants(&self, element_type: ElementType, out: &mut Vec<Self>) {
        for child in self.inner.children.borrow().iter() {
            if element_type.matches(child.element_type()) {
                out.push(child.clone());
            }
            child.collect_descendants(element_type, out);
        }
    }
}

impl fmt::Display for MockElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.description)
    }
}

impl Awaitable for MockElement {}

impl Element for MockElement {
    type Coordinate = MockCoordinate;
    type Query = MockQuery;

    fn exists(&self) -> bool {
        self.inner.exists.get()
    }

    fn is_hittable(&self) -> bool {
        self.exists() && self.inner.hittable.get()
    }

    fn is_enabled(&self) -> bool {
        self.exists() && self.inner.enabled.get()
    }

    fn is_selected(&self) -> bool {
        self.exists() && self.inner.selected.get()
    }

    fn label(&self) -> String {
        self.inner.label.get()
    }

    fn value(&self) -> Option<AttributeValue> {
        self.inner.value.get()
    }

    fn placeholder_value(&self) -> Option<String> {
        self.inner.placeholder.get()
    }

    fn title(&self) -> String {
        self.inner.title.get()
    }

    fn tap(&self) {
        self.record(MockAction::Tap);
    }

    fn double_tap(&self) {
        self.record(MockAction::DoubleTap);
    }

    fn type_text(&self, text: &str) {
        self.record(MockAction::TypeText(text.to_string()));
    }

    fn coordinate(&self, offset: NormalizedOffset) -> MockCoordinate {
        MockCoordinate {
            element: self.clone(),
            offset,
        }
    }

    fn descendants(&self, element_type: ElementType) -> MockQuery {
        let mut matches = Vec::new();
        self.collect_descendants(element_type, &mut matches);
        MockQuery::new(format!("Descendants of {self}"), matches)
    }

    fn wait_for_existence(&self, timeout: Duration) -> bool {
        let waits = &self.inner.existence_waits;
        waits.set(waits.get() + 1);
        self.wait_until(
            &|element: &Self| element.exists(),
            &WaitOptions::new().with_timeout(timeout),
        )
        .is_satisfied()
    }
}

/// A point inside a [`MockElement`]
#[derive(Debug, Clone)]
pub struct MockCoordinate {
    element: MockElement,
    offset: NormalizedOffset,
}

impl MockCoordinate {
    /// Offset within the element
    #[must_use]
    pub const fn offset(&self) -> NormalizedOffset {
        self.offset
    }
}

impl Coordinate for MockCoordinate {
    fn tap(&self) {
        self.element.record(MockAction::TapAt(self.offset));
    }

    fn double_tap(&self) {
        self.element.record(MockAction::DoubleTapAt(self.offset));
    }

    fn press(&self, duration: Duration) {
        self.element.record(MockAction::PressAt {
            offset: self.offset,
            duration,
        });
    }

    fn press_and_drag_to(&self, duration: Duration, target: &Self) {
        self.element.record(MockAction::Drag {
            from: self.offset,
            to: target.offset,
            target: target.element.description().to_string(),
            duration,
        });
    }
}

/// A query over a fixed list of candidate elements.
///
/// Only candidates that currently exist count as matches, so scheduling a
/// candidate's existence changes the query's count over time.
#[derive(Debug, Clone)]
pub struct MockQuery {
    description: String,
    candidates: Rc<RefCell<Vec<MockElement>>>,
}

impl MockQuery {
    /// Query over `candidates`
    pub fn new(description: impl Into<String>, candidates: Vec<MockElement>) -> Self {
        Self {
            description: description.into(),
            candidates: Rc::new(RefCell::new(candidates)),
        }
    }

    /// Add a candidate
    pub fn push(&self, element: MockElement) {
        self.candidates.borrow_mut().push(element);
    }

    /// Remove every candidate
    pub fn clear(&self) {
        self.candidates.borrow_mut().clear();
    }

    fn matches(&self) -> Vec<MockElement> {
        self.candidates
            .borrow()
            .iter()
            .filter(|element| element.exists())
            .cloned()
            .collect()
    }
}

impl fmt::Display for MockQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl Awaitable for MockQuery {}

impl ElementQuery for MockQuery {
    type Element = MockElement;

    fn count(&self) -> usize {
        self.candidates
            .borrow()
            .iter()
            .filter(|element| element.exists())
            .count()
    }

    fn element_bound_by(&self, index: usize) -> MockElement {
        self.matches()
            .into_iter()
            .nth(index)
            .unwrap_or_else(|| MockElement::missing(format!("{self} element {index}")))
    }

    fn descendants(&self, element_type: ElementType) -> Self {
        let mut found = Vec::new();
        for element in self.matches() {
            element.collect_descendants(element_type, &mut found);
        }
        Self::new(format!("Descendants of {self}"), found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod element {
        use super::*;

        #[test]
        fn test_defaults() {
            let element = MockElement::new("Button");
            assert!(element.exists());
            assert!(element.is_hittable());
            assert!(element.is_enabled());
            assert!(!element.is_selected());
            assert_eq!(element.label(), "");
            assert_eq!(element.value(), None);
            assert_eq!(element.to_string(), "Button");
        }

        #[test]
        fn test_missing_is_not_hittable() {
            let element = MockElement::missing("Button");
            assert!(!element.exists());
            assert!(!element.is_hittable());
        }

        #[test]
        fn test_missing_is_neither_enabled_nor_selected() {
            let element = MockElement::missing("Tab 'Inbox'").selected(true);
            assert!(!element.is_enabled());
            assert!(!element.is_selected());

            element.set_exists(true);
            assert!(element.is_enabled());
            assert!(element.is_selected());
        }

        #[test]
        fn test_clones_share_state() {
            let element = MockElement::new("Field");
            let clone = element.clone();
            clone.set_label("changed");
            clone.tap();
            assert_eq!(element.label(), "changed");
            assert_eq!(element.actions(), vec![MockAction::Tap]);
        }

        #[test]
        fn test_value_accessors() {
            let switch = MockElement::new("Switch").with_value(1);
            assert!(switch.is_on());
            assert_eq!(switch.int_value(), Some(1));
            let field = MockElement::new("Field").with_value("text");
            assert_eq!(field.string_value().as_deref(), Some("text"));
        }

        #[test]
        fn test_wait_for_existence() {
            let element = MockElement::missing("Alert");
            element.schedule_exists(Duration::from_millis(20), true);
            assert!(element.wait_for_existence(Duration::from_secs(2)));
            assert!(!MockElement::missing("Other").wait_for_existence(Duration::ZERO));
            assert_eq!(element.existence_waits(), 1);
        }

        #[test]
        fn test_nested_descendants() {
            let leaf = MockElement::new("Leaf").with_type(ElementType(9));
            let root = MockElement::new("Root")
                .with_child(MockElement::new("Branch").with_child(leaf))
                .with_child(MockElement::new("Other"));
            assert_eq!(root.descendants(ElementType::ANY).count(), 3);
            assert_eq!(root.descendants(ElementType(9)).count(), 1);
        }
    }

    mod query {
        use super::*;

        #[test]
        fn test_counts_only_existing() {
            let query = MockQuery::new(
                "Buttons",
                vec![MockElement::new("A"), MockElement::missing("B")],
            );
            assert_eq!(query.count(), 1);
            assert_eq!(query.elements().len(), 1);
        }

        #[test]
        fn test_out_of_range_placeholder() {
            let query = MockQuery::new("Buttons", vec![]);
            let element = query.element_bound_by(2);
            assert!(!element.exists());
            assert_eq!(element.to_string(), "Buttons element 2");
        }

        #[test]
        fn test_push_and_clear() {
            let query = MockQuery::new("Rows", vec![]);
            query.push(MockElement::new("Row"));
            assert_eq!(query.count(), 1);
            query.clear();
            assert_eq!(query.count(), 0);
        }
    }

    mod coordinate {
        use super::*;

        #[test]
        fn test_records_on_source_element() {
            let element = MockElement::new("Map");
            let point = element.coordinate(NormalizedOffset::TOP_RIGHT);
            point.tap();
            point.press(Duration::from_secs(1));
            assert_eq!(point.offset(), NormalizedOffset::TOP_RIGHT);
            assert_eq!(
                element.actions(),
                vec![
                    MockAction::TapAt(NormalizedOffset::TOP_RIGHT),
                    MockAction::PressAt {
                        offset: NormalizedOffset::TOP_RIGHT,
                        duration: Duration::from_secs(1),
                    },
                ]
            );
        }
    }
}
