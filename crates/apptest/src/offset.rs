//! Normalized offsets inside an element's frame.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point expressed as a fraction of an element's bounding box.
///
/// `(0, 0)` is the top-left corner and `(1, 1)` the bottom-right one.
/// Components outside `0.0..=1.0` address points outside the element, which
/// hosts accept for gestures that start or end beyond the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedOffset {
    /// Horizontal fraction
    pub dx: f64,
    /// Vertical fraction
    pub dy: f64,
}

impl NormalizedOffset {
    /// Top left corner
    pub const TOP_LEFT: Self = Self::new(0.0, 0.0);
    /// Top edge, horizontally centered
    pub const TOP: Self = Self::new(0.5, 0.0);
    /// Top right corner
    pub const TOP_RIGHT: Self = Self::new(1.0, 0.0);
    /// Left edge, vertically centered
    pub const LEFT: Self = Self::new(0.0, 0.5);
    /// Center of the element
    pub const CENTER: Self = Self::new(0.5, 0.5);
    /// Right edge, vertically centered
    pub const RIGHT: Self = Self::new(1.0, 0.5);
    /// Bottom left corner
    pub const BOTTOM_LEFT: Self = Self::new(0.0, 1.0);
    /// Bottom edge, horizontally centered
    pub const BOTTOM: Self = Self::new(0.5, 1.0);
    /// Bottom right corner
    pub const BOTTOM_RIGHT: Self = Self::new(1.0, 1.0);

    /// Create a new offset
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Copy shifted by `x` and `y`
    #[must_use]
    pub fn offset(self, x: f64, y: f64) -> Self {
        Self::new(self.dx + x, self.dy + y)
    }

    /// Whether the point lies inside the element's frame
    #[must_use]
    pub fn is_within_bounds(&self) -> bool {
        (0.0..=1.0).contains(&self.dx) && (0.0..=1.0).contains(&self.dy)
    }
}

impl fmt::Display for NormalizedOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.dx, self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_anchors() {
        assert_eq!(NormalizedOffset::TOP_LEFT, NormalizedOffset::new(0.0, 0.0));
        assert_eq!(NormalizedOffset::CENTER, NormalizedOffset::new(0.5, 0.5));
        assert_eq!(NormalizedOffset::BOTTOM_RIGHT, NormalizedOffset::new(1.0, 1.0));
        assert_eq!(NormalizedOffset::TOP.dx, 0.5);
        assert_eq!(NormalizedOffset::RIGHT.dx, 1.0);
        assert_eq!(NormalizedOffset::BOTTOM.dy, 1.0);
        assert_eq!(NormalizedOffset::default(), NormalizedOffset::TOP_LEFT);
    }

    #[test]
    fn test_offset() {
        let shifted = NormalizedOffset::CENTER.offset(0.25, -0.5);
        assert_eq!(shifted, NormalizedOffset::new(0.75, 0.0));
    }

    #[test]
    fn test_bounds() {
        assert!(NormalizedOffset::BOTTOM_LEFT.is_within_bounds());
        assert!(!NormalizedOffset::RIGHT.offset(0.1, 0.0).is_within_bounds());
    }

    #[test]
    fn test_display() {
        assert_eq!(NormalizedOffset::CENTER.to_string(), "(0.50, 0.50)");
    }

    proptest! {
        #[test]
        fn prop_offset_by_zero_is_identity(dx in -2.0f64..2.0, dy in -2.0f64..2.0) {
            let base = NormalizedOffset::new(dx, dy);
            prop_assert_eq!(base.offset(0.0, 0.0), base);
        }
    }
}
