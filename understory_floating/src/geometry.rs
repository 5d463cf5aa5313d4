// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport overflow and clamping helpers.
//!
//! The viewport is the rectangle `(0, 0)..(width, height)` in the same
//! coordinate space as element bounding boxes.

use kurbo::{Rect, Size};

use crate::placement::Axis;

/// How far a rectangle sticks out past each viewport edge.
///
/// Each field is non-negative; zero means the rectangle is inside on that
/// edge.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Overflow {
    /// Pixels above the top edge.
    pub top: f64,
    /// Pixels past the right edge.
    pub right: f64,
    /// Pixels below the bottom edge.
    pub bottom: f64,
    /// Pixels before the left edge.
    pub left: f64,
}

impl Overflow {
    /// Returns `true` if the rectangle fits on every edge.
    pub fn is_contained(&self) -> bool {
        self.top <= 0.0 && self.right <= 0.0 && self.bottom <= 0.0 && self.left <= 0.0
    }

    /// Total overflow along `axis`.
    pub fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left + self.right,
            Axis::Vertical => self.top + self.bottom,
        }
    }
}

/// Measure how far `rect` overflows a viewport of size `viewport`.
pub fn overflow(rect: Rect, viewport: Size) -> Overflow {
    Overflow {
        top: (-rect.y0).max(0.0),
        right: (rect.x1 - viewport.width).max(0.0),
        bottom: (rect.y1 - viewport.height).max(0.0),
        left: (-rect.x0).max(0.0),
    }
}

/// Clamp a start coordinate on one axis so a span of `len` stays within
/// `[padding, viewport_len - padding]`.
///
/// When the span does not fit (the valid range is inverted) the coordinate is
/// pinned to `padding`.
///
/// ```
/// use understory_floating::geometry::clamp_span;
///
/// assert_eq!(clamp_span(-20.0, 100.0, 800.0, 8.0), 8.0);
/// assert_eq!(clamp_span(750.0, 100.0, 800.0, 8.0), 692.0);
/// assert_eq!(clamp_span(300.0, 100.0, 800.0, 8.0), 300.0);
/// // Too wide to fit: pin to the leading padding.
/// assert_eq!(clamp_span(300.0, 900.0, 800.0, 8.0), 8.0);
/// ```
pub fn clamp_span(start: f64, len: f64, viewport_len: f64, padding: f64) -> f64 {
    let min = finite(padding);
    let max = finite(viewport_len - len - padding);
    if max < min {
        return min;
    }
    finite(start).clamp(min, max)
}

/// Replace a non-finite value with zero.
pub(crate) fn finite(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

/// Finite, non-inverted copy of `rect`.
pub(crate) fn sanitize_rect(rect: Rect) -> Rect {
    let (x0, x1) = (finite(rect.x0), finite(rect.x1));
    let (y0, y1) = (finite(rect.y0), finite(rect.y1));
    Rect::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
}

/// Finite, non-negative copy of `size`.
pub(crate) fn sanitize_size(size: Size) -> Size {
    Size::new(finite(size.width).max(0.0), finite(size.height).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_per_edge() {
        let vp = Size::new(100.0, 50.0);
        let o = overflow(Rect::new(-5.0, 10.0, 110.0, 60.0), vp);
        assert_eq!(o.left, 5.0);
        assert_eq!(o.right, 10.0);
        assert_eq!(o.top, 0.0);
        assert_eq!(o.bottom, 10.0);
        assert_eq!(o.along(Axis::Horizontal), 15.0);
        assert_eq!(o.along(Axis::Vertical), 10.0);
        assert!(!o.is_contained());
        assert!(overflow(Rect::new(0.0, 0.0, 100.0, 50.0), vp).is_contained());
    }

    #[test]
    fn sanitizes_degenerate_input() {
        let r = sanitize_rect(Rect::new(f64::NAN, 10.0, f64::INFINITY, 0.0));
        assert_eq!(r, Rect::new(0.0, 0.0, 0.0, 10.0));
        let s = sanitize_size(Size::new(-4.0, f64::NEG_INFINITY));
        assert_eq!(s, Size::ZERO);
    }
}
