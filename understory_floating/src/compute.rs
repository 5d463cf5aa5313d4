// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Position computation: base coordinates, flip, and shift.

use kurbo::{Point, Rect, Size, Vec2};

use crate::geometry::{clamp_span, finite, overflow, sanitize_rect, sanitize_size};
use crate::placement::{Alignment, Axis, Placement, Side};

/// CSS positioning strategy for the floating element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `position: absolute`; coordinates are offset by the document scroll.
    #[default]
    Absolute,
    /// `position: fixed`; coordinates are viewport coordinates.
    Fixed,
}

impl Strategy {
    /// Value for the CSS `position` property.
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
        }
    }
}

/// Options for [`compute_position`].
///
/// ```
/// use understory_floating::{FloatingOptions, Placement};
///
/// let opts = FloatingOptions::new()
///     .placement(Placement::BOTTOM_START)
///     .offset(4.0)
///     .flip(true)
///     .shift(true)
///     .shift_padding(8.0);
/// assert!(opts.flip && opts.shift);
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatingOptions {
    /// Requested placement. Default: `bottom`.
    pub placement: Placement,
    /// Gap between anchor and floating element along the main axis, in
    /// pixels. Default: `0`.
    pub offset: f64,
    /// Try the opposite side when the requested one overflows the viewport on
    /// the main axis. Default: `false`.
    pub flip: bool,
    /// Translate along the cross axis to stay inside the viewport. Default:
    /// `false`.
    pub shift: bool,
    /// Minimum distance from the viewport edges when shifting. Default: `0`.
    pub shift_padding: f64,
    /// How the result is applied by [`apply_floating_styles`](crate::apply_floating_styles).
    /// Default: [`Strategy::Absolute`].
    pub strategy: Strategy,
}

impl Default for FloatingOptions {
    fn default() -> Self {
        Self {
            placement: Placement::BOTTOM,
            offset: 0.0,
            flip: false,
            shift: false,
            shift_padding: 0.0,
            strategy: Strategy::Absolute,
        }
    }
}

impl FloatingOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested placement.
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Set the main-axis gap.
    #[must_use]
    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Enable or disable flipping.
    #[must_use]
    pub fn flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    /// Enable or disable shifting.
    #[must_use]
    pub fn shift(mut self, shift: bool) -> Self {
        self.shift = shift;
        self
    }

    /// Set the shift padding.
    #[must_use]
    pub fn shift_padding(mut self, padding: f64) -> Self {
        self.shift_padding = padding;
        self
    }

    /// Set the positioning strategy.
    #[must_use]
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// Resolved position of a floating element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionResult {
    /// Left edge in viewport coordinates.
    pub x: f64,
    /// Top edge in viewport coordinates.
    pub y: f64,
    /// Placement actually used. The side differs from the requested one when
    /// the element flipped; the alignment never changes.
    pub placement: Placement,
}

impl PositionResult {
    /// The result used when nothing could be measured: `(0, 0)` with the
    /// requested placement.
    pub const fn degenerate(placement: Placement) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            placement,
        }
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Rectangle occupied by a floating element of `size` at this position.
    pub fn rect(&self, size: Size) -> Rect {
        Rect::from_origin_size(self.origin(), size)
    }

    /// Translate by `delta`, keeping the placement.
    #[must_use]
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }
}

/// Compute where to put a floating element of size `floating` next to
/// `anchor`, inside a viewport of size `viewport`.
///
/// All inputs are in viewport coordinates. Non-finite inputs are treated as
/// zero and negative sizes as empty, so the result is always finite.
///
/// The steps are:
/// 1. Base coordinates for the requested placement: the side picks the anchor
///    edge (± `offset`), the alignment picks the cross-axis anchor point.
/// 2. With `flip`, if the result overflows the viewport on the main axis, the
///    mirrored side is tried and kept only if it overflows strictly less.
/// 3. With `shift`, the cross-axis coordinate is clamped into
///    `[shift_padding, viewport - size - shift_padding]` (pinned to
///    `shift_padding` if that range is empty).
///
/// ```
/// use kurbo::{Rect, Size};
/// use understory_floating::{FloatingOptions, Placement, compute_position};
///
/// let viewport = Size::new(800.0, 600.0);
/// // A button near the bottom of the screen.
/// let anchor = Rect::new(100.0, 560.0, 180.0, 590.0);
/// let menu = Size::new(120.0, 200.0);
///
/// let r = compute_position(anchor, menu, viewport, &FloatingOptions::new().flip(true));
/// assert_eq!(r.placement, Placement::TOP);
/// assert_eq!(r.y, 360.0);
/// ```
pub fn compute_position(
    anchor: Rect,
    floating: Size,
    viewport: Size,
    options: &FloatingOptions,
) -> PositionResult {
    let anchor = sanitize_rect(anchor);
    let floating = sanitize_size(floating);
    let viewport = sanitize_size(viewport);
    let offset = finite(options.offset);
    let requested = options.placement;

    let mut placement = requested;
    let mut origin = base_origin(anchor, floating, placement, offset);

    if options.flip {
        let axis = placement.side.main_axis();
        let main_overflow = |p: Point| {
            overflow(Rect::from_origin_size(p, floating), viewport).along(axis)
        };
        let current = main_overflow(origin);
        if current > 0.0 {
            let mirrored = placement.flipped();
            let mirrored_origin = base_origin(anchor, floating, mirrored, offset);
            let candidate = main_overflow(mirrored_origin);
            if candidate < current {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    message = "floating.flip",
                    from = requested.side.as_str(),
                    to = mirrored.side.as_str(),
                    overflow = current,
                    mirrored_overflow = candidate,
                );
                placement = mirrored;
                origin = mirrored_origin;
            }
        }
    }

    if options.shift {
        let padding = finite(options.shift_padding);
        #[cfg(feature = "tracing")]
        let unshifted = origin;
        match placement.side.cross_axis() {
            Axis::Horizontal => {
                origin.x = clamp_span(origin.x, floating.width, viewport.width, padding);
            }
            Axis::Vertical => {
                origin.y = clamp_span(origin.y, floating.height, viewport.height, padding);
            }
        }
        #[cfg(feature = "tracing")]
        {
            let delta = origin - unshifted;
            if delta != Vec2::ZERO {
                tracing::debug!(
                    message = "floating.shift",
                    axis = ?placement.side.cross_axis(),
                    dx = delta.x,
                    dy = delta.y,
                );
            }
        }
    }

    PositionResult {
        x: finite(origin.x),
        y: finite(origin.y),
        placement,
    }
}

/// Top-left corner for `placement` before flip or shift.
fn base_origin(anchor: Rect, floating: Size, placement: Placement, offset: f64) -> Point {
    let align = |start: f64, end: f64, len: f64| match placement.alignment {
        Alignment::Start => start,
        Alignment::Center => start + (end - start) * 0.5 - len * 0.5,
        Alignment::End => end - len,
    };
    match placement.side {
        Side::Bottom => Point::new(
            align(anchor.x0, anchor.x1, floating.width),
            anchor.y1 + offset,
        ),
        Side::Top => Point::new(
            align(anchor.x0, anchor.x1, floating.width),
            anchor.y0 - offset - floating.height,
        ),
        Side::Right => Point::new(
            anchor.x1 + offset,
            align(anchor.y0, anchor.y1, floating.height),
        ),
        Side::Left => Point::new(
            anchor.x0 - offset - floating.width,
            align(anchor.y0, anchor.y1, floating.height),
        ),
    }
}

/// Measurements the position engine needs from the host.
pub trait LayoutHost<K> {
    /// Bounding box of `node` in viewport coordinates, or `None` if the node
    /// is detached or unknown.
    fn bounding_rect(&self, node: &K) -> Option<Rect>;

    /// Size of the layout viewport (`innerWidth` × `innerHeight`).
    fn viewport(&self) -> Size;

    /// Document scroll offset, used by [`Strategy::Absolute`].
    fn scroll_offset(&self) -> Vec2 {
        Vec2::ZERO
    }
}

/// Measure `anchor` and `floating` through `host` and compute a position.
///
/// Returns `None` if either element cannot be measured.
pub fn compute_position_for<K, H>(
    host: &H,
    anchor: &K,
    floating: &K,
    options: &FloatingOptions,
) -> Option<PositionResult>
where
    H: LayoutHost<K> + ?Sized,
{
    let anchor_rect = host.bounding_rect(anchor)?;
    let floating_rect = host.bounding_rect(floating)?;
    Some(compute_position(
        anchor_rect,
        floating_rect.size(),
        host.viewport(),
        options,
    ))
}

/// Stateful wrapper around [`compute_position_for`] that never fails.
///
/// When an element cannot be measured the last successful result is returned
/// again, or [`PositionResult::degenerate`] if there is none.
#[derive(Clone, Debug, Default)]
pub struct Positioner {
    options: FloatingOptions,
    last: Option<PositionResult>,
}

impl Positioner {
    /// Create a positioner with the given options.
    pub fn new(options: FloatingOptions) -> Self {
        Self {
            options,
            last: None,
        }
    }

    /// Current options.
    pub fn options(&self) -> &FloatingOptions {
        &self.options
    }

    /// Replace the options. The last-known result is kept.
    pub fn set_options(&mut self, options: FloatingOptions) {
        self.options = options;
    }

    /// The last successfully computed result.
    pub fn last(&self) -> Option<PositionResult> {
        self.last
    }

    /// Forget the last-known result.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Recompute the position of `floating` relative to `anchor`.
    pub fn update<K, H>(&mut self, host: &H, anchor: &K, floating: &K) -> PositionResult
    where
        H: LayoutHost<K> + ?Sized,
    {
        match compute_position_for(host, anchor, floating, &self.options) {
            Some(result) => {
                self.last = Some(result);
                result
            }
            None => self
                .last
                .unwrap_or(PositionResult::degenerate(self.options.placement)),
        }
    }
}
