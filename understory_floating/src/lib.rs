// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_floating --heading-base-level=0

//! Understory Floating: positioning for menus, popovers, tooltips, and other
//! floating panels.
//!
//! Given the bounding box of an *anchor* (the button that opened a menu) and
//! the size of a *floating* element (the menu panel), [`compute_position`]
//! returns the top-left corner for the floating element and the
//! [`Placement`] actually used.
//!
//! - [`Placement`] combines a [`Side`] (`top`, `bottom`, `left`, `right`) and an
//!   [`Alignment`] (`start`, `center`, `end`).
//! - **Flip** switches to the opposite side when the requested side overflows
//!   the viewport on the main axis and the opposite side overflows less.
//! - **Shift** slides the element along the cross axis to keep it inside the
//!   viewport, without changing the side.
//!
//! The core function is pure and works on [`kurbo`] rectangles. Hosts that own
//! an element tree implement [`LayoutHost`] and use [`compute_position_for`] or
//! the fault-tolerant [`Positioner`], [`AutoUpdate`] to follow scrolling and
//! layout changes, and [`apply_floating_styles`] to write the result.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Rect, Size};
//! use understory_floating::{FloatingOptions, Placement, compute_position};
//!
//! let viewport = Size::new(800.0, 600.0);
//! // A trigger hugging the left edge of the screen.
//! let anchor = Rect::new(0.0, 40.0, 24.0, 64.0);
//! let menu = Size::new(160.0, 120.0);
//!
//! let options = FloatingOptions::new()
//!     .placement("bottom-end".parse().unwrap())
//!     .offset(4.0)
//!     .shift(true)
//!     .shift_padding(8.0);
//! let r = compute_position(anchor, menu, viewport, &options);
//!
//! assert_eq!(r.placement, options.placement);
//! assert_eq!((r.x, r.y), (8.0, 68.0));
//! ```
//!
//! Computation is deterministic: identical inputs always produce identical
//! output, so repeated updates from [`AutoUpdate`] are harmless.
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` builds using `libm` for floating-point math.
//! - `tracing`: emit `tracing` debug events when a placement flips.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod auto_update;
mod compute;
pub mod geometry;
mod placement;
mod styles;

pub use auto_update::{AutoUpdate, Signal};
pub use compute::{
    FloatingOptions, LayoutHost, PositionResult, Positioner, Strategy, compute_position,
    compute_position_for,
};
pub use placement::{Alignment, Axis, ParsePlacementError, Placement, Side};
pub use styles::{FloatingStyles, StyleHost, apply_floating_styles};
