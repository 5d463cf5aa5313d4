// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing a [`PositionResult`] to the floating element's inline style.

use alloc::format;
use alloc::string::String;

use kurbo::Vec2;

use crate::compute::{LayoutHost, PositionResult, Strategy};

/// Inline style sink provided by the host.
pub trait StyleHost<K> {
    /// Set one CSS property on `node`.
    fn set_style(&mut self, node: &K, property: &str, value: &str);
}

/// The `position`, `left`, and `top` values for a result.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FloatingStyles {
    /// CSS `position`.
    pub position: Strategy,
    /// CSS `left`, in pixels.
    pub left: f64,
    /// CSS `top`, in pixels.
    pub top: f64,
}

impl FloatingStyles {
    /// Styles for `result` under `strategy`.
    ///
    /// `Absolute` positions are relative to the document, so `scroll` is added;
    /// `Fixed` positions are the viewport coordinates unchanged.
    pub fn new(result: &PositionResult, strategy: Strategy, scroll: Vec2) -> Self {
        let (left, top) = match strategy {
            Strategy::Absolute => (result.x + scroll.x, result.y + scroll.y),
            Strategy::Fixed => (result.x, result.y),
        };
        Self {
            position: strategy,
            left,
            top,
        }
    }

    /// CSS `left` value, e.g. `"12px"`.
    pub fn left_css(&self) -> String {
        px(self.left)
    }

    /// CSS `top` value.
    pub fn top_css(&self) -> String {
        px(self.top)
    }
}

fn px(v: f64) -> String {
    format!("{v}px")
}

/// Apply `result` to `floating` with the given strategy.
///
/// Writes `position`, `left`, and `top`. Returns the values written.
pub fn apply_floating_styles<K, H>(
    host: &mut H,
    floating: &K,
    result: &PositionResult,
    strategy: Strategy,
) -> FloatingStyles
where
    H: StyleHost<K> + LayoutHost<K> + ?Sized,
{
    let styles = FloatingStyles::new(result, strategy, host.scroll_offset());
    host.set_style(floating, "position", styles.position.as_css());
    host.set_style(floating, "left", &styles.left_css());
    host.set_style(floating, "top", &styles.top_css());
    styles
}
