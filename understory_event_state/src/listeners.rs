// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener sets and propagation results.
//!
//! Controllers do not register callbacks with the platform themselves. Each one
//! reports the [`Listeners`] it currently wants, and the host routes matching
//! events to it. A destroyed controller always reports [`Listeners::empty`].
//!
//! Handlers answer with a [`Propagation`]; the host applies it to the native
//! event (`preventDefault()` / `stopPropagation()`).
//!
//! ```
//! use understory_event_state::listeners::{Listeners, Propagation};
//!
//! let wanted = Listeners::KEYDOWN_CAPTURE | Listeners::POINTERDOWN_CAPTURE;
//! assert!(wanted.is_capture());
//!
//! let mut acc = Propagation::IGNORED;
//! acc.merge(Propagation::CONSUMED);
//! assert!(acc.default_prevented && acc.stopped);
//! ```

bitflags::bitflags! {
    /// Events a controller is listening for.
    ///
    /// `*_CAPTURE` flags are document-level capture-phase listeners; the others
    /// are bubbling listeners on the controller's own element (or, for
    /// `SCROLL`/`RESIZE`, passive window listeners).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Listeners: u8 {
        /// `keydown` on the controller's container.
        const KEYDOWN             = 0b0000_0001;
        /// Document `keydown`, capture phase.
        const KEYDOWN_CAPTURE     = 0b0000_0010;
        /// Document `click`, capture phase.
        const CLICK_CAPTURE       = 0b0000_0100;
        /// Document `pointerdown`, capture phase.
        const POINTERDOWN_CAPTURE = 0b0000_1000;
        /// Window `scroll` (passive, capture so nested scrollers count).
        const SCROLL              = 0b0001_0000;
        /// Window `resize` (passive).
        const RESIZE              = 0b0010_0000;
    }
}

impl Listeners {
    /// Returns `true` if any capture-phase listener is present.
    pub fn is_capture(self) -> bool {
        self.intersects(Self::KEYDOWN_CAPTURE | Self::CLICK_CAPTURE | Self::POINTERDOWN_CAPTURE)
    }
}

/// What a handler did with an event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Propagation {
    /// The host should call `preventDefault()`.
    pub default_prevented: bool,
    /// The host should call `stopPropagation()`.
    pub stopped: bool,
}

impl Propagation {
    /// The handler did not react.
    pub const IGNORED: Self = Self {
        default_prevented: false,
        stopped: false,
    };

    /// The handler consumed the event: prevent the default action and stop
    /// propagation.
    pub const CONSUMED: Self = Self {
        default_prevented: true,
        stopped: true,
    };

    /// The handler acted and prevented the default action, but lets the event
    /// continue to propagate.
    pub const PREVENT_DEFAULT: Self = Self {
        default_prevented: true,
        stopped: false,
    };

    /// Returns `true` if the handler did anything.
    pub fn is_handled(self) -> bool {
        self.default_prevented || self.stopped
    }

    /// Fold another handler's result into this one.
    pub fn merge(&mut self, other: Self) {
        self.default_prevented |= other.default_prevented;
        self.stopped |= other.stopped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_detection() {
        assert!(!Listeners::empty().is_capture());
        assert!(!(Listeners::KEYDOWN | Listeners::SCROLL).is_capture());
        assert!(Listeners::CLICK_CAPTURE.is_capture());
    }

    #[test]
    fn merge_is_sticky() {
        let mut p = Propagation::PREVENT_DEFAULT;
        p.merge(Propagation::IGNORED);
        assert_eq!(p, Propagation::PREVENT_DEFAULT);
        assert!(p.is_handled());
        assert!(!Propagation::IGNORED.is_handled());
    }
}
