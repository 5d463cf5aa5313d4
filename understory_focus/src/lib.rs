// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_focus --heading-base-level=0

//! Understory Focus: keyboard focus controllers for menus, listboxes, toolbars,
//! and other composite widgets.
//!
//! This crate models focus inside a container as a combination of:
//! - **Navigation intents** ([`Navigation`]) such as [`Navigation::Next`] or
//!   [`Navigation::Last`], derived from arrow keys according to an
//!   [`Orientation`].
//! - A **live item set**: the host's [`FocusHost::query_items`] is asked for the
//!   container's items on every keystroke, so controllers never hold stale
//!   element references across re-renders.
//! - Two controllers:
//!   - [`RovingFocus`]: a single tab stop that arrow keys, Home, and End move
//!     between items (`tabindex="0"` on the current item, `-1` on the rest).
//!   - [`Typeahead`]: first-characters search that focuses the item whose label
//!     starts with what the user typed.
//!
//! ## Minimal example
//!
//! A vertical menu with three items and wrapping:
//!
//! ```rust
//! use std::borrow::Cow;
//! use understory_event_state::key::KeyEvent;
//! use understory_focus::{FocusHost, RovingFocus, RovingFocusOptions, WrapMode};
//!
//! #[derive(Default)]
//! struct Menu {
//!     focused: Option<u32>,
//!     tab_index: [i32; 3],
//! }
//!
//! impl FocusHost<u32> for Menu {
//!     fn query_items(&self, _container: &u32, _selector: &str, out: &mut Vec<u32>) {
//!         out.extend([0, 1, 2]);
//!     }
//!     fn focused(&self) -> Option<u32> { self.focused }
//!     fn focus(&mut self, item: &u32) { self.focused = Some(*item); }
//!     fn set_tab_index(&mut self, item: &u32, tab_index: i32) {
//!         self.tab_index[*item as usize] = tab_index;
//!     }
//!     fn label(&self, _item: &u32) -> Option<Cow<'_, str>> { None }
//! }
//!
//! let mut host = Menu::default();
//! let mut roving = RovingFocus::new(100, RovingFocusOptions::new().wrap(WrapMode::Scope));
//! roving.sync(&mut host);
//! assert_eq!(host.tab_index, [0, -1, -1]);
//!
//! host.focused = Some(0);
//! roving.handle_key(&mut host, &KeyEvent::from_dom_key("ArrowUp", 0));
//! assert_eq!(host.focused, Some(2));
//! assert_eq!(host.tab_index, [-1, -1, 0]);
//! ```
//!
//! Disabled items are never focused: the host's [`FocusHost::is_enabled`] is
//! applied on top of the item selector.
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` debug events when focus moves.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod host;
mod roving;
mod typeahead;

pub use host::{DEFAULT_ITEM_SELECTOR, FocusHost, collect_items};
pub use roving::{RovingFocus, RovingFocusOptions};
pub use typeahead::{Typeahead, TypeaheadOptions};

use understory_event_state::key::Key;

/// Logical focus movement within an item set.
///
/// These values represent navigation intents; [`next_index`] interprets them
/// over a linear (document-order) item list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Navigation {
    /// Move to the following item.
    Next,
    /// Move to the preceding item.
    Prev,
    /// Move to the first item.
    First,
    /// Move to the last item.
    Last,
}

/// Which arrow keys move focus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Left/Right arrows (toolbars, menubars, tabs).
    Horizontal,
    /// Up/Down arrows (menus, listboxes).
    #[default]
    Vertical,
    /// All four arrows.
    Both,
}

impl Orientation {
    /// Map a key to a navigation intent under this orientation.
    ///
    /// `home_end` controls whether Home and End are interpreted.
    pub fn navigation(self, key: Key, home_end: bool) -> Option<Navigation> {
        let vertical = matches!(self, Self::Vertical | Self::Both);
        let horizontal = matches!(self, Self::Horizontal | Self::Both);
        match key {
            Key::ArrowDown if vertical => Some(Navigation::Next),
            Key::ArrowUp if vertical => Some(Navigation::Prev),
            Key::ArrowRight if horizontal => Some(Navigation::Next),
            Key::ArrowLeft if horizontal => Some(Navigation::Prev),
            Key::Home if home_end => Some(Navigation::First),
            Key::End if home_end => Some(Navigation::Last),
            _ => None,
        }
    }
}

/// Wrap mode configuration for focus traversal.
///
/// Controls whether moving past either end of the item list wraps around or
/// stops at the edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Do not wrap; moving past an end is a no-op.
    Never,
    /// Wrap within the container.
    #[default]
    Scope,
}

#[derive(Copy, Clone)]
enum Step {
    Forward,
    Backward,
}

/// Resolve `navigation` over `len` items from `origin`.
///
/// Without an origin, forward movement lands on the first item and backward
/// movement on the last. Returns `None` when there are no items or when
/// movement is blocked at an edge with [`WrapMode::Never`].
///
/// ```
/// use understory_focus::{Navigation, WrapMode, next_index};
///
/// assert_eq!(next_index(3, Some(0), Navigation::Prev, WrapMode::Scope), Some(2));
/// assert_eq!(next_index(3, Some(0), Navigation::Prev, WrapMode::Never), None);
/// assert_eq!(next_index(3, None, Navigation::Next, WrapMode::Never), Some(0));
/// assert_eq!(next_index(0, None, Navigation::First, WrapMode::Scope), None);
/// ```
pub fn next_index(
    len: usize,
    origin: Option<usize>,
    navigation: Navigation,
    wrap: WrapMode,
) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match navigation {
        Navigation::First => Some(0),
        Navigation::Last => Some(len - 1),
        Navigation::Next => step(len, origin, wrap, Step::Forward),
        Navigation::Prev => step(len, origin, wrap, Step::Backward),
    }
}

fn step(len: usize, origin: Option<usize>, wrap: WrapMode, step: Step) -> Option<usize> {
    // An origin past the end (the list shrank) behaves like no origin.
    let origin = origin.filter(|&pos| pos < len);
    match step {
        Step::Forward => match origin {
            Some(pos) => {
                if pos + 1 < len {
                    Some(pos + 1)
                } else if wrap == WrapMode::Scope {
                    Some(0)
                } else {
                    None
                }
            }
            None => Some(0),
        },
        Step::Backward => match origin {
            Some(pos) => {
                if pos > 0 {
                    Some(pos - 1)
                } else if wrap == WrapMode::Scope {
                    Some(len - 1)
                } else {
                    None
                }
            }
            None => Some(len - 1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_next_prev_with_wrap() {
        assert_eq!(next_index(2, Some(0), Navigation::Next, WrapMode::Scope), Some(1));
        assert_eq!(next_index(2, Some(1), Navigation::Next, WrapMode::Scope), Some(0));
        assert_eq!(next_index(2, Some(0), Navigation::Prev, WrapMode::Scope), Some(1));
    }

    #[test]
    fn linear_no_wrap_stops_at_edges() {
        assert_eq!(next_index(2, Some(1), Navigation::Next, WrapMode::Never), None);
        assert_eq!(next_index(2, Some(0), Navigation::Prev, WrapMode::Never), None);
        assert_eq!(next_index(2, Some(1), Navigation::Prev, WrapMode::Never), Some(0));
    }

    #[test]
    fn home_end_ignore_origin() {
        assert_eq!(next_index(5, Some(3), Navigation::First, WrapMode::Never), Some(0));
        assert_eq!(next_index(5, None, Navigation::Last, WrapMode::Never), Some(4));
    }

    #[test]
    fn stale_origin_is_treated_as_missing() {
        assert_eq!(next_index(2, Some(7), Navigation::Next, WrapMode::Never), Some(0));
        assert_eq!(next_index(2, Some(7), Navigation::Prev, WrapMode::Never), Some(1));
    }

    #[test]
    fn orientation_maps_arrows() {
        let v = Orientation::Vertical;
        assert_eq!(v.navigation(Key::ArrowDown, true), Some(Navigation::Next));
        assert_eq!(v.navigation(Key::ArrowLeft, true), None);

        let h = Orientation::Horizontal;
        assert_eq!(h.navigation(Key::ArrowLeft, true), Some(Navigation::Prev));
        assert_eq!(h.navigation(Key::ArrowUp, true), None);

        let both = Orientation::Both;
        assert_eq!(both.navigation(Key::ArrowUp, true), Some(Navigation::Prev));
        assert_eq!(both.navigation(Key::ArrowRight, true), Some(Navigation::Next));

        assert_eq!(v.navigation(Key::Home, true), Some(Navigation::First));
        assert_eq!(v.navigation(Key::End, false), None);
    }
}
