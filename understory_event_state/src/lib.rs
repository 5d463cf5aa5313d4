// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_event_state --heading-base-level=0

//! Understory Event State: the shared input vocabulary of the overlay crates.
//!
//! The overlay kernel (`understory_floating`, `understory_dismiss`,
//! `understory_focus`) never talks to a browser or a windowing system directly.
//! A host owns the element tree, forwards input, and applies side effects. This
//! crate defines the small set of types that cross that boundary:
//!
//! - [`key`]: [`Key`](key::Key), [`Modifiers`](key::Modifiers) and
//!   [`KeyEvent`](key::KeyEvent), including parsing of DOM `KeyboardEvent.key`
//!   strings.
//! - [`listeners`]: the [`Listeners`](listeners::Listeners) bitflags a controller
//!   reports so the host knows which events to route to it, and the
//!   [`Propagation`](listeners::Propagation) value handlers return.
//! - [`tree`]: the [`NodeTree`](tree::NodeTree) parent lookup plus
//!   [`contains`](tree::contains) and [`ancestors`](tree::ancestors).
//! - [`typeahead`]: [`TypeaheadState`](typeahead::TypeaheadState), the rolling
//!   search buffer behind first-character navigation.
//!
//! ## Example
//!
//! ```
//! use understory_event_state::key::{Key, KeyEvent};
//! use understory_event_state::typeahead::TypeaheadState;
//!
//! let mut state = TypeaheadState::new();
//! assert_eq!(state.push('A', 1_000).text(), "a");
//! assert_eq!(state.push('v', 1_200).text(), "av");
//! // After the idle window the buffer starts over.
//! assert_eq!(state.push('b', 2_000).text(), "b");
//!
//! let ev = KeyEvent::from_dom_key("Escape", 0);
//! assert_eq!(ev.key, Key::Escape);
//! ```
//!
//! Timestamps are host-provided milliseconds; nothing here reads a clock.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod key;
pub mod listeners;
pub mod tree;
pub mod typeahead;
