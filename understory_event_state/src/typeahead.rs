// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typeahead search buffer.
//!
//! [`TypeaheadState`] accumulates printable characters typed within an idle
//! window and turns them into a [`TypeaheadQuery`]. It does not know about
//! items; `understory_focus::Typeahead` feeds it key events and resolves the
//! query against the live item set.
//!
//! ## Matching rules
//!
//! - Characters are lowercased as they are buffered, and labels are compared
//!   lowercased with leading whitespace trimmed ([`matches_prefix`]).
//! - A gap longer than the timeout (default [`DEFAULT_TIMEOUT_MS`]) between two
//!   characters starts a new buffer.
//! - A buffer made of one repeated character (`"aaa"`) is a *cycle*: it looks
//!   for the next item starting with that character after the current one,
//!   wrapping around. Any other buffer resolves to the first matching item.
//!
//! ```
//! use understory_event_state::typeahead::{TypeaheadState, matches_prefix};
//!
//! let labels = ["Apple", "Banana", "Avocado"];
//! let mut state = TypeaheadState::new();
//!
//! let find = |q: &understory_event_state::typeahead::TypeaheadQuery<'_>, current| {
//!     q.resolve(labels.len(), current, |i, needle| matches_prefix(labels[i], needle))
//! };
//!
//! let q = state.push('a', 0);
//! assert_eq!(find(&q, None), Some(0));
//! let q = state.push('v', 100);
//! assert_eq!(find(&q, Some(0)), Some(2));
//! ```

use alloc::string::String;

/// Idle gap after which the buffer resets, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 500;

/// Rolling typeahead buffer.
#[derive(Clone, Debug)]
pub struct TypeaheadState {
    buffer: String,
    last_input: Option<u64>,
    /// Idle gap in milliseconds after which the next character starts a new
    /// buffer.
    pub timeout: u64,
}

impl Default for TypeaheadState {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeaheadState {
    /// Create an empty buffer with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT_MS)
    }

    /// Create an empty buffer with a custom timeout in milliseconds.
    pub fn with_timeout(timeout: u64) -> Self {
        Self {
            buffer: String::new(),
            last_input: None,
            timeout,
        }
    }

    /// Append a character typed at `timestamp` and return the resulting query.
    ///
    /// If more than `timeout` milliseconds passed since the previous character
    /// the buffer is cleared first.
    pub fn push(&mut self, ch: char, timestamp: u64) -> TypeaheadQuery<'_> {
        self.expire(timestamp);
        self.buffer.extend(ch.to_lowercase());
        self.last_input = Some(timestamp);
        TypeaheadQuery::new(&self.buffer)
    }

    /// Clear the buffer if it has been idle for longer than the timeout.
    ///
    /// Returns `true` if the buffer was cleared.
    pub fn expire(&mut self, now: u64) -> bool {
        let Some(last) = self.last_input else {
            return false;
        };
        if now.saturating_sub(last) > self.timeout {
            #[cfg(feature = "tracing")]
            tracing::trace!(message = "typeahead.reset", idle = now.saturating_sub(last));
            self.clear();
            true
        } else {
            false
        }
    }

    /// Returns `true` if there is buffered input still inside the idle window.
    ///
    /// Callers use this to let Space extend a search instead of activating an
    /// item.
    pub fn is_active(&self, now: u64) -> bool {
        !self.buffer.is_empty()
            && self
                .last_input
                .is_some_and(|last| now.saturating_sub(last) <= self.timeout)
    }

    /// The buffered (lowercased) text.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Drop all buffered input.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_input = None;
    }
}

/// A search derived from the current buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeaheadQuery<'a> {
    text: &'a str,
    cycle: bool,
}

impl<'a> TypeaheadQuery<'a> {
    fn new(text: &'a str) -> Self {
        let mut chars = text.chars();
        let cycle = match chars.next() {
            Some(first) => text.chars().count() > 1 && chars.all(|c| c == first),
            None => false,
        };
        Self { text, cycle }
    }

    /// The whole buffer.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Returns `true` if the buffer is one character repeated.
    pub fn is_cycle(&self) -> bool {
        self.cycle
    }

    /// The prefix to match labels against.
    ///
    /// For a cycle this is the single repeated character.
    pub fn needle(&self) -> &'a str {
        if self.cycle {
            let end = self.text.chars().next().map_or(0, char::len_utf8);
            &self.text[..end]
        } else {
            self.text
        }
    }

    /// Resolve the query over `len` items in document order.
    ///
    /// `current` is the index of the currently focused item, if any.
    /// `is_match(index, needle)` reports whether the item at `index` matches;
    /// [`matches_prefix`] is the usual implementation.
    pub fn resolve(
        &self,
        len: usize,
        current: Option<usize>,
        mut is_match: impl FnMut(usize, &str) -> bool,
    ) -> Option<usize> {
        if len == 0 || self.text.is_empty() {
            return None;
        }
        let needle = self.needle();
        let start = if self.cycle {
            current.map_or(0, |c| (c + 1) % len)
        } else {
            0
        };
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&i| is_match(i, needle))
    }
}

/// Case-insensitive prefix test used for typeahead.
///
/// `needle` is expected to be lowercase already (as produced by
/// [`TypeaheadState`]); `label` is lowercased and has leading whitespace
/// trimmed before comparison.
pub fn matches_prefix(label: &str, needle: &str) -> bool {
    let mut hay = label.trim_start().chars().flat_map(char::to_lowercase);
    needle.chars().all(|n| hay.next() == Some(n))
}
