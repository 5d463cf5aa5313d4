// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typeahead (first-characters) search over a container's items.

use alloc::borrow::Cow;

use understory_event_state::key::KeyEvent;
use understory_event_state::listeners::{Listeners, Propagation};
use understory_event_state::typeahead::{DEFAULT_TIMEOUT_MS, TypeaheadState, matches_prefix};

use crate::host::{DEFAULT_ITEM_SELECTOR, FocusHost, collect_items};

/// Options for [`Typeahead`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeaheadOptions {
    /// Selector identifying the container's items.
    /// Default: [`DEFAULT_ITEM_SELECTOR`].
    pub item_selector: Cow<'static, str>,
    /// Idle gap in milliseconds after which the buffer resets. Default: 500.
    pub timeout_ms: u64,
}

impl Default for TypeaheadOptions {
    fn default() -> Self {
        Self {
            item_selector: Cow::Borrowed(DEFAULT_ITEM_SELECTOR),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl TypeaheadOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item selector.
    #[must_use]
    pub fn item_selector(mut self, selector: impl Into<Cow<'static, str>>) -> Self {
        self.item_selector = selector.into();
        self
    }

    /// Set the idle timeout.
    #[must_use]
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// Typeahead controller for one container.
///
/// Printable keys are buffered and the buffer is matched against item labels
/// from [`FocusHost::label`]. Typing the same character repeatedly cycles
/// through the items starting with it.
///
/// Only focus moves; tab indices are left to [`RovingFocus`](crate::RovingFocus),
/// whose [`sync`](crate::RovingFocus::sync) picks up the newly focused item.
///
/// ```
/// use std::borrow::Cow;
/// use understory_event_state::key::KeyEvent;
/// use understory_focus::{FocusHost, Typeahead, TypeaheadOptions};
///
/// struct Fruit(Option<usize>);
/// const LABELS: [&str; 3] = ["Apple", "Banana", "Avocado"];
///
/// impl FocusHost<usize> for Fruit {
///     fn query_items(&self, _c: &usize, _s: &str, out: &mut Vec<usize>) {
///         out.extend(0..LABELS.len());
///     }
///     fn focused(&self) -> Option<usize> { self.0 }
///     fn focus(&mut self, item: &usize) { self.0 = Some(*item); }
///     fn set_tab_index(&mut self, _item: &usize, _tab_index: i32) {}
///     fn label(&self, item: &usize) -> Option<Cow<'_, str>> {
///         Some(Cow::Borrowed(LABELS[*item]))
///     }
/// }
///
/// let mut host = Fruit(None);
/// let mut search = Typeahead::new(99, TypeaheadOptions::new());
/// search.handle_key(&mut host, &KeyEvent::from_dom_key("a", 0));
/// assert_eq!(host.0, Some(0));
/// search.handle_key(&mut host, &KeyEvent::from_dom_key("v", 100));
/// assert_eq!(host.0, Some(2));
/// ```
#[derive(Debug)]
pub struct Typeahead<K> {
    container: Option<K>,
    options: TypeaheadOptions,
    state: TypeaheadState,
    listeners: Listeners,
}

impl<K> Typeahead<K> {
    /// A controller that never handles anything, for a missing container.
    pub fn inert() -> Self {
        Self {
            container: None,
            options: TypeaheadOptions::default(),
            state: TypeaheadState::new(),
            listeners: Listeners::empty(),
        }
    }

    /// Create a controller for `container`.
    pub fn new(container: K, options: TypeaheadOptions) -> Self {
        let state = TypeaheadState::with_timeout(options.timeout_ms);
        Self {
            container: Some(container),
            options,
            state,
            listeners: Listeners::KEYDOWN,
        }
    }

    /// Like [`new`](Self::new), but inert when `container` is `None`.
    pub fn for_container(container: Option<K>, options: TypeaheadOptions) -> Self {
        match container {
            Some(container) => Self::new(container, options),
            None => Self::inert(),
        }
    }

    /// The options in use.
    pub fn options(&self) -> &TypeaheadOptions {
        &self.options
    }

    /// The buffered (lowercased) search text.
    pub fn buffer(&self) -> &str {
        self.state.text()
    }

    /// Returns `true` if a search is in progress at `now`.
    ///
    /// While this holds, Space extends the search instead of reaching the
    /// focused item.
    pub fn is_searching(&self, now: u64) -> bool {
        self.state.is_active(now)
    }

    /// Listeners currently attached.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Clear the buffer.
    pub fn reset(&mut self) {
        self.state.clear();
    }

    /// Detach and forget the container. Idempotent.
    pub fn destroy(&mut self) {
        self.container = None;
        self.state.clear();
        self.listeners = Listeners::empty();
    }
}

impl<K: PartialEq> Typeahead<K> {
    /// Handle a `keydown` on the container.
    ///
    /// A buffered key prevents default whether or not an item matched.
    /// Non-printable keys, keys with Control, Alt, or Meta, and a Space that
    /// would start a new search are ignored.
    pub fn handle_key<H>(&mut self, host: &mut H, event: &KeyEvent) -> Propagation
    where
        H: FocusHost<K> + ?Sized,
    {
        if !self.listeners.contains(Listeners::KEYDOWN) {
            return Propagation::IGNORED;
        }
        let Some(ch) = event.printable() else {
            return Propagation::IGNORED;
        };
        if ch == ' ' && !self.state.is_active(event.timestamp) {
            return Propagation::IGNORED;
        }
        let Some(container) = self.container.as_ref() else {
            return Propagation::IGNORED;
        };
        let items = collect_items(host, container, &self.options.item_selector);
        if items.is_empty() {
            return Propagation::IGNORED;
        }
        let current = host
            .focused()
            .and_then(|f| items.iter().position(|i| *i == f));

        let query = self.state.push(ch, event.timestamp);
        let found = query.resolve(items.len(), current, |index, needle| {
            host.label(&items[index])
                .is_some_and(|label| matches_prefix(&label, needle))
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "typeahead", buffer = query.text(), ?found);

        if let Some(index) = found
            && current != Some(index)
        {
            host.focus(&items[index]);
        }
        Propagation::PREVENT_DEFAULT
    }
}

impl<K> Drop for Typeahead<K> {
    fn drop(&mut self) {
        self.destroy();
    }
}
