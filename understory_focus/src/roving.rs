// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-tab-stop roving focus.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use understory_event_state::key::{KeyEvent, Modifiers};
use understory_event_state::listeners::{Listeners, Propagation};

use crate::host::{DEFAULT_ITEM_SELECTOR, FocusHost, collect_items};
use crate::{Orientation, WrapMode, next_index};

/// Options for [`RovingFocus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RovingFocusOptions {
    /// Selector identifying the container's items.
    /// Default: [`DEFAULT_ITEM_SELECTOR`].
    pub item_selector: Cow<'static, str>,
    /// Which arrows move focus. Default: [`Orientation::Vertical`].
    pub orientation: Orientation,
    /// Behavior past either end. Default: [`WrapMode::Scope`] (loop).
    pub wrap: WrapMode,
    /// Interpret Home and End. Default: `true`.
    pub home_end: bool,
}

impl Default for RovingFocusOptions {
    fn default() -> Self {
        Self {
            item_selector: Cow::Borrowed(DEFAULT_ITEM_SELECTOR),
            orientation: Orientation::Vertical,
            wrap: WrapMode::Scope,
            home_end: true,
        }
    }
}

impl RovingFocusOptions {
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

    /// Set the orientation.
    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the wrap mode.
    #[must_use]
    pub fn wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    /// Enable or disable Home/End.
    #[must_use]
    pub fn home_end(mut self, enabled: bool) -> Self {
        self.home_end = enabled;
        self
    }
}

/// Roving focus controller for one container.
///
/// The host attaches a `keydown` listener on the container while
/// [`listeners`](Self::listeners) contains [`Listeners::KEYDOWN`] and routes
/// events to [`handle_key`](Self::handle_key). Items are re-queried from the
/// host on every call; the controller only remembers the last item it moved
/// to and looks it up again in the fresh set.
#[derive(Debug)]
pub struct RovingFocus<K> {
    container: Option<K>,
    options: RovingFocusOptions,
    current: Option<K>,
    listeners: Listeners,
}

impl<K> RovingFocus<K> {
    /// A controller that never handles anything, for a missing container.
    pub fn inert() -> Self {
        Self {
            container: None,
            options: RovingFocusOptions::default(),
            current: None,
            listeners: Listeners::empty(),
        }
    }

    /// Create a controller for `container`.
    pub fn new(container: K, options: RovingFocusOptions) -> Self {
        Self {
            container: Some(container),
            options,
            current: None,
            listeners: Listeners::KEYDOWN,
        }
    }

    /// Like [`new`](Self::new), but inert when `container` is `None`.
    pub fn for_container(container: Option<K>, options: RovingFocusOptions) -> Self {
        match container {
            Some(container) => Self::new(container, options),
            None => Self::inert(),
        }
    }

    /// The container, unless the controller is inert or destroyed.
    pub fn container(&self) -> Option<&K> {
        self.container.as_ref()
    }

    /// The options in use.
    pub fn options(&self) -> &RovingFocusOptions {
        &self.options
    }

    /// The item focus last moved to, if any.
    ///
    /// This may no longer be in the container; it is only a hint.
    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }

    /// Listeners currently attached.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Detach and forget the container. Idempotent.
    pub fn destroy(&mut self) {
        self.container = None;
        self.current = None;
        self.listeners = Listeners::empty();
    }
}

impl<K: Clone + PartialEq> RovingFocus<K> {
    /// Establish the single tab stop without moving focus.
    ///
    /// The tab stop is the focused element if it is an item, else the last
    /// item focus moved to, else the first item. Call this after opening and
    /// whenever the item set changes. Returns `false` if there are no items.
    pub fn sync<H>(&mut self, host: &mut H) -> bool
    where
        H: FocusHost<K> + ?Sized,
    {
        let items = self.items(host);
        if items.is_empty() {
            self.current = None;
            return false;
        }
        let index = self.origin(host, &items).unwrap_or(0);
        set_tab_stop(host, &items, index);
        self.current = Some(items[index].clone());
        true
    }

    /// Handle a `keydown` on the container.
    ///
    /// Recognized navigation keys prevent default, including at an edge with
    /// [`WrapMode::Never`] where focus stays put. Keys with Control, Alt, or
    /// Meta held are ignored.
    pub fn handle_key<H>(&mut self, host: &mut H, event: &KeyEvent) -> Propagation
    where
        H: FocusHost<K> + ?Sized,
    {
        if !self.listeners.contains(Listeners::KEYDOWN)
            || event.modifiers.intersects(Modifiers::SHORTCUT)
        {
            return Propagation::IGNORED;
        }
        let Some(navigation) = self
            .options
            .orientation
            .navigation(event.key, self.options.home_end)
        else {
            return Propagation::IGNORED;
        };
        let items = self.items(host);
        if items.is_empty() {
            return Propagation::IGNORED;
        }
        let origin = self.origin(host, &items);
        if let Some(index) = next_index(items.len(), origin, navigation, self.options.wrap) {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "roving.move", ?navigation, from = ?origin, to = index);
            self.move_to(host, &items, index);
        }
        Propagation::PREVENT_DEFAULT
    }

    /// Focus `item` and make it the tab stop, as for a pointer hover.
    ///
    /// Returns `false` (and does nothing) if `item` is not a current,
    /// enabled item of the container.
    pub fn focus_item<H>(&mut self, host: &mut H, item: &K) -> bool
    where
        H: FocusHost<K> + ?Sized,
    {
        let items = self.items(host);
        match items.iter().position(|i| i == item) {
            Some(index) => {
                self.move_to(host, &items, index);
                true
            }
            None => false,
        }
    }

    fn items<H>(&self, host: &H) -> Vec<K>
    where
        H: FocusHost<K> + ?Sized,
    {
        match &self.container {
            Some(container) => collect_items(host, container, &self.options.item_selector),
            None => Vec::new(),
        }
    }

    fn origin<H>(&self, host: &H, items: &[K]) -> Option<usize>
    where
        H: FocusHost<K> + ?Sized,
    {
        let position = |k: &K| items.iter().position(|i| i == k);
        host.focused()
            .and_then(|f| position(&f))
            .or_else(|| self.current.as_ref().and_then(position))
    }

    fn move_to<H>(&mut self, host: &mut H, items: &[K], index: usize)
    where
        H: FocusHost<K> + ?Sized,
    {
        set_tab_stop(host, items, index);
        host.focus(&items[index]);
        self.current = Some(items[index].clone());
    }
}

fn set_tab_stop<K, H>(host: &mut H, items: &[K], index: usize)
where
    H: FocusHost<K> + ?Sized,
{
    for (i, item) in items.iter().enumerate() {
        host.set_tab_index(item, if i == index { 0 } else { -1 });
    }
}

impl<K> Drop for RovingFocus<K> {
    fn drop(&mut self) {
        self.destroy();
    }
}
