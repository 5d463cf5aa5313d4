// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host side of focus management.

use alloc::borrow::Cow;
use alloc::vec::Vec;

/// Item selector used when none is configured.
///
/// Hosts interpret selectors; a DOM host would pass this to
/// `querySelectorAll` on the container.
pub const DEFAULT_ITEM_SELECTOR: &str =
    "[data-roving-item]:not([disabled]):not([aria-disabled=\"true\"])";

/// Element tree access needed by [`RovingFocus`](crate::RovingFocus) and
/// [`Typeahead`](crate::Typeahead).
pub trait FocusHost<K> {
    /// Append the items of `container` matching `selector`, in document
    /// order, to `out`.
    fn query_items(&self, container: &K, selector: &str, out: &mut Vec<K>);

    /// Returns `false` for items that must not receive focus even though the
    /// selector matched them.
    fn is_enabled(&self, item: &K) -> bool {
        let _ = item;
        true
    }

    /// The element that currently has focus, if any.
    fn focused(&self) -> Option<K>;

    /// Move focus to `item`.
    fn focus(&mut self, item: &K);

    /// Set the `tabindex` of `item`.
    fn set_tab_index(&mut self, item: &K, tab_index: i32);

    /// The text used for typeahead matching (usually the text content).
    fn label(&self, item: &K) -> Option<Cow<'_, str>>;
}

/// Query the enabled items of `container`.
pub fn collect_items<K, H>(host: &H, container: &K, selector: &str) -> Vec<K>
where
    H: FocusHost<K> + ?Sized,
{
    let mut items = Vec::new();
    host.query_items(container, selector, &mut items);
    items.retain(|item| host.is_enabled(item));
    items
}


#[cfg(test)]
mod tests {
    use super::fake::FakeHost;
    use super::*;

    #[test]
    fn collect_skips_disabled() {
        let mut host = FakeHost::with_labels(&["a", "b", "c"]);
        host.items[1].enabled = false;
        assert_eq!(collect_items(&host, &0, DEFAULT_ITEM_SELECTOR), [0, 2]);
    }
}
