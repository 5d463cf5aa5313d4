// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered registry of open overlays.
//!
//! Nested overlays (a popover inside a modal, a submenu inside a menu) must
//! close one at a time: a single Escape closes only the most recently opened
//! one. Each overlay pushes itself with its dismiss callback when it opens and
//! removes itself when it closes. One Escape listener, installed on the stack,
//! dismisses the top entry.
//!
//! A layer can be paused with [`LayerStack::set_paused`]. Escape leaves a
//! paused top layer in place and passes through.
//!
//! There is no process-wide instance. The host creates a [`LayerStackHandle`]
//! once and hands clones of it to every overlay that should share Escape
//! precedence.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use understory_event_state::key::{Key, KeyEvent};
use understory_event_state::listeners::{Listeners, Propagation};

struct Layer<K> {
    element: K,
    paused: bool,
    on_dismiss: Box<dyn FnMut()>,
}

impl<K> Layer<K> {
    fn dismiss(mut self) {
        (self.on_dismiss)();
    }
}

/// Stack of open overlays, top = most recently pushed.
///
/// ```
/// use core::cell::RefCell;
/// use std::rc::Rc;
/// use understory_dismiss::LayerStack;
/// use understory_event_state::key::KeyEvent;
///
/// let closed = Rc::new(RefCell::new(Vec::new()));
/// let mut stack = LayerStack::new();
/// for name in ["modal", "popover"] {
///     let log = closed.clone();
///     stack.push(name, move || log.borrow_mut().push(name));
/// }
/// stack.install_global_escape_handler();
///
/// let esc = KeyEvent::from_dom_key("Escape", 0);
/// assert!(stack.handle_key(&esc).is_handled());
/// assert!(stack.is_top(&"modal"));
/// assert!(stack.handle_key(&esc).is_handled());
/// assert!(!stack.handle_key(&esc).is_handled()); // empty
/// assert_eq!(*closed.borrow(), ["popover", "modal"]);
/// ```
pub struct LayerStack<K> {
    layers: Vec<Layer<K>>,
    escape_installed: bool,
}

impl<K: fmt::Debug> fmt::Debug for LayerStack<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerStack")
            .field(
                "layers",
                &self.layers.iter().map(|l| &l.element).collect::<Vec<_>>(),
            )
            .field("escape_installed", &self.escape_installed)
            .finish()
    }
}

impl<K> Default for LayerStack<K> {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            escape_installed: false,
        }
    }
}

impl<K> LayerStack<K> {
    /// Create an empty stack with no Escape listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of open layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if no layer is open.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// The topmost element.
    pub fn top(&self) -> Option<&K> {
        self.layers.last().map(|l| &l.element)
    }

    /// Pop the top layer and run its dismiss callback.
    ///
    /// Returns `false` on an empty stack. The entry is removed before the
    /// callback runs, so a callback that removes its own element is a no-op.
    /// Paused layers are dismissed too.
    pub fn dismiss_top(&mut self) -> bool {
        match self.take_top() {
            Some(layer) => {
                layer.dismiss();
                true
            }
            None => false,
        }
    }

    /// Install the single Escape listener. Returns `false` if it was already
    /// installed.
    pub fn install_global_escape_handler(&mut self) -> bool {
        !core::mem::replace(&mut self.escape_installed, true)
    }

    /// Listeners the stack needs: document `keydown` capture once the Escape
    /// handler is installed.
    pub fn listeners(&self) -> Listeners {
        if self.escape_installed {
            Listeners::KEYDOWN_CAPTURE
        } else {
            Listeners::empty()
        }
    }

    /// Handle a document `keydown` (capture phase).
    ///
    /// Escape dismisses only the top layer and is consumed. It passes through
    /// with an empty stack, a paused top layer, or before the handler is
    /// installed.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Propagation {
        match self.take_escape_target(event) {
            Some(layer) => {
                layer.dismiss();
                Propagation::CONSUMED
            }
            None => Propagation::IGNORED,
        }
    }

    /// Drop every layer without running callbacks and uninstall the Escape
    /// listener.
    pub fn dispose_all(&mut self) {
        drop(self.take_all());
    }

    fn take_top(&mut self) -> Option<Layer<K>> {
        let layer = self.layers.pop()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "layer.pop", remaining = self.layers.len());
        Some(layer)
    }

    fn take_escape_target(&mut self, event: &KeyEvent) -> Option<Layer<K>> {
        if !self.escape_installed || event.key != Key::Escape {
            return None;
        }
        if self.layers.last()?.paused {
            #[cfg(feature = "tracing")]
            tracing::debug!(message = "layer.escape_paused", depth = self.layers.len());
            return None;
        }
        self.take_top()
    }

    fn take_all(&mut self) -> Vec<Layer<K>> {
        self.escape_installed = false;
        let layers = core::mem::take(&mut self.layers);
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "layer.dispose_all", dropped = layers.len());
        layers
    }
}

impl<K: PartialEq> LayerStack<K> {
    /// Push `element` with its dismiss callback.
    ///
    /// If `element` is already on the stack it is moved to the top, unpaused,
    /// and its callback replaced.
    pub fn push(&mut self, element: K, on_dismiss: impl FnMut() + 'static) {
        drop(self.insert(element, Box::new(on_dismiss)));
    }

    /// Remove `element` without running its callback.
    ///
    /// Returns `false` if it was not on the stack.
    pub fn remove(&mut self, element: &K) -> bool {
        self.take(element).is_some()
    }

    /// Remove `element` and run its callback (force-dismiss).
    ///
    /// Returns `false` if it was not on the stack.
    pub fn dismiss(&mut self, element: &K) -> bool {
        match self.take(element) {
            Some(layer) => {
                layer.dismiss();
                true
            }
            None => false,
        }
    }

    /// Pause or resume Escape for `element`.
    ///
    /// Returns `false` if it was not on the stack.
    pub fn set_paused(&mut self, element: &K, paused: bool) -> bool {
        let Some(i) = self.position(element) else {
            return false;
        };
        self.layers[i].paused = paused;
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "layer.set_paused", index = i, paused);
        true
    }

    /// Returns `true` if `element` is the topmost layer.
    pub fn is_top(&self, element: &K) -> bool {
        self.top() == Some(element)
    }

    /// Returns `true` if `element` is anywhere on the stack.
    pub fn contains(&self, element: &K) -> bool {
        self.position(element).is_some()
    }

    /// Returns `true` if `element` is on the stack and paused.
    pub fn is_paused(&self, element: &K) -> bool {
        self.position(element)
            .is_some_and(|i| self.layers[i].paused)
    }

    fn position(&self, element: &K) -> Option<usize> {
        self.layers.iter().rposition(|l| l.element == *element)
    }

    /// Push a layer, returning the entry it replaced.
    fn insert(&mut self, element: K, on_dismiss: Box<dyn FnMut()>) -> Option<Layer<K>> {
        let previous = self.position(&element).map(|i| self.layers.remove(i));
        self.layers.push(Layer {
            element,
            paused: false,
            on_dismiss,
        });
        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "layer.push",
            depth = self.layers.len(),
            replaced = previous.is_some()
        );
        previous
    }

    fn take(&mut self, element: &K) -> Option<Layer<K>> {
        let i = self.position(element)?;
        let layer = self.layers.remove(i);
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "layer.remove", index = i, remaining = self.layers.len());
        Some(layer)
    }
}

/// Shared handle to a [`LayerStack`].
///
/// Clones refer to the same stack. Callbacks run, and removed callbacks drop,
/// after the handle releases its borrow, so a dismiss callback may push to or
/// remove from the stack.
pub struct LayerStackHandle<K> {
    inner: Rc<RefCell<LayerStack<K>>>,
}

impl<K> Clone for LayerStackHandle<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for LayerStackHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.try_borrow() {
            Ok(stack) => fmt::Debug::fmt(&*stack, f),
            Err(_) => f.write_str("LayerStackHandle(<borrowed>)"),
        }
    }
}

impl<K> Default for LayerStackHandle<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LayerStackHandle<K> {
    /// Create a new, empty shared stack.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(LayerStack::new())),
        }
    }

    /// Returns `true` if both handles refer to the same stack.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of open layers.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    /// Returns `true` if no layer is open.
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().is_empty()
    }

    /// See [`LayerStack::install_global_escape_handler`].
    pub fn install_global_escape_handler(&self) -> bool {
        self.inner.borrow_mut().install_global_escape_handler()
    }

    /// See [`LayerStack::listeners`].
    pub fn listeners(&self) -> Listeners {
        self.inner.borrow().listeners()
    }

    /// See [`LayerStack::dismiss_top`].
    pub fn dismiss_top(&self) -> bool {
        let popped = self.inner.borrow_mut().take_top();
        match popped {
            Some(layer) => {
                layer.dismiss();
                true
            }
            None => false,
        }
    }

    /// See [`LayerStack::handle_key`].
    pub fn handle_key(&self, event: &KeyEvent) -> Propagation {
        let target = self.inner.borrow_mut().take_escape_target(event);
        match target {
            Some(layer) => {
                layer.dismiss();
                Propagation::CONSUMED
            }
            None => Propagation::IGNORED,
        }
    }

    /// See [`LayerStack::dispose_all`].
    pub fn dispose_all(&self) {
        let layers = self.inner.borrow_mut().take_all();
        drop(layers);
    }
}

impl<K: PartialEq> LayerStackHandle<K> {
    /// See [`LayerStack::push`].
    pub fn push(&self, element: K, on_dismiss: impl FnMut() + 'static) {
        let previous = self
            .inner
            .borrow_mut()
            .insert(element, Box::new(on_dismiss));
        drop(previous);
    }

    /// See [`LayerStack::remove`].
    pub fn remove(&self, element: &K) -> bool {
        let removed = self.inner.borrow_mut().take(element);
        removed.is_some()
    }

    /// See [`LayerStack::dismiss`].
    pub fn dismiss(&self, element: &K) -> bool {
        let removed = self.inner.borrow_mut().take(element);
        match removed {
            Some(layer) => {
                layer.dismiss();
                true
            }
            None => false,
        }
    }

    /// See [`LayerStack::set_paused`].
    pub fn set_paused(&self, element: &K, paused: bool) -> bool {
        self.inner.borrow_mut().set_paused(element, paused)
    }

    /// See [`LayerStack::is_top`].
    pub fn is_top(&self, element: &K) -> bool {
        self.inner.borrow().is_top(element)
    }

    /// See [`LayerStack::contains`].
    pub fn contains(&self, element: &K) -> bool {
        self.inner.borrow().contains(element)
    }

    /// See [`LayerStack::is_paused`].
    pub fn is_paused(&self, element: &K) -> bool {
        self.inner.borrow().is_paused(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::Cell;

    fn esc() -> KeyEvent {
        KeyEvent::from_dom_key("Escape", 0)
    }

    fn log_push(stack: &mut LayerStack<char>, log: &Rc<RefCell<Vec<char>>>, id: char) {
        let log = log.clone();
        stack.push(id, move || log.borrow_mut().push(id));
    }

    #[test]
    fn escape_dismisses_top_first() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::new();
        for id in ['a', 'b', 'c'] {
            log_push(&mut stack, &log, id);
        }
        stack.install_global_escape_handler();
        assert_eq!(stack.len(), 3);

        assert_eq!(stack.handle_key(&esc()), Propagation::CONSUMED);
        assert_eq!(stack.len(), 2);
        assert!(stack.is_top(&'b'));

        assert_eq!(stack.handle_key(&esc()), Propagation::CONSUMED);
        assert_eq!(stack.len(), 1);
        assert_eq!(*log.borrow(), vec!['c', 'b']);
    }

    #[test]
    fn escape_requires_installation() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::new();
        log_push(&mut stack, &log, 'a');
        assert_eq!(stack.listeners(), Listeners::empty());
        assert_eq!(stack.handle_key(&esc()), Propagation::IGNORED);
        assert!(stack.install_global_escape_handler());
        assert!(!stack.install_global_escape_handler());
        assert_eq!(stack.listeners(), Listeners::KEYDOWN_CAPTURE);
        assert_eq!(
            stack.handle_key(&KeyEvent::from_dom_key("Enter", 0)),
            Propagation::IGNORED
        );
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn underflow_and_absent_removal_are_no_ops() {
        let mut stack: LayerStack<u32> = LayerStack::new();
        stack.install_global_escape_handler();
        assert!(!stack.dismiss_top());
        assert!(!stack.remove(&1));
        assert!(!stack.dismiss(&1));
        assert_eq!(stack.handle_key(&esc()), Propagation::IGNORED);
        assert!(stack.top().is_none());
    }

    #[test]
    fn remove_from_middle_keeps_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::new();
        for id in ['a', 'b', 'c'] {
            log_push(&mut stack, &log, id);
        }
        assert!(stack.remove(&'b'));
        assert!(!stack.contains(&'b'));
        assert!(stack.dismiss_top());
        assert!(stack.is_top(&'a'));
        assert_eq!(*log.borrow(), vec!['c']);
    }

    #[test]
    fn repush_moves_to_top_with_new_callback() {
        let hits = Rc::new(Cell::new(0));
        let mut stack = LayerStack::new();
        stack.push(1, || panic!("replaced callback must not run"));
        stack.push(2, || {});
        let h = hits.clone();
        stack.push(1, move || h.set(h.get() + 1));
        assert_eq!(stack.len(), 2);
        assert!(stack.is_top(&1));
        assert!(stack.dismiss_top());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dispose_all_clears_without_callbacks() {
        let mut stack = LayerStack::new();
        stack.push(1, || panic!("disposed layers are not dismissed"));
        stack.install_global_escape_handler();
        stack.dispose_all();
        assert!(stack.is_empty());
        assert_eq!(stack.listeners(), Listeners::empty());
    }

    #[test]
    fn handle_callbacks_may_reenter_the_stack() {
        let handle: LayerStackHandle<u32> = LayerStackHandle::new();
        handle.install_global_escape_handler();

        let inner = handle.clone();
        handle.push(1, || {});
        // Closing layer 2 removes itself again and opens layer 3.
        handle.push(2, move || {
            assert!(!inner.remove(&2));
            inner.push(3, || {});
        });

        assert_eq!(handle.handle_key(&esc()), Propagation::CONSUMED);
        assert_eq!(handle.len(), 2);
        assert!(handle.is_top(&3));
        assert!(handle.dismiss(&1));
        assert!(handle.contains(&3));
        handle.dispose_all();
        assert!(handle.is_empty());
    }

    #[test]
    fn handles_share_one_stack() {
        let a: LayerStackHandle<u32> = LayerStackHandle::new();
        let b = a.clone();
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&LayerStackHandle::new()));
        a.push(7, || {});
        assert!(b.is_top(&7));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn paused_top_lets_escape_through() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut stack = LayerStack::new();
        for id in ['a', 'b'] {
            log_push(&mut stack, &log, id);
        }
        stack.install_global_escape_handler();

        // Pausing a lower layer does not shield the top one.
        assert!(stack.set_paused(&'a', true));
        assert_eq!(stack.handle_key(&esc()), Propagation::CONSUMED);
        assert!(stack.is_top(&'a'));

        assert_eq!(stack.handle_key(&esc()), Propagation::IGNORED);
        assert!(stack.contains(&'a'));
        assert!(stack.is_paused(&'a'));

        assert!(stack.set_paused(&'a', false));
        assert_eq!(stack.handle_key(&esc()), Propagation::CONSUMED);
        assert_eq!(*log.borrow(), vec!['b', 'a']);
        assert!(!stack.set_paused(&'a', true));
    }

    #[test]
    fn repush_and_dismiss_top_ignore_pause() {
        let hits = Rc::new(Cell::new(0));
        let mut stack = LayerStack::new();
        stack.install_global_escape_handler();
        stack.push(1, || {});
        stack.set_paused(&1, true);
        let h = hits.clone();
        stack.push(1, move || h.set(h.get() + 1));
        assert!(!stack.is_paused(&1));

        stack.set_paused(&1, true);
        assert!(stack.dismiss_top());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn handle_matches_owned_stack() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut owned = LayerStack::new();
        let shared: LayerStackHandle<char> = LayerStackHandle::new();
        owned.install_global_escape_handler();
        shared.install_global_escape_handler();
        for id in ['a', 'b', 'c'] {
            log_push(&mut owned, &log, id);
            let log = log.clone();
            shared.push(id, move || log.borrow_mut().push(id));
        }

        assert!(owned.set_paused(&'c', true));
        assert!(shared.set_paused(&'c', true));
        assert_eq!(owned.handle_key(&esc()), shared.handle_key(&esc()));
        assert_eq!(shared.is_paused(&'c'), owned.is_paused(&'c'));
        assert_eq!(owned.remove(&'c'), shared.remove(&'c'));
        assert_eq!(owned.handle_key(&esc()), shared.handle_key(&esc()));
        assert_eq!(owned.dismiss(&'a'), shared.dismiss(&'a'));
        assert_eq!((owned.len(), shared.len()), (0, 0));
        assert_eq!(*log.borrow(), vec!['b', 'b', 'a', 'a']);
    }
}
