// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-overlay dismissal session.

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;
use understory_event_state::key::{Key, KeyEvent};
use understory_event_state::listeners::{Listeners, Propagation};
use understory_event_state::tree::{NodeTree, contains};

/// Which pointer event an outside interaction was reported from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// `click`.
    Click,
    /// `pointerdown`.
    PointerDown,
}

impl PointerKind {
    const fn listener(self) -> Listeners {
        match self {
            Self::Click => Listeners::CLICK_CAPTURE,
            Self::PointerDown => Listeners::POINTERDOWN_CAPTURE,
        }
    }
}

/// Options for [`DismissHandler`].
#[derive(Clone, Debug)]
pub struct DismissOptions<K> {
    /// Dismiss on Escape. Default: `true`.
    pub escape_key: bool,
    /// Dismiss on interaction outside the container. Default: `true`.
    pub click_outside: bool,
    /// Elements (and their descendants) that never count as outside, such as
    /// the trigger that opened the overlay. Default: empty.
    pub ignore: SmallVec<[K; 2]>,
    /// Detect outside interaction on `pointerdown` instead of `click`.
    /// Default: `false`.
    ///
    /// With `click`, the listener is only attached on the host's next
    /// [`tick`](DismissHandler::tick) so the click that opened the overlay
    /// cannot close it.
    pub pointer_down_outside: bool,
}

impl<K> Default for DismissOptions<K> {
    fn default() -> Self {
        Self {
            escape_key: true,
            click_outside: true,
            ignore: SmallVec::new(),
            pointer_down_outside: false,
        }
    }
}

impl<K> DismissOptions<K> {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable Escape handling.
    #[must_use]
    pub fn escape_key(mut self, enabled: bool) -> Self {
        self.escape_key = enabled;
        self
    }

    /// Enable or disable outside-interaction handling.
    #[must_use]
    pub fn click_outside(mut self, enabled: bool) -> Self {
        self.click_outside = enabled;
        self
    }

    /// Add an element to the ignore list.
    #[must_use]
    pub fn ignore(mut self, element: K) -> Self {
        self.ignore.push(element);
        self
    }

    /// Use `pointerdown` instead of `click` for outside detection.
    #[must_use]
    pub fn pointer_down_outside(mut self, enabled: bool) -> Self {
        self.pointer_down_outside = enabled;
        self
    }
}

/// Dismissal session for one open overlay.
///
/// The handler reports the capture-phase listeners it needs through
/// [`listeners`](Self::listeners); the host routes matching document events to
/// [`handle_key`](Self::handle_key) and
/// [`handle_pointer`](Self::handle_pointer). When an event should close the
/// overlay the `on_dismiss` callback runs.
///
/// [`destroy`](Self::destroy) detaches everything and is idempotent; dropping
/// the handler destroys it.
///
/// ```
/// use core::cell::Cell;
/// use std::rc::Rc;
/// use understory_dismiss::{DismissHandler, DismissOptions, PointerKind};
/// use understory_event_state::key::KeyEvent;
/// use understory_event_state::tree::NodeTree;
///
/// // 0 is the document root; 1 is the overlay; 2 is inside it; 3 is the trigger.
/// struct Doc;
/// impl NodeTree<u32> for Doc {
///     fn parent_of(&self, n: &u32) -> Option<u32> {
///         match n { 1 | 3 => Some(0), 2 => Some(1), _ => None }
///     }
/// }
///
/// let closed = Rc::new(Cell::new(0));
/// let c = closed.clone();
/// let mut handler = DismissHandler::new(
///     1_u32,
///     DismissOptions::new().ignore(3).pointer_down_outside(true),
///     move || c.set(c.get() + 1),
/// );
///
/// assert!(!handler.handle_pointer(&Doc, PointerKind::PointerDown, Some(&2)));
/// assert!(!handler.handle_pointer(&Doc, PointerKind::PointerDown, Some(&3)));
/// assert!(handler.handle_pointer(&Doc, PointerKind::PointerDown, Some(&0)));
/// assert!(handler.handle_key(&KeyEvent::from_dom_key("Escape", 0)).is_handled());
/// assert_eq!(closed.get(), 2);
///
/// handler.destroy();
/// handler.destroy();
/// assert!(!handler.handle_pointer(&Doc, PointerKind::PointerDown, Some(&0)));
/// assert_eq!(closed.get(), 2);
/// ```
pub struct DismissHandler<K> {
    container: Option<K>,
    options: DismissOptions<K>,
    on_dismiss: Option<Box<dyn FnMut()>>,
    listeners: Listeners,
    /// Listeners waiting for the next tick.
    deferred: Listeners,
    paused: bool,
}

impl<K: fmt::Debug> fmt::Debug for DismissHandler<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DismissHandler")
            .field("container", &self.container)
            .field("options", &self.options)
            .field("listeners", &self.listeners)
            .field("deferred", &self.deferred)
            .field("paused", &self.paused)
            .finish_non_exhaustive()
    }
}

impl<K> DismissHandler<K> {
    /// A handler that never attaches anything, for a missing container.
    pub fn inert() -> Self {
        Self {
            container: None,
            options: DismissOptions::default(),
            on_dismiss: None,
            listeners: Listeners::empty(),
            deferred: Listeners::empty(),
            paused: false,
        }
    }

    /// Start a dismissal session for `container`.
    pub fn new(
        container: K,
        options: DismissOptions<K>,
        on_dismiss: impl FnMut() + 'static,
    ) -> Self {
        let mut listeners = Listeners::empty();
        let mut deferred = Listeners::empty();
        if options.escape_key {
            listeners |= Listeners::KEYDOWN_CAPTURE;
        }
        if options.click_outside {
            if options.pointer_down_outside {
                listeners |= Listeners::POINTERDOWN_CAPTURE;
            } else {
                deferred |= Listeners::CLICK_CAPTURE;
            }
        }
        Self {
            container: Some(container),
            options,
            on_dismiss: Some(Box::new(on_dismiss)),
            listeners,
            deferred,
            paused: false,
        }
    }

    /// Like [`new`](Self::new), but returns an [`inert`](Self::inert) handler
    /// when `container` is `None`.
    pub fn for_container(
        container: Option<K>,
        options: DismissOptions<K>,
        on_dismiss: impl FnMut() + 'static,
    ) -> Self {
        match container {
            Some(container) => Self::new(container, options, on_dismiss),
            None => Self::inert(),
        }
    }

    /// The container, unless the handler is inert.
    pub fn container(&self) -> Option<&K> {
        self.container.as_ref()
    }

    /// The options this session was created with.
    pub fn options(&self) -> &DismissOptions<K> {
        &self.options
    }

    /// Listeners currently attached.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Attach listeners deferred at creation.
    ///
    /// Hosts call this once the event that opened the overlay has finished
    /// dispatching (a zero-delay timer in a browser). Returns the listeners
    /// that were newly attached.
    pub fn tick(&mut self) -> Listeners {
        let attached = self.deferred;
        self.listeners |= attached;
        self.deferred = Listeners::empty();
        attached
    }

    /// Returns `true` until [`destroy`](Self::destroy).
    pub fn is_active(&self) -> bool {
        self.on_dismiss.is_some()
    }

    /// Stop reacting to events until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// React to events again.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Returns `true` while paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Handle a document `keydown` (capture phase).
    ///
    /// Escape dismisses and is consumed; everything else is ignored.
    pub fn handle_key(&mut self, event: &KeyEvent) -> Propagation {
        if event.key != Key::Escape
            || self.paused
            || !self.listeners.contains(Listeners::KEYDOWN_CAPTURE)
        {
            return Propagation::IGNORED;
        }
        if self.dismiss("escape") {
            Propagation::CONSUMED
        } else {
            Propagation::IGNORED
        }
    }

    /// Destroy the session, detaching all listeners. Idempotent.
    pub fn destroy(&mut self) {
        self.on_dismiss = None;
        self.listeners = Listeners::empty();
        self.deferred = Listeners::empty();
    }

    fn dismiss(&mut self, reason: &'static str) -> bool {
        let Some(on_dismiss) = self.on_dismiss.as_mut() else {
            return false;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "dismiss", reason);
        #[cfg(not(feature = "tracing"))]
        let _ = reason;
        on_dismiss();
        true
    }
}

impl<K: Clone + PartialEq> DismissHandler<K> {
    /// Handle a document `click` or `pointerdown` (capture phase) whose
    /// target is `target`.
    ///
    /// Dismisses when the target is attached and lies neither inside the
    /// container nor inside an ignored element. Returns `true` if the overlay
    /// was dismissed. Outside interactions are never consumed.
    pub fn handle_pointer<T>(&mut self, tree: &T, kind: PointerKind, target: Option<&K>) -> bool
    where
        T: NodeTree<K> + ?Sized,
    {
        if self.paused || !self.listeners.contains(kind.listener()) {
            return false;
        }
        let (Some(container), Some(target)) = (self.container.as_ref(), target) else {
            return false;
        };
        // A node detached by the same interaction (e.g. a removed menu item)
        // is not outside.
        if !tree.is_connected(target) {
            return false;
        }
        if contains(tree, container, target) {
            return false;
        }
        if self
            .options
            .ignore
            .iter()
            .any(|ignored| contains(tree, ignored, target))
        {
            return false;
        }
        self.dismiss("outside")
    }
}

impl<K> Drop for DismissHandler<K> {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::Cell;

    /// 0 root; 1 overlay under 0; 2 item under 1; 3 trigger under 0;
    /// 4 icon under 3; 5 elsewhere under 0; 6 detached.
    struct Doc;

    impl NodeTree<u32> for Doc {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            match node {
                1 | 3 | 5 => Some(0),
                2 => Some(1),
                4 => Some(3),
                _ => None,
            }
        }

        fn is_connected(&self, node: &u32) -> bool {
            *node != 6
        }
    }

    fn handler(options: DismissOptions<u32>) -> (DismissHandler<u32>, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let h = DismissHandler::new(1, options, move || c.set(c.get() + 1));
        (h, count)
    }

    fn escape() -> KeyEvent {
        KeyEvent::from_dom_key("Escape", 0)
    }

    #[test]
    fn escape_dismisses_and_consumes() {
        let (mut h, count) = handler(DismissOptions::new());
        assert_eq!(h.handle_key(&escape()), Propagation::CONSUMED);
        assert_eq!(
            h.handle_key(&KeyEvent::from_dom_key("a", 0)),
            Propagation::IGNORED
        );
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn escape_disabled() {
        let (mut h, count) = handler(DismissOptions::new().escape_key(false));
        assert!(!h.listeners().contains(Listeners::KEYDOWN_CAPTURE));
        assert_eq!(h.handle_key(&escape()), Propagation::IGNORED);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn ignore_list_covers_descendants() {
        let opts = DismissOptions::new().ignore(3).pointer_down_outside(true);
        let (mut h, count) = handler(opts);
        assert!(!h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&3)));
        assert!(!h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&4)));
        assert!(!h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&2)));
        assert_eq!(count.get(), 0);
        assert!(h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&5)));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn detached_or_missing_targets_are_not_outside() {
        let (mut h, count) = handler(DismissOptions::new().pointer_down_outside(true));
        assert!(!h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&6)));
        assert!(!h.handle_pointer(&Doc, PointerKind::PointerDown, None));
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn click_mode_defers_until_tick() {
        let (mut h, count) = handler(DismissOptions::new());
        assert!(!h.listeners().contains(Listeners::CLICK_CAPTURE));
        // The click that opened the overlay.
        assert!(!h.handle_pointer(&Doc, PointerKind::Click, Some(&5)));
        assert_eq!(h.tick(), Listeners::CLICK_CAPTURE);
        assert_eq!(h.tick(), Listeners::empty());
        // Pointerdown is not what this session listens for.
        assert!(!h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&5)));
        assert!(h.handle_pointer(&Doc, PointerKind::Click, Some(&5)));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn pause_gates_everything() {
        let (mut h, count) = handler(DismissOptions::new().pointer_down_outside(true));
        h.pause();
        assert!(h.is_paused());
        assert_eq!(h.handle_key(&escape()), Propagation::IGNORED);
        assert!(!h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&5)));
        h.resume();
        assert!(h.handle_pointer(&Doc, PointerKind::PointerDown, Some(&5)));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn destroy_is_total_and_idempotent() {
        let (mut h, count) = handler(DismissOptions::new());
        h.destroy();
        h.destroy();
        assert_eq!(h.listeners(), Listeners::empty());
        assert_eq!(h.tick(), Listeners::empty());
        assert_eq!(h.handle_key(&escape()), Propagation::IGNORED);
        assert!(!h.handle_pointer(&Doc, PointerKind::Click, Some(&5)));
        assert_eq!(count.get(), 0);
        assert!(!h.is_active());
    }

    #[test]
    fn inert_handler_is_a_valid_no_op() {
        let mut h: DismissHandler<u32> =
            DismissHandler::for_container(None, DismissOptions::new(), || {});
        assert!(h.container().is_none());
        assert_eq!(h.listeners(), Listeners::empty());
        h.tick();
        assert_eq!(h.handle_key(&escape()), Propagation::IGNORED);
        assert!(!h.handle_pointer(&Doc, PointerKind::Click, Some(&5)));
        h.pause();
        h.resume();
        h.destroy();
        h.destroy();
    }
}
