// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keeping a floating element positioned while layout changes.
//!
//! [`AutoUpdate`] is the subscription returned by "auto update": it listens
//! for window scroll/resize, observes the anchor's ancestry for mutations and
//! the anchor/floating elements for resizes, and runs a callback when any of
//! them fires. Signals are coalesced per animation frame:
//!
//! 1. The host forwards a [`Signal`] through [`AutoUpdate::notify`].
//! 2. If `notify` returns `true`, the host requests one animation frame.
//! 3. In that frame the host calls [`AutoUpdate::run_frame`], which invokes the
//!    callback once no matter how many signals arrived.
//!
//! The callback normally recomputes the position and applies styles; it must
//! be idempotent.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_event_state::tree::NodeTree;
//! use understory_floating::{AutoUpdate, Signal};
//!
//! struct Flat;
//! impl NodeTree<u32> for Flat {
//!     fn parent_of(&self, _: &u32) -> Option<u32> { None }
//! }
//!
//! let runs = Rc::new(Cell::new(0));
//! let counter = runs.clone();
//! let mut sub = AutoUpdate::new(&Flat, 1, 2, move || counter.set(counter.get() + 1));
//! // The initial position is computed immediately.
//! assert_eq!(runs.get(), 1);
//!
//! assert!(sub.notify(Signal::Scroll));
//! assert!(!sub.notify(Signal::Resize)); // same frame
//! assert!(sub.run_frame());
//! assert_eq!(runs.get(), 2);
//!
//! sub.unsubscribe();
//! sub.unsubscribe(); // idempotent
//! assert!(!sub.notify(Signal::Scroll));
//! ```

use alloc::boxed::Box;
use core::fmt;

use smallvec::SmallVec;
use understory_event_state::listeners::Listeners;
use understory_event_state::tree::{NodeTree, ancestors};

/// Something that may have moved the anchor or resized either element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Signal<K> {
    /// Window or ancestor scroll.
    Scroll,
    /// Window resize.
    Resize,
    /// Mutation observed on a node (child list or attributes).
    Mutation(K),
    /// Resize observed on a node.
    ElementResize(K),
}

/// Auto-update subscription.
///
/// Dropping the subscription unsubscribes it.
pub struct AutoUpdate<K> {
    anchor: K,
    floating: K,
    /// Anchor followed by its ancestors, nearest first.
    observed: SmallVec<[K; 8]>,
    callback: Option<Box<dyn FnMut()>>,
    listeners: Listeners,
    pending: bool,
}

impl<K: fmt::Debug> fmt::Debug for AutoUpdate<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutoUpdate")
            .field("anchor", &self.anchor)
            .field("floating", &self.floating)
            .field("observed", &self.observed)
            .field("listeners", &self.listeners)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl<K: Clone + PartialEq> AutoUpdate<K> {
    /// Subscribe to layout changes affecting `anchor` and `floating`.
    ///
    /// `callback` runs once immediately and then once per frame in which a
    /// relevant signal arrived.
    pub fn new<T>(tree: &T, anchor: K, floating: K, callback: impl FnMut() + 'static) -> Self
    where
        T: NodeTree<K> + ?Sized,
    {
        let mut this = Self {
            observed: SmallVec::new(),
            anchor,
            floating,
            callback: Some(Box::new(callback)),
            listeners: Listeners::SCROLL | Listeners::RESIZE,
            pending: false,
        };
        this.refresh_ancestry(tree);
        this.invoke();
        this
    }

    /// Re-collect the anchor's ancestry, for example after it was re-parented.
    pub fn refresh_ancestry<T>(&mut self, tree: &T)
    where
        T: NodeTree<K> + ?Sized,
    {
        if !self.is_active() {
            return;
        }
        self.observed.clear();
        self.observed.push(self.anchor.clone());
        self.observed.extend(ancestors(tree, &self.anchor));
    }

    /// Nodes watched for mutations: the anchor and its ancestors.
    pub fn observed(&self) -> &[K] {
        &self.observed
    }

    /// Returns `true` if `node` is watched for mutations.
    pub fn observes(&self, node: &K) -> bool {
        self.observed.contains(node)
    }

    /// Window listeners this subscription needs.
    pub fn listeners(&self) -> Listeners {
        self.listeners
    }

    /// Returns `true` until [`unsubscribe`](Self::unsubscribe) is called.
    pub fn is_active(&self) -> bool {
        self.callback.is_some()
    }

    /// Returns `true` if a frame has been requested and not yet run.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record a signal.
    ///
    /// Returns `true` if the host should request an animation frame, which is
    /// the case for the first relevant signal since the last
    /// [`run_frame`](Self::run_frame). Irrelevant signals (mutations outside
    /// the anchor's ancestry, resizes of unrelated nodes) are ignored.
    pub fn notify(&mut self, signal: Signal<K>) -> bool {
        if !self.is_active() {
            return false;
        }
        let relevant = match &signal {
            Signal::Scroll => self.listeners.contains(Listeners::SCROLL),
            Signal::Resize => self.listeners.contains(Listeners::RESIZE),
            Signal::Mutation(node) => self.observes(node),
            Signal::ElementResize(node) => *node == self.anchor || *node == self.floating,
        };
        if !relevant || self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Run the callback if a signal arrived since the last frame.
    ///
    /// Returns `true` if the callback ran.
    pub fn run_frame(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.invoke()
    }

    /// Stop listening and observing. Safe to call any number of times.
    pub fn unsubscribe(&mut self) {
        self.callback = None;
        self.listeners = Listeners::empty();
        self.observed.clear();
        self.pending = false;
    }

    fn invoke(&mut self) -> bool {
        match self.callback.as_mut() {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }
}

impl<K> Drop for AutoUpdate<K> {
    fn drop(&mut self) {
        self.callback = None;
        self.listeners = Listeners::empty();
    }
}
