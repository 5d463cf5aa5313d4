// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_overlay --heading-base-level=0

//! Understory Overlay: one open overlay (menu, popover, select, tooltip)
//! with positioning, dismissal, and keyboard focus wired together.
//!
//! An [`Overlay`] composes the kernel crates the way every overlay-like
//! component does:
//!
//! 1. [`open`](Overlay::open) positions the floating panel against its anchor
//!    ([`understory_floating::Positioner`]) and subscribes to layout changes
//!    ([`understory_floating::AutoUpdate`]).
//! 2. It starts a dismissal session on the panel
//!    ([`understory_dismiss::DismissHandler`]) with the anchor ignored, and
//!    pushes the panel onto a shared [`LayerStackHandle`] when one was given
//!    and Escape is enabled.
//! 3. It creates [`RovingFocus`] and [`Typeahead`] controllers over the
//!    panel's items and establishes the tab stop.
//! 4. [`close`](Overlay::close) tears all of it down. It is idempotent and
//!    also runs on drop.
//!
//! Dismissal never closes the overlay directly. Every dismissal path (Escape,
//! outside interaction, the layer stack) raises a flag that the owner reads
//! with [`take_dismiss_request`](Overlay::take_dismiss_request) before
//! deciding to call `close`. This keeps callbacks free of borrows on the
//! overlay.
//!
//! ## Host
//!
//! The host implements [`OverlayHost`], which is blanket-implemented for
//! anything that implements [`NodeTree`], [`LayoutHost`], [`StyleHost`], and
//! [`FocusHost`]. Event routing is driven by [`Overlay::listeners`]:
//!
//! | Listener | Route to |
//! | --- | --- |
//! | `KEYDOWN_CAPTURE` (document) | [`Overlay::handle_document_key`] |
//! | `CLICK_CAPTURE` / `POINTERDOWN_CAPTURE` (document) | [`Overlay::handle_pointer`] |
//! | `KEYDOWN` (panel) | [`Overlay::handle_key`] |
//! | `SCROLL` / `RESIZE` (window) and observers | [`Overlay::notify`], then [`Overlay::run_frame`] |
//!
//! The host also calls [`Overlay::tick`] once the event that opened the
//! overlay has finished dispatching.
//!
//! ## Features
//!
//! - `std` (default) / `libm`: forwarded to `understory_floating`.
//! - `tracing`: emit `tracing` debug events here and in every kernel crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use core::cell::Cell;

pub use understory_dismiss::{DismissOptions, LayerStackHandle, PointerKind};
pub use understory_event_state::key::KeyEvent;
pub use understory_event_state::listeners::{Listeners, Propagation};
pub use understory_event_state::tree::NodeTree;
pub use understory_floating::{
    FloatingOptions, FloatingStyles, LayoutHost, PositionResult, Signal, StyleHost,
};
pub use understory_focus::{FocusHost, RovingFocusOptions, TypeaheadOptions};

use understory_dismiss::DismissHandler;
use understory_floating::{AutoUpdate, Positioner, apply_floating_styles};
use understory_focus::{RovingFocus, Typeahead};

/// Everything an [`Overlay`] needs from the host.
pub trait OverlayHost<K>: NodeTree<K> + LayoutHost<K> + StyleHost<K> + FocusHost<K> {}

impl<K, H> OverlayHost<K> for H where
    H: NodeTree<K> + LayoutHost<K> + StyleHost<K> + FocusHost<K> + ?Sized
{
}

/// Configuration of an [`Overlay`].
#[derive(Clone, Debug)]
pub struct OverlayOptions<K> {
    /// Positioning. Default: [`FloatingOptions::default`].
    pub floating: FloatingOptions,
    /// Dismissal. The anchor is added to the ignore list on open.
    pub dismiss: DismissOptions<K>,
    /// Roving focus over the panel's items, or `None` for none.
    /// Default: `Some` with default options.
    pub roving: Option<RovingFocusOptions>,
    /// Typeahead over the panel's items, or `None` for none. Default: `None`.
    pub typeahead: Option<TypeaheadOptions>,
    /// Follow layout changes while open. Default: `true`.
    pub auto_update: bool,
}

impl<K> Default for OverlayOptions<K> {
    fn default() -> Self {
        Self {
            floating: FloatingOptions::default(),
            dismiss: DismissOptions::default(),
            roving: Some(RovingFocusOptions::default()),
            typeahead: None,
            auto_update: true,
        }
    }
}

impl<K> OverlayOptions<K> {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the positioning options.
    #[must_use]
    pub fn floating(mut self, floating: FloatingOptions) -> Self {
        self.floating = floating;
        self
    }

    /// Set the dismissal options.
    #[must_use]
    pub fn dismiss(mut self, dismiss: DismissOptions<K>) -> Self {
        self.dismiss = dismiss;
        self
    }

    /// Set or disable roving focus.
    #[must_use]
    pub fn roving(mut self, roving: Option<RovingFocusOptions>) -> Self {
        self.roving = roving;
        self
    }

    /// Set or disable typeahead.
    #[must_use]
    pub fn typeahead(mut self, typeahead: Option<TypeaheadOptions>) -> Self {
        self.typeahead = typeahead;
        self
    }

    /// Enable or disable auto-update.
    #[must_use]
    pub fn auto_update(mut self, enabled: bool) -> Self {
        self.auto_update = enabled;
        self
    }
}

#[derive(Debug)]
struct Session<K> {
    anchor: K,
    floating: K,
    auto_update: Option<AutoUpdate<K>>,
    dismiss: DismissHandler<K>,
    roving: RovingFocus<K>,
    typeahead: Typeahead<K>,
}

/// An overlay that can be opened and closed repeatedly.
///
/// When a [`LayerStackHandle`] is attached the stack owns Escape: the panel
/// is pushed on open, removed on close, and the per-overlay Escape listener is
/// disabled so one keypress closes only the topmost overlay. A panel with
/// `escape_key` turned off in its [`DismissOptions`] is never pushed.
#[derive(Debug)]
pub struct Overlay<K: Clone + PartialEq> {
    options: OverlayOptions<K>,
    positioner: Positioner,
    layers: Option<LayerStackHandle<K>>,
    session: Option<Session<K>>,
    dismiss_requested: Rc<Cell<bool>>,
    reposition: Rc<Cell<bool>>,
}

impl<K: Clone + PartialEq> Overlay<K> {
    /// Create a closed overlay.
    pub fn new(options: OverlayOptions<K>) -> Self {
        let positioner = Positioner::new(options.floating);
        Self {
            options,
            positioner,
            layers: None,
            session: None,
            dismiss_requested: Rc::new(Cell::new(false)),
            reposition: Rc::new(Cell::new(false)),
        }
    }

    /// Register with `layers` on every open.
    #[must_use]
    pub fn with_layer_stack(mut self, layers: LayerStackHandle<K>) -> Self {
        self.layers = Some(layers);
        self
    }

    /// The options in use.
    pub fn options(&self) -> &OverlayOptions<K> {
        &self.options
    }

    /// The attached layer stack, if any.
    pub fn layer_stack(&self) -> Option<&LayerStackHandle<K>> {
        self.layers.as_ref()
    }

    /// Returns `true` between [`open`](Self::open) and [`close`](Self::close).
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// The anchor of the open overlay.
    pub fn anchor(&self) -> Option<&K> {
        self.session.as_ref().map(|s| &s.anchor)
    }

    /// The floating panel of the open overlay.
    pub fn floating(&self) -> Option<&K> {
        self.session.as_ref().map(|s| &s.floating)
    }

    /// The last position applied.
    pub fn position(&self) -> Option<PositionResult> {
        self.positioner.last()
    }

    /// Returns `true` once if a dismissal was requested since the last call.
    pub fn take_dismiss_request(&self) -> bool {
        self.dismiss_requested.replace(false)
    }

    /// Listeners the host must attach for the open overlay.
    ///
    /// The layer stack's own listener is not included; the application
    /// installs it once for the shared stack.
    pub fn listeners(&self) -> Listeners {
        let Some(session) = &self.session else {
            return Listeners::empty();
        };
        let mut listeners = session.dismiss.listeners()
            | session.roving.listeners()
            | session.typeahead.listeners();
        if let Some(auto) = &session.auto_update {
            listeners |= auto.listeners();
        }
        listeners
    }

    /// Attach listeners deferred at open; see [`DismissHandler::tick`].
    pub fn tick(&mut self) -> Listeners {
        match &mut self.session {
            Some(session) => session.dismiss.tick(),
            None => Listeners::empty(),
        }
    }

    /// Stop reacting to Escape and outside interaction, for example while a
    /// nested overlay is open on top of this one.
    ///
    /// The panel's layer, if any, is paused as well and stays on the stack.
    pub fn pause_dismiss(&mut self) {
        self.set_dismiss_paused(true);
    }

    /// Undo [`pause_dismiss`](Self::pause_dismiss).
    pub fn resume_dismiss(&mut self) {
        self.set_dismiss_paused(false);
    }

    fn set_dismiss_paused(&mut self, paused: bool) {
        let Some(session) = &mut self.session else {
            return;
        };
        if paused {
            session.dismiss.pause();
        } else {
            session.dismiss.resume();
        }
        if let Some(layers) = &self.layers {
            layers.set_paused(&session.floating, paused);
        }
    }

    /// Handle a document `keydown` in the capture phase.
    pub fn handle_document_key(&mut self, event: &KeyEvent) -> Propagation {
        match &mut self.session {
            Some(session) => session.dismiss.handle_key(event),
            None => Propagation::IGNORED,
        }
    }

    /// Forward a layout signal. Returns `true` if the host should request an
    /// animation frame and then call [`run_frame`](Self::run_frame).
    pub fn notify(&mut self, signal: Signal<K>) -> bool {
        match self.session.as_mut().and_then(|s| s.auto_update.as_mut()) {
            Some(auto) => auto.notify(signal),
            None => false,
        }
    }

    /// Open the overlay with `floating` placed against `anchor`.
    ///
    /// Opening an open overlay closes it first. Returns the initial position.
    pub fn open<H>(&mut self, host: &mut H, anchor: K, floating: K) -> PositionResult
    where
        H: OverlayHost<K> + ?Sized,
    {
        self.close();
        self.dismiss_requested.set(false);
        self.positioner.set_options(self.options.floating);

        let auto_update = self.options.auto_update.then(|| {
            let flag = self.reposition.clone();
            AutoUpdate::new(&*host, anchor.clone(), floating.clone(), move || {
                flag.set(true);
            })
        });
        // The subscription's initial run is served right here.
        self.reposition.set(false);
        let result = self.positioner.update(&*host, &anchor, &floating);
        apply_floating_styles(host, &floating, &result, self.options.floating.strategy);

        let mut dismiss_options = self.options.dismiss.clone().ignore(anchor.clone());
        if self.layers.is_some() {
            dismiss_options = dismiss_options.escape_key(false);
        }
        let flag = self.dismiss_requested.clone();
        let dismiss = DismissHandler::new(floating.clone(), dismiss_options, move || {
            flag.set(true);
        });
        if let Some(layers) = &self.layers
            && self.options.dismiss.escape_key
        {
            let flag = self.dismiss_requested.clone();
            layers.push(floating.clone(), move || flag.set(true));
        }

        let mut roving = match &self.options.roving {
            Some(options) => RovingFocus::new(floating.clone(), options.clone()),
            None => RovingFocus::inert(),
        };
        roving.sync(host);
        let typeahead = match &self.options.typeahead {
            Some(options) => Typeahead::new(floating.clone(), options.clone()),
            None => Typeahead::inert(),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            message = "overlay.open",
            x = result.x,
            y = result.y,
            placement = %result.placement
        );

        self.session = Some(Session {
            anchor,
            floating,
            auto_update,
            dismiss,
            roving,
            typeahead,
        });
        result
    }

    /// Close the overlay and detach everything it attached. Idempotent.
    pub fn close(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        if let Some(auto) = &mut session.auto_update {
            auto.unsubscribe();
        }
        session.dismiss.destroy();
        session.roving.destroy();
        session.typeahead.destroy();
        if let Some(layers) = &self.layers {
            layers.remove(&session.floating);
        }
        self.reposition.set(false);
        #[cfg(feature = "tracing")]
        tracing::debug!(message = "overlay.close");
    }

    /// Run a requested animation frame, repositioning if anything changed.
    ///
    /// Returns the new position if the panel was repositioned.
    pub fn run_frame<H>(&mut self, host: &mut H) -> Option<PositionResult>
    where
        H: OverlayHost<K> + ?Sized,
    {
        let session = self.session.as_mut()?;
        let auto = session.auto_update.as_mut()?;
        auto.run_frame();
        if !self.reposition.replace(false) {
            return None;
        }
        let result = self
            .positioner
            .update(&*host, &session.anchor, &session.floating);
        apply_floating_styles(host, &session.floating, &result, self.options.floating.strategy);
        Some(result)
    }

    /// Handle a document `click` or `pointerdown` in the capture phase.
    ///
    /// Returns `true` if it requested dismissal.
    pub fn handle_pointer<H>(&mut self, host: &H, kind: PointerKind, target: Option<&K>) -> bool
    where
        H: OverlayHost<K> + ?Sized,
    {
        match &mut self.session {
            Some(session) => session.dismiss.handle_pointer(host, kind, target),
            None => false,
        }
    }

    /// Handle a `keydown` on the floating panel.
    ///
    /// Navigation keys go to roving focus; anything else goes to typeahead,
    /// after which the tab stop follows the newly focused item.
    pub fn handle_key<H>(&mut self, host: &mut H, event: &KeyEvent) -> Propagation
    where
        H: OverlayHost<K> + ?Sized,
    {
        let Some(session) = &mut self.session else {
            return Propagation::IGNORED;
        };
        let roving = session.roving.handle_key(host, event);
        if roving.is_handled() {
            return roving;
        }
        let typeahead = session.typeahead.handle_key(host, event);
        if typeahead.is_handled() {
            session.roving.sync(host);
        }
        typeahead
    }

    /// Focus `item` and make it the tab stop, as on pointer hover.
    pub fn focus_item<H>(&mut self, host: &mut H, item: &K) -> bool
    where
        H: OverlayHost<K> + ?Sized,
    {
        match &mut self.session {
            Some(session) => session.roving.focus_item(host, item),
            None => false,
        }
    }

    /// Re-establish the tab stop after the panel's items changed.
    pub fn sync_items<H>(&mut self, host: &mut H) -> bool
    where
        H: OverlayHost<K> + ?Sized,
    {
        match &mut self.session {
            Some(session) => session.roving.sync(host),
            None => false,
        }
    }
}

impl<K: Clone + PartialEq> Drop for Overlay<K> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests;
