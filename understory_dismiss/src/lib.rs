// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dismiss --heading-base-level=0

//! Understory Dismiss: closing overlays on Escape and outside interaction.
//!
//! ## Dismissal sessions
//!
//! A [`DismissHandler`] is created when an overlay opens and destroyed when it
//! closes. It asks the host for document-level capture listeners:
//!
//! - `keydown`: Escape calls `on_dismiss` and is consumed (prevent default +
//!   stop propagation).
//! - `click` or `pointerdown`: an event whose target is attached and outside
//!   both the container and every element in
//!   [`DismissOptions::ignore`] calls `on_dismiss`. With `click`, the listener
//!   is attached one tick late so the opening click does not close the
//!   overlay.
//!
//! [`DismissHandler::pause`] gates both while a nested overlay is on top.
//!
//! Listeners run in the capture phase so the topmost overlay observes the
//! event before inner content can handle it differently.
//!
//! ## Layer stack
//!
//! With nested overlays, per-overlay Escape handling would close all of them
//! at once. A [`LayerStack`] (or a shared [`LayerStackHandle`]) keeps open
//! overlays in order and a single installed Escape handler dismisses only the
//! top one. Overlays that use the stack typically create their
//! [`DismissHandler`] with `escape_key(false)` and rely on the stack for
//! Escape.
//!
//! ```
//! use core::cell::Cell;
//! use std::rc::Rc;
//! use understory_dismiss::LayerStackHandle;
//! use understory_event_state::key::KeyEvent;
//!
//! let stack: LayerStackHandle<&str> = LayerStackHandle::new();
//! stack.install_global_escape_handler();
//!
//! let modal_open = Rc::new(Cell::new(true));
//! let popover_open = Rc::new(Cell::new(true));
//! let (m, p) = (modal_open.clone(), popover_open.clone());
//! stack.push("modal", move || m.set(false));
//! stack.push("popover", move || p.set(false));
//!
//! let esc = KeyEvent::from_dom_key("Escape", 0);
//! stack.handle_key(&esc);
//! assert!(!popover_open.get() && modal_open.get());
//! stack.handle_key(&esc);
//! assert!(!modal_open.get());
//! assert!(stack.is_empty());
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `tracing` debug events on dismissals and layer changes.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod handler;
mod layer_stack;

pub use handler::{DismissHandler, DismissOptions, PointerKind};
pub use layer_stack::{LayerStack, LayerStackHandle};
