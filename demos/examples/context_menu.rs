// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A menu with a submenu, driven through `understory_overlay` on a tiny
//! in-memory document.
//!
//! This example shows how to:
//! - open an overlay against a trigger and apply its position,
//! - route document and panel events according to `Overlay::listeners`,
//! - share a `LayerStackHandle` so Escape closes one level at a time,
//! - reposition after a scroll through `notify` + `run_frame`.
//!
//! Run:
//! - `cargo run -p understory_demos --example context_menu`
//!
//! Kernel events are logged at `DEBUG` through `tracing-subscriber`.

use std::borrow::Cow;
use std::collections::HashMap;

use kurbo::{Rect, Size, Vec2};
use understory_floating::Placement;
use understory_overlay::{
    FloatingOptions, FocusHost, KeyEvent, LayerStackHandle, LayoutHost, Listeners, NodeTree,
    Overlay, OverlayOptions, PointerKind, Signal, StyleHost, TypeaheadOptions,
};

#[derive(Debug)]
struct Node {
    parent: Option<u32>,
    rect: Rect,
    label: &'static str,
    item: bool,
}

/// Just enough of a document for the overlay kernel.
#[derive(Debug, Default)]
struct Document {
    nodes: HashMap<u32, Node>,
    scroll: Vec2,
    focused: Option<u32>,
}

impl Document {
    fn add(&mut self, id: u32, parent: Option<u32>, rect: Rect, label: &'static str, item: bool) {
        self.nodes.insert(
            id,
            Node {
                parent,
                rect,
                label,
                item,
            },
        );
    }

    fn label(&self, id: Option<u32>) -> &'static str {
        id.and_then(|id| self.nodes.get(&id))
            .map_or("<none>", |n| n.label)
    }
}

impl NodeTree<u32> for Document {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    fn is_connected(&self, node: &u32) -> bool {
        self.nodes.contains_key(node)
    }
}

impl LayoutHost<u32> for Document {
    fn bounding_rect(&self, node: &u32) -> Option<Rect> {
        self.nodes.get(node).map(|n| n.rect)
    }

    fn viewport(&self) -> Size {
        Size::new(640.0, 480.0)
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }
}

impl StyleHost<u32> for Document {
    fn set_style(&mut self, node: &u32, property: &str, value: &str) {
        println!("  style #{node} {property}: {value}");
    }
}

impl FocusHost<u32> for Document {
    fn query_items(&self, container: &u32, _selector: &str, out: &mut Vec<u32>) {
        let mut items: Vec<u32> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.item && n.parent == Some(*container))
            .map(|(id, _)| *id)
            .collect();
        // Ids follow document order.
        items.sort_unstable();
        out.extend(items);
    }

    fn focused(&self) -> Option<u32> {
        self.focused
    }

    fn focus(&mut self, item: &u32) {
        self.focused = Some(*item);
    }

    fn set_tab_index(&mut self, _item: &u32, _tab_index: i32) {}

    fn label(&self, item: &u32) -> Option<Cow<'_, str>> {
        self.nodes.get(item).map(|n| Cow::Borrowed(n.label))
    }
}

const BODY: u32 = 0;
const TRIGGER: u32 = 1;
const MENU: u32 = 10;
const SHARE: u32 = 12;
const SUBMENU: u32 = 20;
const ELSEWHERE: u32 = 2;

fn build() -> Document {
    let mut doc = Document::default();
    doc.add(BODY, None, Rect::new(0.0, 0.0, 640.0, 480.0), "body", false);
    doc.add(TRIGGER, Some(BODY), Rect::new(40.0, 400.0, 140.0, 430.0), "Edit", false);
    doc.add(ELSEWHERE, Some(BODY), Rect::new(300.0, 40.0, 400.0, 80.0), "canvas", false);
    doc.add(MENU, Some(BODY), Rect::new(0.0, 0.0, 160.0, 120.0), "menu", false);
    for (id, label) in [(11, "Copy"), (SHARE, "Share"), (13, "Paste"), (14, "Print")] {
        let y = 400.0 + f64::from(id - 11) * 30.0;
        doc.add(id, Some(MENU), Rect::new(40.0, y, 200.0, y + 30.0), label, true);
    }
    doc.add(SUBMENU, Some(BODY), Rect::new(0.0, 0.0, 120.0, 60.0), "submenu", false);
    doc.add(21, Some(SUBMENU), Rect::ZERO, "Email", true);
    doc.add(22, Some(SUBMENU), Rect::ZERO, "Link", true);
    doc
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut doc = build();
    let layers = LayerStackHandle::new();
    layers.install_global_escape_handler();

    let options = OverlayOptions::new()
        .floating(
            FloatingOptions::new()
                .placement(Placement::BOTTOM_START)
                .offset(4.0)
                .flip(true)
                .shift(true)
                .shift_padding(8.0),
        )
        .typeahead(Some(TypeaheadOptions::new()));
    let mut menu = Overlay::new(options.clone()).with_layer_stack(layers.clone());
    let mut submenu = Overlay::new(
        options.floating(FloatingOptions::new().placement(Placement::RIGHT)),
    )
    .with_layer_stack(layers.clone());

    println!("click {}: open menu", doc.label(Some(TRIGGER)));
    let placed = menu.open(&mut doc, TRIGGER, MENU);
    println!("  placed at ({}, {}) {}", placed.x, placed.y, placed.placement);
    // The opening click is still dispatching; outside clicks start counting
    // after this tick.
    let attached = menu.tick();
    println!("  listeners {:?} (+{:?})", menu.listeners(), attached);

    for key in ["ArrowDown", "ArrowDown", "p", "End", "Home", "s"] {
        menu.handle_key(&mut doc, &KeyEvent::from_dom_key(key, 0));
        println!("key {key}: focus {}", doc.label(doc.focused));
    }

    println!("ArrowRight on {}: open submenu", doc.label(Some(SHARE)));
    submenu.open(&mut doc, SHARE, SUBMENU);
    submenu.tick();
    submenu.handle_key(&mut doc, &KeyEvent::from_dom_key("ArrowDown", 0));
    println!("  focus {}, {} layers", doc.label(doc.focused), layers.len());

    println!("Escape");
    layers.handle_key(&KeyEvent::from_dom_key("Escape", 0));
    for (name, overlay) in [("submenu", &mut submenu), ("menu", &mut menu)] {
        if overlay.take_dismiss_request() {
            println!("  {name} dismissed");
            overlay.close();
        }
    }
    println!("  {} layers, menu open: {}", layers.len(), menu.is_open());

    println!("scroll by 100");
    doc.scroll = Vec2::new(0.0, 100.0);
    if let Some(node) = doc.nodes.get_mut(&TRIGGER) {
        node.rect = node.rect - Vec2::new(0.0, 100.0);
    }
    if menu.listeners().contains(Listeners::SCROLL)
        && menu.notify(Signal::Scroll)
        && let Some(moved) = menu.run_frame(&mut doc)
    {
        println!("  moved to ({}, {}) {}", moved.x, moved.y, moved.placement);
    }

    println!("pointer on {}", doc.label(Some(ELSEWHERE)));
    menu.handle_pointer(&doc, PointerKind::Click, Some(&ELSEWHERE));
    if menu.take_dismiss_request() {
        menu.close();
    }
    println!("  menu open: {}, {} layers", menu.is_open(), layers.len());
}
