// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use super::*;
use alloc::borrow::Cow;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use kurbo::{Rect, Size, Vec2};
use understory_floating::Placement;

/// 0 root; 1 trigger; 2 menu with items 10..=12; 5 elsewhere;
/// 20 submenu with items 21, 22.
#[derive(Default)]
struct Page {
    rects: BTreeMap<u32, Rect>,
    scroll: Vec2,
    styles: BTreeMap<(u32, String), String>,
    focused: Option<u32>,
    tab_index: BTreeMap<u32, i32>,
}

impl Page {
    fn new() -> Self {
        let mut page = Self::default();
        page.rects.insert(1, Rect::new(100.0, 100.0, 200.0, 140.0));
        page.rects.insert(2, Rect::new(0.0, 0.0, 120.0, 90.0));
        page.rects.insert(11, Rect::new(100.0, 174.0, 220.0, 204.0));
        page.rects.insert(20, Rect::new(0.0, 0.0, 80.0, 60.0));
        page
    }

    fn style(&self, node: u32, property: &str) -> Option<&str> {
        self.styles
            .get(&(node, property.to_string()))
            .map(String::as_str)
    }
}

impl NodeTree<u32> for Page {
    fn parent_of(&self, node: &u32) -> Option<u32> {
        match node {
            1 | 2 | 5 | 20 => Some(0),
            10..=12 => Some(2),
            21 | 22 => Some(20),
            _ => None,
        }
    }
}

impl LayoutHost<u32> for Page {
    fn bounding_rect(&self, node: &u32) -> Option<Rect> {
        self.rects.get(node).copied()
    }

    fn viewport(&self) -> Size {
        Size::new(800.0, 600.0)
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }
}

impl StyleHost<u32> for Page {
    fn set_style(&mut self, node: &u32, property: &str, value: &str) {
        self.styles
            .insert((*node, property.to_string()), value.to_string());
    }
}

impl FocusHost<u32> for Page {
    fn query_items(&self, container: &u32, _selector: &str, out: &mut Vec<u32>) {
        match container {
            2 => out.extend([10, 11, 12]),
            20 => out.extend([21, 22]),
            _ => {}
        }
    }

    fn focused(&self) -> Option<u32> {
        self.focused
    }

    fn focus(&mut self, item: &u32) {
        self.focused = Some(*item);
    }

    fn set_tab_index(&mut self, item: &u32, tab_index: i32) {
        self.tab_index.insert(*item, tab_index);
    }

    fn label(&self, item: &u32) -> Option<Cow<'_, str>> {
        let label = match item {
            10 => "Cut",
            11 => "Copy",
            12 => "Paste",
            21 => "Bold",
            22 => "Italic",
            _ => return None,
        };
        Some(Cow::Borrowed(label))
    }
}

fn menu_options() -> OverlayOptions<u32> {
    OverlayOptions::new()
        .floating(
            FloatingOptions::new()
                .placement(Placement::BOTTOM_START)
                .offset(4.0),
        )
        .typeahead(Some(TypeaheadOptions::new()))
}

fn key(name: &str, timestamp: u64) -> KeyEvent {
    KeyEvent::from_dom_key(name, timestamp)
}

#[test]
fn open_positions_and_wires_listeners() {
    let mut page = Page::new();
    let mut menu = Overlay::new(menu_options());
    let result = menu.open(&mut page, 1, 2);

    assert_eq!((result.x, result.y), (100.0, 144.0));
    assert_eq!(page.style(2, "position"), Some("absolute"));
    assert_eq!(page.style(2, "left"), Some("100px"));
    assert_eq!(page.style(2, "top"), Some("144px"));
    assert_eq!(menu.position(), Some(result));
    assert_eq!((menu.anchor(), menu.floating()), (Some(&1), Some(&2)));

    let listeners = menu.listeners();
    assert!(listeners.contains(
        Listeners::KEYDOWN_CAPTURE | Listeners::KEYDOWN | Listeners::SCROLL | Listeners::RESIZE
    ));
    assert!(!listeners.contains(Listeners::CLICK_CAPTURE));
    assert_eq!(menu.tick(), Listeners::CLICK_CAPTURE);
    assert!(menu.listeners().contains(Listeners::CLICK_CAPTURE));

    // Single tab stop on the first item; focus itself is not moved.
    assert_eq!(page.tab_index.get(&10), Some(&0));
    assert_eq!(page.tab_index.get(&11), Some(&-1));
    assert_eq!(page.focused, None);
}

#[test]
fn absolute_strategy_includes_scroll() {
    let mut page = Page::new();
    page.scroll = Vec2::new(0.0, 50.0);
    let mut menu = Overlay::new(menu_options());
    menu.open(&mut page, 1, 2);
    assert_eq!(page.style(2, "top"), Some("194px"));
}

#[test]
fn escape_requests_dismissal() {
    let mut page = Page::new();
    let mut menu = Overlay::new(menu_options());
    menu.open(&mut page, 1, 2);

    assert_eq!(menu.handle_document_key(&key("Escape", 0)), Propagation::CONSUMED);
    assert!(menu.take_dismiss_request());
    assert!(!menu.take_dismiss_request());
    // The owner decides when to close.
    assert!(menu.is_open());

    menu.close();
    menu.close();
    assert!(!menu.is_open());
    assert_eq!(menu.listeners(), Listeners::empty());
    assert_eq!(menu.handle_document_key(&key("Escape", 0)), Propagation::IGNORED);
    assert!(!menu.take_dismiss_request());
}

#[test]
fn outside_click_ignores_anchor_and_panel() {
    let mut page = Page::new();
    let mut menu = Overlay::new(menu_options());
    menu.open(&mut page, 1, 2);

    // The opening click is still dispatching.
    assert!(!menu.handle_pointer(&page, PointerKind::Click, Some(&5)));
    menu.tick();
    assert!(!menu.handle_pointer(&page, PointerKind::Click, Some(&1)));
    assert!(!menu.handle_pointer(&page, PointerKind::Click, Some(&11)));
    assert!(!menu.take_dismiss_request());
    assert!(menu.handle_pointer(&page, PointerKind::Click, Some(&5)));
    assert!(menu.take_dismiss_request());
}

#[test]
fn keyboard_moves_focus_and_tab_stop() {
    let mut page = Page::new();
    let mut menu = Overlay::new(menu_options());
    menu.open(&mut page, 1, 2);

    assert!(menu.handle_key(&mut page, &key("ArrowDown", 0)).default_prevented);
    assert_eq!(page.focused, Some(11));
    assert_eq!(page.tab_index.get(&11), Some(&0));

    assert!(menu.handle_key(&mut page, &key("p", 10)).default_prevented);
    assert_eq!(page.focused, Some(12));
    assert_eq!(page.tab_index.get(&12), Some(&0));
    assert_eq!(page.tab_index.get(&11), Some(&-1));

    // Roving continues from the item typeahead picked.
    menu.handle_key(&mut page, &key("ArrowDown", 20));
    assert_eq!(page.focused, Some(10));

    assert!(menu.focus_item(&mut page, &11));
    assert_eq!(page.focused, Some(11));
    assert!(!menu.focus_item(&mut page, &21));
}

#[test]
fn frames_reposition_once_per_signal_burst() {
    let mut page = Page::new();
    let mut menu = Overlay::new(menu_options());
    menu.open(&mut page, 1, 2);
    assert_eq!(menu.run_frame(&mut page), None);

    page.rects.insert(1, Rect::new(300.0, 100.0, 400.0, 140.0));
    assert!(menu.notify(Signal::Scroll));
    assert!(!menu.notify(Signal::Resize));
    assert!(!menu.notify(Signal::Mutation(5)));

    let moved = menu.run_frame(&mut page).map(|r| (r.x, r.y));
    assert_eq!(moved, Some((300.0, 144.0)));
    assert_eq!(page.style(2, "left"), Some("300px"));
    assert_eq!(menu.run_frame(&mut page), None);

    assert!(menu.notify(Signal::Mutation(0)));
    menu.close();
    assert!(!menu.notify(Signal::Scroll));
    assert_eq!(menu.run_frame(&mut page), None);
}

#[test]
fn auto_update_can_be_disabled() {
    let mut page = Page::new();
    let mut menu = Overlay::new(menu_options().auto_update(false));
    menu.open(&mut page, 1, 2);
    assert!(!menu.listeners().intersects(Listeners::SCROLL | Listeners::RESIZE));
    assert!(!menu.notify(Signal::Scroll));
}

#[test]
fn layer_stack_closes_only_the_top_overlay() {
    let mut page = Page::new();
    let stack = LayerStackHandle::new();
    stack.install_global_escape_handler();

    let mut menu = Overlay::new(menu_options()).with_layer_stack(stack.clone());
    let mut submenu = Overlay::new(menu_options()).with_layer_stack(stack.clone());
    menu.open(&mut page, 1, 2);
    submenu.open(&mut page, 11, 20);
    assert_eq!(stack.len(), 2);
    assert!(stack.is_top(&20));

    // Per-overlay Escape is left to the stack.
    assert!(!menu.listeners().contains(Listeners::KEYDOWN_CAPTURE));
    assert_eq!(menu.handle_document_key(&key("Escape", 0)), Propagation::IGNORED);

    assert_eq!(stack.handle_key(&key("Escape", 0)), Propagation::CONSUMED);
    assert!(submenu.take_dismiss_request());
    assert!(!menu.take_dismiss_request());
    submenu.close();
    assert_eq!(stack.len(), 1);

    stack.handle_key(&key("Escape", 0));
    assert!(menu.take_dismiss_request());
    menu.close();
    assert!(stack.is_empty());
}

#[test]
fn reopen_and_drop_keep_the_stack_consistent() {
    let mut page = Page::new();
    let stack = LayerStackHandle::new();
    let mut menu = Overlay::new(menu_options()).with_layer_stack(stack.clone());
    menu.open(&mut page, 1, 2);
    menu.open(&mut page, 1, 2);
    assert_eq!(stack.len(), 1);
    drop(menu);
    assert!(stack.is_empty());
}

#[test]
fn escape_disabled_overlay_stays_off_the_stack() {
    let mut page = Page::new();
    let stack = LayerStackHandle::new();
    stack.install_global_escape_handler();
    let options = menu_options().dismiss(DismissOptions::new().escape_key(false));
    let mut menu = Overlay::new(options).with_layer_stack(stack.clone());
    menu.open(&mut page, 1, 2);

    assert!(stack.is_empty());
    assert_eq!(stack.handle_key(&key("Escape", 0)), Propagation::IGNORED);
    assert_eq!(menu.handle_document_key(&key("Escape", 0)), Propagation::IGNORED);
    assert!(!menu.take_dismiss_request());
    assert!(menu.is_open());
}

#[test]
fn paused_overlay_survives_stack_escape() {
    let mut page = Page::new();
    let stack = LayerStackHandle::new();
    stack.install_global_escape_handler();
    let mut menu = Overlay::new(menu_options()).with_layer_stack(stack.clone());
    menu.open(&mut page, 1, 2);

    menu.pause_dismiss();
    assert!(stack.is_paused(&2));
    assert_eq!(stack.handle_key(&key("Escape", 0)), Propagation::IGNORED);
    assert!(!menu.take_dismiss_request());
    assert!(stack.is_top(&2));

    menu.resume_dismiss();
    assert_eq!(stack.handle_key(&key("Escape", 0)), Propagation::CONSUMED);
    assert!(menu.take_dismiss_request());
    menu.close();
    assert!(stack.is_empty());
}

#[test]
fn paused_parent_keeps_its_place_under_a_submenu() {
    let mut page = Page::new();
    let stack = LayerStackHandle::new();
    stack.install_global_escape_handler();
    let mut menu = Overlay::new(menu_options()).with_layer_stack(stack.clone());
    let mut submenu = Overlay::new(menu_options()).with_layer_stack(stack.clone());
    menu.open(&mut page, 1, 2);
    menu.pause_dismiss();
    submenu.open(&mut page, 11, 20);

    assert_eq!(stack.handle_key(&key("Escape", 0)), Propagation::CONSUMED);
    assert!(submenu.take_dismiss_request());
    submenu.close();
    assert_eq!(stack.handle_key(&key("Escape", 0)), Propagation::IGNORED);
    assert!(!menu.take_dismiss_request());

    menu.resume_dismiss();
    assert!(!stack.is_paused(&2));
    stack.handle_key(&key("Escape", 0));
    assert!(menu.take_dismiss_request());
}

#[test]
fn paused_overlay_ignores_outside_interaction() {
    let mut page = Page::new();
    let mut menu = Overlay::new(menu_options());
    menu.open(&mut page, 1, 2);
    menu.tick();
    menu.pause_dismiss();
    assert!(!menu.handle_pointer(&page, PointerKind::Click, Some(&5)));
    menu.resume_dismiss();
    assert!(menu.handle_pointer(&page, PointerKind::Click, Some(&5)));
}

#[test]
fn closed_overlay_is_inert() {
    let mut page = Page::new();
    let mut menu: Overlay<u32> = Overlay::new(OverlayOptions::default());
    menu.close();
    assert_eq!(menu.listeners(), Listeners::empty());
    assert_eq!(menu.tick(), Listeners::empty());
    assert_eq!(menu.handle_key(&mut page, &key("ArrowDown", 0)), Propagation::IGNORED);
    assert!(!menu.handle_pointer(&page, PointerKind::Click, Some(&5)));
    assert!(!menu.sync_items(&mut page));
    assert_eq!(menu.position(), None);
}
