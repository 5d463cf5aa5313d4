// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard input as seen by overlay controllers.
//!
//! Only the keys the kernel reacts to get their own variant. Everything else is
//! [`Key::Other`], which every controller ignores.

/// Logical key, modelled after DOM `KeyboardEvent.key`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character (`"a"`, `"Z"`, `" "`, ...).
    Character(char),
    /// `Escape`.
    Escape,
    /// `Enter`.
    Enter,
    /// `Tab`.
    Tab,
    /// `ArrowUp`.
    ArrowUp,
    /// `ArrowDown`.
    ArrowDown,
    /// `ArrowLeft`.
    ArrowLeft,
    /// `ArrowRight`.
    ArrowRight,
    /// `Home`.
    Home,
    /// `End`.
    End,
    /// Any key the overlay kernel does not interpret.
    Other,
}

impl Key {
    /// Parse a DOM `KeyboardEvent.key` value.
    ///
    /// Single-character strings become [`Key::Character`]; named keys the
    /// kernel does not handle map to [`Key::Other`].
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Other,
                }
            }
        }
    }

    /// Returns the character for printable keys.
    pub fn as_char(self) -> Option<char> {
        match self {
            Self::Character(c) => Some(c),
            _ => None,
        }
    }
}

bitflags::bitflags! {
    /// Modifier keys held while a key was pressed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt / Option.
        const ALT     = 0b0000_0100;
        /// Meta / Command / Windows.
        const META    = 0b0000_1000;
    }
}

impl Modifiers {
    /// Modifiers that turn a printable key into a shortcut.
    pub const SHORTCUT: Self = Self::CONTROL.union(Self::ALT).union(Self::META);
}

/// A `keydown` as delivered to a controller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The logical key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
    /// Event timestamp in milliseconds.
    pub timestamp: u64,
}

impl KeyEvent {
    /// Create an unmodified key event.
    pub const fn new(key: Key, timestamp: u64) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            timestamp,
        }
    }

    /// Create an unmodified key event from a DOM `key` string.
    pub fn from_dom_key(key: &str, timestamp: u64) -> Self {
        Self::new(Key::from_dom(key), timestamp)
    }

    /// Replace the modifier set.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns the character if this is a printable key pressed without a
    /// shortcut modifier (Shift is allowed).
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.intersects(Modifiers::SHORTCUT) {
            return None;
        }
        self.key.as_char().filter(|c| !c.is_control())
    }
}
