#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! This module defines the event types a host pushes into the overlay
//! runtime. All events derive `Clone` and `PartialEq` for use in tests and
//! pattern matching.
//!
//! # Design Notes
//!
//! - Wheel coordinates are viewport-local pixels, the same space the bubble
//!   anchor engine works in.
//! - `KeyEventKind` defaults to `Press` when the host cannot tell.
//! - Keys delivered while a dedicated control has focus arrive as
//!   [`Event::ControlKey`]; everything else is a global [`Event::Key`].

use bitflags::bitflags;

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A keyboard event with no focused control (global shortcut surface).
    Key(KeyEvent),

    /// A keyboard event delivered to a focused control.
    ControlKey {
        /// The control holding focus.
        control: Control,
        /// The key that was pressed.
        key: KeyEvent,
    },

    /// A click (pointer activation) on a dedicated control.
    Click(Control),

    /// Pointer-wheel input over the background viewport.
    Wheel(WheelEvent),

    /// The window was resized.
    Resize {
        /// New window width in pixels.
        width: f64,
        /// New window height in pixels.
        height: f64,
    },

    /// The content region's scroll position changed.
    ContentScroll {
        /// Vertical scroll offset in pixels.
        top: f64,
        /// Horizontal scroll offset in pixels.
        left: f64,
    },
}

/// Dedicated controls on the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Primary activation control that toggles the panel.
    Activate,
    /// Close control inside the panel.
    Close,
    /// Replay (re-scan) control inside the panel.
    Replay,
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// The type of key event (press, repeat, or release).
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Create a new key event with default modifiers and Press kind.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Create a key event with a specific kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check for a character key, ignoring letter case.
    #[must_use]
    pub fn is_char_ignore_case(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch.to_lowercase().eq(c.to_lowercase()))
    }

    /// Whether this key activates a focused control (Enter or Space).
    #[must_use]
    pub fn is_activation(&self) -> bool {
        matches!(self.code, KeyCode::Enter | KeyCode::Char(' '))
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key (Space is `Char(' ')`).
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Tab key.
    Tab,

    /// Backspace key.
    Backspace,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,
}

/// The type of key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    /// Key was pressed (default when not distinguishable).
    #[default]
    Press,

    /// Key is being held (repeat event).
    Repeat,

    /// Key was released.
    Release,
}

bitflags! {
    /// Modifier keys that can be held during a key or wheel event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// A pointer-wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelEvent {
    /// Where the wheel input originated, in viewport-local pixels.
    pub origin: Point,

    /// Horizontal scroll delta in pixels.
    pub delta_x: f64,

    /// Vertical scroll delta in pixels.
    pub delta_y: f64,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl WheelEvent {
    /// Create a wheel event at `origin` with the given deltas.
    #[must_use]
    pub const fn new(origin: Point, delta_x: f64, delta_y: f64) -> Self {
        Self {
            origin,
            delta_x,
            delta_y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Whether the event carries any scroll movement.
    #[must_use]
    pub fn has_delta(&self) -> bool {
        self.delta_x != 0.0 || self.delta_y != 0.0
    }
}
