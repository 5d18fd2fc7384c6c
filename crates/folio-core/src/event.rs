#![forbid(unsafe_code)]

//! Canonical page input events.
//!
//! The host translates browser events into these values before handing them
//! to the runtime. Only the information the controllers actually consume is
//! carried; everything else about the native event stays on the host side.
//!
//! # Design Notes
//!
//! - Targets are [`NodeId`] handles, never live element references.
//! - Scroll and resize carry absolute values, not deltas, so coalescing a
//!   burst of them is always "latest wins".
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::dom::NodeId;
use crate::geometry::Span;

/// Canonical page event.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// A pointer activation (`click`) on `target`.
    Click {
        /// Innermost element the click landed on.
        target: NodeId,
    },

    /// A `keydown` event.
    Key(KeyEvent),

    /// The window scrolled to a new vertical offset.
    Scroll {
        /// Vertical scroll offset in CSS pixels.
        offset_y: f64,
    },

    /// The viewport changed size.
    Resize {
        /// Viewport width in CSS pixels.
        width: f64,
        /// Viewport height in CSS pixels.
        height: f64,
    },

    /// An element's layout box moved or changed height.
    Layout {
        /// Element whose box changed.
        node: NodeId,
        /// New vertical extent in document coordinates.
        span: Span,
    },
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,

    /// Element the event was dispatched to, if any.
    pub target: Option<NodeId>,
}

impl KeyEvent {
    /// Create a new key event with no modifiers and no target.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            target: None,
        }
    }

    /// Set the element the event was dispatched to.
    #[must_use]
    pub const fn with_target(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Enter and Space activate buttons.
    #[must_use]
    pub const fn is_activation(&self) -> bool {
        matches!(self.code, KeyCode::Enter | KeyCode::Char(' '))
    }
}

/// Key codes for keyboard events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key (including `' '` for Space).
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,

    /// Tab key.
    Tab,

    /// Home key.
    Home,

    /// End key.
    End,

    /// Up arrow key.
    Up,

    /// Down arrow key.
    Down,

    /// Left arrow key.
    Left,

    /// Right arrow key.
    Right,

    /// Any key the page does not react to.
    Unidentified,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.key` value to a key code.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Home" => Self::Home,
            "End" => Self::End,
            "ArrowUp" | "Up" => Self::Up,
            "ArrowDown" | "Down" => Self::Down,
            "ArrowLeft" | "Left" => Self::Left,
            "ArrowRight" | "Right" => Self::Right,
            "Spacebar" => Self::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Self::Char(ch),
                    _ => Self::Unidentified,
                }
            }
        }
    }
}

bitflags! {
    /// Modifier keys that can be held during a key event.
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
        /// Meta/Command key.
        const META  = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}
