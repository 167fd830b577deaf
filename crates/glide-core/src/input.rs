#![forbid(unsafe_code)]

//! Discrete input delivered to the scroller by the host.

use bitflags::bitflags;

use crate::geometry::{Axis, Vec2};

bitflags! {
    /// Input sources the scroller may be told to ignore.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputKinds: u8 {
        /// Nothing ignored.
        const NONE        = 0b0000;
        /// Touch manipulation.
        const TOUCH       = 0b0001;
        /// Pen manipulation.
        const PEN         = 0b0010;
        /// Mouse wheel notches.
        const MOUSE_WHEEL = 0b0100;
        /// Keyboard navigation.
        const KEYBOARD    = 0b1000;
    }
}

impl Default for InputKinds {
    fn default() -> Self {
        Self::NONE
    }
}

/// One mouse-wheel event.
///
/// `delta` follows the usual convention: 120 per notch, positive when the
/// wheel moves away from the user (toward the start of the content, or
/// zooming in when Ctrl is held).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelInput {
    /// Signed wheel delta.
    pub delta: i32,
    /// Tilt wheel or shift-wheel.
    pub is_horizontal: bool,
    /// Ctrl held while scrolling.
    pub ctrl: bool,
    /// Pointer position relative to the viewport.
    pub position: Vec2,
}

impl WheelInput {
    /// A vertical wheel notch without modifiers.
    #[must_use]
    pub const fn vertical(delta: i32) -> Self {
        Self {
            delta,
            is_horizontal: false,
            ctrl: false,
            position: Vec2::ZERO,
        }
    }

    /// A horizontal wheel notch without modifiers.
    #[must_use]
    pub const fn horizontal(delta: i32) -> Self {
        Self {
            delta,
            is_horizontal: true,
            ctrl: false,
            position: Vec2::ZERO,
        }
    }

    /// A Ctrl+wheel zoom notch at `position`.
    #[must_use]
    pub const fn zoom(delta: i32, position: Vec2) -> Self {
        Self {
            delta,
            is_horizontal: false,
            ctrl: true,
            position,
        }
    }

    /// Axis scrolled by this event when it does not zoom.
    #[inline]
    pub const fn axis(&self) -> Axis {
        if self.is_horizontal {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}
