//! Input model shared by the frame driver and its subscribers.
//!
//! Platform layers translate their native input into [`InputEvent`]s and push
//! them into the driver's queue; the driver turns them into key, mouse,
//! resize and close dispatches at the start of the next frame.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// A keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character key, reported unshifted
    Character(char),
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    /// Function key F1-F12
    Function(u8),
    /// Any other key, by platform scancode
    Other(u32),
}

/// Modifier keys held while a key or button event occurred.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        control: false,
        alt: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn control() -> Self {
        Self {
            control: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

/// Position or offset in window pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Raw input queued for the frame driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyPressed { key: Key, modifiers: KeyModifiers },
    KeyReleased { key: Key, modifiers: KeyModifiers },
    /// Button pressed at the current cursor position
    MousePressed { button: MouseButton, modifiers: KeyModifiers },
    MouseReleased { button: MouseButton, modifiers: KeyModifiers },
    /// Cursor moved to an absolute position
    CursorMoved(Vec2),
    Resized { width: u32, height: u32 },
    /// The platform asked the window to close
    CloseRequested,
}
