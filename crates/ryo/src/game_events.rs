//! # Game Events
//!
//! Payload types for every event the frame driver emits, and [`GameEvents`],
//! which owns one channel per event kind. Channels are plain fields: a
//! component that needs an event subscribes to that field directly, there is
//! no lookup by type.
//!
//! ## Event Kinds
//!
//! - **Lifetime**: [`Load`], [`Close`], [`Unload`]
//! - **Window**: [`Resize`]
//! - **Frame**: [`Update`] (dispatched in parallel), [`Render`]
//! - **Keyboard**: [`KeyDown`], [`KeyUp`]
//! - **Mouse**: [`MouseDown`], [`MouseUp`], [`MouseMove`]

use crate::input::{Key, KeyModifiers, MouseButton, Vec2};
use ryo_event::{Event, WorkerPool};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// Lifetime Events
// ============================================================================

/// Emitted once before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Load;

/// Shared decision about whether a pending close goes ahead.
///
/// Starts as `true` when the driver wants to close; any close handler may
/// clear it to keep the loop running.
#[derive(Debug, Clone)]
pub struct CloseFlag(Arc<AtomicBool>);

impl CloseFlag {
    pub fn new(should_close: bool) -> Self {
        Self(Arc::new(AtomicBool::new(should_close)))
    }

    pub fn should_close(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Cancels the close request.
    pub fn veto(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Emitted when the driver is about to stop.
#[derive(Debug, Clone)]
pub struct Close {
    pub should_close: CloseFlag,
}

/// Emitted once after the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Unload;

// ============================================================================
// Window Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub width: u32,
    pub height: u32,
}

// ============================================================================
// Frame Events
// ============================================================================

/// Simulation step. Handlers run concurrently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    /// Seconds since the previous update
    pub delta_time: f64,
    pub frame: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Render {
    pub frame: u64,
}

// ============================================================================
// Input Events
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDown {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyUp {
    pub key: Key,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseDown {
    pub position: Vec2,
    pub button: MouseButton,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseUp {
    pub position: Vec2,
    pub button: MouseButton,
    pub modifiers: KeyModifiers,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseMove {
    pub position: Vec2,
    /// Offset from the previous cursor position
    pub delta: Vec2,
}

// ============================================================================
// Channels
// ============================================================================

/// One channel per event kind, owned by the frame driver.
#[derive(Debug)]
pub struct GameEvents {
    pub load: Event<Load>,
    pub close: Event<Close>,
    pub unload: Event<Unload>,
    pub resize: Event<Resize>,
    pub update: Event<Update>,
    pub render: Event<Render>,
    pub key_down: Event<KeyDown>,
    pub key_up: Event<KeyUp>,
    pub mouse_down: Event<MouseDown>,
    pub mouse_up: Event<MouseUp>,
    pub mouse_move: Event<MouseMove>,
}

impl GameEvents {
    /// Creates every channel on the shared worker pool.
    pub fn new() -> Self {
        Self::with_pool(ryo_event::shared_pool())
    }

    /// Creates every channel, dispatching parallel events on `pool`.
    pub fn with_pool(pool: Arc<dyn WorkerPool>) -> Self {
        Self {
            load: Event::with_pool("load", Arc::clone(&pool)),
            close: Event::with_pool("close", Arc::clone(&pool)),
            unload: Event::with_pool("unload", Arc::clone(&pool)),
            resize: Event::with_pool("resize", Arc::clone(&pool)),
            update: Event::with_pool("update", Arc::clone(&pool)),
            render: Event::with_pool("render", Arc::clone(&pool)),
            key_down: Event::with_pool("key_down", Arc::clone(&pool)),
            key_up: Event::with_pool("key_up", Arc::clone(&pool)),
            mouse_down: Event::with_pool("mouse_down", Arc::clone(&pool)),
            mouse_up: Event::with_pool("mouse_up", Arc::clone(&pool)),
            mouse_move: Event::with_pool("mouse_move", pool),
        }
    }

    /// Total handlers across all channels as of their last dispatch.
    pub fn handler_count(&self) -> usize {
        self.load.handler_count()
            + self.close.handler_count()
            + self.unload.handler_count()
            + self.resize.handler_count()
            + self.update.handler_count()
            + self.render.handler_count()
            + self.key_down.handler_count()
            + self.key_up.handler_count()
            + self.mouse_down.handler_count()
            + self.mouse_up.handler_count()
            + self.mouse_move.handler_count()
    }
}

impl Default for GameEvents {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ryo_event::{Handler, SenderId};

    #[test]
    fn test_channels_are_named_after_their_kind() {
        let events = GameEvents::new();
        assert_eq!(events.update.name(), "update");
        assert_eq!(events.mouse_move.name(), "mouse_move");
        assert_eq!(events.handler_count(), 0);
    }

    #[test]
    fn test_close_flag_veto_is_shared() {
        let events = GameEvents::new();
        events.close.subscribe(&Handler::infallible(|_, close: &Close| {
            close.should_close.veto();
        }));

        let flag = CloseFlag::new(true);
        events
            .close
            .invoke(SenderId::nil(), Close { should_close: flag.clone() })
            .unwrap();
        assert!(!flag.should_close());
    }
}
