//! Built-in subscribers.
//!
//! A component subscribes to the channels it cares about when registered and
//! may unsubscribe itself at any time, including from inside its own handlers.

mod frame_stats;
mod input_log;
mod quit_on_escape;

pub use frame_stats::{FrameStats, FrameStatsSnapshot};
pub use input_log::InputLog;
pub use quit_on_escape::QuitOnEscape;

use crate::game_events::GameEvents;
use std::sync::Arc;

/// Something that reacts to game events.
pub trait Component: Send + Sync {
    fn name(&self) -> &str;

    /// Subscribes this component's handlers to `events`.
    fn register(self: Arc<Self>, events: &Arc<GameEvents>);
}
