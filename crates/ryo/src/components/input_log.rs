use super::Component;
use crate::game_events::{GameEvents, KeyDown, KeyUp, MouseDown, MouseMove, MouseUp};
use ryo_event::Handler;
use std::sync::Arc;
use tracing::{debug, trace};

/// Logs keyboard and mouse events.
#[derive(Debug, Default)]
pub struct InputLog;

impl Component for InputLog {
    fn name(&self) -> &str {
        "input_log"
    }

    fn register(self: Arc<Self>, events: &Arc<GameEvents>) {
        events.key_down.subscribe(&Handler::infallible(|sender, e: &KeyDown| {
            debug!("⬇️ {:?} {:?} from {}", e.key, e.modifiers, sender)
        }));
        events.key_up.subscribe(&Handler::infallible(|sender, e: &KeyUp| {
            debug!("⬆️ {:?} {:?} from {}", e.key, e.modifiers, sender)
        }));
        events.mouse_down.subscribe(&Handler::infallible(|_, e: &MouseDown| {
            debug!("🖱️ {:?} down at ({}, {})", e.button, e.position.x, e.position.y)
        }));
        events.mouse_up.subscribe(&Handler::infallible(|_, e: &MouseUp| {
            debug!("🖱️ {:?} up at ({}, {})", e.button, e.position.x, e.position.y)
        }));
        events.mouse_move.subscribe(&Handler::infallible(|_, e: &MouseMove| {
            trace!("🖱️ moved to ({}, {})", e.position.x, e.position.y)
        }));
    }
}
