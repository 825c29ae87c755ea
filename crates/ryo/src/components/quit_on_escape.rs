use super::Component;
use crate::game_events::{GameEvents, KeyDown};
use crate::input::Key;
use crate::shutdown::ShutdownHandle;
use ryo_event::Handler;
use std::sync::{Arc, OnceLock, Weak};
use tracing::info;

/// Requests shutdown the first time Escape is pressed, then stops listening.
///
/// The channel only holds a weak reference: the component does nothing once
/// its owner drops it.
pub struct QuitOnEscape {
    shutdown: ShutdownHandle,
    handler: OnceLock<Handler<KeyDown>>,
}

impl QuitOnEscape {
    pub fn new(shutdown: ShutdownHandle) -> Arc<Self> {
        Arc::new(Self {
            shutdown,
            handler: OnceLock::new(),
        })
    }

    fn on_key_down(&self, events: &GameEvents, down: &KeyDown) {
        if down.key != Key::Escape {
            return;
        }

        info!("⎋ Escape pressed - requesting shutdown");
        self.shutdown.request();
        if let Some(handler) = self.handler.get() {
            events.key_down.unsubscribe(handler);
        }
    }
}

impl Component for QuitOnEscape {
    fn name(&self) -> &str {
        "quit_on_escape"
    }

    fn register(self: Arc<Self>, events: &Arc<GameEvents>) {
        // Weak references: the channel owns the handler, which must not own
        // the channel or this component in return.
        let this: Weak<Self> = Arc::downgrade(&self);
        let channels: Weak<GameEvents> = Arc::downgrade(events);

        let handler = self.handler.get_or_init(|| {
            Handler::named("quit_on_escape", move |_, down: &KeyDown| {
                if let (Some(this), Some(events)) = (this.upgrade(), channels.upgrade()) {
                    this.on_key_down(&events, down);
                }
                Ok(())
            })
        });
        events.key_down.subscribe(handler);
    }
}
