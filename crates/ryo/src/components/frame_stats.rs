use super::Component;
use crate::game_events::{GameEvents, Render, Resize, Update};
use ryo_event::Handler;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

/// Counts frames and keeps track of simulated time and window size.
#[derive(Debug, Default)]
pub struct FrameStats {
    updates: AtomicU64,
    renders: AtomicU64,
    /// Accumulated update time in microseconds
    simulated_micros: AtomicU64,
    window: Mutex<Option<Resize>>,
    /// Log a summary every this many renders (0 disables)
    report_every: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStatsSnapshot {
    pub updates: u64,
    pub renders: u64,
    pub simulated_time: f64,
    pub window: Option<Resize>,
}

impl FrameStats {
    pub fn new(report_every: u64) -> Arc<Self> {
        Arc::new(Self {
            report_every,
            ..Self::default()
        })
    }

    pub fn snapshot(&self) -> FrameStatsSnapshot {
        FrameStatsSnapshot {
            updates: self.updates.load(Ordering::Relaxed),
            renders: self.renders.load(Ordering::Relaxed),
            simulated_time: self.simulated_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0,
            window: *self.window.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    fn on_update(&self, update: &Update) {
        self.updates.fetch_add(1, Ordering::Relaxed);
        let micros = (update.delta_time * 1_000_000.0).round() as u64;
        self.simulated_micros.fetch_add(micros, Ordering::Relaxed);
    }

    fn on_render(&self, render: &Render) {
        let renders = self.renders.fetch_add(1, Ordering::Relaxed) + 1;
        if self.report_every > 0 && renders % self.report_every == 0 {
            let snapshot = self.snapshot();
            debug!(
                "📊 Frame {}: {} updates, {:.2}s simulated",
                render.frame, snapshot.updates, snapshot.simulated_time
            );
        }
    }

    fn on_resize(&self, resize: &Resize) {
        *self.window.lock().unwrap_or_else(PoisonError::into_inner) = Some(*resize);
    }
}

impl Component for FrameStats {
    fn name(&self) -> &str {
        "frame_stats"
    }

    fn register(self: Arc<Self>, events: &Arc<GameEvents>) {
        let stats = Arc::clone(&self);
        events.update.subscribe(&Handler::infallible(move |_, update: &Update| {
            stats.on_update(update)
        }));

        let stats = Arc::clone(&self);
        events.render.subscribe(&Handler::infallible(move |_, render: &Render| {
            stats.on_render(render)
        }));

        events.resize.subscribe(&Handler::infallible(move |_, resize: &Resize| {
            self.on_resize(resize)
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ryo_event::SenderId;

    #[test]
    fn test_counts_frames_and_time() {
        let events = Arc::new(GameEvents::new());
        let stats = FrameStats::new(0);
        Arc::clone(&stats).register(&events);

        let sender = SenderId::nil();
        events.resize.invoke(sender, Resize { width: 640, height: 480 }).unwrap();
        for frame in 0..4 {
            events
                .update
                .invoke_parallel(sender, Update { delta_time: 0.25, frame })
                .unwrap();
            events.render.invoke(sender, Render { frame }).unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.updates, 4);
        assert_eq!(snapshot.renders, 4);
        assert!((snapshot.simulated_time - 1.0).abs() < 1e-9);
        assert_eq!(snapshot.window, Some(Resize { width: 640, height: 480 }));
    }
}
