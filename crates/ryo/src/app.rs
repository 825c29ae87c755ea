//! Main application logic and lifecycle management.
//!
//! `Application` wires the configured worker pool, the game event channels,
//! the built-in components and the frame driver together, and runs the loop
//! on a blocking thread while the async runtime listens for signals.

use crate::components::{Component, FrameStats, InputLog, QuitOnEscape};
use crate::config::AppConfig;
use crate::driver::{FrameDriver, RunSummary};
use crate::game_events::GameEvents;
use crate::logging::display_banner;
use crate::shutdown::ShutdownHandle;
use crate::signals::spawn_listener;
use ryo_event::{build_pool, shared_pool};
use std::sync::Arc;
use tracing::{info, warn};

/// How often the frame statistics component reports, in frames.
const STATS_REPORT_INTERVAL: u64 = 300;

pub struct Application {
    config: AppConfig,
    events: Arc<GameEvents>,
    shutdown: ShutdownHandle,
    stats: Arc<FrameStats>,
    /// Kept alive for the whole run; some components only hold weak references
    components: Vec<Arc<dyn Component>>,
}

impl Application {
    /// Builds the application from an already validated configuration.
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let pool = match config.pool.threads {
            Some(threads) => build_pool(threads)?,
            None => shared_pool(),
        };
        info!("🧵 Parallel dispatch on {} worker threads", pool.size());

        let events = Arc::new(GameEvents::with_pool(pool));
        let shutdown = ShutdownHandle::new();
        let stats = FrameStats::new(STATS_REPORT_INTERVAL);

        let components: Vec<Arc<dyn Component>> = vec![
            stats.clone() as Arc<dyn Component>,
            QuitOnEscape::new(shutdown.clone()) as Arc<dyn Component>,
            Arc::new(InputLog) as Arc<dyn Component>,
        ];
        for component in &components {
            Arc::clone(component).register(&events);
            info!("🔌 Registered component: {}", component.name());
        }

        Ok(Self {
            config,
            events,
            shutdown,
            stats,
            components,
        })
    }

    /// Runs the frame loop until it stops, forwarding termination signals as
    /// shutdown requests.
    pub async fn run(self) -> Result<RunSummary, Box<dyn std::error::Error>> {
        display_banner();

        let mut driver = FrameDriver::new(
            Arc::clone(&self.events),
            self.config.frame.clone(),
            self.shutdown.clone(),
        );
        let signals = spawn_listener(self.shutdown.clone());

        let outcome = tokio::task::spawn_blocking(move || driver.run()).await?;
        signals.abort();
        let summary = outcome?;

        let stats = self.stats.snapshot();
        info!(
            "📊 {} updates, {} renders, {:.2}s simulated",
            stats.updates, stats.renders, stats.simulated_time
        );
        if summary.vetoed_closes > 0 {
            warn!("⚠️ {} close requests were vetoed", summary.vetoed_closes);
        }
        info!("✅ {} components shut down cleanly", self.components.len());

        Ok(summary)
    }
}
