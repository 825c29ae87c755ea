//! # Ryo Frame Driver
//!
//! Headless frame loop that owns one typed [`ryo_event::Event`] channel per
//! game event kind and drives them every frame. Subscribers (rendering,
//! input handling, game logic) attach to the channels they need and never
//! see each other.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (written to ryo.toml if missing)
//! ryo
//!
//! # Run 600 unpaced frames on 4 dedicated workers with debug logs
//! ryo --frames 600 --fps 0 --threads 4 --log-level debug
//!
//! # JSON logging
//! ryo --json-logs
//! ```
//!
//! ## Signal Handling
//!
//! SIGINT (Ctrl+C) and SIGTERM request a close; close handlers may veto it a
//! bounded number of times.

use tracing::error;

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod driver;
pub mod game_events;
pub mod input;
pub mod logging;
pub mod shutdown;
pub mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Entry point for the `ryo` binary.
///
/// 1. Parse command-line arguments
/// 2. Load the configuration file and apply CLI overrides
/// 3. Initialize logging
/// 4. Validate, build and run the application
///
/// Exits the process with status 1 on any startup or runtime error.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = match AppConfig::load_from_file(&args.config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load {}: {e}", args.config_path.display());
            std::process::exit(1);
        }
    };
    args.apply_overrides(&mut config);

    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    if let Err(e) = config.validate() {
        error!("❌ Configuration validation failed: {e}");
        std::process::exit(1);
    }

    let app = match Application::new(config) {
        Ok(app) => app,
        Err(e) => {
            error!("❌ Failed to start application: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!("❌ Application error: {e}");
        std::process::exit(1);
    }

    Ok(())
}

pub use config::{FrameSettings, LoggingSettings, PoolSettings};
pub use driver::{FrameDriver, RunSummary, StopReason};
pub use game_events::GameEvents;
pub use shutdown::ShutdownHandle;
