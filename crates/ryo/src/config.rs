//! Configuration management for the Ryo frame driver.
//!
//! This module handles loading, validation, and defaults of the driver
//! configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

fn default_target_fps() -> u32 {
    60
}

fn default_max_frames() -> u64 {
    0 // run until asked to stop
}

fn default_veto_limit() -> u32 {
    3
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Application configuration loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Frame loop settings
    #[serde(default)]
    pub frame: FrameSettings,
    /// Worker pool used for parallel dispatch
    #[serde(default)]
    pub pool: PoolSettings,
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Frame loop settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSettings {
    /// Frames per second to pace the loop at (0 runs unpaced)
    #[serde(default = "default_target_fps")]
    pub target_fps: u32,
    /// Stop after this many frames (0 for no limit)
    #[serde(default = "default_max_frames")]
    pub max_frames: u64,
    /// How many close requests handlers may veto before the close is forced
    #[serde(default = "default_veto_limit")]
    pub veto_limit: u32,
    /// Initial window width reported by the first resize event
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial window height reported by the first resize event
    #[serde(default = "default_height")]
    pub height: u32,
}

/// Worker pool settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Dedicated worker threads; unset shares the process-wide pool
    #[serde(default)]
    pub threads: Option<usize>,
}

/// Logging system configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            target_fps: default_target_fps(),
            max_frames: default_max_frames(),
            veto_limit: default_veto_limit(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file, writing the defaults there first
    /// if the file does not exist.
    pub async fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        if self.frame.target_fps > 1000 {
            return Err("frame.target_fps must be at most 1000".to_string());
        }

        if self.frame.veto_limit > 100 {
            return Err("frame.veto_limit must be at most 100".to_string());
        }

        if self.frame.width == 0 || self.frame.height == 0 {
            return Err("frame.width and frame.height must be greater than 0".to_string());
        }

        if self.pool.threads == Some(0) {
            return Err("pool.threads must be greater than 0".to_string());
        }

        Ok(())
    }
}
