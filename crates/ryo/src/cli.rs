//! Command-line interface handling for the Ryo frame driver.

use crate::config::AppConfig;
use clap::{value_parser, Arg, ArgMatches, Command};
use std::path::PathBuf;

/// Command line arguments parsed from user input.
///
/// Every option except the config path overrides the matching config file
/// setting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Optional override for log level
    pub log_level: Option<String>,
    /// Whether to force JSON log output
    pub json_logs: bool,
    /// Optional override for the frame limit
    pub frames: Option<u64>,
    /// Optional override for the target frame rate
    pub fps: Option<u32>,
    /// Optional override for the worker pool size
    pub threads: Option<usize>,
}

fn command() -> Command {
    Command::new("Ryo Frame Driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Headless frame loop driving typed game event channels")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("ryo.toml"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level (trace, debug, info, warn, error)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .help("Output logs in JSON format")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("frames")
                .short('n')
                .long("frames")
                .value_name("N")
                .help("Stop after N frames (0 runs until interrupted)")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("fps")
                .long("fps")
                .value_name("N")
                .help("Target frames per second (0 runs unpaced)")
                .value_parser(value_parser!(u32)),
        )
        .arg(
            Arg::new("threads")
                .short('t')
                .long("threads")
                .value_name("N")
                .help("Dedicated worker threads for parallel dispatch")
                .value_parser(value_parser!(usize)),
        )
}

impl CliArgs {
    /// Parses the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    /// Parses an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            config_path: matches
                .get_one::<String>("config")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("ryo.toml")),
            log_level: matches.get_one::<String>("log-level").cloned(),
            json_logs: matches.get_flag("json-logs"),
            frames: matches.get_one::<u64>("frames").copied(),
            fps: matches.get_one::<u32>("fps").copied(),
            threads: matches.get_one::<usize>("threads").copied(),
        }
    }

    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json_format = true;
        }
        if let Some(frames) = self.frames {
            config.frame.max_frames = frames;
        }
        if let Some(fps) = self.fps {
            config.frame.target_fps = fps;
        }
        if let Some(threads) = self.threads {
            config.pool.threads = Some(threads);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["ryo"]).unwrap();
        assert_eq!(args.config_path, PathBuf::from("ryo.toml"));
        assert_eq!(args.frames, None);
        assert!(!args.json_logs);
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = CliArgs::try_parse_from([
            "ryo", "-c", "custom.toml", "-l", "debug", "--json-logs", "-n", "30", "--fps", "0",
            "-t", "2",
        ])
        .unwrap();
        assert_eq!(args.config_path, PathBuf::from("custom.toml"));

        let mut config = AppConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.frame.max_frames, 30);
        assert_eq!(config.frame.target_fps, 0);
        assert_eq!(config.pool.threads, Some(2));
    }

    #[test]
    fn test_rejects_non_numeric_frames() {
        assert!(CliArgs::try_parse_from(["ryo", "--frames", "lots"]).is_err());
    }
}
