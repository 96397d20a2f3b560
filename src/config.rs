//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.
//! Command line flags are applied on top by the binary.

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

use crate::constants::{logging, playback};
use crate::error::{Error, Result};

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Coarse seek step in seconds
    pub seek_step: f64,
    /// Fine seek step in seconds
    pub fine_step: f64,
    /// Position poll interval in milliseconds
    pub tick_ms: u64,
    /// Directory the log file is written to
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            seek_step: playback::DEFAULT_SEEK_STEP,
            fine_step: playback::DEFAULT_FINE_STEP,
            tick_ms: playback::DEFAULT_TICK_MS,
            log_dir: dirs::data_dir().map(|d| d.join(logging::APP_DIR)),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Ok(step) = env::var("LYRICSYNC_SEEK_STEP") {
            config.seek_step = parse_step(&step, "LYRICSYNC_SEEK_STEP")?;
        }

        if let Ok(step) = env::var("LYRICSYNC_FINE_STEP") {
            config.fine_step = parse_step(&step, "LYRICSYNC_FINE_STEP")?;
        }

        if let Ok(ms) = env::var("LYRICSYNC_TICK_MS") {
            config.tick_ms = parse_tick(&ms)?;
        }

        if let Ok(dir) = env::var("LYRICSYNC_LOG_DIR") {
            config.log_dir = Some(expand_path(&dir));
        }

        Ok(config)
    }

    /// Override the seek steps, validating them the same way as the environment.
    pub fn with_steps(mut self, seek_step: Option<&str>, fine_step: Option<&str>) -> Result<Self> {
        if let Some(step) = seek_step {
            self.seek_step = parse_step(step, "--seek-step")?;
        }
        if let Some(step) = fine_step {
            self.fine_step = parse_step(step, "--fine-step")?;
        }
        Ok(self)
    }
}

/// Expand a leading `~` in a user supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}

fn parse_step(value: &str, name: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(step) if step.is_finite() && step > 0.0 => Ok(step),
        _ => Err(Error::config(
            format!("{name} must be a positive number of seconds, got '{value}'"),
            "Use a value such as 5 or 0.5",
        )),
    }
}

fn parse_tick(value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|ms| (playback::MIN_TICK_MS..=playback::MAX_TICK_MS).contains(ms))
        .ok_or_else(|| {
            Error::config(
                format!("LYRICSYNC_TICK_MS must be between {} and {}, got '{value}'", playback::MIN_TICK_MS, playback::MAX_TICK_MS),
                "The default of 50 ms suits most terminals",
            )
        })
}
