//! Engine client configuration.
//!
//! Settings can be built in code or loaded from a TOML file. Every field has
//! a default, so an empty file (or no file at all) is a valid configuration.

use gtp::coord::MAX_BOARD_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// A setting is out of range.
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Poll intervals and bounds used when waiting on the engine.
///
/// All durations are in milliseconds.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Timing {
    /// Pause after spawning before the first command.
    pub settle_delay_ms: u64,
    /// Sleep between reads while waiting for acknowledgments.
    pub ack_poll_interval_ms: u64,
    /// Total budget for one command's acknowledgments.
    pub command_timeout_ms: u64,
    /// Sleep between drains while the engine searches.
    pub analysis_poll_interval_ms: u64,
    /// Idle polls tolerated before a search is abandoned, on top of two per
    /// second of search time.
    pub idle_base_polls: u32,
    /// Wait for the summary block after the move appears.
    pub grace_period_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle_delay_ms: 2000,
            ack_poll_interval_ms: 100,
            command_timeout_ms: 20_000,
            analysis_poll_interval_ms: 1000,
            idle_base_polls: 20,
            grace_period_ms: 1000,
        }
    }
}

impl Timing {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn ack_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ack_poll_interval_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn analysis_poll_interval(&self) -> Duration {
        Duration::from_millis(self.analysis_poll_interval_ms)
    }

    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Consecutive idle polls allowed for a search of `search_seconds`.
    pub fn idle_poll_limit(&self, search_seconds: u32) -> u32 {
        self.idle_base_polls
            .saturating_add(search_seconds.saturating_mul(2))
    }
}

/// Configuration for one engine client.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Path to the engine executable.
    pub executable: PathBuf,
    /// Command-line arguments. The defaults put the engine in GTP mode and
    /// turn off pondering.
    pub args: Vec<String>,
    pub board_size: u8,
    /// White moves first on an empty board.
    pub handicap: bool,
    pub komi: f32,
    /// Search time per move in seconds.
    pub search_seconds: u32,
    /// Diagnostic volume for the command-line tool (0 = warnings only).
    pub verbosity: u8,
    pub timing: Timing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("leela"),
            args: vec!["--gtp".to_string(), "--noponder".to_string()],
            board_size: 19,
            handicap: false,
            komi: 7.5,
            search_seconds: 10,
            verbosity: 0,
            timing: Timing::default(),
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it contains invalid TOML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks values the engine or coordinate system cannot accept.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size == 0 || self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::Invalid(format!(
                "board_size must be between 1 and {}, got {}",
                MAX_BOARD_SIZE, self.board_size
            )));
        }
        if self.timing.ack_poll_interval_ms == 0 || self.timing.analysis_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll intervals must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Search time handed to the engine: one second more than configured to
    /// absorb the engine's start-up lag.
    pub fn effective_search_seconds(&self) -> u32 {
        self.search_seconds.saturating_add(1)
    }
}
