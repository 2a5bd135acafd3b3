//! GTP Client - drives an external Go engine to analyse positions.
//!
//! The engine runs as a subprocess speaking the Go Text Protocol. This crate
//! launches it, keeps it in sync with the game being reviewed, asks it for a
//! move, and turns its diagnostic chatter into a [`gtp::AnalysisReport`].
//!
//! # Modules
//!
//! - [`client`] - The [`GtpClient`] facade used by callers
//! - [`config`] - Engine settings and poll timing, loadable from TOML
//! - [`process`] - Engine subprocess start and teardown
//! - [`pipe`] - Non-blocking line access to the engine's output streams
//! - [`channel`] - Command sending with acknowledgment counting
//! - [`history`] - Recorded moves and replay
//! - [`poller`] - The `genmove` polling state machine

pub mod channel;
pub mod client;
pub mod config;
mod error;
pub mod history;
pub mod pipe;
pub mod poller;
pub mod process;

pub use client::GtpClient;
pub use config::{ConfigError, EngineConfig, Timing};
pub use error::ClientError;
