//! Errors surfaced by the engine client.

use gtp::CoordError;
use thiserror::Error;

/// Errors that can occur while driving a GTP engine.
///
/// Only these abort an operation. Unrecognised diagnostic output and missing
/// summary fields are not errors; see [`gtp::AnalysisReport::missing`].
#[derive(Error, Debug)]
pub enum ClientError {
    /// The engine could not be spawned or never acknowledged its setup.
    #[error("Failed to start engine: {0}")]
    StartupFailure(String),
    /// The engine did not acknowledge a command in time.
    #[error("Command '{command}' was not acknowledged in time")]
    CommandTimeout { command: String },
    /// The engine stopped reporting progress without producing a move.
    #[error("Engine produced no move after {polls} idle polls")]
    AnalysisTimeout { polls: u32 },
    /// A command was issued while no engine is running.
    #[error("Engine is not running")]
    NotRunning,
    /// A move was given with an invalid coordinate.
    #[error(transparent)]
    Coord(#[from] CoordError),
    /// Writing to the engine failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let timeout = ClientError::CommandTimeout {
            command: "komi 7.5".to_string(),
        };
        assert_eq!(
            timeout.to_string(),
            "Command 'komi 7.5' was not acknowledged in time"
        );
        assert_eq!(ClientError::NotRunning.to_string(), "Engine is not running");
        assert_eq!(
            ClientError::AnalysisTimeout { polls: 40 }.to_string(),
            "Engine produced no move after 40 idle polls"
        );
    }

    #[test]
    fn error_from_coord_error() {
        let err: ClientError = CoordError::BoardSize(30).into();
        assert!(matches!(err, ClientError::Coord(CoordError::BoardSize(30))));
    }

    #[test]
    fn error_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        match ClientError::from(io_error) {
            ClientError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe),
            other => panic!("Expected Io variant, got {:?}", other),
        }
    }
}
