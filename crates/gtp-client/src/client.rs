//! GTP client for analysing positions with an external Go engine.
//!
//! # Example
//!
//! ```no_run
//! use gtp::Color;
//! use gtp_client::{EngineConfig, GtpClient};
//!
//! let mut client = GtpClient::new(EngineConfig::default());
//! client.start()?;
//! client.add_move(Color::Black, "dp")?;
//! client.add_move(Color::White, "pd")?;
//! client.replay()?;
//! let report = client.analyze()?;
//! println!("Engine plays {:?}", report.stats.chosen);
//! client.stop();
//! # Ok::<(), gtp_client::ClientError>(())
//! ```

use crate::config::EngineConfig;
use crate::history::History;
use crate::poller::AnalysisPoller;
use crate::process::EngineProcess;
use crate::ClientError;
use gtp::{AnalysisReport, Color, Command};
use std::thread;

/// A client that owns one engine process and the game it is analysing.
///
/// # Lifecycle
///
/// 1. Create with [`GtpClient::new`] and launch the engine with [`GtpClient::start`]
/// 2. Record moves with [`GtpClient::add_move`], push them with [`GtpClient::replay`]
/// 3. Ask for a move with [`GtpClient::analyze`]
/// 4. Shut down with [`GtpClient::stop`] (or rely on [`Drop`])
///
/// Moves are only recorded locally until [`replay`](GtpClient::replay) sends
/// them, so the engine can be restarted at any point and brought back to the
/// same position.
pub struct GtpClient {
    config: EngineConfig,
    history: History,
    engine: Option<EngineProcess>,
}

impl GtpClient {
    pub fn new(config: EngineConfig) -> Self {
        let history = History::new(config.board_size, config.handicap);
        Self {
            config,
            history,
            engine: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_some()
    }

    /// Launches the engine and sends board size, komi and time settings.
    ///
    /// A running engine is stopped first. The history is kept; call
    /// [`replay`](Self::replay) to restore the position.
    ///
    /// # Errors
    ///
    /// [`ClientError::StartupFailure`] if the engine cannot be spawned or does
    /// not acknowledge the board size; [`ClientError::CommandTimeout`] if a
    /// later setup command goes unanswered. The engine is stopped on failure.
    pub fn start(&mut self) -> Result<(), ClientError> {
        self.stop();
        tracing::info!("Starting engine...");
        let mut engine = EngineProcess::spawn(&self.config)?;
        thread::sleep(self.config.timing.settle_delay());

        match self.configure(&mut engine) {
            Ok(()) => {
                self.engine = Some(engine);
                Ok(())
            }
            Err(e) => {
                engine.terminate();
                Err(e)
            }
        }
    }

    fn configure(&self, engine: &mut EngineProcess) -> Result<(), ClientError> {
        let timeout = self.config.timing.command_timeout();
        tracing::info!(
            "Setting board size {} and komi {} on engine",
            self.config.board_size,
            self.config.komi
        );
        let boardsize = Command::BoardSize(self.config.board_size).to_gtp();
        engine
            .channel
            .send(&boardsize, 1, true, timeout)
            .map_err(|e| match e {
                ClientError::CommandTimeout { command } => ClientError::StartupFailure(format!(
                    "engine did not acknowledge '{}'",
                    command
                )),
                other => ClientError::StartupFailure(other.to_string()),
            })?;
        engine
            .channel
            .send(&Command::Komi(self.config.komi).to_gtp(), 1, true, timeout)?;
        let time_settings = Command::TimeSettings {
            seconds: self.config.effective_search_seconds(),
        };
        engine.channel.send(&time_settings.to_gtp(), 1, true, timeout)
    }

    /// Stops the engine. Does nothing if it is not running.
    pub fn stop(&mut self) {
        if let Some(engine) = self.engine.take() {
            tracing::info!("Stopping engine...");
            engine.terminate();
        }
    }

    fn engine(&mut self) -> Result<&mut EngineProcess, ClientError> {
        self.engine.as_mut().ok_or(ClientError::NotRunning)
    }

    /// Records a move given in internal coordinates (`dp`; empty or `tt` for
    /// a pass). Nothing is sent to the engine.
    pub fn add_move(&mut self, color: Color, position: &str) -> Result<(), ClientError> {
        self.history.add(color, position)?;
        Ok(())
    }

    /// Forgets the last recorded move.
    pub fn undo(&mut self) {
        self.history.undo();
    }

    /// Forgets every recorded move.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Empties the engine's board and keeps the recorded moves, so a
    /// following [`replay`](Self::replay) restores the position.
    pub fn clear_board(&mut self) -> Result<(), ClientError> {
        let timeout = self.config.timing.command_timeout();
        self.engine()?
            .channel
            .send(&Command::ClearBoard.to_gtp(), 1, true, timeout)
    }

    /// Starts a new game: clears the engine's board and the recorded moves.
    pub fn reset(&mut self) -> Result<(), ClientError> {
        self.clear_board()?;
        self.history.clear();
        Ok(())
    }

    pub fn whose_turn(&self) -> Color {
        self.history.whose_turn()
    }

    /// Plays every recorded move on the engine in one submission.
    ///
    /// Expects one acknowledgment per move. The engine's board is assumed to
    /// be empty (fresh start or after [`reset`](Self::reset)).
    pub fn replay(&mut self) -> Result<(), ClientError> {
        if self.history.is_empty() {
            return Ok(());
        }
        let script = self.history.replay_script();
        let count = self.history.len();
        let timeout = self.config.timing.command_timeout();
        self.engine()?.channel.send(&script, count, true, timeout)
    }

    /// The engine's own board printout (it writes `showboard` to stderr).
    pub fn board_state(&mut self) -> Result<String, ClientError> {
        let timeout = self.config.timing.command_timeout();
        let channel = &mut self.engine()?.channel;
        channel.send(&Command::ShowBoard.to_gtp(), 1, false, timeout)?;
        let (_, board) = channel.drain();
        Ok(board)
    }

    /// Asks the engine for a move for the side to play and returns its
    /// analysis.
    ///
    /// The engine places its chosen stone on its own board; the recorded
    /// history is untouched. Call [`clear_board`](Self::clear_board) and
    /// [`replay`](Self::replay) before analysing another position.
    ///
    /// # Errors
    ///
    /// [`ClientError::AnalysisTimeout`] if the engine goes quiet without
    /// playing; [`ClientError::CommandTimeout`] if the time budget is not
    /// acknowledged.
    pub fn analyze(&mut self) -> Result<AnalysisReport, ClientError> {
        let side = self.whose_turn();
        if tracing::enabled!(tracing::Level::TRACE) {
            let board = self.board_state()?;
            tracing::trace!("Analyzing state, {} to play:\n{}", side, board);
        }

        let board_size = self.config.board_size;
        let seconds = self.config.effective_search_seconds();
        let timing = self.config.timing;
        let engine = self.engine()?;
        AnalysisPoller::new(&mut engine.channel, side, board_size, seconds, timing).run()
    }
}

impl Drop for GtpClient {
    /// Makes sure the engine does not outlive the client.
    fn drop(&mut self) {
        self.stop();
    }
}
