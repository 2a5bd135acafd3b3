//! Driving one `genmove` analysis to completion or timeout.
//!
//! While it searches, the engine streams progress to stderr and only prints
//! the move on stdout at the end, followed shortly by a summary block on
//! stderr. The poller walks this as a state machine:
//!
//! ```text
//! Idle -> TimeBudgetSet -> Requested -> Polling -> Completed
//!                                               \-> TimedOut
//! ```

use crate::channel::CommandChannel;
use crate::config::Timing;
use crate::ClientError;
use gtp::lines::{classify, finished_move};
use gtp::{parse_analysis, AnalysisReport, Color, Command, LineKind};
use std::io::Write;
use std::thread;

/// Where the poller is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    TimeBudgetSet,
    Requested,
    Polling,
    Completed,
    TimedOut,
}

/// One analysis of the side to move.
pub struct AnalysisPoller<'a, W: Write> {
    channel: &'a mut CommandChannel<W>,
    side_to_move: Color,
    board_size: u8,
    search_seconds: u32,
    timing: Timing,
    state: PollState,
    stdout: String,
    stderr: String,
    idle_polls: u32,
}

impl<'a, W: Write> AnalysisPoller<'a, W> {
    pub fn new(
        channel: &'a mut CommandChannel<W>,
        side_to_move: Color,
        board_size: u8,
        search_seconds: u32,
        timing: Timing,
    ) -> Self {
        Self {
            channel,
            side_to_move,
            board_size,
            search_seconds,
            timing,
            state: PollState::Idle,
            stdout: String::new(),
            stderr: String::new(),
            idle_polls: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Runs the cycle to its end and parses what the engine printed.
    ///
    /// # Errors
    ///
    /// [`ClientError::AnalysisTimeout`] if the engine falls silent without
    /// producing a move; errors from setting the time budget are passed on.
    pub fn run(mut self) -> Result<AnalysisReport, ClientError> {
        loop {
            match self.state {
                PollState::Completed => return Ok(self.finish()),
                PollState::TimedOut => {
                    return Err(ClientError::AnalysisTimeout {
                        polls: self.idle_polls,
                    })
                }
                _ => self.step()?,
            }
        }
    }

    /// Advances by one transition (one drain while polling).
    pub fn step(&mut self) -> Result<(), ClientError> {
        let next = match self.state {
            PollState::Idle => {
                self.set_time_budget()?;
                PollState::TimeBudgetSet
            }
            PollState::TimeBudgetSet => {
                let cmd = Command::GenMove(self.side_to_move).to_gtp();
                tracing::debug!("gtp> {}", cmd);
                self.channel.write_line(&cmd)?;
                PollState::Requested
            }
            PollState::Requested | PollState::Polling => self.poll_once(),
            done => done,
        };
        if next != self.state {
            tracing::trace!("analysis {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        Ok(())
    }

    fn set_time_budget(&mut self) -> Result<(), ClientError> {
        for color in [Color::Black, Color::White] {
            let cmd = Command::TimeLeft {
                color,
                seconds: self.search_seconds,
            };
            self.channel
                .send(&cmd.to_gtp(), 1, true, self.timing.command_timeout())?;
        }
        Ok(())
    }

    fn poll_once(&mut self) -> PollState {
        let (out, err) = self.channel.drain();
        self.stdout.push_str(&out);
        self.stderr.push_str(&err);

        let progress = err.lines().filter_map(|line| match classify(line, self.board_size) {
            LineKind::Progress(p) => Some(p),
            _ => None,
        });
        match progress.last() {
            Some(p) => {
                tracing::info!("Visited {} positions", p.nodes);
                self.idle_polls = 0;
            }
            None => self.idle_polls += 1,
        }

        if finished_move(&self.stdout, self.board_size).is_some() {
            return PollState::Completed;
        }
        if self.idle_polls >= self.timing.idle_poll_limit(self.search_seconds) {
            tracing::warn!(
                "no move after {} idle polls, giving up on analysis",
                self.idle_polls
            );
            return PollState::TimedOut;
        }
        thread::sleep(self.timing.analysis_poll_interval());
        PollState::Polling
    }

    fn finish(mut self) -> AnalysisReport {
        // The summary block lands on stderr a little after the move.
        if let Err(e) = self.channel.write_line("") {
            tracing::debug!("trailing newline not delivered: {}", e);
        }
        thread::sleep(self.timing.grace_period());
        let (out, err) = self.channel.drain();
        self.stdout.push_str(&out);
        self.stderr.push_str(&err);

        tracing::trace!("engine stdout:\n{}", self.stdout);
        tracing::trace!("engine stderr:\n{}", self.stderr);

        let report = parse_analysis(
            &self.stdout,
            &self.stderr,
            self.side_to_move,
            self.board_size,
        );
        if let Some(chosen) = report.stats.chosen {
            tracing::info!("Chosen move: {}", chosen);
        }
        if let (Some(best), Some(winrate), Some(visits)) = (
            report.stats.best,
            report.stats.winrate,
            report.stats.visits,
        ) {
            tracing::info!("Best move: {} winrate {:.4} visits {}", best, winrate, visits);
        }
        report
    }
}
