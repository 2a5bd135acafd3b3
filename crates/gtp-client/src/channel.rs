//! Sending commands and waiting for their acknowledgments.

use crate::pipe::LineStream;
use crate::ClientError;
use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

/// `true` for a GTP success reply: `=` alone or followed by a payload.
pub fn is_ack(line: &str) -> bool {
    let line = line.trim();
    line == "=" || line.starts_with("= ")
}

/// Command/response plumbing to one engine process.
///
/// Generic over the writer so tests can stand in for the engine's stdin.
pub struct CommandChannel<W: Write> {
    stdin: W,
    stdout: LineStream,
    stderr: LineStream,
    poll_interval: Duration,
}

impl<W: Write> CommandChannel<W> {
    pub fn new(stdin: W, stdout: LineStream, stderr: LineStream, poll_interval: Duration) -> Self {
        Self {
            stdin,
            stdout,
            stderr,
            poll_interval,
        }
    }

    /// The engine-side writer.
    pub fn writer(&self) -> &W {
        &self.stdin
    }

    /// Writes `text` plus a newline and flushes.
    pub fn write_line(&mut self, text: &str) -> Result<(), ClientError> {
        writeln!(self.stdin, "{}", text)?;
        self.stdin.flush()?;
        Ok(())
    }

    /// Everything currently buffered on (stdout, stderr).
    pub fn drain(&mut self) -> (String, String) {
        (self.stdout.drain(), self.stderr.drain())
    }

    /// Sends `cmd` and waits for `expected_acks` success replies.
    ///
    /// Output is polled every `poll_interval` until `timeout` has elapsed in
    /// total. The call returns on the first poll that completes the count,
    /// discarding whatever else is buffered when `drain` is set. `cmd` may
    /// hold several newline-separated commands, in which case
    /// `expected_acks` should match their number. With `expected_acks == 0`
    /// the command is written and nothing is awaited.
    ///
    /// # Errors
    ///
    /// [`ClientError::CommandTimeout`] if the acknowledgments do not arrive in
    /// time, [`ClientError::Io`] if the engine's stdin is closed.
    pub fn send(
        &mut self,
        cmd: &str,
        expected_acks: usize,
        drain: bool,
        timeout: Duration,
    ) -> Result<(), ClientError> {
        tracing::debug!("gtp> {}", cmd);
        self.write_line(cmd)?;
        if expected_acks == 0 {
            return Ok(());
        }

        let deadline = Instant::now() + timeout;
        let mut acks = 0;
        loop {
            thread::sleep(self.poll_interval);
            while let Some(line) = self.stdout.try_line() {
                if is_ack(&line) {
                    acks += 1;
                    if acks >= expected_acks {
                        if drain {
                            self.drain();
                        }
                        return Ok(());
                    }
                } else if line.starts_with('?') {
                    tracing::warn!("engine rejected a command: {}", line.trim());
                }
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        Err(ClientError::CommandTimeout {
            command: cmd.to_string(),
        })
    }
}
