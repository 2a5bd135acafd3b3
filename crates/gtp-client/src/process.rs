//! Spawning and tearing down the engine subprocess.

use crate::channel::CommandChannel;
use crate::config::EngineConfig;
use crate::pipe::LineStream;
use crate::ClientError;
use gtp::Command;
use std::process::{Child, ChildStdin, Command as Process, Stdio};

/// A running engine and the channel to talk to it.
pub struct EngineProcess {
    child: Child,
    pub(crate) channel: CommandChannel<ChildStdin>,
}

impl EngineProcess {
    /// Spawns the engine with all three standard streams piped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::StartupFailure`] if the process cannot be
    /// spawned, typically because the executable doesn't exist or lacks
    /// permissions.
    pub fn spawn(config: &EngineConfig) -> Result<Self, ClientError> {
        let startup = |reason: String| {
            ClientError::StartupFailure(format!("{}: {}", config.executable.display(), reason))
        };

        let mut child = Process::new(&config.executable)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| startup(e.to_string()))?;

        let (Some(stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(startup("standard streams not piped".to_string()));
        };

        tracing::info!("Started engine {} (pid {})", config.executable.display(), child.id());
        Ok(Self {
            child,
            channel: CommandChannel::new(
                stdin,
                LineStream::spawn(stdout, "stdout"),
                LineStream::spawn(stderr, "stderr"),
                config.timing.ack_poll_interval(),
            ),
        })
    }

    /// Asks the engine to quit, kills it, and discards leftover output.
    ///
    /// Every step is best-effort: the engine may already be gone.
    pub fn terminate(mut self) {
        let _ = self.channel.write_line(&Command::Exit.to_gtp());
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = self.channel.drain();
        tracing::info!("Stopped engine (pid {})", self.child.id());
    }
}
