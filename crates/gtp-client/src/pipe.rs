//! Non-blocking line access to the engine's output streams.
//!
//! Standard pipes only offer blocking reads, so each stream gets a pump
//! thread that forwards complete lines over a channel. Reading from the
//! client side is then a `try_recv`: it returns at once, with or without data.

use std::io::{BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// One output stream of the engine, read without blocking.
pub struct LineStream {
    rx: Receiver<String>,
}

impl LineStream {
    /// Starts pumping `reader` on a background thread.
    ///
    /// The thread ends when the stream closes (engine exit) or when this
    /// `LineStream` is dropped.
    pub fn spawn<R: Read + Send + 'static>(reader: R, name: &str) -> Self {
        let (tx, rx) = mpsc::channel::<String>();
        let name = name.to_string();
        thread::spawn(move || {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf) {
                    Ok(0) => break,
                    Ok(_) => {
                        // engines occasionally print non-UTF-8 bytes in their chatter
                        let line = String::from_utf8_lossy(&buf).into_owned();
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::trace!("{} pump stopped: {}", name, e);
                        break;
                    }
                }
            }
        });
        Self { rx }
    }

    /// Wraps an existing receiver; lines are expected to keep their newline.
    pub fn from_receiver(rx: Receiver<String>) -> Self {
        Self { rx }
    }

    /// Next buffered line, or `None` if nothing is waiting right now.
    pub fn try_line(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Everything buffered so far, concatenated. Empty if nothing is waiting.
    pub fn drain(&self) -> String {
        let mut out = String::new();
        while let Some(line) = self.try_line() {
            out.push_str(&line);
        }
        out
    }
}
