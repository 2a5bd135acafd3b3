//! Outbound GTP commands.

use crate::Color;
use std::fmt;

/// Commands sent from the client to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set the board to `size`x`size`.
    BoardSize(u8),
    /// Set the komi.
    Komi(f32),
    /// Absolute time settings: no main time, `seconds` of byo-yomi per stone.
    TimeSettings { seconds: u32 },
    /// Remaining time for one color: `seconds` for a single stone.
    TimeLeft { color: Color, seconds: u32 },
    /// Play a move. `vertex` is already in GTP form (`D4`, `pass`).
    Play { color: Color, vertex: String },
    /// Ask the engine to generate (and play) a move.
    GenMove(Color),
    /// Print the board to the engine's diagnostic stream.
    ShowBoard,
    /// Empty the board.
    ClearBoard,
    /// Quit the engine.
    Exit,
}

impl Command {
    /// Format the command as a protocol line (without newline).
    pub fn to_gtp(&self) -> String {
        match self {
            Command::BoardSize(size) => format!("boardsize {}", size),
            Command::Komi(komi) => format!("komi {:.6}", komi),
            Command::TimeSettings { seconds } => format!("time_settings 0 {} 1", seconds),
            Command::TimeLeft { color, seconds } => format!("time_left {} {} 1", color, seconds),
            Command::Play { color, vertex } => format!("play {} {}", color, vertex),
            Command::GenMove(color) => format!("genmove {}", color),
            Command::ShowBoard => "showboard".to_string(),
            Command::ClearBoard => "clear_board".to_string(),
            Command::Exit => "exit".to_string(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_gtp())
    }
}
