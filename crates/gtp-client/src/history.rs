//! The game record the engine's board is rebuilt from.
//!
//! GTP has no "set up this position" command, so after a restart the only
//! way to bring the engine back in sync is to replay every move. History keeps
//! those moves, already translated to GTP vertices, in play order.

use gtp::{Color, Command, CoordError, Vertex};

/// A move in protocol-native form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub color: Color,
    /// GTP vertex (`D4`) or `pass`.
    pub vertex: String,
}

impl Move {
    /// The `play` command for this move.
    pub fn to_command(&self) -> Command {
        Command::Play {
            color: self.color,
            vertex: self.vertex.clone(),
        }
    }
}

/// Ordered moves of the current game.
#[derive(Debug, Clone)]
pub struct History {
    moves: Vec<Move>,
    board_size: u8,
    handicap: bool,
}

impl History {
    pub fn new(board_size: u8, handicap: bool) -> Self {
        Self {
            moves: Vec::new(),
            board_size,
            handicap,
        }
    }

    /// Appends a move given in internal coordinates.
    ///
    /// An empty position (or `tt` on boards up to 19x19) is a pass.
    pub fn add(&mut self, color: Color, position: &str) -> Result<(), CoordError> {
        let vertex = Vertex::from_sgf(position, self.board_size)?.to_gtp(self.board_size)?;
        self.moves.push(Move { color, vertex });
        Ok(())
    }

    /// Removes and returns the last move.
    pub fn undo(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    /// The color to move, from the number of moves played and the handicap
    /// flag alone.
    pub fn whose_turn(&self) -> Color {
        let first = if self.handicap {
            Color::White
        } else {
            Color::Black
        };
        if self.moves.len() % 2 == 0 {
            first
        } else {
            first.opposite()
        }
    }

    /// All moves as one newline-separated block of `play` commands.
    pub fn replay_script(&self) -> String {
        self.moves
            .iter()
            .map(|m| m.to_command().to_gtp())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
