//! Stone color representation.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The two players in Go. Black plays first in an even game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// Returns the opposite color.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Returns the protocol spelling (`black` or `white`).
    #[inline]
    pub const fn as_gtp(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_gtp())
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `black`/`white` and the one-letter forms `b`/`w`, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            other => Err(format!("unknown color '{}'", other)),
        }
    }
}
