//! Coordinate translation between the internal SGF-style space and GTP vertices.
//!
//! Internally a point is two lowercase letters `a`–`z`, column first, with the
//! row counted from the top edge (`dp` on 19x19). GTP names columns with
//! letters that skip `I` and counts rows `1..=N` from the bottom edge, so the
//! same point is `D4`.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Largest board the GTP column alphabet can address.
pub const MAX_BOARD_SIZE: u8 = 25;

/// Token used for a pass in both coordinate spaces.
pub const PASS: &str = "pass";

/// Token the engine answers `genmove` with when it gives up.
pub const RESIGN: &str = "resign";

const SGF_LETTERS: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";
const GTP_COLUMNS: &[u8; 25] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

/// Errors produced while translating coordinates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    /// The text is not a coordinate in the expected space.
    #[error("Malformed coordinate: '{0}'")]
    Malformed(String),
    /// The coordinate is well formed but lies outside the board.
    #[error("Coordinate {coord} is off a {size}x{size} board")]
    OffBoard { coord: String, size: u8 },
    /// The board size cannot be expressed in GTP coordinates.
    #[error("Unsupported board size: {0}")]
    BoardSize(u8),
}

fn check_size(size: u8) -> Result<(), CoordError> {
    if size == 0 || size > MAX_BOARD_SIZE {
        Err(CoordError::BoardSize(size))
    } else {
        Ok(())
    }
}

/// An on-board intersection in internal coordinates (0-based, origin top-left).
///
/// Only constructible through the checked parsers, so every `Point` lies on
/// some board of at most [`MAX_BOARD_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    col: u8,
    row: u8,
}

fn sgf_letter(index: u8) -> char {
    SGF_LETTERS.get(index as usize).map_or('?', |&b| b as char)
}

impl Point {
    /// Creates a point, checking it lies on a `size`x`size` board.
    pub fn new(col: u8, row: u8, size: u8) -> Result<Self, CoordError> {
        check_size(size)?;
        if col >= size || row >= size {
            return Err(CoordError::OffBoard {
                coord: format!("{}{}", sgf_letter(col), sgf_letter(row)),
                size,
            });
        }
        Ok(Self { col, row })
    }

    pub fn col(self) -> u8 {
        self.col
    }

    pub fn row(self) -> u8 {
        self.row
    }

    /// Parses a two-letter internal coordinate such as `dp`.
    pub fn from_sgf(s: &str, size: u8) -> Result<Self, CoordError> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(CoordError::Malformed(s.to_string()));
        }
        let index = |b: u8| {
            SGF_LETTERS
                .iter()
                .position(|&l| l == b)
                .map(|i| i as u8)
                .ok_or_else(|| CoordError::Malformed(s.to_string()))
        };
        Self::new(index(bytes[0])?, index(bytes[1])?, size)
    }

    /// Parses a GTP vertex such as `D4` (case-insensitive).
    pub fn from_gtp(s: &str, size: u8) -> Result<Self, CoordError> {
        check_size(size)?;
        let mut chars = s.chars();
        let letter = chars
            .next()
            .ok_or_else(|| CoordError::Malformed(s.to_string()))?
            .to_ascii_uppercase();
        let col = GTP_COLUMNS
            .iter()
            .position(|&c| c as char == letter)
            .ok_or_else(|| CoordError::Malformed(s.to_string()))? as u8;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CoordError::Malformed(s.to_string()));
        }
        let number: u32 = digits
            .parse()
            .map_err(|_| CoordError::Malformed(s.to_string()))?;
        if number == 0 || number > u32::from(size) || col >= size {
            return Err(CoordError::OffBoard {
                coord: s.to_string(),
                size,
            });
        }
        Ok(Self {
            col,
            row: size - number as u8,
        })
    }

    /// Renders the internal two-letter form.
    pub fn to_sgf(self) -> String {
        let mut out = String::with_capacity(2);
        out.push(sgf_letter(self.col));
        out.push(sgf_letter(self.row));
        out
    }

    /// Renders the GTP vertex for a `size`x`size` board.
    pub fn to_gtp(self, size: u8) -> Result<String, CoordError> {
        check_size(size)?;
        if self.col >= size || self.row >= size {
            return Err(CoordError::OffBoard {
                coord: self.to_sgf(),
                size,
            });
        }
        Ok(format!(
            "{}{}",
            GTP_COLUMNS[self.col as usize] as char,
            size - self.row
        ))
    }
}

/// A move target: an intersection, a pass, or the engine's resignation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Vertex {
    Point(Point),
    Pass,
    Resign,
}

impl Vertex {
    /// Parses an internal coordinate.
    ///
    /// The empty string and `pass` are passes, as is `tt` on boards of 19 or
    /// less where it cannot name a real point.
    pub fn from_sgf(s: &str, size: u8) -> Result<Self, CoordError> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case(PASS) || (s == "tt" && size <= 19) {
            return Ok(Vertex::Pass);
        }
        Point::from_sgf(s, size).map(Vertex::Point)
    }

    /// Parses a GTP vertex, including `pass` and `resign`.
    pub fn from_gtp(s: &str, size: u8) -> Result<Self, CoordError> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(PASS) {
            return Ok(Vertex::Pass);
        }
        if s.eq_ignore_ascii_case(RESIGN) {
            return Ok(Vertex::Resign);
        }
        Point::from_gtp(s, size).map(Vertex::Point)
    }

    /// Renders the internal form.
    pub fn to_sgf(self) -> String {
        match self {
            Vertex::Point(p) => p.to_sgf(),
            Vertex::Pass => PASS.to_string(),
            Vertex::Resign => RESIGN.to_string(),
        }
    }

    /// Renders the GTP form.
    pub fn to_gtp(self, size: u8) -> Result<String, CoordError> {
        match self {
            Vertex::Point(p) => p.to_gtp(size),
            Vertex::Pass => Ok(PASS.to_string()),
            Vertex::Resign => Ok(RESIGN.to_string()),
        }
    }

    pub fn is_pass(self) -> bool {
        self == Vertex::Pass
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sgf())
    }
}

impl From<Vertex> for String {
    fn from(v: Vertex) -> Self {
        v.to_sgf()
    }
}

/// Translates an internal coordinate to its GTP vertex.
pub fn to_gtp(sgf: &str, size: u8) -> Result<String, CoordError> {
    Vertex::from_sgf(sgf, size)?.to_gtp(size)
}

/// Translates a GTP vertex to its internal coordinate.
pub fn to_sgf(gtp: &str, size: u8) -> Result<String, CoordError> {
    Ok(Vertex::from_gtp(gtp, size)?.to_sgf())
}
