//! Go Text Protocol (GTP) types for driving an analysis engine.
//!
//! This crate has no I/O. It provides:
//! - [`Color`] and the coordinate types [`Point`] and [`Vertex`], with
//!   translation between the internal SGF-style space and GTP vertices
//! - [`Command`] for formatting outbound commands
//! - [`lines`] matchers for the engine's diagnostic output
//! - [`parse_analysis`] to turn a finished `genmove` into an [`AnalysisReport`]

mod color;
mod command;
pub mod coord;
pub mod lines;
mod report;

pub use color::Color;
pub use command::Command;
pub use coord::{CoordError, Point, Vertex};
pub use lines::{LineKind, Progress};
pub use report::{parse_analysis, rank_candidates, AnalysisReport, AnalysisStats, CandidateMove};
