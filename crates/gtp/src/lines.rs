//! Matchers for the engine's diagnostic line shapes.
//!
//! Each matcher looks at a single trimmed line and either recognises one
//! shape or declines. [`classify`] tries them all; anything no matcher
//! claims is [`LineKind::Unrecognized`] and callers are expected to skip it.
//!
//! Winrates are returned as fractions from the engine's own (Black's)
//! perspective. Flipping to the side to move is the report's job.

use crate::report::CandidateMove;
use crate::Vertex;
use std::str::FromStr;

/// Separator the engine prints before its post-search summary.
pub const BANNER: &str = "================";

/// A live search update printed while the engine thinks.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub nodes: u64,
    pub winrate: f64,
    pub mc_winrate: f64,
    pub nn_winrate: f64,
    pub pv: Vec<Vertex>,
}

/// The shape of one diagnostic line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// Row of `=` separating live logging from the summary.
    Banner,
    /// `Nodes: 1234, Win: 52.31% (MC:50.12%/VN:53.20%), PV: D4 Q16`
    Progress(Progress),
    /// `3 book moves, 120 total positions`
    BookMoves { moves: u32, positions: u32 },
    /// `MC winrate=0.5123, NN eval=0.5231, score=B+3.5`
    Status {
        mc_winrate: f64,
        nn_winrate: f64,
        margin: String,
    },
    /// `D4 -> 1234 (W: 52.31%) (U: 50.12%) (V: 53.20%: 1100) (N: 23.4%) PV: D4 Q16`
    Candidate(CandidateMove),
    /// `1234 visits, score 52.31% (from 50.10%) PV: D4 Q16`
    Best {
        visits: u64,
        winrate: f64,
        pv: Vec<Vertex>,
    },
    /// `1234 visits, 1300 nodes, 1200 playouts, 400 p/s`
    Summary {
        visits: u64,
        nodes: u64,
        playouts: u64,
        rate: u64,
    },
    Unrecognized,
}

/// Classify one diagnostic line.
pub fn classify(line: &str, board_size: u8) -> LineKind {
    let line = line.trim();
    if line.starts_with(BANNER) {
        return LineKind::Banner;
    }
    let tokens: Vec<&str> = line.split_whitespace().collect();

    progress(&tokens, board_size)
        .or_else(|| book_moves(&tokens))
        .or_else(|| status(&tokens))
        .or_else(|| candidate(&tokens, board_size))
        .or_else(|| best(&tokens, board_size))
        .or_else(|| summary(&tokens))
        .unwrap_or(LineKind::Unrecognized)
}

/// Find the move in a `genmove` reply (`= D4`, `= pass`, `= resign`).
pub fn finished_move(stdout: &str, board_size: u8) -> Option<Vertex> {
    stdout.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("= ")?;
        Vertex::from_gtp(rest.split_whitespace().next()?, board_size).ok()
    })
}

fn number<T: FromStr>(token: &str) -> Option<T> {
    token.trim_end_matches(',').parse().ok()
}

/// `52.31%` (with optional trailing punctuation) as a fraction.
fn percent(token: &str) -> Option<f64> {
    let token = token.trim_end_matches([')', ',', ':']);
    let value: f64 = token.strip_suffix('%')?.parse().ok()?;
    Some(value / 100.0)
}

fn pv(tokens: &[&str], board_size: u8) -> Vec<Vertex> {
    tokens
        .iter()
        .filter_map(|t| Vertex::from_gtp(t, board_size).ok())
        .collect()
}

fn progress(tokens: &[&str], board_size: u8) -> Option<LineKind> {
    match tokens {
        ["Nodes:", nodes, "Win:", win, split, "PV:", rest @ ..] => {
            let split = split.strip_prefix("(MC:")?.strip_suffix("),")?;
            let (mc, nn) = split.split_once("/VN:")?;
            Some(LineKind::Progress(Progress {
                nodes: number(nodes)?,
                winrate: percent(win)?,
                mc_winrate: percent(mc)?,
                nn_winrate: percent(nn)?,
                pv: pv(rest, board_size),
            }))
        }
        _ => None,
    }
}

fn book_moves(tokens: &[&str]) -> Option<LineKind> {
    match tokens {
        [moves, "book", "moves,", positions, "total", "positions", ..] => {
            Some(LineKind::BookMoves {
                moves: number(moves)?,
                positions: number(positions)?,
            })
        }
        _ => None,
    }
}

fn status(tokens: &[&str]) -> Option<LineKind> {
    match tokens {
        ["MC", mc, "NN", nn, score, ..] => {
            let mc = mc.strip_prefix("winrate=")?;
            let nn = nn.strip_prefix("eval=")?;
            let margin = score.strip_prefix("score=")?;
            let (side, points) = margin.split_once('+')?;
            if !matches!(side, "B" | "W") || points.parse::<f64>().is_err() {
                return None;
            }
            Some(LineKind::Status {
                mc_winrate: number(mc)?,
                nn_winrate: number(nn)?,
                margin: margin.to_string(),
            })
        }
        _ => None,
    }
}

fn candidate(tokens: &[&str], board_size: u8) -> Option<LineKind> {
    match tokens {
        [mv, "->", visits, "(W:", w, "(U:", u, "(V:", v, count, "(N:", n, "PV:", rest @ ..] => {
            Some(LineKind::Candidate(CandidateMove {
                vertex: Vertex::from_gtp(mv, board_size).ok()?,
                visits: number(visits)?,
                winrate: Some(percent(w)?),
                mc_winrate: Some(percent(u)?),
                nn_winrate: Some(percent(v)?),
                nn_count: Some(count.trim_end_matches(')').parse().ok()?),
                policy_prob: Some(percent(n)?),
                pv: pv(rest, board_size),
                is_book: false,
            }))
        }
        _ => None,
    }
}

fn best(tokens: &[&str], board_size: u8) -> Option<LineKind> {
    match tokens {
        [visits, "visits,", "score", score, "(from", _, "PV:", rest @ ..] => {
            let pv = pv(rest, board_size);
            if pv.is_empty() {
                return None;
            }
            Some(LineKind::Best {
                visits: number(visits)?,
                winrate: percent(score)?,
                pv,
            })
        }
        _ => None,
    }
}

fn summary(tokens: &[&str]) -> Option<LineKind> {
    match tokens {
        [visits, "visits,", nodes, "nodes,", playouts, "playouts,", rate, "p/s", ..] => {
            Some(LineKind::Summary {
                visits: number(visits)?,
                nodes: number(nodes)?,
                playouts: number(playouts)?,
                rate: number(rate)?,
            })
        }
        _ => None,
    }
}
