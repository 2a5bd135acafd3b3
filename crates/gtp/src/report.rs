//! Turning accumulated engine output into a structured analysis report.

use crate::lines::{classify, finished_move, LineKind};
use crate::{Color, Vertex};
use serde::Serialize;
use std::cmp::Reverse;

/// Summary statistics for the analysed position.
///
/// Every field is optional: the engine's output varies between versions and
/// between book and searched moves, and nothing is filled in that the engine
/// did not print. Winrates are from the perspective of the side to move.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisStats {
    /// The move the engine actually played in reply to `genmove`.
    pub chosen: Option<Vertex>,
    /// The move the engine's post-search summary declares best.
    pub best: Option<Vertex>,
    pub winrate: Option<f64>,
    pub mc_winrate: Option<f64>,
    pub nn_winrate: Option<f64>,
    /// Score estimate such as `B+3.5`.
    pub margin: Option<String>,
    /// Total visits of the search.
    pub visits: Option<u64>,
    pub book_moves: Option<u32>,
    pub book_positions: Option<u32>,
}

/// One move the engine considered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateMove {
    pub vertex: Vertex,
    pub visits: u64,
    pub winrate: Option<f64>,
    pub mc_winrate: Option<f64>,
    pub nn_winrate: Option<f64>,
    /// Number of network evaluations behind `nn_winrate`.
    pub nn_count: Option<u64>,
    /// Prior probability from the policy network (never flipped).
    pub policy_prob: Option<f64>,
    pub pv: Vec<Vertex>,
    /// Came from the opening book rather than a search.
    pub is_book: bool,
}

impl CandidateMove {
    /// A candidate that only records a book move.
    pub fn book(vertex: Vertex) -> Self {
        Self {
            vertex,
            visits: 0,
            winrate: None,
            mc_winrate: None,
            nn_winrate: None,
            nn_count: None,
            policy_prob: None,
            pv: Vec::new(),
            is_book: true,
        }
    }
}

/// Parsed result of one analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisReport {
    pub stats: AnalysisStats,
    /// Ranked candidates; the declared best move, if any, comes first.
    pub candidates: Vec<CandidateMove>,
    /// Summary fields the engine did not report.
    pub missing: Vec<&'static str>,
}

/// Parse the text collected during one `genmove`.
///
/// `stdout` holds the protocol replies, `stderr` the engine's diagnostics.
/// The engine reports winrates for Black; when `side_to_move` is White they
/// are complemented so every winrate is from the mover's point of view.
pub fn parse_analysis(
    stdout: &str,
    stderr: &str,
    side_to_move: Color,
    board_size: u8,
) -> AnalysisReport {
    let flip = side_to_move == Color::White;
    let maybe_flip = |w: f64| if flip { 1.0 - w } else { w };

    let mut stats = AnalysisStats {
        chosen: finished_move(stdout, board_size),
        ..AnalysisStats::default()
    };
    let mut candidates = Vec::new();

    let mut post_banner = false;
    let mut summarized = false;
    for line in stderr.lines() {
        match classify(line, board_size) {
            LineKind::Banner => post_banner = true,
            LineKind::BookMoves { moves, positions } => {
                stats.book_moves = Some(moves);
                stats.book_positions = Some(positions);
            }
            LineKind::Status {
                mc_winrate,
                nn_winrate,
                margin,
            } => {
                stats.mc_winrate = Some(maybe_flip(mc_winrate));
                stats.nn_winrate = Some(maybe_flip(nn_winrate));
                stats.margin = Some(margin);
            }
            LineKind::Candidate(mut c) => {
                c.winrate = c.winrate.map(maybe_flip);
                c.mc_winrate = c.mc_winrate.map(maybe_flip);
                c.nn_winrate = c.nn_winrate.map(maybe_flip);
                candidates.push(c);
            }
            LineKind::Best { winrate, pv, .. } if post_banner && !summarized => {
                stats.best = pv.first().copied();
                stats.winrate = Some(maybe_flip(winrate));
            }
            LineKind::Summary { visits, .. } if post_banner && !summarized => {
                stats.visits = Some(visits);
                summarized = true;
            }
            _ => {}
        }
    }

    let mut missing = Vec::new();
    if stats.book_moves.is_some() && candidates.is_empty() {
        candidates.extend(stats.chosen.map(CandidateMove::book));
    } else {
        missing = missing_fields(&stats);
        for field in &missing {
            tracing::warn!("analysis stats missing data {}", field);
        }
        candidates = rank_candidates(candidates, stats.best);
    }

    AnalysisReport {
        stats,
        candidates,
        missing,
    }
}

fn missing_fields(stats: &AnalysisStats) -> Vec<&'static str> {
    [
        ("mc_winrate", stats.mc_winrate.is_none()),
        ("nn_winrate", stats.nn_winrate.is_none()),
        ("margin", stats.margin.is_none()),
        ("best", stats.best.is_none()),
        ("winrate", stats.winrate.is_none()),
        ("visits", stats.visits.is_none()),
    ]
    .into_iter()
    .filter_map(|(name, absent)| absent.then_some(name))
    .collect()
}

/// Order candidates by visits, put every row for `best` first, and drop
/// unvisited noise.
///
/// The first entry is always kept, whatever its visit count.
pub fn rank_candidates(
    mut candidates: Vec<CandidateMove>,
    best: Option<Vertex>,
) -> Vec<CandidateMove> {
    candidates.sort_by_key(|c| (Some(c.vertex) != best, Reverse(c.visits)));
    candidates
        .into_iter()
        .enumerate()
        .filter(|(i, c)| *i == 0 || c.visits > 0)
        .map(|(_, c)| c)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Point;

    fn pt(gtp: &str) -> Vertex {
        Vertex::Point(Point::from_gtp(gtp, 19).unwrap())
    }

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    fn searched(vertex: &str, visits: u64) -> CandidateMove {
        CandidateMove {
            visits,
            is_book: false,
            ..CandidateMove::book(pt(vertex))
        }
    }

    const STDOUT: &str = "= Q16\n\n";

    const STDERR: &str = "\
Nodes: 500, Win: 51.00% (MC:50.00%/VN:52.00%), PV: Q16 D4
Nodes: 900, Win: 52.00% (MC:50.50%/VN:53.00%), PV: Q16 D4
MC winrate=0.5100, NN eval=0.5300, score=B+2.5
 D4 ->     300 (W: 50.10%) (U: 49.00%) (V: 51.00%:    280) (N: 20.0%) PV: D4 Q16
Q16 ->     250 (W: 52.31%) (U: 50.12%) (V: 53.20%:    240) (N: 18.5%) PV: Q16 D4 D16
D16 ->       0 (W:  0.00%) (U:  0.00%) (V:  0.00%:      0) (N:  1.2%) PV: D16
C3  ->      40 (W: 40.00%) (U: 41.00%) (V: 39.00%:     38) (N:  5.0%) PV: C3
========================
Q16 ->     250 (W: 52.31%) (U: 50.12%) (V: 53.20%:    240) (N: 18.5%) PV: Q16 D4 D16
250 visits, score 52.31% (from 50.00%) PV: Q16 D4 D16
590 visits, 610 nodes, 600 playouts, 300 p/s
========================
1 visits, score 10.00% (from 10.00%) PV: C3
1 visits, 1 nodes, 1 playouts, 1 p/s
";

    #[test]
    fn test_parses_full_summary() {
        let report = parse_analysis(STDOUT, STDERR, Color::Black, 19);
        let s = &report.stats;
        assert_eq!(s.chosen, Some(pt("Q16")));
        assert_eq!(s.best, Some(pt("Q16")));
        assert!(approx(s.winrate, 0.5231));
        assert!(approx(s.mc_winrate, 0.51));
        assert!(approx(s.nn_winrate, 0.53));
        assert_eq!(s.margin.as_deref(), Some("B+2.5"));
        assert_eq!(s.visits, Some(590));
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_later_summary_blocks_do_not_overwrite() {
        let report = parse_analysis(STDOUT, STDERR, Color::Black, 19);
        assert_eq!(report.stats.visits, Some(590));
        assert_eq!(report.stats.best, Some(pt("Q16")));
    }

    #[test]
    fn test_best_line_before_banner_is_ignored() {
        let stderr = "250 visits, score 52.31% (from 50.00%) PV: Q16 D4\n\
                      590 visits, 610 nodes, 600 playouts, 300 p/s\n";
        let report = parse_analysis(STDOUT, stderr, Color::Black, 19);
        assert_eq!(report.stats.best, None);
        assert_eq!(report.stats.visits, None);
    }

    #[test]
    fn test_candidates_ranked_with_best_first() {
        let report = parse_analysis(STDOUT, STDERR, Color::Black, 19);
        let order: Vec<Vertex> = report.candidates.iter().map(|c| c.vertex).collect();
        assert_eq!(order, vec![pt("Q16"), pt("D4"), pt("Q16"), pt("C3")]);
        assert!(report.candidates[1..].iter().all(|c| c.visits > 0));
    }

    #[test]
    fn test_perspective_flip_for_white() {
        let black = parse_analysis(STDOUT, STDERR, Color::Black, 19);
        let white = parse_analysis(STDOUT, STDERR, Color::White, 19);

        let complement = |a: Option<f64>, b: Option<f64>| {
            (a.unwrap() + b.unwrap() - 1.0).abs() < 1e-9
        };
        assert!(complement(black.stats.winrate, white.stats.winrate));
        assert!(complement(black.stats.mc_winrate, white.stats.mc_winrate));
        assert!(complement(black.stats.nn_winrate, white.stats.nn_winrate));
        assert_eq!(black.stats.margin, white.stats.margin);
        assert_eq!(black.stats.visits, white.stats.visits);
        assert_eq!(black.stats.best, white.stats.best);

        for (b, w) in black.candidates.iter().zip(&white.candidates) {
            assert_eq!(b.vertex, w.vertex);
            assert_eq!(b.visits, w.visits);
            assert_eq!(b.nn_count, w.nn_count);
            assert_eq!(b.policy_prob, w.policy_prob);
            assert_eq!(b.pv, w.pv);
            assert!(complement(b.winrate, w.winrate));
            assert!(complement(b.mc_winrate, w.mc_winrate));
            assert!(complement(b.nn_winrate, w.nn_winrate));
        }
    }

    #[test]
    fn test_book_move_fallback() {
        let report = parse_analysis(
            "= D4\n\n",
            "1 book moves, 42 total positions\n",
            Color::Black,
            19,
        );
        assert_eq!(report.stats.book_moves, Some(1));
        assert_eq!(report.stats.book_positions, Some(42));
        assert_eq!(report.candidates, vec![CandidateMove::book(pt("D4"))]);
        assert!(report.missing.is_empty());
    }

    #[test]
    fn test_book_count_with_candidates_keeps_candidates() {
        let stderr = "2 book moves, 42 total positions\n\
                      D4 -> 10 (W: 50.00%) (U: 50.00%) (V: 50.00%: 10) (N: 10.0%) PV: D4\n";
        let report = parse_analysis("= D4\n", stderr, Color::Black, 19);
        assert_eq!(report.candidates.len(), 1);
        assert!(!report.candidates[0].is_book);
    }

    #[test]
    fn test_missing_fields_are_reported_not_fatal() {
        let stderr = "garbage\nD4 -> 10 (W: 50.00%) (U: 50.00%) (V: 50.00%: 10) (N: 10.0%) PV: D4\n";
        let report = parse_analysis("= D4\n", stderr, Color::Black, 19);
        assert_eq!(report.stats.chosen, Some(pt("D4")));
        assert_eq!(
            report.missing,
            vec!["mc_winrate", "nn_winrate", "margin", "best", "winrate", "visits"]
        );
        assert_eq!(report.candidates.len(), 1);
    }

    #[test]
    fn test_empty_output_yields_empty_report() {
        let report = parse_analysis("", "", Color::Black, 19);
        assert_eq!(report.stats.chosen, None);
        assert!(report.candidates.is_empty());
        assert_eq!(report.missing.len(), 6);
    }

    #[test]
    fn test_rank_forces_best_to_front_even_with_zero_visits() {
        let ranked = rank_candidates(
            vec![searched("D4", 10), searched("Q16", 0), searched("C3", 0), searched("D16", 30)],
            Some(pt("Q16")),
        );
        let order: Vec<Vertex> = ranked.iter().map(|c| c.vertex).collect();
        assert_eq!(order, vec![pt("Q16"), pt("D16"), pt("D4")]);
    }

    #[test]
    fn test_rank_groups_repeated_best_rows_at_front() {
        let ranked = rank_candidates(
            vec![searched("D4", 50), searched("Q16", 40), searched("C3", 10), searched("Q16", 5)],
            Some(pt("Q16")),
        );
        let order: Vec<Vertex> = ranked.iter().map(|c| c.vertex).collect();
        assert_eq!(order, vec![pt("Q16"), pt("Q16"), pt("D4"), pt("C3")]);
        assert_eq!(ranked[0].visits, 40);
    }

    #[test]
    fn test_rank_keeps_first_entry_when_nothing_visited() {
        let ranked = rank_candidates(vec![searched("D4", 0), searched("Q16", 0)], None);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].vertex, pt("D4"));
    }

    #[test]
    fn test_rank_without_best_is_by_visits() {
        let ranked = rank_candidates(
            vec![searched("D4", 1), searched("Q16", 5), searched("C3", 3)],
            Some(pt("K10")),
        );
        let visits: Vec<u64> = ranked.iter().map(|c| c.visits).collect();
        assert_eq!(visits, vec![5, 3, 1]);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = parse_analysis("= D4\n", "1 book moves, 42 total positions\n", Color::Black, 19);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stats"]["chosen"], "dp");
        assert_eq!(json["candidates"][0]["is_book"], true);
    }
}
