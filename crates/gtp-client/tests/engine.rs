//! Integration tests against the scripted `fake-engine` binary.

use gtp::{Color, Vertex};
use gtp_client::{ClientError, EngineConfig, GtpClient, Timing};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn config(mode: &str) -> EngineConfig {
    EngineConfig {
        executable: PathBuf::from(env!("CARGO_BIN_EXE_fake-engine")),
        args: vec![
            "--gtp".to_string(),
            "--noponder".to_string(),
            format!("--mode={}", mode),
        ],
        board_size: 19,
        search_seconds: 0,
        timing: Timing {
            settle_delay_ms: 10,
            ack_poll_interval_ms: 5,
            command_timeout_ms: 2000,
            analysis_poll_interval_ms: 20,
            idle_base_polls: 5,
            grace_period_ms: 300,
        },
        ..EngineConfig::default()
    }
}

fn vertex(gtp: &str) -> Vertex {
    Vertex::from_gtp(gtp, 19).unwrap()
}

#[test]
fn test_start_and_stop() {
    let mut client = GtpClient::new(config("normal"));
    client.start().expect("engine should start");
    assert!(client.is_running());
    client.stop();
    assert!(!client.is_running());
    client.stop();
}

#[test]
fn test_replay_reaches_engine() {
    let mut client = GtpClient::new(config("normal"));
    client.start().unwrap();
    client.add_move(Color::Black, "dp").unwrap();
    client.add_move(Color::White, "pd").unwrap();
    client.add_move(Color::Black, "").unwrap();
    client.replay().unwrap();

    let board = client.board_state().unwrap();
    assert!(board.contains("Moves played: 3"), "board was: {}", board);
}

#[test]
fn test_reset_clears_engine_and_history() {
    let mut client = GtpClient::new(config("normal"));
    client.start().unwrap();
    client.add_move(Color::Black, "dp").unwrap();
    client.replay().unwrap();
    client.reset().unwrap();

    assert!(client.history().is_empty());
    let board = client.board_state().unwrap();
    assert!(board.contains("Moves played: 0"), "board was: {}", board);
}

#[test]
fn test_analyze_full_search() {
    let mut client = GtpClient::new(config("normal"));
    client.start().unwrap();
    client.add_move(Color::Black, "dp").unwrap();
    client.replay().unwrap();
    assert_eq!(client.whose_turn(), Color::White);

    let report = client.analyze().unwrap();
    let stats = &report.stats;
    assert_eq!(stats.chosen, Some(vertex("Q16")));
    assert_eq!(stats.best, Some(vertex("Q16")));
    assert_eq!(stats.visits, Some(240));
    assert_eq!(stats.margin.as_deref(), Some("W+1.5"));
    // white to move: engine's 47.5% for black is 52.5% for white
    assert!((stats.winrate.unwrap() - 0.525).abs() < 1e-9);
    assert!(report.missing.is_empty());

    let order: Vec<Vertex> = report.candidates.iter().map(|c| c.vertex).collect();
    assert_eq!(order, vec![vertex("Q16"), vertex("R4")]);
}

#[test]
fn test_clear_board_and_replay_between_analyses() {
    let mut client = GtpClient::new(config("normal"));
    client.start().unwrap();
    client.add_move(Color::Black, "dp").unwrap();
    client.replay().unwrap();
    client.analyze().unwrap();

    // the engine's own move is now on its board
    let board = client.board_state().unwrap();
    assert!(board.contains("Moves played: 2"), "board was: {}", board);

    client.clear_board().unwrap();
    assert_eq!(client.history().len(), 1);
    client.replay().unwrap();
    let board = client.board_state().unwrap();
    assert!(board.contains("Moves played: 1"), "board was: {}", board);
    assert_eq!(client.whose_turn(), Color::White);

    let report = client.analyze().unwrap();
    assert_eq!(report.stats.chosen, Some(vertex("Q16")));
}

#[test]
fn test_analyze_book_move() {
    let mut client = GtpClient::new(config("book"));
    client.start().unwrap();

    let report = client.analyze().unwrap();
    assert_eq!(report.stats.chosen, Some(vertex("D4")));
    assert_eq!(report.stats.book_moves, Some(1));
    assert_eq!(report.candidates.len(), 1);
    assert!(report.candidates[0].is_book);
    assert_eq!(report.candidates[0].vertex, vertex("D4"));
}

#[test]
fn test_silent_engine_times_out() {
    let cfg = config("silent");
    // one second of lag is added to the configured search time
    let polls = cfg.timing.idle_poll_limit(cfg.effective_search_seconds());
    let mut client = GtpClient::new(cfg);
    client.start().unwrap();

    let start = Instant::now();
    match client.analyze() {
        Err(ClientError::AnalysisTimeout { polls: p }) => assert_eq!(p, polls),
        other => panic!("Expected AnalysisTimeout, got {:?}", other),
    }
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[test]
fn test_mute_engine_fails_startup() {
    let mut cfg = config("mute");
    cfg.timing.command_timeout_ms = 200;
    let mut client = GtpClient::new(cfg);

    match client.start() {
        Err(ClientError::StartupFailure(msg)) => assert!(msg.contains("boardsize 19")),
        other => panic!("Expected StartupFailure, got {:?}", other),
    }
    assert!(!client.is_running());
}

#[test]
fn test_restart_and_replay_restores_position() {
    let mut client = GtpClient::new(config("normal"));
    client.start().unwrap();
    client.add_move(Color::Black, "dp").unwrap();
    client.add_move(Color::White, "pd").unwrap();
    client.replay().unwrap();

    client.start().unwrap();
    let board = client.board_state().unwrap();
    assert!(board.contains("Moves played: 0"), "board was: {}", board);

    client.replay().unwrap();
    let board = client.board_state().unwrap();
    assert!(board.contains("Moves played: 2"), "board was: {}", board);
}
