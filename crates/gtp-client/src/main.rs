//! gtp-analyze - ask a GTP engine for its view of one position.
//!
//! Replays the given moves on a fresh engine, runs one analysis for the side
//! to move, and prints the report as JSON on stdout.

use anyhow::Context;
use clap::Parser;
use gtp::Color;
use gtp_client::{EngineConfig, GtpClient};
use std::path::PathBuf;
use tracing::Level;

/// Analyse a Go position with an external GTP engine.
#[derive(Parser)]
#[command(name = "gtp-analyze")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML engine configuration
    #[arg(long, default_value = "engine.toml")]
    config: PathBuf,

    /// Engine executable (overrides the configuration)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Moves played so far, e.g. `b:dp,w:pd,b:` (empty position = pass)
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,

    /// White moves first (handicap game)
    #[arg(long)]
    handicap: bool,

    /// Seconds of search (overrides the configuration)
    #[arg(long)]
    seconds: Option<u32>,

    /// More output; repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_level(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn parse_move(spec: &str) -> anyhow::Result<(Color, &str)> {
    let (color, position) = spec
        .split_once(':')
        .with_context(|| format!("move '{}' is not color:position", spec))?;
    let color = color.parse::<Color>().map_err(anyhow::Error::msg)?;
    Ok((color, position))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = EngineConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(engine) = args.engine {
        config.executable = engine;
    }
    if let Some(seconds) = args.seconds {
        config.search_seconds = seconds;
    }
    config.handicap |= args.handicap;
    config.verbosity = config.verbosity.max(args.verbose);

    tracing_subscriber::fmt()
        .with_max_level(log_level(config.verbosity))
        .with_writer(std::io::stderr)
        .init();

    let mut client = GtpClient::new(config);
    for spec in &args.moves {
        let (color, position) = parse_move(spec)?;
        client.add_move(color, position)?;
    }

    client.start()?;
    client.replay()?;
    let report = client.analyze()?;
    client.stop();

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
