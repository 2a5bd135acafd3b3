//! Scripted stand-in for a GTP engine, used by the integration tests.
//!
//! It acknowledges every known command and answers `genmove` with canned
//! search output in the same shapes a real engine prints. `--mode` selects
//! how it behaves when asked for a move.

use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Search, play Q16 and print a full summary.
    Normal,
    /// Play D4 straight from the opening book.
    Book,
    /// Acknowledge setup but never answer `genmove`.
    Silent,
    /// Never answer anything.
    Mute,
}

#[derive(Parser)]
#[command(name = "fake-engine")]
struct Args {
    /// Accepted for compatibility; always on.
    #[arg(long)]
    gtp: bool,

    /// Accepted for compatibility; never ponders.
    #[arg(long)]
    noponder: bool,

    #[arg(long, value_enum, default_value_t = Mode::Normal)]
    mode: Mode,
}

const KNOWN: &[&str] = &[
    "boardsize",
    "komi",
    "time_settings",
    "time_left",
    "play",
    "clear_board",
];

fn ack(out: &mut impl Write) {
    let _ = write!(out, "= \n\n");
    let _ = out.flush();
}

fn pause() {
    thread::sleep(Duration::from_millis(20));
}

fn search(err: &mut impl Write, out: &mut impl Write) {
    let _ = writeln!(err, "Thinking at most 1.0 seconds...");
    let _ = writeln!(err, "Nodes: 120, Win: 48.00% (MC:47.00%/VN:49.00%), PV: Q16 D4");
    pause();
    let _ = writeln!(err, "Nodes: 240, Win: 47.50% (MC:46.00%/VN:49.00%), PV: Q16 D4 R4");
    let _ = err.flush();
    pause();

    let _ = write!(out, "= Q16\n\n");
    let _ = out.flush();

    for line in [
        "================",
        "MC winrate=0.4700, NN eval=0.4900, score=W+1.5",
        "Q16 ->     200 (W: 47.50%) (U: 46.00%) (V: 49.00%:    180) (N: 35.0%) PV: Q16 D4 R4",
        " R4 ->      40 (W: 45.00%) (U: 44.00%) (V: 46.00%:     35) (N: 12.0%) PV: R4 Q16",
        " C3 ->       0 (W:  0.00%) (U:  0.00%) (V:  0.00%:      0) (N:  0.5%) PV: C3",
        "240 visits, score 47.50% (from 48.00%) PV: Q16 D4 R4",
        "240 visits, 260 nodes, 250 playouts, 800 p/s",
    ] {
        let _ = writeln!(err, "{}", line);
    }
    let _ = err.flush();
}

fn main() {
    let args = Args::parse();
    let stdin = io::stdin();
    let mut out = io::stdout();
    let mut err = io::stderr();
    let mut moves_played = 0usize;

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            continue;
        };
        if args.mode == Mode::Mute {
            continue;
        }

        match command {
            "exit" | "quit" => {
                ack(&mut out);
                break;
            }
            "play" => {
                moves_played += 1;
                ack(&mut out);
            }
            "clear_board" => {
                moves_played = 0;
                ack(&mut out);
            }
            "showboard" => {
                let _ = writeln!(err, "Moves played: {}", moves_played);
                let _ = err.flush();
                pause();
                ack(&mut out);
            }
            "genmove" => match args.mode {
                Mode::Normal => {
                    moves_played += 1;
                    search(&mut err, &mut out);
                }
                Mode::Book => {
                    moves_played += 1;
                    let _ = writeln!(err, "1 book moves, 42 total positions");
                    let _ = err.flush();
                    pause();
                    let _ = write!(out, "= D4\n\n");
                    let _ = out.flush();
                }
                Mode::Silent | Mode::Mute => {}
            },
            c if KNOWN.contains(&c) => ack(&mut out),
            _ => {
                let _ = write!(out, "? unknown command\n\n");
                let _ = out.flush();
            }
        }
    }
}
