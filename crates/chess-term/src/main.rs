//! Terminal host for the chess interaction controller.
//!
//! Reads cell labels from stdin, draws the board to stdout, and plays the
//! automated side after a delay. Logs go to stderr; set `RUST_LOG` to see
//! them (`RUST_LOG=chess_controller=debug`).

mod config;
mod scheduler;
mod session;

use anyhow::Result;
use chess_core::Color;
use chess_engine::AiLevel;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use session::{forward_lines, Session};

/// Play chess against the engine in the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file (default: chess.toml in this or a parent directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Delay before the engine replies, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Engine strength: random, greedy, minimax or minimax:N
    #[arg(long)]
    level: Option<AiLevel>,

    /// Start from this position
    #[arg(long)]
    fen: Option<String>,

    /// Side you play: white or black
    #[arg(long)]
    side: Option<Color>,

    /// Seed for the engine's move choice
    #[arg(long)]
    seed: Option<u64>,

    /// Draw the board with ANSI colors
    #[arg(long)]
    ansi: bool,
}

impl Args {
    fn apply(self, config: &mut Config) {
        if let Some(delay) = self.delay_ms {
            config.reply_delay_ms = delay;
        }
        if let Some(level) = self.level {
            config.ai = level;
        }
        if let Some(fen) = self.fen {
            config.start_fen = Some(fen);
        }
        if let Some(side) = self.side {
            config.human = side;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        config.ansi |= self.ansi;
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).await?;
    args.apply(&mut config);
    info!(?config, "starting");

    let session = Session::new(config, std::io::stdout())?;
    let events = session.sender();
    std::thread::spawn(move || {
        if let Err(e) = forward_lines(std::io::stdin().lock(), events) {
            error!(error = %e, "reading stdin failed");
        }
    });

    session.run().await?;
    Ok(())
}
