#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Lane Defence as a line-oriented game.

mod board_text;
mod input;
mod session;

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::LevelId;
use lane_defence_system_spawning::{Config, SeededSpawner, DEFAULT_SPAWN_SEED};
use lane_defence_world::{level::Level, persistence, World};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::session::Session;

#[derive(Parser, Debug)]
#[command(
    name = "lane-defence",
    version,
    about = "Turn-based lane defence on a six by nine grid"
)]
struct Cli {
    /// Seed for the attacker spawn draws.
    #[arg(long, default_value_t = DEFAULT_SPAWN_SEED)]
    seed: u64,
    /// Campaign level to start on.
    #[arg(long, default_value_t = 1)]
    level: u32,
    /// Save file to resume instead of starting a fresh level.
    #[arg(long, conflicts_with = "level")]
    load: Option<PathBuf>,
    /// File of requests to run instead of reading standard input.
    #[arg(long)]
    script: Option<PathBuf>,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let spawner = Box::new(SeededSpawner::new(Config::new(cli.seed)));
    let world = match &cli.load {
        Some(path) => persistence::load(path, spawner)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => {
            let level = Level::campaign(LevelId::new(cli.level))
                .with_context(|| format!("campaign level {} does not exist", cli.level))?;
            World::with_spawn_source(level, spawner)
        }
    };
    info!(seed = cli.seed, "session started");

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let mut session = Session::new(world, cli.seed);
    session.run(input, &mut io::stdout().lock())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
