#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line entry point that replays an input script against a session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use soulkeeper_cli::{Script, Session, SessionConfig};
use soulkeeper_world::query;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

/// Headless Soulkeeper session driven by scripted input.
#[derive(Parser, Debug)]
#[command(name = "soulkeeper")]
#[command(about = "Replay a scripted input session and report the outcome")]
struct Args {
    /// Session configuration in TOML; defaults apply when omitted.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Input script in TOML made of `[[frame]]` tables.
    #[arg(long, short = 's')]
    script: PathBuf,

    /// Log navigation and gameplay decisions.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let script = Script::load(&args.script)?;
    let mut session = Session::new(config).context("failed to start session")?;

    for (dt, input) in script.replay() {
        let events = session.frame(&input, dt);
        for event in &events {
            info!(frame = session.frames(), ?event, "event");
        }
    }

    println!("frames: {}", session.frames());
    println!("score: {}", session.score());
    println!("enemies alive: {}", query::enemies(session.world()).count());
    println!("souls held: {}", query::souls(session.world()).len());
    Ok(())
}
