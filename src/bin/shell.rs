//! ttlkv Shell Binary
//!
//! Reads commands from stdin and runs them against an in-memory store.

use std::io;

use clap::{Parser, ValueEnum};
use ttlkv::config::{ClockSource, Config};
use ttlkv::shell::Shell;
use ttlkv::Instant;
use tracing_subscriber::{fmt, EnvFilter};

/// Clock choices on the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ClockArg {
    /// Wall-clock seconds
    System,
    /// Manual clock, moved with ADVANCE
    Manual,
}

/// ttlkv Shell
#[derive(Parser, Debug)]
#[command(name = "ttlkv-shell")]
#[command(about = "Interactive shell for the ttlkv in-memory TTL store")]
#[command(version)]
struct Args {
    /// Clock backing the store
    #[arg(short, long, value_enum, default_value = "system")]
    clock: ClockArg,

    /// Start time in seconds for the manual clock
    #[arg(short, long, default_value = "0")]
    start: i64,

    /// Purge expired entries after every N commands (0 = never)
    #[arg(short = 'r', long, default_value = "0")]
    reap_every: u64,

    /// Max entries reclaimed per automatic purge
    #[arg(short = 'b', long, default_value = "64")]
    reap_batch: usize,

    /// Print a prompt before each command
    #[arg(short, long)]
    prompt: bool,
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout carries replies only)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,ttlkv=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("ttlkv shell v{}", ttlkv::VERSION);

    let clock = match args.clock {
        ClockArg::System => ClockSource::System,
        ClockArg::Manual => ClockSource::Manual {
            start: Instant::from_secs(args.start),
        },
    };

    // Build config from args
    let config = match Config::builder()
        .clock(clock)
        .reap_every(args.reap_every)
        .reap_batch(args.reap_batch)
        .prompt(args.prompt)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(2);
        }
    };

    tracing::info!("Clock: {:?}", config.clock);

    let mut shell = match Shell::from_config(&config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start shell: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = shell.run(stdin.lock(), stdout.lock(), config.prompt) {
        tracing::error!("Shell error: {}", e);
        std::process::exit(1);
    }

    tracing::info!(
        commands = shell.executed(),
        entries = shell.store().len(),
        "Shell stopped"
    );
}
