//! Path perceptron trace replay CLI.
//!
//! This binary drives the predictor core from the command line. It performs:
//! 1. **Replay:** Feeds a text branch trace through the speculative replay driver and prints statistics.
//! 2. **Config:** Prints the effective configuration (defaults, file, and flag overrides) as JSON.

use std::fmt::Display;
use std::{fs, process};

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pathperc_core::config::Config;
use pathperc_core::sim::Replay;
use pathperc_core::trace;

#[derive(Parser, Debug)]
#[command(
    name = "pathperc",
    author,
    version,
    about = "Path-based perceptron branch predictor",
    long_about = "Replay branch traces through a path-based perceptron predictor.\n\nTrace lines are `<pc> <T|N|J> [thread]`; `#` starts a comment.\n\nExamples:\n  pathperc run -t traces/loop.trace\n  pathperc run -t mt.trace --config bp.json --threads 2 --window 16\n  pathperc config --config bp.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a branch trace and print prediction statistics.
    Run {
        /// Branch trace to replay.
        #[arg(short, long)]
        trace: String,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the effective configuration as JSON.
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Configuration sources shared by every subcommand.
#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON configuration file; missing fields take defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Override the replay window (unresolved branches per thread).
    #[arg(long)]
    window: Option<usize>,

    /// Override the number of hardware threads.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { trace, config } => cmd_run(&trace, &load_config(&config)),
        Commands::Config { config } => cmd_config(&load_config(&config)),
    }
}

/// Prints `msg` to stderr and exits with status 1.
fn fail(msg: impl Display) -> ! {
    eprintln!("[!] {msg}");
    process::exit(1);
}

/// Builds the configuration from defaults, the optional JSON file, and flag overrides.
///
/// Exits the process if the file cannot be read or the result is invalid.
fn load_config(args: &ConfigArgs) -> Config {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("could not read config '{path}': {e}")));
            Config::from_json(&json).unwrap_or_else(|e| fail(format!("{path}: {e}")))
        }
        None => Config::default(),
    };

    if let Some(window) = args.window {
        config.replay.window = window;
    }
    if let Some(threads) = args.threads {
        config.predictor.num_threads = threads;
    }
    if let Err(e) = config.validate() {
        fail(e);
    }
    config
}

/// Replays the trace at `path` and prints the statistics report.
fn cmd_run(path: &str, config: &Config) {
    let records = trace::load(path).unwrap_or_else(|e| fail(e));

    let threads = config.predictor.num_threads;
    if let Some(max) = records.iter().map(|r| r.thread).max().filter(|&t| t >= threads) {
        fail(format!(
            "trace uses thread {max} but only {threads} thread(s) are configured (see --threads)"
        ));
    }

    let mut replay = Replay::from_config(config).unwrap_or_else(|e| fail(e));
    info!(branches = records.len(), window = config.replay.window, "replaying {path}");
    replay.run(records);

    let (_, stats) = replay.into_parts();
    stats.print();
}

/// Prints the configuration as pretty JSON.
fn cmd_config(config: &Config) {
    match serde_json::to_string_pretty(config) {
        Ok(json) => println!("{json}"),
        Err(e) => fail(e),
    }
}
