//! Auditpack CLI - verifies proof-first audit packs against their input directory.

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;
mod path;

use commands::verify;

#[derive(Parser)]
#[command(name = "auditpack")]
#[command(about = "Proof-first audit pack verifier")]
struct Cli {
    /// Diagnostics written to stderr (RUST_LOG takes precedence when set)
    #[arg(long, value_enum, default_value = "error", global = true)]
    log_level: LogLevel,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify an audit pack against the input directory it describes
    Verify {
        /// Input directory listed by manifest.json
        #[arg(long = "in", visible_alias = "input", default_value = path::DEFAULT_INPUT_DIR)]
        input: String,
        /// Audit pack directory holding manifest.sha256, manifest.json and run_meta.json
        #[arg(long, visible_alias = "out", default_value = path::DEFAULT_PACK_DIR)]
        pack: String,
        /// Also fail on input files the manifest does not list
        #[arg(long)]
        strict: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    // stdout is reserved for --json output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    initialize_tracing(cli.log_level);

    let result = match cli.command {
        Commands::Verify {
            input,
            pack,
            strict,
            json,
        } => verify::run(input, pack, strict, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
