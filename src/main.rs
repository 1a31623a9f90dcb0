//! noteseek - a command-line client for a notes/file service
//!
//! noteseek provides:
//! - Ranked, folder-aware search over the remote listing
//! - Downloads with endpoint fallback (folders as zip)
//! - File and folder uploads with a name-availability check
//! - Sign-in, quick notes and a debounced live search
//! - Unified output format (jsonl/json/md/raw)

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod client;
mod config;
mod core;
mod flows;
mod resolver;
mod search;

/// Log to stderr. RUST_LOG wins over the -v/-q flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("noteseek={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(cli::exit_code(&err))
        }
    }
}
