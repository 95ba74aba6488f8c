use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;

use crate::cli::{Cli, Commands};
use rxnfinder_core::RxnFinderError;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise RXNFINDER_LOG, raised by -v / -vv
    let log_level = match cli.verbose {
        0 => std::env::var("RXNFINDER_LOG").unwrap_or_else(|_| "warn".to_string()),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };

    match cli.command {
        Commands::Find(args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(num_threads)
                .enable_all()
                .build()?;
            runtime.block_on(crate::cli::commands::find::run(args, cli.threads))
        }
        Commands::Reduce(args) => crate::cli::commands::reduce::run(args),
        Commands::Config(args) => crate::cli::commands::config::run(args),
    }
}

/// Process exit code for a failed run
fn exit_code(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<RxnFinderError>() {
        Some(RxnFinderError::Configuration(_)) => 2,
        Some(RxnFinderError::Io(_)) => 3,
        Some(RxnFinderError::InvalidBatchInput(_)) => 4,
        Some(
            RxnFinderError::FatalRetrieval { .. }
            | RxnFinderError::TransientUpstream { .. }
            | RxnFinderError::RequestRejected { .. }
            | RxnFinderError::Network(_),
        ) => 5,
        Some(
            RxnFinderError::Alignment(_)
            | RxnFinderError::AlignmentTimeout { .. }
            | RxnFinderError::MalformedAlignmentRecord { .. },
        ) => 6,
        Some(RxnFinderError::Cancelled) => 130,
        Some(_) => 1,
        None if e.downcast_ref::<std::io::Error>().is_some() => 3,
        None => 1,
    }
}
