//! timestamp-sidecar - File Timestamp Backup and Restore
//!
//! Entry point for the CLI application.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::process::ExitCode;
use timestamp_sidecar::config::{CliArgs, RunConfig};
use timestamp_sidecar::progress::{print_header, print_summary};
use timestamp_sidecar::walker::RunCoordinator;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every file was handled without error
fn run(args: CliArgs) -> Result<bool> {
    // Validate and create config
    let config = RunConfig::from_args(args).context("Invalid configuration")?;

    // Setup logging
    setup_logging(config.verbose);

    print_header(&config, Utc::now());

    let result = RunCoordinator::new(config).run().context("Run failed")?;

    print_summary(&result);

    if result.errored > 0 {
        info!(errors = result.errored, "Run completed with errors");
    }

    Ok(result.is_success())
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("timestamp_sidecar=debug,warn")
    } else {
        EnvFilter::new("timestamp_sidecar=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
