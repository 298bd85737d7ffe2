//! Writersphere CLI
//!
//! Command-line interface for writing and publishing with Writersphere.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;

use writersphere_cli::{Cli, commands, log_filter};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
