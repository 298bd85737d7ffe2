//! # writersphere-cli
//!
//! The `writersphere` command: account, catalog, and article management
//! from the terminal, plus a public reader.
//!
//! - [`cli`]: clap argument definitions
//! - [`config`]: the TOML configuration file
//! - [`config_handlers`]: `config path|get|set|init|export`
//! - [`commands`]: dispatch to the studio workflows
//! - [`render`]: plain-text output

#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod render;

pub use cli::Cli;
pub use config::WritersphereConfig;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,writersphere=info";

/// Log filter for `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "info,writersphere=debug";

/// Build the log filter: `--verbose` wins, then `RUST_LOG`, then the default.
pub fn log_filter(verbose: bool) -> tracing_subscriber::EnvFilter {
    if verbose {
        return tracing_subscriber::EnvFilter::new(VERBOSE_LOG_FILTER);
    }
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
}
