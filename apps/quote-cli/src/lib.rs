//! # Quote CLI Library
//!
//! Operator-facing command-line front end for `freight-core`.
//!
//! ## Module Organization
//! ```text
//! quote_cli/
//! ├── lib.rs          ◄─── You are here (logging setup & run)
//! ├── cli.rs          ◄─── clap argument definitions, piece parsing
//! ├── config.rs       ◄─── FREIGHT_* environment configuration
//! ├── sources.rs      ◄─── Rate sheet and rule-set file loading
//! ├── render.rs       ◄─── Quote table, JSON quote document
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command dispatch
//! │   ├── weight.rs   ◄─── Chargeable weight breakdown
//! │   ├── quote.rs    ◄─── Quote generation
//! │   ├── routes.rs   ◄─── Location / destination listing
//! │   └── rules.rs    ◄─── Active rule set listing
//! └── error.rs        ◄─── CLI error type and exit codes
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod sources;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::FreightConfig;
use error::CliError;

/// Runs one CLI invocation and returns what should be printed to stdout.
///
/// ## Sequence
/// 1. Load configuration from the environment
/// 2. Dispatch the subcommand
/// 3. Hand the rendered output back to `main`
pub fn run(cli: Cli) -> Result<String, CliError> {
    let config = FreightConfig::from_env();
    info!(
        rates = ?config.rates_path,
        rules = ?config.rules_path,
        currency = %config.currency_code,
        "Configuration loaded"
    );

    let output = commands::execute(cli.command, cli.format, &config)?;
    debug!(bytes = output.len(), "Command finished");
    Ok(output)
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays clean for JSON output.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=quote_cli=trace` - Show trace for this crate only
/// - Default: `info,quote_cli=debug`, or `debug` with `--verbose`
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info,quote_cli=debug" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
