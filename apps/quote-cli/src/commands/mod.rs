//! # Commands Module
//!
//! One function per subcommand. Each returns the text to print, so the
//! commands are testable without capturing stdout.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (dispatch, shared helpers)
//! ├── weight.rs   ◄─── Chargeable weight breakdown
//! ├── quote.rs    ◄─── Quote generation
//! ├── routes.rs   ◄─── Location / destination listing
//! └── rules.rs    ◄─── Active rule set listing
//! ```

pub mod quote;
pub mod routes;
pub mod rules;
pub mod weight;

use std::path::{Path, PathBuf};

use crate::cli::{Commands, OutputFormat};
use crate::config::{FreightConfig, RATES_PATH_VAR};
use crate::error::CliError;

/// Runs a parsed subcommand.
pub fn execute(
    command: Commands,
    format: OutputFormat,
    config: &FreightConfig,
) -> Result<String, CliError> {
    match command {
        Commands::Weight { pieces } => weight::run(&pieces, format),
        Commands::Quote {
            origin,
            destination,
            pieces,
            rates,
            rules,
        } => quote::run(
            &quote::QuoteArgs {
                origin,
                destination,
                pieces,
                rates,
                rules,
            },
            format,
            config,
        ),
        Commands::Routes { origin, rates } => {
            routes::run(origin.as_deref(), rates.as_deref(), format, config)
        }
        Commands::Rules { rules } => rules::run(rules.as_deref(), format, config),
    }
}

/// The rate sheet path: `--rates` first, then `FREIGHT_RATES_PATH`.
pub(crate) fn rates_path(flag: Option<&Path>, config: &FreightConfig) -> Result<PathBuf, CliError> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.rates_path.clone())
        .ok_or_else(|| {
            CliError::config(format!(
                "No rate sheet configured: pass --rates or set {}",
                RATES_PATH_VAR
            ))
        })
}

/// The rule set path: `--rules` first, then `FREIGHT_RULES_PATH`.
pub(crate) fn rules_path<'a>(
    flag: Option<&'a Path>,
    config: &'a FreightConfig,
) -> Option<&'a Path> {
    flag.or(config.rules_path.as_deref())
}
