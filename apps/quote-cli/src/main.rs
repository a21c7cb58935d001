//! # Freight Quote CLI Entry Point
//!
//! ## Startup Sequence
//! 1. Parse arguments
//! 2. Initialize tracing (logging)
//! 3. Run the subcommand (see `quote_cli::run`)
//! 4. Print the result, or the error with its exit status

use clap::Parser;
use std::process::ExitCode;

use quote_cli::cli::{Cli, OutputFormat};

fn main() -> ExitCode {
    let cli = Cli::parse();
    quote_cli::init_tracing(cli.verbose);
    let format = cli.format;

    match quote_cli::run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            match format {
                OutputFormat::Json => match serde_json::to_string_pretty(&err) {
                    Ok(json) => println!("{}", json),
                    Err(_) => eprintln!("{}", err),
                },
                OutputFormat::Table => eprintln!("{}", err.message),
            }
            ExitCode::from(err.exit_code())
        }
    }
}
