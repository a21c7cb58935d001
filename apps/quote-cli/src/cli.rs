//! CLI definition using clap

use clap::{Parser, Subcommand, ValueEnum};
use freight_core::Piece;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "freight-quote")]
#[command(version)]
#[command(about = "Air freight quotes: chargeable weight, surcharges and GST")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (table, json)
    #[arg(long, short = 'f', global = true, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Verbose logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the chargeable weight of a shipment
    Weight {
        /// Piece as WEIGHT[:LxWxH] in kg and cm (repeatable)
        #[arg(long = "piece", short = 'p', value_parser = parse_piece)]
        pieces: Vec<Piece>,
    },

    /// Price a shipment on a route
    Quote {
        /// Origin location code (e.g. POM)
        #[arg(long, short = 'o')]
        origin: String,

        /// Destination location code (e.g. LAE)
        #[arg(long, short = 'd')]
        destination: String,

        /// Piece as WEIGHT[:LxWxH] in kg and cm (repeatable)
        #[arg(long = "piece", short = 'p', value_parser = parse_piece)]
        pieces: Vec<Piece>,

        /// Rate sheet JSON export. Uses FREIGHT_RATES_PATH if not specified.
        #[arg(long)]
        rates: Option<PathBuf>,

        /// Rule set TOML file. Uses FREIGHT_RULES_PATH or the standard rules if not specified.
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// List known locations, or quotable destinations from an origin
    Routes {
        /// Only show destinations reachable from this origin
        #[arg(long, short = 'o')]
        origin: Option<String>,

        /// Rate sheet JSON export. Uses FREIGHT_RATES_PATH if not specified.
        #[arg(long)]
        rates: Option<PathBuf>,
    },

    /// Show the active ancillary charge rules
    Rules {
        /// Rule set TOML file. Uses FREIGHT_RULES_PATH or the standard rules if not specified.
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

/// Parses `WEIGHT` or `WEIGHT:LxWxH`.
///
/// `0:120x80x60` describes a piece known only by its dimensions.
pub fn parse_piece(input: &str) -> Result<Piece, String> {
    let (weight, dims) = match input.split_once(':') {
        Some((weight, dims)) => (weight, Some(dims)),
        None => (input, None),
    };

    let actual_weight = parse_measure(weight, "weight")?;

    let Some(dims) = dims else {
        return Ok(Piece::weighing(actual_weight));
    };

    let parts: Vec<&str> = dims.split(['x', 'X']).collect();
    let [length, width, height] = parts.as_slice() else {
        return Err(format!("dimensions must be LxWxH, got '{}'", dims));
    };

    Ok(Piece::new(
        actual_weight,
        parse_measure(length, "length")?,
        parse_measure(width, "width")?,
        parse_measure(height, "height")?,
    ))
}

fn parse_measure(value: &str, field: &str) -> Result<f64, String> {
    let value = value.trim();
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("{} '{}' is not a number", field, value))?;
    if !parsed.is_finite() || parsed < 0.0 {
        return Err(format!("{} must be zero or more, got '{}'", field, value));
    }
    Ok(parsed)
}
