//! # Weight Command
//!
//! Shows how each piece contributes and the resulting chargeable weight.

use freight_core::weight::{assess, PieceWeight};
use freight_core::{chargeable_weight, ChargeableWeight, Piece};
use serde::Serialize;
use tracing::debug;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::render;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeightReport {
    pieces: Vec<PieceWeight>,
    chargeable_weight: ChargeableWeight,
}

pub fn run(pieces: &[Piece], format: OutputFormat) -> Result<String, CliError> {
    let report = WeightReport {
        pieces: pieces.iter().map(assess).collect(),
        chargeable_weight: chargeable_weight(pieces)?,
    };
    debug!(pieces = pieces.len(), kg = report.chargeable_weight.kg(), "Weight computed");

    match format {
        OutputFormat::Table => Ok(render::weight_table(
            &report.pieces,
            report.chargeable_weight,
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
    }
}
