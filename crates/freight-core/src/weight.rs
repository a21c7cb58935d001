//! # Chargeable Weight
//!
//! Converts the pieces of a shipment into one billable weight.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each piece:                                                        │
//! │    volumetric = L × W × H / 6000          (cm³ → kg, air freight)       │
//! │    counted    = actual > 0  OR  length > 0                              │
//! │    counted ? max(actual, volumetric) : 0                                │
//! │                                                                         │
//! │  chargeable = ceil(Σ contributions)       (never bill a fraction down)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A piece with zero weight and zero length is ignored even when width and
//! height are filled in: the gate is weight-or-length, not volume.
//!
//! Negative, NaN and infinite inputs are treated as zero. A total above
//! `u32::MAX` kilograms is refused rather than clamped.

use serde::{Deserialize, Serialize};

use crate::error::QuoteRejection;
use crate::types::{ChargeableWeight, Piece};
use crate::VOLUMETRIC_DIVISOR;

/// Per-piece view of the calculation, for display next to the piece rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceWeight {
    pub actual: f64,
    pub volumetric: f64,
    pub counted: bool,
    pub contribution: f64,
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Dimensional weight of a piece in kilograms.
pub fn volumetric_weight(piece: &Piece) -> f64 {
    sanitize(piece.length) * sanitize(piece.width) * sanitize(piece.height) / VOLUMETRIC_DIVISOR
}

/// Evaluates one piece.
pub fn assess(piece: &Piece) -> PieceWeight {
    let actual = sanitize(piece.actual_weight);
    let volumetric = volumetric_weight(piece);
    let counted = actual > 0.0 || sanitize(piece.length) > 0.0;

    PieceWeight {
        actual,
        volumetric,
        counted,
        contribution: if counted { actual.max(volumetric) } else { 0.0 },
    }
}

/// Sum of counted contributions before rounding.
pub fn raw_weight(pieces: &[Piece]) -> f64 {
    pieces.iter().map(|p| assess(p).contribution).sum()
}

/// Chargeable weight of a shipment, rounded up to the whole kilogram.
///
/// ## Example
/// ```rust
/// use freight_core::types::Piece;
/// use freight_core::weight::chargeable_weight;
///
/// let pieces = [
///     Piece::weighing(50.0),
///     Piece::new(2.0, 60.0, 40.0, 30.0), // 12 kg volumetric beats 2 kg actual
/// ];
/// assert_eq!(chargeable_weight(&pieces).unwrap().kg(), 62);
/// assert!(chargeable_weight(&[]).unwrap().is_zero());
/// ```
pub fn chargeable_weight(pieces: &[Piece]) -> Result<ChargeableWeight, QuoteRejection> {
    let kg = raw_weight(pieces).ceil();
    if !kg.is_finite() || kg > u32::MAX as f64 {
        return Err(QuoteRejection::WeightOutOfRange);
    }
    Ok(ChargeableWeight::from_kg(kg as u32))
}

// =============================================================================
// Unit Tests
// =============================================================================
