//! # Rendering
//!
//! Plain-text tables for the terminal and the JSON quote document.
//!
//! ## Quote Table Layout
//! ```text
//! Quote POM → LAE   chargeable weight 50 kg
//!
//! Description              Rate          Subtotal        GST      Total
//! ──────────────────────── ──────── ──────────── ────────── ──────────
//! Air Freight              5.00/kg        250.00      25.00     275.00
//! ...
//! ──────────────────────── ──────── ──────────── ────────── ──────────
//! Total                                   435.50      43.55     479.05
//!
//! Grand total: PGK 479.05
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use freight_core::rules::{Applicability, ChargeBasis};
use freight_core::weight::PieceWeight;
use freight_core::{ChargeableWeight, Location, PerKgRate, Quote, RuleSet};

use crate::config::FreightConfig;

// =============================================================================
// Quote Document
// =============================================================================

/// A quote as handed to the PDF export: the quote plus reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDocument {
    /// Customer-facing reference, `Q-` and six digits.
    pub reference: String,
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    pub quote: Quote,
}

impl QuoteDocument {
    pub fn new(quote: Quote, currency: impl Into<String>, generated_at: DateTime<Utc>) -> Self {
        QuoteDocument {
            reference: quote_reference(Uuid::new_v4()),
            generated_at,
            currency: currency.into(),
            quote,
        }
    }
}

/// Derives a `Q-NNNNNN` reference (100000..=999999) from a random id.
pub fn quote_reference(seed: Uuid) -> String {
    format!("Q-{}", 100_000 + seed.as_u128() % 900_000)
}

// =============================================================================
// Tables
// =============================================================================

const RULE: char = '─';

fn separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|w| RULE.to_string().repeat(*w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Itemised quote with a totals row.
pub fn quote_table(quote: &Quote, config: &FreightConfig) -> String {
    let widths = [24, 10, 12, 10, 12];
    let mut out = String::new();

    out.push_str(&format!(
        "Quote {} → {}   chargeable weight {}\n\n",
        quote.origin, quote.destination, quote.chargeable_weight
    ));
    out.push_str(&format!(
        "{:<24} {:<10} {:>12} {:>10} {:>12}\n",
        "Description", "Rate", "Subtotal", "GST", "Total"
    ));
    out.push_str(&separator(&widths));
    out.push('\n');

    for line in &quote.line_items {
        out.push_str(&format!(
            "{:<24} {:<10} {:>12} {:>10} {:>12}\n",
            line.name,
            line.rate.to_string(),
            config.format_amount(line.subtotal),
            config.format_amount(line.tax),
            config.format_amount(line.total),
        ));
    }

    out.push_str(&separator(&widths));
    out.push('\n');
    out.push_str(&format!(
        "{:<24} {:<10} {:>12} {:>10} {:>12}\n\n",
        "Total",
        "",
        config.format_amount(quote.subtotal),
        config.format_amount(quote.tax),
        config.format_amount(quote.grand_total),
    ));
    out.push_str(&format!(
        "Grand total: {}",
        config.format_currency(quote.grand_total)
    ));
    out
}

/// Per-piece breakdown followed by the chargeable weight.
pub fn weight_table(pieces: &[PieceWeight], chargeable: ChargeableWeight) -> String {
    let mut out = format!(
        "{:>5} {:>10} {:>12} {:>8}\n{}\n",
        "Piece",
        "Actual kg",
        "Volumetric",
        "Counted",
        separator(&[5, 10, 12, 8])
    );
    for (i, piece) in pieces.iter().enumerate() {
        out.push_str(&format!(
            "{:>5} {:>10.2} {:>12.2} {:>8}\n",
            i + 1,
            piece.actual,
            piece.volumetric,
            if piece.counted { "yes" } else { "no" }
        ));
    }
    out.push_str(&format!("\nChargeable weight: {}", chargeable));
    out
}

/// Location codes, one per line.
pub fn location_list<'a>(locations: impl IntoIterator<Item = &'a Location>) -> String {
    locations
        .into_iter()
        .map(Location::code)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Quotable destinations from an origin with their per-kg rate.
pub fn destination_table(
    origin: &Location,
    destinations: &[(&Location, PerKgRate)],
    config: &FreightConfig,
) -> String {
    let mut out = format!("Destinations from {}\n", origin);
    for (destination, rate) in destinations {
        out.push_str(&format!(
            "  {:<6} {}\n",
            destination.code(),
            config.format_rate(*rate)
        ));
    }
    out.trim_end().to_string()
}

/// Human-readable description of a rule set.
pub fn rule_table(rules: &RuleSet) -> String {
    let mut out = format!(
        "{:<24} {:<26} {:>9} {:<8}\n{}\n",
        "Rule",
        "Basis",
        "Minimum",
        "Applies",
        separator(&[24, 26, 9, 8])
    );

    for rule in rules.rules() {
        let basis = match &rule.basis {
            ChargeBasis::PerShipment { amount } => format!("{} per shipment", amount),
            ChargeBasis::PerWeight { rate_per_kg } => format!("{} per kg", rate_per_kg),
            ChargeBasis::PercentageOf { rate, depends_on } => {
                let parent = rules
                    .rule(depends_on)
                    .map(|r| r.name.as_str())
                    .unwrap_or(depends_on.as_str());
                format!("{} of {}", rate, parent)
            }
        };
        let minimum = if rule.minimum_charge.is_zero() {
            String::new()
        } else {
            rule.minimum_charge.to_string()
        };
        let applies = match rule.applicability {
            Applicability::Always => "always",
            Applicability::PickupDelivery => "PUD",
        };
        out.push_str(&format!(
            "{:<24} {:<26} {:>9} {:<8}\n",
            rule.name, basis, minimum, applies
        ));
    }

    let locations = location_list(rules.pickup_delivery_locations());
    out.push_str(&format!(
        "\nPUD locations: {}",
        if locations.is_empty() {
            "none".to_string()
        } else {
            locations.replace('\n', ", ")
        }
    ));
    out
}
