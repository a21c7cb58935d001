//! # Domain Types
//!
//! Core domain types shared by the weight calculator and the quote engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT                         OUTPUT                                   │
//! │  ┌─────────────────┐           ┌─────────────────┐                      │
//! │  │     Piece       │           │     Quote       │                      │
//! │  │  actual_weight  │           │  origin → dest  │                      │
//! │  │  length/width/  │  ──────►  │  chargeable kg  │                      │
//! │  │  height (cm)    │           │  line_items[]   │                      │
//! │  └─────────────────┘           │  Σ sub/tax/tot  │                      │
//! │                                └────────┬────────┘                      │
//! │  ┌─────────────────┐           ┌────────▼────────┐                      │
//! │  │    Location     │           │    LineItem     │                      │
//! │  │  "POM", "LAE"   │           │  name, rate     │                      │
//! │  └─────────────────┘           │  subtotal, tax  │                      │
//! │                                │  total          │                      │
//! │  ┌─────────────────┐           └─────────────────┘                      │
//! │  │   Percentage    │                                                    │
//! │  │  bps (u32)      │                                                    │
//! │  │  1000 = 10%     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::{Money, PerKgRate};
use crate::rules::RuleId;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10% (the GST rate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percentage(u32);

impl Percentage {
    /// Creates a percentage from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percentage(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let frac = self.0 % 100;
        if frac == 0 {
            write!(f, "{}%", whole)
        } else if frac % 10 == 0 {
            write!(f, "{}.{}%", whole, frac / 10)
        } else {
            write!(f, "{}.{:02}%", whole, frac)
        }
    }
}

// =============================================================================
// Location
// =============================================================================

/// A location code from the rate sheet vocabulary (e.g. `POM`, `LAE`).
///
/// Codes are trimmed and upper-cased on construction, so `" pom"` and `"POM"`
/// name the same place. Routes are directional: `POM → LAE` and `LAE → POM`
/// are separate entries.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct Location(String);

impl Location {
    /// Creates a normalized location code.
    pub fn new(code: impl AsRef<str>) -> Self {
        Location(code.as_ref().trim().to_uppercase())
    }

    /// Returns the normalized code.
    #[inline]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// True when the code is blank after trimming.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(code: &str) -> Self {
        Location::new(code)
    }
}

impl From<String> for Location {
    fn from(code: String) -> Self {
        Location::new(code)
    }
}

// Deserializing goes through `Location::new` so config files get the same
// normalization as programmatic callers.
impl<'de> Deserialize<'de> for Location {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Location::new(code))
    }
}

// =============================================================================
// Piece
// =============================================================================

/// One physical item in a shipment.
///
/// The quote form submits whatever is in its cells. A field that is absent,
/// `null`, blank or not a number deserializes as zero; numeric text such as
/// `"12.5"` is read as the number.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Piece {
    /// Scale weight in kilograms.
    #[serde(default, deserialize_with = "measure_or_zero")]
    pub actual_weight: f64,

    /// Length in centimeters.
    #[serde(default, deserialize_with = "measure_or_zero")]
    pub length: f64,

    /// Width in centimeters.
    #[serde(default, deserialize_with = "measure_or_zero")]
    pub width: f64,

    /// Height in centimeters.
    #[serde(default, deserialize_with = "measure_or_zero")]
    pub height: f64,
}

impl Piece {
    /// Creates a piece from weight (kg) and dimensions (cm).
    pub const fn new(actual_weight: f64, length: f64, width: f64, height: f64) -> Self {
        Piece {
            actual_weight,
            length,
            width,
            height,
        }
    }

    /// A piece with only a scale weight.
    pub const fn weighing(actual_weight: f64) -> Self {
        Piece::new(actual_weight, 0.0, 0.0, 0.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MeasureCell {
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

fn measure_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = match Option::<MeasureCell>::deserialize(deserializer)? {
        Some(MeasureCell::Number(n)) => n,
        Some(MeasureCell::Text(text)) => text.trim().parse().unwrap_or(0.0),
        Some(MeasureCell::Other(_)) | None => 0.0,
    };
    Ok(value)
}

// =============================================================================
// Chargeable Weight
// =============================================================================

/// Billable weight in whole kilograms (always rounded up).
///
/// Zero is a valid calculator output but means "no shipment details" to the
/// quote engine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct ChargeableWeight(u32);

impl ChargeableWeight {
    #[inline]
    pub const fn from_kg(kg: u32) -> Self {
        ChargeableWeight(kg)
    }

    #[inline]
    pub const fn kg(&self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ChargeableWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} kg", self.0)
    }
}

// =============================================================================
// Charge Rate
// =============================================================================

/// The unit rate shown next to a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum ChargeRate {
    /// Amount per chargeable kilogram (air freight, per-weight surcharges).
    PerKg { rate: PerKgRate },
    /// Flat amount per shipment.
    Flat { amount: Money },
    /// Share of another charge's subtotal.
    Percentage { rate: Percentage },
}

impl fmt::Display for ChargeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeRate::PerKg { rate } => write!(f, "{}/kg", rate),
            ChargeRate::Flat { amount } => write!(f, "{}", amount),
            ChargeRate::Percentage { rate } => write!(f, "{}", rate),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One priced row of a quote.
///
/// ## Invariants
/// - `tax = subtotal × GST`, rounded at this line
/// - `total = subtotal + tax`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Display name, also the sort key.
    pub name: String,

    /// Rule that produced this line; `None` for Air Freight.
    pub rule_id: Option<RuleId>,

    /// Unit rate as configured.
    pub rate: ChargeRate,

    /// Amount before tax.
    #[serde(rename = "subTotal")]
    pub subtotal: Money,

    /// GST on the subtotal.
    pub tax: Money,

    /// Subtotal plus tax.
    pub total: Money,
}

impl LineItem {
    /// Prices a line: applies GST to the subtotal and derives the total.
    ///
    /// `None` when the tax or total leaves the money range.
    pub fn priced(
        name: impl Into<String>,
        rule_id: Option<RuleId>,
        rate: ChargeRate,
        subtotal: Money,
    ) -> Option<Self> {
        let tax = subtotal.checked_percentage(crate::GST_RATE)?;
        Some(LineItem {
            name: name.into(),
            rule_id,
            rate,
            subtotal,
            tax,
            total: subtotal.checked_add(tax)?,
        })
    }
}

// =============================================================================
// Quote
// =============================================================================

/// A complete, internally consistent quotation.
///
/// The aggregates are sums of the line fields, never recomputed from the
/// aggregate subtotal, so the printed grand total always equals the sum of the
/// printed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Quote {
    pub origin: Location,
    pub destination: Location,
    pub chargeable_weight: ChargeableWeight,

    /// Sorted by name, case-insensitive ascending.
    pub line_items: Vec<LineItem>,

    #[serde(rename = "subTotal")]
    pub subtotal: Money,
    pub tax: Money,
    pub grand_total: Money,
}

impl Quote {
    /// Finds a line by its display name.
    pub fn line(&self, name: &str) -> Option<&LineItem> {
        self.line_items.iter().find(|item| item.name == name)
    }

    /// Finds the line produced by a rule.
    pub fn line_for_rule(&self, rule_id: &RuleId) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.rule_id.as_ref() == Some(rule_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
