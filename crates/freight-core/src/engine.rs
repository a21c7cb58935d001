//! # Quote Engine
//!
//! Turns a chargeable weight, a route and a rule set into an itemised,
//! GST-inclusive quote.
//!
//! ## Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote(pieces, origin, destination, rates)                              │
//! │       │                                                                 │
//! │       ├── weight > u32::MAX kg ?   → WeightOutOfRange                   │
//! │       ├── weight == 0 ?            → NoShipmentDetails                  │
//! │       ├── origin == destination ?  → IdenticalOriginDestination         │
//! │       ├── no positive route rate ? → RouteUnavailable                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Air Freight = kg × route rate                  (always)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Phase 1: Always rules                                                  │
//! │     PerShipment → amount, PerWeight → kg × rate, floored at minimum     │
//! │     emitted only when > 0; dependents follow their parent               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Phase 2: PickupDelivery rules (origin or destination PUD-serviceable)  │
//! │     parent floored at minimum, dependent = % of the FLOORED parent      │
//! │     both always emitted                                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  GST per line → sort by name (case-insensitive) → Σ lines               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All money arithmetic is checked; a product or sum outside the i64 range
//! rejects the quote with `AmountOutOfRange`.
//!
//! The engine borrows its rule set and rate table and never mutates them, so
//! one snapshot can serve any number of concurrent quotes.

use serde::{Deserialize, Serialize};

use crate::error::QuoteRejection;
use crate::money::Money;
use crate::rates::RateTable;
use crate::rules::{AncillaryChargeRule, Applicability, ChargeBasis, RuleId, RuleSet};
use crate::types::{ChargeRate, ChargeableWeight, LineItem, Location, Piece, Quote};
use crate::weight::chargeable_weight;

/// Display name of the base freight line.
pub const AIR_FREIGHT: &str = "Air Freight";

/// A quote request as the quote form submits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub origin: Location,
    pub destination: Location,
    #[serde(default)]
    pub pieces: Vec<Piece>,
}

/// Prices quotes against a fixed rule set.
#[derive(Debug, Clone, Copy)]
pub struct QuoteEngine<'a> {
    rules: &'a RuleSet,
}

impl<'a> QuoteEngine<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        QuoteEngine { rules }
    }

    pub fn rules(&self) -> &'a RuleSet {
        self.rules
    }

    /// Computes the chargeable weight of `pieces` and prices the shipment.
    pub fn quote(
        &self,
        pieces: &[Piece],
        origin: &Location,
        destination: &Location,
        rates: &RateTable,
    ) -> Result<Quote, QuoteRejection> {
        self.quote_for_weight(chargeable_weight(pieces)?, origin, destination, rates)
    }

    /// Prices a submitted quote form.
    pub fn quote_request(
        &self,
        request: &QuoteRequest,
        rates: &RateTable,
    ) -> Result<Quote, QuoteRejection> {
        self.quote(&request.pieces, &request.origin, &request.destination, rates)
    }

    /// Prices a shipment whose chargeable weight is already known.
    pub fn quote_for_weight(
        &self,
        weight: ChargeableWeight,
        origin: &Location,
        destination: &Location,
        rates: &RateTable,
    ) -> Result<Quote, QuoteRejection> {
        if weight.is_zero() {
            return Err(QuoteRejection::NoShipmentDetails);
        }
        if origin == destination {
            return Err(QuoteRejection::IdenticalOriginDestination {
                location: origin.clone(),
            });
        }
        let route_rate =
            rates
                .rate_for(origin, destination)
                .ok_or_else(|| QuoteRejection::RouteUnavailable {
                    origin: origin.clone(),
                    destination: destination.clone(),
                })?;

        let freight = route_rate
            .times_weight(weight.kg())
            .ok_or(QuoteRejection::AmountOutOfRange)?;
        let mut lines = vec![priced(
            AIR_FREIGHT,
            None,
            ChargeRate::PerKg { rate: route_rate },
            freight,
        )?];

        self.price_unconditional(weight, &mut lines)?;

        if self.rules.pickup_delivery_applies(origin, destination) {
            self.price_pickup_delivery(weight, &mut lines)?;
        }

        assemble(origin.clone(), destination.clone(), weight, lines)
    }

    /// Phase 1: zero-value rows are left out to keep the quote readable.
    fn price_unconditional(
        &self,
        weight: ChargeableWeight,
        lines: &mut Vec<LineItem>,
    ) -> Result<(), QuoteRejection> {
        for rule in self.rules.base_rules(Applicability::Always) {
            let subtotal = base_subtotal(rule, weight)?;
            if !subtotal.is_positive() {
                continue;
            }
            lines.push(rule_line(rule, subtotal)?);

            if let Some(dependent) = self.rules.dependent_of(&rule.id) {
                let dependent_subtotal = percentage_subtotal(dependent, subtotal)?;
                if dependent_subtotal.is_positive() {
                    lines.push(rule_line(dependent, dependent_subtotal)?);
                }
            }
        }
        Ok(())
    }

    /// Phase 2: PUD rows are always shown once the route qualifies.
    fn price_pickup_delivery(
        &self,
        weight: ChargeableWeight,
        lines: &mut Vec<LineItem>,
    ) -> Result<(), QuoteRejection> {
        for rule in self.rules.base_rules(Applicability::PickupDelivery) {
            let subtotal = base_subtotal(rule, weight)?;
            lines.push(rule_line(rule, subtotal)?);

            if let Some(dependent) = self.rules.dependent_of(&rule.id) {
                let dependent_subtotal = percentage_subtotal(dependent, subtotal)?;
                lines.push(rule_line(dependent, dependent_subtotal)?);
            }
        }
        Ok(())
    }
}

/// Prices a shipment against an explicit rule set.
///
/// ## Example
/// ```rust
/// use freight_core::{generate_quote, Location, PerKgRate, Piece, RateTable, RuleSet};
///
/// let rates = RateTable::new().with_route("POM", "LAE", PerKgRate::from_cents(500));
/// let quote = generate_quote(
///     &[Piece::weighing(50.0)],
///     &Location::new("POM"),
///     &Location::new("LAE"),
///     &rates,
///     &RuleSet::standard(),
/// )
/// .unwrap();
///
/// assert_eq!(quote.subtotal.cents(), 43550);
/// assert_eq!(quote.tax.cents(), 4355);
/// assert_eq!(quote.grand_total.cents(), 47905);
/// ```
pub fn generate_quote(
    pieces: &[Piece],
    origin: &Location,
    destination: &Location,
    rates: &RateTable,
    rules: &RuleSet,
) -> Result<Quote, QuoteRejection> {
    QuoteEngine::new(rules).quote(pieces, origin, destination, rates)
}

fn base_subtotal(
    rule: &AncillaryChargeRule,
    weight: ChargeableWeight,
) -> Result<Money, QuoteRejection> {
    let raw = match &rule.basis {
        ChargeBasis::PerShipment { amount } => Some(*amount),
        ChargeBasis::PerWeight { rate_per_kg } => rate_per_kg.times_weight(weight.kg()),
        // Dependents are priced from their parent, never directly
        ChargeBasis::PercentageOf { .. } => Some(Money::zero()),
    };
    raw.map(|amount| amount.at_least(rule.minimum_charge))
        .ok_or(QuoteRejection::AmountOutOfRange)
}

fn percentage_subtotal(
    rule: &AncillaryChargeRule,
    parent_subtotal: Money,
) -> Result<Money, QuoteRejection> {
    let raw = match &rule.basis {
        ChargeBasis::PercentageOf { rate, .. } => parent_subtotal.checked_percentage(*rate),
        _ => Some(Money::zero()),
    };
    raw.map(|amount| amount.at_least(rule.minimum_charge))
        .ok_or(QuoteRejection::AmountOutOfRange)
}

fn rule_line(rule: &AncillaryChargeRule, subtotal: Money) -> Result<LineItem, QuoteRejection> {
    let rate = match &rule.basis {
        ChargeBasis::PerShipment { amount } => ChargeRate::Flat { amount: *amount },
        ChargeBasis::PerWeight { rate_per_kg } => ChargeRate::PerKg { rate: *rate_per_kg },
        ChargeBasis::PercentageOf { rate, .. } => ChargeRate::Percentage { rate: *rate },
    };
    priced(rule.name.clone(), Some(rule.id.clone()), rate, subtotal)
}

fn priced(
    name: impl Into<String>,
    rule_id: Option<RuleId>,
    rate: ChargeRate,
    subtotal: Money,
) -> Result<LineItem, QuoteRejection> {
    LineItem::priced(name, rule_id, rate, subtotal).ok_or(QuoteRejection::AmountOutOfRange)
}

fn checked_sum(mut amounts: impl Iterator<Item = Money>) -> Result<Money, QuoteRejection> {
    amounts
        .try_fold(Money::zero(), Money::checked_add)
        .ok_or(QuoteRejection::AmountOutOfRange)
}

fn assemble(
    origin: Location,
    destination: Location,
    chargeable_weight: ChargeableWeight,
    mut line_items: Vec<LineItem>,
) -> Result<Quote, QuoteRejection> {
    line_items.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });

    Ok(Quote {
        origin,
        destination,
        chargeable_weight,
        subtotal: checked_sum(line_items.iter().map(|l| l.subtotal))?,
        tax: checked_sum(line_items.iter().map(|l| l.tax))?,
        grand_total: checked_sum(line_items.iter().map(|l| l.total))?,
        line_items,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
