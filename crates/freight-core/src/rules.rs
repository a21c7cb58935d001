//! # Ancillary Charge Rules
//!
//! Static configuration of the surcharges added on top of air freight.
//!
//! ## Rule Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AncillaryChargeRule                                                    │
//! │  ├── id            stable identifier ("pud-fee")                        │
//! │  ├── name          display label ("PUD Fee"), also the sort key         │
//! │  ├── basis         PerShipment { amount }                               │
//! │  │                 PerWeight   { rate_per_kg }                          │
//! │  │                 PercentageOf{ rate, depends_on: RuleId }             │
//! │  ├── minimum_charge floor applied after the raw amount                  │
//! │  └── applicability Always | PickupDelivery                              │
//! │                                                                         │
//! │  RuleSet = ordered rules + PUD-serviceable location allow-list          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dependencies are explicit ids, never name matching. A rule set is
//! validated once when it is built, so the engine can evaluate it without
//! re-checking references on every quote.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use ts_rs::TS;

use crate::error::RuleSetError;
use crate::money::{Money, PerKgRate};
use crate::types::{Location, Percentage};

// =============================================================================
// Rule Identity
// =============================================================================

/// Stable identifier of an ancillary charge rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        RuleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        RuleId::new(id)
    }
}

/// Ids used by [`RuleSet::standard`].
pub mod standard_ids {
    pub const AWB_FEE: &str = "awb-fee";
    pub const SECURITY_SURCHARGE: &str = "security-surcharge";
    pub const AIRLINE_FUEL_SURCHARGE: &str = "airline-fuel-surcharge";
    pub const PUD_FEE: &str = "pud-fee";
    pub const PUD_FUEL_SURCHARGE: &str = "pud-fuel-surcharge";
}

// =============================================================================
// Rule Definition
// =============================================================================

/// How a rule turns a shipment into an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChargeBasis {
    /// Flat fee per shipment.
    PerShipment { amount: Money },

    /// Rate × chargeable kilograms, in ten-thousandths per kg in config files.
    PerWeight { rate_per_kg: PerKgRate },

    /// Rate × the floored subtotal of another rule.
    PercentageOf { rate: Percentage, depends_on: RuleId },
}

/// When a rule applies to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    /// Every quote.
    #[default]
    Always,

    /// Only when origin or destination is PUD-serviceable.
    PickupDelivery,
}

/// One surcharge definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncillaryChargeRule {
    pub id: RuleId,
    pub name: String,
    pub basis: ChargeBasis,

    /// Floor applied after computing the raw amount.
    #[serde(default)]
    pub minimum_charge: Money,

    #[serde(default)]
    pub applicability: Applicability,
}

impl AncillaryChargeRule {
    /// A flat per-shipment fee.
    pub fn per_shipment(id: &str, name: &str, amount: Money) -> Self {
        AncillaryChargeRule {
            id: RuleId::new(id),
            name: name.to_string(),
            basis: ChargeBasis::PerShipment { amount },
            minimum_charge: Money::zero(),
            applicability: Applicability::Always,
        }
    }

    /// A per-kilogram surcharge with a minimum-charge floor.
    pub fn per_weight(
        id: &str,
        name: &str,
        rate_per_kg: PerKgRate,
        minimum_charge: Money,
    ) -> Self {
        AncillaryChargeRule {
            id: RuleId::new(id),
            name: name.to_string(),
            basis: ChargeBasis::PerWeight { rate_per_kg },
            minimum_charge,
            applicability: Applicability::Always,
        }
    }

    /// A surcharge computed as a share of another rule's subtotal.
    pub fn percentage_of(id: &str, name: &str, rate: Percentage, depends_on: &str) -> Self {
        AncillaryChargeRule {
            id: RuleId::new(id),
            name: name.to_string(),
            basis: ChargeBasis::PercentageOf {
                rate,
                depends_on: RuleId::new(depends_on),
            },
            minimum_charge: Money::zero(),
            applicability: Applicability::Always,
        }
    }

    /// Restricts the rule to PUD-serviceable routes.
    pub fn pickup_delivery_only(mut self) -> Self {
        self.applicability = Applicability::PickupDelivery;
        self
    }

    /// The rule this one is a percentage of, if any.
    pub fn depends_on(&self) -> Option<&RuleId> {
        match &self.basis {
            ChargeBasis::PercentageOf { depends_on, .. } => Some(depends_on),
            _ => None,
        }
    }

    pub fn is_dependent(&self) -> bool {
        self.depends_on().is_some()
    }
}

// =============================================================================
// Rule Set
// =============================================================================

/// Unvalidated shape of a rule set, as written in configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    #[serde(default)]
    pub pickup_delivery_locations: Vec<Location>,
    pub rules: Vec<AncillaryChargeRule>,
}

/// A validated, read-only set of ancillary charge rules.
///
/// ## Invariants
/// - rule ids are unique and names are non-blank
/// - every `depends_on` names an existing, non-percentage rule
/// - a parent has at most one dependent, with the same applicability
/// - no amount, rate or minimum is negative
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleSetConfig", into = "RuleSetConfig")]
pub struct RuleSet {
    rules: Vec<AncillaryChargeRule>,
    pickup_delivery_locations: BTreeSet<Location>,
}

impl RuleSet {
    /// Validates and builds a rule set.
    pub fn new(
        rules: Vec<AncillaryChargeRule>,
        pickup_delivery_locations: impl IntoIterator<Item = Location>,
    ) -> Result<Self, RuleSetError> {
        validate_rules(&rules)?;
        Ok(RuleSet {
            rules,
            pickup_delivery_locations: pickup_delivery_locations.into_iter().collect(),
        })
    }

    /// The charge configuration used by the freight desk.
    ///
    /// | Rule                   | Basis        | Rate  | Minimum | PUD only |
    /// |------------------------|--------------|-------|---------|----------|
    /// | AWB Fee                | per shipment | 70.00 |         |          |
    /// | Security Surcharge     | per kg       | 0.20  | 5.00    |          |
    /// | Airline Fuel Surcharge | per kg       | 0.35  |         |          |
    /// | PUD Fee                | per kg       | 0.80  | 80.00   | yes      |
    /// | PUD Fuel Surcharge     | % of PUD Fee | 10%   |         | yes      |
    ///
    /// PUD-serviceable locations: POM, LAE.
    pub fn standard() -> Self {
        use standard_ids::*;

        let rules = vec![
            AncillaryChargeRule::per_shipment(AWB_FEE, "AWB Fee", Money::from_cents(7000)),
            AncillaryChargeRule::per_weight(
                SECURITY_SURCHARGE,
                "Security Surcharge",
                PerKgRate::from_cents(20),
                Money::from_cents(500),
            ),
            AncillaryChargeRule::per_weight(
                AIRLINE_FUEL_SURCHARGE,
                "Airline Fuel Surcharge",
                PerKgRate::from_cents(35),
                Money::zero(),
            ),
            AncillaryChargeRule::per_weight(
                PUD_FEE,
                "PUD Fee",
                PerKgRate::from_cents(80),
                Money::from_cents(8000),
            )
            .pickup_delivery_only(),
            AncillaryChargeRule::percentage_of(
                PUD_FUEL_SURCHARGE,
                "PUD Fuel Surcharge",
                Percentage::from_bps(1000),
                PUD_FEE,
            )
            .pickup_delivery_only(),
        ];

        RuleSet {
            rules,
            pickup_delivery_locations: [Location::new("POM"), Location::new("LAE")]
                .into_iter()
                .collect(),
        }
    }

    /// Rules in configuration order.
    pub fn rules(&self) -> &[AncillaryChargeRule] {
        &self.rules
    }

    pub fn rule(&self, id: &RuleId) -> Option<&AncillaryChargeRule> {
        self.rules.iter().find(|r| &r.id == id)
    }

    /// The single rule configured as a percentage of `parent`, if any.
    pub fn dependent_of(&self, parent: &RuleId) -> Option<&AncillaryChargeRule> {
        self.rules.iter().find(|r| r.depends_on() == Some(parent))
    }

    /// Rules that are evaluated on their own (not percentages of another).
    pub fn base_rules(
        &self,
        applicability: Applicability,
    ) -> impl Iterator<Item = &AncillaryChargeRule> {
        self.rules
            .iter()
            .filter(move |r| !r.is_dependent() && r.applicability == applicability)
    }

    pub fn pickup_delivery_locations(&self) -> &BTreeSet<Location> {
        &self.pickup_delivery_locations
    }

    /// True when either end of the route is PUD-serviceable.
    pub fn pickup_delivery_applies(&self, origin: &Location, destination: &Location) -> bool {
        self.pickup_delivery_locations.contains(origin)
            || self.pickup_delivery_locations.contains(destination)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::standard()
    }
}

impl TryFrom<RuleSetConfig> for RuleSet {
    type Error = RuleSetError;

    fn try_from(config: RuleSetConfig) -> Result<Self, Self::Error> {
        RuleSet::new(config.rules, config.pickup_delivery_locations)
    }
}

impl From<RuleSet> for RuleSetConfig {
    fn from(set: RuleSet) -> Self {
        RuleSetConfig {
            pickup_delivery_locations: set.pickup_delivery_locations.into_iter().collect(),
            rules: set.rules,
        }
    }
}

fn validate_rules(rules: &[AncillaryChargeRule]) -> Result<(), RuleSetError> {
    let mut seen = HashSet::new();
    for rule in rules {
        if !seen.insert(&rule.id) {
            return Err(RuleSetError::DuplicateRuleId(rule.id.clone()));
        }
        if rule.name.trim().is_empty() {
            return Err(RuleSetError::MissingName(rule.id.clone()));
        }
        if rule.minimum_charge.is_negative() {
            return Err(RuleSetError::NegativeAmount {
                rule: rule.id.clone(),
                field: "minimum_charge",
            });
        }
        match &rule.basis {
            ChargeBasis::PerShipment { amount } if amount.is_negative() => {
                return Err(RuleSetError::NegativeAmount {
                    rule: rule.id.clone(),
                    field: "amount",
                });
            }
            ChargeBasis::PerWeight { rate_per_kg } if rate_per_kg.is_negative() => {
                return Err(RuleSetError::NegativeAmount {
                    rule: rule.id.clone(),
                    field: "rate_per_kg",
                });
            }
            _ => {}
        }
    }

    let mut dependents: HashMap<&RuleId, &RuleId> = HashMap::new();
    for rule in rules {
        let Some(parent_id) = rule.depends_on() else {
            continue;
        };

        let parent = rules.iter().find(|r| &r.id == parent_id).ok_or_else(|| {
            RuleSetError::UnknownDependency {
                rule: rule.id.clone(),
                depends_on: parent_id.clone(),
            }
        })?;

        if parent.is_dependent() {
            return Err(RuleSetError::ChainedDependency {
                rule: rule.id.clone(),
                depends_on: parent_id.clone(),
            });
        }

        if parent.applicability != rule.applicability {
            return Err(RuleSetError::ApplicabilityMismatch {
                rule: rule.id.clone(),
                depends_on: parent_id.clone(),
            });
        }

        if let Some(first) = dependents.insert(parent_id, &rule.id) {
            return Err(RuleSetError::MultipleDependents {
                parent: parent_id.clone(),
                first: first.clone(),
                second: rule.id.clone(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
