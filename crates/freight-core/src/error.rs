//! # Error Types
//!
//! Domain-specific error types for freight-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  freight-core errors (this file)                                        │
//! │  ├── QuoteRejection   - Expected outcomes of bad/incomplete requests    │
//! │  ├── RuleSetError     - Broken ancillary charge configuration           │
//! │  ├── ValidationError  - Field-level input problems (rate parsing)       │
//! │  └── CoreError        - Umbrella for all of the above                   │
//! │                                                                         │
//! │  quote-cli errors (app)                                                 │
//! │  └── CliError         - What the operator sees (code + message)         │
//! │                                                                         │
//! │  Flow: QuoteRejection / RuleSetError → CoreError → CliError → stderr    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (route, rule id, field)
//! 3. Errors are enum variants, never String
//! 4. A rejection is a normal return value; the engine stays usable afterwards

use thiserror::Error;

use crate::rules::RuleId;
use crate::types::Location;

// =============================================================================
// Quote Rejection
// =============================================================================

/// Why a quote request was refused.
///
/// These are validation outcomes, not faults. No partial quote exists when
/// one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuoteRejection {
    /// Chargeable weight came out as zero.
    ///
    /// ## When This Occurs
    /// - No pieces were entered
    /// - Every piece had zero weight and zero length
    #[error("Please enter shipment details.")]
    NoShipmentDetails,

    /// Origin and destination are the same location.
    #[error("Origin and destination must be different ({location}).")]
    IdenticalOriginDestination { location: Location },

    /// No positive per-kg rate exists for the directional route.
    #[error("Sorry, a rate for {origin} to {destination} is not available.")]
    RouteUnavailable {
        origin: Location,
        destination: Location,
    },

    /// The pieces add up to more kilograms than a quote can carry.
    #[error("Shipment weight exceeds the quotable maximum.")]
    WeightOutOfRange,

    /// A line or total does not fit in the money range.
    #[error("Quote amount exceeds the supported range.")]
    AmountOutOfRange,
}

impl QuoteRejection {
    /// Stable machine-readable code for callers that branch on the reason.
    pub const fn code(&self) -> &'static str {
        match self {
            QuoteRejection::NoShipmentDetails => "NO_SHIPMENT_DETAILS",
            QuoteRejection::IdenticalOriginDestination { .. } => "IDENTICAL_ORIGIN_DESTINATION",
            QuoteRejection::RouteUnavailable { .. } => "ROUTE_UNAVAILABLE",
            QuoteRejection::WeightOutOfRange => "WEIGHT_OUT_OF_RANGE",
            QuoteRejection::AmountOutOfRange => "AMOUNT_OUT_OF_RANGE",
        }
    }
}

// =============================================================================
// Rule Set Error
// =============================================================================

/// Ancillary charge configuration that cannot be evaluated safely.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleSetError {
    /// Two rules share an id.
    #[error("Duplicate rule id: {0}")]
    DuplicateRuleId(RuleId),

    /// A rule has a blank display name.
    #[error("Rule {0} has no name")]
    MissingName(RuleId),

    /// A percentage rule points at a rule that does not exist.
    #[error("Rule {rule} depends on unknown rule {depends_on}")]
    UnknownDependency { rule: RuleId, depends_on: RuleId },

    /// A percentage rule points at another percentage rule (or itself).
    #[error("Rule {rule} depends on {depends_on}, which is itself a percentage rule")]
    ChainedDependency { rule: RuleId, depends_on: RuleId },

    /// More than one percentage rule points at the same parent.
    #[error("Rule {parent} has more than one dependent charge ({first}, {second})")]
    MultipleDependents {
        parent: RuleId,
        first: RuleId,
        second: RuleId,
    },

    /// A dependent declares a different applicability than its parent.
    #[error("Rule {rule} must share the applicability of {depends_on}")]
    ApplicabilityMismatch { rule: RuleId, depends_on: RuleId },

    /// An amount or minimum is negative.
    #[error("Rule {rule} has a negative {field}")]
    NegativeAmount { rule: RuleId, field: &'static str },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used at the boundaries where untyped data (rate sheets, config files)
/// becomes domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Invalid format (e.g. unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that handle every core failure in one place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Rejected(#[from] QuoteRejection),

    #[error("Invalid charge rules: {0}")]
    RuleSet(#[from] RuleSetError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Unit Tests
// =============================================================================
