//! # freight-core: Pure Quotation Logic for Freight Quotes
//!
//! This crate holds everything needed to price an air freight shipment:
//! chargeable weight, route rates, ancillary charge rules, GST and the quote
//! engine that ties them together. It does no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Freight Quote Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/quote-cli                               │   │
//! │  │    args ──► config ──► load rates/rules ──► render quote        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ freight-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │  weight   │  │   rates   │  │   rules   │  │  engine   │   │   │
//! │  │   │ Piece →kg │  │ RateTable │  │  RuleSet  │  │   Quote   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • NO GLOBAL STATE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Piece, Location, LineItem, Quote)
//! - [`money`] - Money in toea/cents and per-kg rates (integer arithmetic)
//! - [`weight`] - Chargeable weight calculation
//! - [`rates`] - Directional route rate table
//! - [`rules`] - Ancillary charge rules and PUD locations
//! - [`engine`] - Quote generation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same pieces, route, rates and rules give the same quote
//! 2. **Integer Money**: amounts are minor units (i64), GST rounds per line,
//!    overflow rejects the quote
//! 3. **Read-only Inputs**: the engine borrows rates and rules, never mutates them
//! 4. **Explicit Errors**: rejections are typed values, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use freight_core::{generate_quote, Location, PerKgRate, Piece, RateTable, RuleSet};
//!
//! let rates = RateTable::new().with_route("POM", "LAE", PerKgRate::from_cents(500));
//! let rules = RuleSet::standard();
//!
//! let quote = generate_quote(
//!     &[Piece::weighing(50.0)],
//!     &Location::new("POM"),
//!     &Location::new("LAE"),
//!     &rates,
//!     &rules,
//! )
//! .unwrap();
//!
//! assert_eq!(quote.chargeable_weight.kg(), 50);
//! assert_eq!(quote.line_items.len(), 6);
//! assert_eq!(quote.grand_total.to_string(), "479.05");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod money;
pub mod rates;
pub mod rules;
pub mod types;
pub mod weight;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{generate_quote, QuoteEngine, QuoteRequest, AIR_FREIGHT};
pub use error::{CoreError, QuoteRejection, RuleSetError, ValidationError};
pub use money::{Money, PerKgRate};
pub use rates::{RateSheetImport, RateSheetRow, RateTable, RouteRate};
pub use rules::{AncillaryChargeRule, Applicability, ChargeBasis, RuleId, RuleSet};
pub use types::*;
pub use weight::chargeable_weight;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Goods and Services Tax applied to every line item (10%).
pub const GST_RATE: Percentage = Percentage::from_bps(1000);

/// Air freight dimensional factor: cm³ per kilogram.
pub const VOLUMETRIC_DIVISOR: f64 = 6000.0;
