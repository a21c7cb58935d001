//! # Route Rates
//!
//! Directional origin → destination → per-kg freight rate lookup.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RateTable                                                              │
//! │                                                                         │
//! │   "POM" ──┬── "LAE" ──► RouteRate { rate_per_kg: 5.00 }                 │
//! │           └── "HGU" ──► RouteRate { rate_per_kg: 6.50 }                 │
//! │   "LAE" ───── "POM" ──► RouteRate { rate_per_kg: 5.20 }  (separate)     │
//! │                                                                         │
//! │   locations: { HGU, LAE, POM }   (vocabulary for origin/dest pickers)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing entry and an entry with a rate of zero or less are treated the
//! same: the route is unquotable. Rates keep four decimals (`4.125`), so a
//! sub-cent sheet price is a valid route.
//!
//! Fetching the sheet is the caller's job; this module only turns the
//! exported rows into a table.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::ValidationError;
use crate::money::PerKgRate;
use crate::types::Location;

const ORIGIN_COLUMN: &str = "OriginAirportCode";
const DESTINATION_COLUMN: &str = "DestinationAirportCode";
const RATE_COLUMN: &str = "Rate_Per_KG_PGK";

/// Freight rate for one directional route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRate {
    pub rate_per_kg: PerKgRate,
}

impl RouteRate {
    pub const fn per_kg(rate_per_kg: PerKgRate) -> Self {
        RouteRate { rate_per_kg }
    }

    /// A route is quotable only with a strictly positive rate.
    pub const fn is_quotable(&self) -> bool {
        self.rate_per_kg.is_positive()
    }
}

/// Read-only snapshot of the route rates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable {
    routes: BTreeMap<Location, BTreeMap<Location, RouteRate>>,
    locations: BTreeSet<Location>,
}

impl RateTable {
    pub fn new() -> Self {
        RateTable::default()
    }

    /// Adds or replaces a route. Both ends join the location vocabulary.
    pub fn insert(&mut self, origin: Location, destination: Location, rate: RouteRate) {
        self.locations.insert(origin.clone());
        self.locations.insert(destination.clone());
        self.routes.entry(origin).or_default().insert(destination, rate);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_route(mut self, origin: &str, destination: &str, rate_per_kg: PerKgRate) -> Self {
        self.insert(
            Location::new(origin),
            Location::new(destination),
            RouteRate::per_kg(rate_per_kg),
        );
        self
    }

    /// The raw entry for a route, quotable or not.
    pub fn route(&self, origin: &Location, destination: &Location) -> Option<&RouteRate> {
        self.routes.get(origin)?.get(destination)
    }

    /// The per-kg rate for a route, only when the route is quotable.
    pub fn rate_for(&self, origin: &Location, destination: &Location) -> Option<PerKgRate> {
        self.route(origin, destination)
            .filter(|r| r.is_quotable())
            .map(|r| r.rate_per_kg)
    }

    /// Every known location code, sorted.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Quotable destinations from an origin, sorted by code.
    pub fn destinations_from(&self, origin: &Location) -> Vec<(&Location, PerKgRate)> {
        self.routes
            .get(origin)
            .map(|dests| {
                dests
                    .iter()
                    .filter(|(_, r)| r.is_quotable())
                    .map(|(d, r)| (d, r.rate_per_kg))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of route entries, quotable or not.
    pub fn route_count(&self) -> usize {
        self.routes.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Builds a table from rate sheet rows.
    ///
    /// ## Row Handling
    /// - blank origin or destination: row skipped
    /// - rate that does not parse: both codes are still known locations, but
    ///   no route is added and the row is reported
    /// - later rows for the same route replace earlier ones
    pub fn from_sheet_rows(rows: impl IntoIterator<Item = RateSheetRow>) -> RateSheetImport {
        let mut table = RateTable::new();
        let mut skipped = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let origin = Location::new(row.origin.unwrap_or_default());
            let destination = Location::new(row.destination.unwrap_or_default());

            if origin.is_blank() || destination.is_blank() {
                let field = if origin.is_blank() {
                    ORIGIN_COLUMN
                } else {
                    DESTINATION_COLUMN
                };
                skipped.push(SkippedRow {
                    index,
                    reason: ValidationError::Required {
                        field: field.to_string(),
                    },
                });
                continue;
            }

            match parse_rate(row.rate.as_ref()) {
                Ok(rate) => table.insert(origin, destination, RouteRate::per_kg(rate)),
                Err(reason) => {
                    table.locations.insert(origin);
                    table.locations.insert(destination);
                    skipped.push(SkippedRow { index, reason });
                }
            }
        }

        RateSheetImport { table, skipped }
    }
}

fn parse_rate(value: Option<&serde_json::Value>) -> Result<PerKgRate, ValidationError> {
    let text = match value {
        // f64 `Display` never uses exponent notation, unlike the JSON form
        Some(serde_json::Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(whole), _) => whole.to_string(),
            (None, Some(float)) => float.to_string(),
            (None, None) => n.to_string(),
        },
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => {
            return Err(ValidationError::Required {
                field: RATE_COLUMN.to_string(),
            })
        }
        Some(other) => {
            return Err(ValidationError::InvalidFormat {
                field: RATE_COLUMN.to_string(),
                reason: format!("unexpected value {}", other),
            })
        }
    };

    PerKgRate::parse_decimal(&text).map_err(|err| match err {
        ValidationError::InvalidFormat { reason, .. } => ValidationError::InvalidFormat {
            field: RATE_COLUMN.to_string(),
            reason,
        },
        other => other,
    })
}

// =============================================================================
// Rate Sheet Rows
// =============================================================================

/// One row of the exported rate sheet.
///
/// Column names match the sheet headers. The rate column arrives as either a
/// number or a string depending on how the cell was formatted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSheetRow {
    #[serde(rename = "OriginAirportCode", default)]
    pub origin: Option<String>,

    #[serde(rename = "DestinationAirportCode", default)]
    pub destination: Option<String>,

    #[serde(rename = "Rate_Per_KG_PGK", default)]
    pub rate: Option<serde_json::Value>,
}

/// A row that did not produce a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based position in the sheet.
    pub index: usize,
    pub reason: ValidationError,
}

/// Result of loading a rate sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateSheetImport {
    pub table: RateTable,
    pub skipped: Vec<SkippedRow>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(origin: &str, destination: &str, rate: serde_json::Value) -> RateSheetRow {
        RateSheetRow {
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            rate: Some(rate),
        }
    }

    #[test]
    fn test_rate_for_is_directional() {
        let table = RateTable::new().with_route("POM", "LAE", PerKgRate::from_cents(500));
        let pom = Location::new("POM");
        let lae = Location::new("LAE");

        assert_eq!(table.rate_for(&pom, &lae), Some(PerKgRate::from_cents(500)));
        assert_eq!(table.rate_for(&lae, &pom), None);
    }

    #[test]
    fn test_non_positive_rate_is_unquotable() {
        let table = RateTable::new()
            .with_route("POM", "LAE", PerKgRate::zero())
            .with_route("POM", "HGU", PerKgRate::from_cents(-100));

        let pom = Location::new("POM");
        assert!(table.route(&pom, &Location::new("LAE")).is_some());
        assert_eq!(table.rate_for(&pom, &Location::new("LAE")), None);
        assert_eq!(table.rate_for(&pom, &Location::new("HGU")), None);
        assert!(table.destinations_from(&pom).is_empty());
    }

    #[test]
    fn test_lookup_normalizes_codes() {
        let table = RateTable::new().with_route(" pom", "lae ", PerKgRate::from_cents(500));
        assert!(table
            .rate_for(&Location::new("POM"), &Location::new("LAE"))
            .is_some());
    }

    #[test]
    fn test_from_sheet_rows() {
        let rows = vec![
            row("POM", "LAE", json!(5)),
            row("POM", "HGU", json!("6.50")),
            row("LAE", "POM", json!(5.2)),
        ];
        let import = RateTable::from_sheet_rows(rows);

        assert!(import.skipped.is_empty());
        assert_eq!(import.table.route_count(), 3);

        let pom = Location::new("POM");
        assert_eq!(
            import.table.rate_for(&pom, &Location::new("HGU")),
            Some(PerKgRate::from_cents(650))
        );
        assert_eq!(
            import.table.rate_for(&Location::new("LAE"), &pom),
            Some(PerKgRate::from_cents(520))
        );

        let codes: Vec<_> = import.table.locations().map(Location::code).collect();
        assert_eq!(codes, ["HGU", "LAE", "POM"]);
    }

    #[test]
    fn test_sub_cent_sheet_rate_is_quotable() {
        let rows = vec![
            row("POM", "LAE", json!(4.125)),
            row("POM", "HGU", json!("4.125")),
            row("LAE", "POM", json!("0.00004")),
            row("HGU", "RAB", json!(1.5e-3)),
        ];
        let import = RateTable::from_sheet_rows(rows);
        assert!(import.skipped.is_empty());

        let pom = Location::new("POM");
        let rate = import.table.rate_for(&pom, &Location::new("LAE")).unwrap();
        assert_eq!(rate.ten_thousandths(), 41_250);
        assert_eq!(rate.times_weight(100).unwrap().cents(), 41_250);
        assert_eq!(import.table.rate_for(&pom, &Location::new("HGU")), Some(rate));

        let hgu = Location::new("HGU");
        let rab = Location::new("RAB");
        assert_eq!(import.table.rate_for(&hgu, &rab).unwrap().ten_thousandths(), 15);

        // Rounds to zero at four decimals, so the route exists but is unquotable
        assert_eq!(import.table.rate_for(&Location::new("LAE"), &pom), None);
    }

    #[test]
    fn test_blank_codes_are_skipped() {
        let rows = vec![
            row("  ", "LAE", json!(5)),
            RateSheetRow {
                origin: Some("POM".to_string()),
                destination: None,
                rate: Some(json!(5)),
            },
        ];
        let import = RateTable::from_sheet_rows(rows);

        assert!(import.table.is_empty());
        assert_eq!(import.table.locations().count(), 0);
        assert_eq!(import.skipped.len(), 2);
        assert_eq!(import.skipped[1].index, 1);
    }

    #[test]
    fn test_bad_rate_keeps_locations_but_not_route() {
        let rows = vec![row("POM", "WWK", json!("call us")), row("POM", "RAB", json!(null))];
        let import = RateTable::from_sheet_rows(rows);

        assert_eq!(import.skipped.len(), 2);
        assert!(matches!(
            import.skipped[0].reason,
            ValidationError::InvalidFormat { ref field, .. } if field == "Rate_Per_KG_PGK"
        ));
        assert!(import.table.is_empty());
        let codes: Vec<_> = import.table.locations().map(Location::code).collect();
        assert_eq!(codes, ["POM", "RAB", "WWK"]);
    }

    #[test]
    fn test_later_rows_replace_earlier() {
        let rows = vec![row("POM", "LAE", json!(5)), row("POM", "LAE", json!(5.5))];
        let import = RateTable::from_sheet_rows(rows);
        assert_eq!(
            import
                .table
                .rate_for(&Location::new("POM"), &Location::new("LAE")),
            Some(PerKgRate::from_cents(550))
        );
    }

    #[test]
    fn test_sheet_rows_deserialize_from_export() {
        let json = r#"[
            {"OriginAirportCode": "POM", "DestinationAirportCode": "LAE", "Rate_Per_KG_PGK": 5},
            {"OriginAirportCode": "POM", "DestinationAirportCode": "", "Rate_Per_KG_PGK": 4}
        ]"#;
        let rows: Vec<RateSheetRow> = serde_json::from_str(json).unwrap();
        let import = RateTable::from_sheet_rows(rows);
        assert_eq!(import.table.route_count(), 1);
        assert_eq!(import.skipped.len(), 1);
    }
}
