//! # Sources
//!
//! Loads the rate sheet and rule set from disk.
//!
//! - Rate sheet: JSON array of rows exported from the rates spreadsheet
//!   (`OriginAirportCode`, `DestinationAirportCode`, `Rate_Per_KG_PGK`).
//! - Rule set: TOML in the shape of `RuleSetConfig`, validated on load.

use std::path::{Path, PathBuf};

use freight_core::{RateSheetRow, RateTable, RuleSet};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A source file that could not be turned into domain values.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Rate sheet {path} is not valid JSON: {source}")]
    RateSheet {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Rule set {path} is invalid: {source}")]
    RuleSet {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn read(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a rate sheet export into a table.
///
/// Rows that cannot become routes are logged and skipped; the remaining
/// routes stay quotable.
pub fn load_rate_table(path: &Path) -> Result<RateTable, SourceError> {
    let text = read(path)?;
    let rows: Vec<RateSheetRow> =
        serde_json::from_str(&text).map_err(|source| SourceError::RateSheet {
            path: path.to_path_buf(),
            source,
        })?;

    let row_count = rows.len();
    let import = RateTable::from_sheet_rows(rows);

    for skipped in &import.skipped {
        warn!(row = skipped.index, reason = %skipped.reason, "Skipping rate sheet row");
    }
    info!(
        path = %path.display(),
        rows = row_count,
        routes = import.table.route_count(),
        skipped = import.skipped.len(),
        "Rate sheet loaded"
    );

    Ok(import.table)
}

/// Loads a rule set file, or the standard rules when no path is given.
pub fn load_rule_set(path: Option<&Path>) -> Result<RuleSet, SourceError> {
    let Some(path) = path else {
        debug!("Using standard rule set");
        return Ok(RuleSet::standard());
    };

    let text = read(path)?;
    let rules: RuleSet = toml::from_str(&text).map_err(|source| SourceError::RuleSet {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), rules = rules.rules().len(), "Rule set loaded");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_core::{Location, PerKgRate};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_rate_table() {
        let file = write_temp(
            r#"[
                {"OriginAirportCode": "POM", "DestinationAirportCode": "LAE", "Rate_Per_KG_PGK": 5},
                {"OriginAirportCode": "POM", "DestinationAirportCode": "HGU", "Rate_Per_KG_PGK": "n/a"},
                {"OriginAirportCode": "", "DestinationAirportCode": "HGU", "Rate_Per_KG_PGK": 4},
                {"OriginAirportCode": "LAE", "DestinationAirportCode": "POM", "Rate_Per_KG_PGK": 4.125}
            ]"#,
        );

        let table = load_rate_table(file.path()).unwrap();
        assert_eq!(table.route_count(), 2);
        assert_eq!(
            table.rate_for(&Location::new("POM"), &Location::new("LAE")),
            Some(PerKgRate::from_cents(500))
        );
        assert_eq!(
            table.rate_for(&Location::new("LAE"), &Location::new("POM")),
            Some(PerKgRate::from_ten_thousandths(41_250))
        );
    }

    #[test]
    fn test_missing_rate_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_rate_table(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
    }

    #[test]
    fn test_malformed_rate_sheet() {
        let file = write_temp("{ not json");
        let err = load_rate_table(file.path()).unwrap_err();
        assert!(matches!(err, SourceError::RateSheet { .. }));
    }

    #[test]
    fn test_default_rule_set() {
        assert_eq!(load_rule_set(None).unwrap(), RuleSet::standard());
    }

    #[test]
    fn test_load_rule_set_file() {
        let file = write_temp(
            r#"
            pickup_delivery_locations = ["WWK"]

            [[rules]]
            id = "doc"
            name = "Documentation"
            basis = { type = "per_shipment", amount = 2500 }
            "#,
        );

        let rules = load_rule_set(Some(file.path())).unwrap();
        assert_eq!(rules.rules().len(), 1);
        assert!(rules
            .pickup_delivery_locations()
            .contains(&Location::new("WWK")));
    }

    #[test]
    fn test_invalid_rule_set_file() {
        let file = write_temp(
            r#"
            [[rules]]
            id = "fuel"
            name = "Fuel"
            basis = { type = "percentage_of", rate = 1000, depends_on = "missing" }
            "#,
        );

        let err = load_rule_set(Some(file.path())).unwrap_err();
        assert!(matches!(err, SourceError::RuleSet { .. }));
        assert!(err.to_string().contains("unknown rule missing"));
    }
}
