//! # Routes Command
//!
//! Lists the location vocabulary, or the quotable destinations from one
//! origin, as the quote form's pickers would show them.

use std::path::Path;

use freight_core::Location;
use serde_json::json;

use super::rates_path;
use crate::cli::OutputFormat;
use crate::config::FreightConfig;
use crate::error::CliError;
use crate::render;
use crate::sources;

pub fn run(
    origin: Option<&str>,
    rates: Option<&Path>,
    format: OutputFormat,
    config: &FreightConfig,
) -> Result<String, CliError> {
    let table = sources::load_rate_table(&rates_path(rates, config)?)?;

    match origin.map(Location::new) {
        None => match format {
            OutputFormat::Table => Ok(render::location_list(table.locations())),
            OutputFormat::Json => {
                let codes: Vec<&str> = table.locations().map(Location::code).collect();
                Ok(serde_json::to_string_pretty(&codes)?)
            }
        },
        Some(origin) => {
            let destinations = table.destinations_from(&origin);
            match format {
                OutputFormat::Table => {
                    Ok(render::destination_table(&origin, &destinations, config))
                }
                OutputFormat::Json => {
                    let rows: Vec<_> = destinations
                        .iter()
                        .map(|(destination, rate)| {
                            json!({
                                "destination": destination,
                                "ratePerKg": rate,
                                "display": rate.to_string(),
                            })
                        })
                        .collect();
                    let body = json!({ "origin": origin, "destinations": rows });
                    Ok(serde_json::to_string_pretty(&body)?)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rate_sheet() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"OriginAirportCode": "POM", "DestinationAirportCode": "LAE", "Rate_Per_KG_PGK": 5},
                {"OriginAirportCode": "POM", "DestinationAirportCode": "WWK", "Rate_Per_KG_PGK": 0},
                {"OriginAirportCode": "HGU", "DestinationAirportCode": "RAB", "Rate_Per_KG_PGK": 7}
            ]"#,
        )
        .unwrap();
        file
    }

    #[test]
    fn test_lists_all_locations() {
        let sheet = rate_sheet();
        let config = FreightConfig::default();
        let out = run(None, Some(sheet.path()), OutputFormat::Table, &config).unwrap();
        assert_eq!(out, "HGU\nLAE\nPOM\nRAB\nWWK");
    }

    #[test]
    fn test_destinations_skip_unquotable_routes() {
        let sheet = rate_sheet();
        let config = FreightConfig::default();
        let out = run(Some("pom"), Some(sheet.path()), OutputFormat::Json, &config).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(json["origin"], "POM");
        let destinations = json["destinations"].as_array().unwrap();
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0]["destination"], "LAE");
        assert_eq!(destinations[0]["ratePerKg"], 50000);
        assert_eq!(destinations[0]["display"], "5.00");
    }
}
