//! # Quote Command
//!
//! Loads rates and rules, prices the shipment, and renders the result.
//!
//! ## Flow
//! ```text
//! --rates / FREIGHT_RATES_PATH ──► RateTable ─┐
//! --rules / FREIGHT_RULES_PATH ──► RuleSet ───┼──► QuoteEngine::quote ──► table | QuoteDocument
//! --origin --destination --piece ─────────────┘
//! ```

use std::path::PathBuf;

use chrono::Utc;
use freight_core::{Location, Piece, QuoteEngine};
use tracing::{debug, info};

use super::{rates_path, rules_path};
use crate::cli::OutputFormat;
use crate::config::FreightConfig;
use crate::error::CliError;
use crate::render::{self, QuoteDocument};
use crate::sources;

/// Arguments of the `quote` subcommand.
#[derive(Debug, Clone, Default)]
pub struct QuoteArgs {
    pub origin: String,
    pub destination: String,
    pub pieces: Vec<Piece>,
    pub rates: Option<PathBuf>,
    pub rules: Option<PathBuf>,
}

pub fn run(
    args: &QuoteArgs,
    format: OutputFormat,
    config: &FreightConfig,
) -> Result<String, CliError> {
    let origin = Location::new(&args.origin);
    let destination = Location::new(&args.destination);
    if origin.is_blank() || destination.is_blank() {
        return Err(CliError::invalid_input("Origin and destination are required."));
    }

    let rates = sources::load_rate_table(&rates_path(args.rates.as_deref(), config)?)?;
    let rules = sources::load_rule_set(rules_path(args.rules.as_deref(), config))?;

    let quote = QuoteEngine::new(&rules)
        .quote(&args.pieces, &origin, &destination, &rates)
        .map_err(|rejection| {
            info!(code = rejection.code(), %origin, %destination, "Quote rejected");
            CliError::from(rejection)
        })?;

    debug!(
        %origin,
        %destination,
        kg = quote.chargeable_weight.kg(),
        lines = quote.line_items.len(),
        grand_total = %quote.grand_total,
        "Quote generated"
    );

    match format {
        OutputFormat::Table => Ok(render::quote_table(&quote, config)),
        OutputFormat::Json => {
            let document = QuoteDocument::new(quote, config.currency_code.clone(), Utc::now());
            info!(reference = %document.reference, "Quote document issued");
            Ok(serde_json::to_string_pretty(&document)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn rate_sheet() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"[
                {"OriginAirportCode": "POM", "DestinationAirportCode": "LAE", "Rate_Per_KG_PGK": 5},
                {"OriginAirportCode": "HGU", "DestinationAirportCode": "RAB", "Rate_Per_KG_PGK": "7.15"}
            ]"#,
        )
        .unwrap();
        file
    }

    fn args(
        origin: &str,
        destination: &str,
        pieces: Vec<Piece>,
        sheet: &NamedTempFile,
    ) -> QuoteArgs {
        QuoteArgs {
            origin: origin.to_string(),
            destination: destination.to_string(),
            pieces,
            rates: Some(sheet.path().to_path_buf()),
            rules: None,
        }
    }

    #[test]
    fn test_quote_table() {
        let sheet = rate_sheet();
        let out = run(
            &args("pom", "lae", vec![Piece::weighing(50.0)], &sheet),
            OutputFormat::Table,
            &FreightConfig::default(),
        )
        .unwrap();

        assert!(out.starts_with("Quote POM → LAE"));
        assert!(out.ends_with("Grand total: PGK 479.05"));
    }

    #[test]
    fn test_quote_json_document() {
        let sheet = rate_sheet();
        let out = run(
            &args("HGU", "RAB", vec![Piece::weighing(10.0)], &sheet),
            OutputFormat::Json,
            &FreightConfig::default(),
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(json["reference"].as_str().unwrap().starts_with("Q-"));
        assert_eq!(json["currency"], "PGK");
        assert_eq!(json["quote"]["subTotal"], 15000);
        assert_eq!(json["quote"]["lineItems"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_rejection_maps_to_quote_rejected() {
        let sheet = rate_sheet();
        let config = FreightConfig::default();

        let empty = args("POM", "LAE", vec![], &sheet);
        let err = run(&empty, OutputFormat::Table, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::QuoteRejected);
        assert_eq!(err.message, "Please enter shipment details.");

        let err = run(
            &args("LAE", "POM", vec![Piece::weighing(5.0)], &sheet),
            OutputFormat::Table,
            &config,
        )
        .unwrap_err();
        assert_eq!(err.message, "Sorry, a rate for LAE to POM is not available.");
    }

    #[test]
    fn test_blank_location_is_invalid_input() {
        let sheet = rate_sheet();
        let err = run(
            &args(" ", "LAE", vec![Piece::weighing(5.0)], &sheet),
            OutputFormat::Table,
            &FreightConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_rates_from_config() {
        let sheet = rate_sheet();
        let config = FreightConfig {
            rates_path: Some(sheet.path().to_path_buf()),
            ..FreightConfig::default()
        };
        let quote_args = QuoteArgs {
            origin: "POM".to_string(),
            destination: "LAE".to_string(),
            pieces: vec![Piece::weighing(1.0)],
            ..QuoteArgs::default()
        };

        assert!(run(&quote_args, OutputFormat::Table, &config).is_ok());
    }
}
