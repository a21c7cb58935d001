//! # Rules Command
//!
//! Prints the active ancillary charge rules: the `--rules` file, the
//! `FREIGHT_RULES_PATH` file, or the standard set.

use std::path::Path;

use super::rules_path;
use crate::cli::OutputFormat;
use crate::config::FreightConfig;
use crate::error::CliError;
use crate::render;
use crate::sources;

pub fn run(
    rules: Option<&Path>,
    format: OutputFormat,
    config: &FreightConfig,
) -> Result<String, CliError> {
    let rule_set = sources::load_rule_set(rules_path(rules, config))?;

    match format {
        OutputFormat::Table => Ok(render::rule_table(&rule_set)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rule_set)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_core::RuleSet;

    #[test]
    fn test_standard_rules_table() {
        let out = run(None, OutputFormat::Table, &FreightConfig::default()).unwrap();
        assert!(out.contains("AWB Fee"));
        assert!(out.contains("PUD Fuel Surcharge"));
    }

    #[test]
    fn test_json_output_reloads() {
        let out = run(None, OutputFormat::Json, &FreightConfig::default()).unwrap();
        let back: RuleSet = serde_json::from_str(&out).unwrap();
        assert_eq!(back, RuleSet::standard());
    }
}
