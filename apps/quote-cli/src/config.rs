//! # Configuration
//!
//! Settings read once at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--rates`, `--rules`)
//! 2. Environment variables (`FREIGHT_*`)
//! 3. Defaults (this file)
//!
//! Configuration is read-only after startup.

use freight_core::{Money, PerKgRate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const RATES_PATH_VAR: &str = "FREIGHT_RATES_PATH";
pub const RULES_PATH_VAR: &str = "FREIGHT_RULES_PATH";
pub const CURRENCY_CODE_VAR: &str = "FREIGHT_CURRENCY_CODE";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreightConfig {
    /// Rate sheet JSON export used when `--rates` is not given.
    pub rates_path: Option<PathBuf>,

    /// Rule set TOML file; the standard rules apply when absent.
    pub rules_path: Option<PathBuf>,

    /// Currency code (ISO 4217) shown in front of amounts
    pub currency_code: String,
}

impl Default for FreightConfig {
    /// ## Default Values
    /// - Rates: none (must be supplied)
    /// - Rules: built-in standard rule set
    /// - Currency: PGK
    fn default() -> Self {
        FreightConfig {
            rates_path: None,
            rules_path: None,
            currency_code: "PGK".to_string(),
        }
    }
}

impl FreightConfig {
    /// Creates a config from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `FREIGHT_RATES_PATH`: Rate sheet JSON file
    /// - `FREIGHT_RULES_PATH`: Rule set TOML file
    /// - `FREIGHT_CURRENCY_CODE`: Display currency (e.g. "PGK")
    pub fn from_env() -> Self {
        FreightConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = FreightConfig::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_blank(RATES_PATH_VAR) {
            config.rates_path = Some(PathBuf::from(path));
        }

        if let Some(path) = non_blank(RULES_PATH_VAR) {
            config.rules_path = Some(PathBuf::from(path));
        }

        if let Some(code) = non_blank(CURRENCY_CODE_VAR) {
            config.currency_code = code.trim().to_uppercase();
        }

        config
    }

    /// Formats an amount with thousands grouping and two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use freight_core::{Money, PerKgRate};
    /// use quote_cli::config::FreightConfig;
    ///
    /// let config = FreightConfig::default();
    /// assert_eq!(config.format_amount(Money::from_cents(123456)), "1,234.56");
    /// ```
    pub fn format_amount(&self, amount: Money) -> String {
        format!(
            "{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            group_thousands(&amount.dollars().abs().to_string()),
            amount.cents_part()
        )
    }

    /// Formats a per-kg rate with the currency code, keeping sub-cent digits.
    ///
    /// ## Example
    /// ```rust
    /// use freight_core::PerKgRate;
    /// use quote_cli::config::FreightConfig;
    ///
    /// let config = FreightConfig::default();
    /// let rate = PerKgRate::from_ten_thousandths(41_250);
    /// assert_eq!(config.format_rate(rate), "PGK 4.125/kg");
    /// ```
    pub fn format_rate(&self, rate: PerKgRate) -> String {
        let plain = rate.to_string();
        let (sign, unsigned) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain.as_str()),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, "00"));
        format!(
            "{} {}{}.{}/kg",
            self.currency_code,
            sign,
            group_thousands(whole),
            fraction
        )
    }

    /// Formats an amount with the currency code in front.
    ///
    /// ## Example
    /// ```rust
    /// use freight_core::{Money, PerKgRate};
    /// use quote_cli::config::FreightConfig;
    ///
    /// let config = FreightConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(47905)), "PGK 479.05");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", self.currency_code, self.format_amount(amount))
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
