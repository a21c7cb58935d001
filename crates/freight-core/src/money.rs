//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE RECONCILIATION PROBLEM                                             │
//! │                                                                         │
//! │  With floating point line items:                                        │
//! │    17.5 × 0.10 = 1.7500000000000002                                     │
//! │    Σ rows displayed at 2 decimals ≠ displayed grand total  ❌           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (toea / cents)                       │
//! │    Every line is rounded ONCE, at the line, in integer math.            │
//! │    Totals are plain integer sums of the displayed lines.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use freight_core::money::{Money, PerKgRate};
//!
//! let awb_fee = Money::from_cents(7000); // 70.00
//! let freight = PerKgRate::parse_decimal("5.00").unwrap().times_weight(50).unwrap(); // 250.00
//!
//! assert_eq!(awb_fee.checked_add(freight).unwrap().cents(), 32000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Percentage;

/// Ten-thousandths of a currency unit per cent.
const RATE_UNITS_PER_CENT: i64 = 100;

/// Fractional digits kept by [`PerKgRate`].
const RATE_DECIMALS: usize = 4;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (toea for PGK).
///
/// ## Design Decisions
/// - **i64 (signed)**: negative values never come out of the engine, but
///   rule files can contain them and they must survive parsing to be rejected
/// - **Single field tuple struct**: serializes as a bare integer
/// - **Checked arithmetic only**: an amount that leaves the i64 range is a
///   rejected quote, never a wrapped total
///
/// ## Where Money Flows
/// ```text
/// PerKgRate × chargeable kg ──► Air Freight subtotal ──────────────────┐
/// Rule amounts/rates ─────► × kg / flat / % ──► Ancillary subtotals ───┤
///                                                                      ▼
///                                     LineItem { subtotal, tax, total }
///                                                                      │
///                                     Quote { Σ subtotal, Σ tax, Σ total }
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use freight_core::money::Money;
    ///
    /// let fee = Money::from_cents(8000); // 80.00
    /// assert_eq!(fee.cents(), 8000);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Money(sum)),
            None => None,
        }
    }

    /// Applies a percentage, rounding half-up to the minor unit.
    ///
    /// Used for GST and for percentage-of-another-charge surcharges. Returns
    /// `None` when the result does not fit in the i64 range.
    ///
    /// ## Implementation
    /// Integer math in basis points: `(amount * bps + 5000) / 10000`.
    /// The +5000 rounds halves away from zero for positive amounts.
    ///
    /// ## Example
    /// ```rust
    /// use freight_core::money::Money;
    /// use freight_core::types::Percentage;
    ///
    /// let ten_percent = Percentage::from_bps(1000);
    /// let fuel = Money::from_cents(1750); // 17.50
    /// assert_eq!(fuel.checked_percentage(ten_percent).unwrap().cents(), 175);
    ///
    /// let odd = Money::from_cents(1005); // 10.05 × 10% = 1.005
    /// assert_eq!(odd.checked_percentage(ten_percent).unwrap().cents(), 101);
    /// ```
    pub fn checked_percentage(&self, rate: Percentage) -> Option<Money> {
        let scaled = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        i64::try_from(scaled).ok().map(Money)
    }

    /// Returns the larger of this amount and a minimum-charge floor.
    #[inline]
    pub fn at_least(self, floor: Money) -> Money {
        self.max(floor)
    }
}

/// Renders as a plain decimal (`1234.50`, `-5.50`).
///
/// Currency codes and thousands grouping are presentation concerns of the
/// calling application.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

// =============================================================================
// Per-Kilogram Rate
// =============================================================================

/// A price per chargeable kilogram, in ten-thousandths of the currency unit.
///
/// Rate sheets quote per-kg prices below the cent (`4.125`), so rates carry
/// four decimals. Only the product with a weight is rounded to the cent.
///
/// ```text
/// "4.125"  ──parse──►  PerKgRate(41250)
///          × 100 kg ─►  4_125_000 / 100 = 41250 cents = 412.50
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct PerKgRate(i64);

impl PerKgRate {
    #[inline]
    pub const fn from_ten_thousandths(units: i64) -> Self {
        PerKgRate(units)
    }

    /// A whole-cent rate: `from_cents(35)` is 0.35 per kg.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        PerKgRate(cents * RATE_UNITS_PER_CENT)
    }

    /// Parses a decimal rate in major units, e.g. `"5.00"`, `"0.8"`, `"4.125"`.
    ///
    /// Accepts an optional sign. Digits past the fourth decimal are rounded
    /// half-up. Rate sheets are exported by spreadsheets, so surrounding
    /// whitespace is ignored.
    ///
    /// ## Example
    /// ```rust
    /// use freight_core::money::PerKgRate;
    ///
    /// assert_eq!(PerKgRate::parse_decimal("5.25").unwrap(), PerKgRate::from_cents(525));
    /// assert_eq!(PerKgRate::parse_decimal("4.125").unwrap().ten_thousandths(), 41250);
    /// assert!(PerKgRate::parse_decimal("abc").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<PerKgRate, ValidationError> {
        parse_scaled(input, RATE_DECIMALS).map(PerKgRate)
    }

    #[inline]
    pub const fn ten_thousandths(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        PerKgRate(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Prices a whole number of kilograms, rounding half-up to the cent.
    ///
    /// Returns `None` when the amount does not fit in [`Money`].
    ///
    /// ## Example
    /// ```rust
    /// use freight_core::money::PerKgRate;
    ///
    /// let security = PerKgRate::from_cents(20); // 0.20 per kg
    /// assert_eq!(security.times_weight(50).unwrap().cents(), 1000);
    ///
    /// let sheet = PerKgRate::from_ten_thousandths(41250); // 4.125 per kg
    /// assert_eq!(sheet.times_weight(3).unwrap().cents(), 1238); // 12.375
    /// ```
    pub fn times_weight(&self, kg: u32) -> Option<Money> {
        let units = self.0 as i128 * kg as i128;
        let half = RATE_UNITS_PER_CENT as i128 / 2;
        let rounded = if units < 0 { units - half } else { units + half };
        i64::try_from(rounded / RATE_UNITS_PER_CENT as i128)
            .ok()
            .map(Money::from_cents)
    }
}

/// Two decimals at least, up to four when the rate needs them
/// (`5.00`, `0.35`, `4.125`).
impl fmt::Display for PerKgRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let units = self.0.unsigned_abs();
        let fraction = format!("{:04}", units % 10_000);
        let fraction = fraction.trim_end_matches('0');
        write!(f, "{}{}.{:0<2}", sign, units / 10_000, fraction)
    }
}

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Parses a plain decimal into an integer scaled by `10^decimals`, rounding
/// half-up beyond that precision.
fn parse_scaled(input: &str, decimals: usize) -> Result<i64, ValidationError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "amount".to_string(),
        reason: format!("'{}' {}", trimmed, reason),
    };

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid("is not a number"));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(invalid("is not a number"));
    }

    let scale = 10i128.pow(decimals as u32);
    let mut value: i128 = 0;
    for digit in whole.bytes() {
        value = value * 10 + i128::from(digit - b'0');
        if value > i64::MAX as i128 {
            return Err(invalid("is out of range"));
        }
    }
    value *= scale;

    let kept = &fraction[..fraction.len().min(decimals)];
    let mut place = scale;
    for digit in kept.bytes() {
        place /= 10;
        value += i128::from(digit - b'0') * place;
    }
    if fraction.as_bytes().get(decimals).is_some_and(|d| *d >= b'5') {
        value += 1;
    }

    let signed = if negative { -value } else { value };
    i64::try_from(signed).map_err(|_| invalid("is out of range"))
}

// =============================================================================
// Unit Tests
// =============================================================================
