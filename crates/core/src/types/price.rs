//! Type-safe price representation using decimal arithmetic.
//!
//! Line items arrive with prices in one of two shapes: hand-authored catalog
//! data carries currency-formatted strings (`"$12.99"`), the backend API
//! carries plain numbers (`12.99`). [`PriceValue`] keeps whichever shape
//! arrived and [`PriceValue::normalize`] turns either into a [`Decimal`].
//!
//! All cart arithmetic happens in [`Decimal`], so sums never drift the way
//! binary floating point does. Totals are rounded to the cent with
//! [`round_to_cents`], which rounds half away from zero (`0.005 -> 0.01`).

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Currency symbols stripped from the front of a formatted price.
const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₹'];

/// Errors produced when a price string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PriceError {
    /// Nothing left after stripping whitespace and currency symbols.
    #[error("price is empty")]
    Empty,
    /// The remaining text is not a decimal number.
    #[error("invalid price {0:?}")]
    Invalid(String),
}

/// Parse a currency-formatted price string.
///
/// Leading whitespace and currency symbols are stripped and thousands
/// separators are ignored, so `"$12.99"`, `" £1,299.00"` and `"5.995"` all
/// parse.
///
/// # Errors
///
/// Returns [`PriceError`] if nothing numeric remains after stripping.
pub fn parse_price(raw: &str) -> Result<Decimal, PriceError> {
    let stripped = raw
        .trim()
        .trim_start_matches(|c: char| CURRENCY_SYMBOLS.contains(&c) || c.is_whitespace());

    if stripped.is_empty() {
        return Err(PriceError::Empty);
    }

    let cleaned: String = stripped.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).map_err(|_| PriceError::Invalid(raw.to_string()))
}

/// Round an amount to whole cents, half away from zero.
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A price as it was supplied: either a number or a formatted string.
///
/// Deserializes from a JSON string or number. Strings serialize as strings.
/// Numbers serialize as JSON numbers when a float holds them exactly, and
/// otherwise as decimal strings, so the amount never changes on the way out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    /// Currency-formatted text, e.g. `"$12.99"`.
    Text(String),
    /// A bare numeric amount.
    Number(Decimal),
}

impl PriceValue {
    /// Convert to a decimal amount.
    ///
    /// Unparseable text normalizes to zero so a single bad price can never
    /// poison the cart total.
    #[must_use]
    pub fn normalize(&self) -> Decimal {
        match self {
            Self::Number(amount) => *amount,
            Self::Text(raw) => parse_price(raw).unwrap_or(Decimal::ZERO),
        }
    }

    /// Convert to a decimal amount, reporting malformed text.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError`] if the value is text that does not parse.
    pub fn try_normalize(&self) -> Result<Decimal, PriceError> {
        match self {
            Self::Number(amount) => Ok(*amount),
            Self::Text(raw) => parse_price(raw),
        }
    }
}

impl Serialize for PriceValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(raw) => serializer.serialize_str(raw),
            Self::Number(amount) => match exact_f64(*amount) {
                Some(value) => serializer.serialize_f64(value),
                None => serializer.serialize_str(&amount.to_string()),
            },
        }
    }
}

/// `amount` as a float, if reading the float back gives the same amount.
fn exact_f64(amount: Decimal) -> Option<f64> {
    let value = amount.to_f64()?;
    let back = Decimal::from_str(&value.to_string()).ok()?;
    (back == amount).then_some(value)
}

impl From<Decimal> for PriceValue {
    fn from(amount: Decimal) -> Self {
        Self::Number(amount)
    }
}

impl From<&str> for PriceValue {
    fn from(raw: &str) -> Self {
        Self::Text(raw.to_string())
    }
}

impl From<String> for PriceValue {
    fn from(raw: String) -> Self {
        Self::Text(raw)
    }
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = round_to_cents(self.amount);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            format!("-{}{:.2}", self.currency_code.symbol(), rounded.abs())
        } else {
            format!("{}{:.2}", self.currency_code.symbol(), rounded.abs())
        }
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}
