//! Exchange rate data and conversion helpers
//!
//! This module contains the rate table type shared by the cache and the
//! provider, the pure conversion and listing helpers, and the clients that
//! obtain fresh rate tables.

pub mod provider;
pub mod source;

pub use provider::{ProviderError, RateLookup, RateOrigin, RateProvider};
pub use source::{HttpRateSource, RateSource, SourceError};

use std::collections::HashMap;
use thiserror::Error;

/// Rates keyed by currency code, relative to one unit of a base currency
pub type RateTable = HashMap<String, f64>;

/// Errors that can occur when converting an amount
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The target currency is not present in the rate table
    #[error("Target currency '{0}' not found")]
    UnknownTargetCurrency(String),
}

/// Converts `amount` of the base currency into `to_currency`
///
/// # Returns
/// * `Ok(f64)` - `amount * rates[to_currency]`
/// * `Err(ConversionError::UnknownTargetCurrency)` - if the table has no such code
pub fn convert(amount: f64, rates: &RateTable, to_currency: &str) -> Result<f64, ConversionError> {
    rates
        .get(to_currency)
        .map(|rate| amount * rate)
        .ok_or_else(|| ConversionError::UnknownTargetCurrency(to_currency.to_string()))
}

/// Returns every currency code in `rates`, sorted lexicographically
pub fn list_currencies(rates: &RateTable) -> Vec<String> {
    let mut codes: Vec<String> = rates.keys().cloned().collect();
    codes.sort();
    codes
}

/// Normalizes user input into a currency code (trimmed, uppercase)
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}
