//! Text formatting for converter output
//!
//! Pure functions that turn lookup and conversion results into the lines the
//! binary prints.

use crate::data::{list_currencies, RateTable};

/// Number of currency codes printed per row when listing
pub const CODES_PER_ROW: usize = 5;

/// Notice printed when rates come from an expired cache entry
pub const STALE_NOTICE: &str = "Using cached exchange rates (may be outdated)";

/// Formats a single conversion, e.g. `100 USD = 92.10 EUR`
pub fn format_conversion(amount: f64, from: &str, converted: f64, to: &str) -> String {
    format!("{amount} {from} = {converted:.2} {to}")
}

/// Formats the sorted currency codes of `rates` in rows of five
pub fn format_currency_grid(rates: &RateTable) -> String {
    let codes = list_currencies(rates);
    let mut lines = vec!["Available currencies:".to_string()];
    lines.extend(
        codes
            .chunks(CODES_PER_ROW)
            .map(|row| format!("  {}", row.join("  "))),
    );
    lines.join("\n")
}

/// Formats the conversion of `amount` into every currency of `rates`
///
/// Codes are sorted and padded to the longest code so the values line up.
pub fn format_all_conversions(amount: f64, base: &str, rates: &RateTable) -> String {
    let codes = list_currencies(rates);
    let width = codes.iter().map(String::len).max().unwrap_or(0);

    let mut lines = vec![format!("Conversions for {amount} {base}:")];
    lines.extend(
        codes
            .iter()
            .map(|code| format!("  {code:width$} : {:.2}", amount * rates[code])),
    );
    lines.join("\n")
}
