//! Command-line interface parsing for the currency converter
//!
//! This module handles parsing of CLI arguments using clap and maps the parsed
//! arguments onto the single action a run performs.

use clap::Parser;
use std::path::PathBuf;

use crate::data::normalize_code;

/// Base currency listed when `--list` is given without one
pub const DEFAULT_BASE: &str = "USD";

/// Simple currency converter using cached exchange rates
#[derive(Parser, Debug)]
#[command(name = "curconv")]
#[command(about = "Simple Currency Converter")]
#[command(version)]
pub struct Cli {
    /// Amount to convert
    #[arg(allow_negative_numbers = true)]
    pub amount: Option<f64>,

    /// Source currency code (e.g., USD)
    pub from_currency: Option<String>,

    /// Target currency code (e.g., EUR)
    pub to_currency: Option<String>,

    /// List all available currencies, optionally for a given base currency
    ///
    /// Examples:
    ///   curconv --list          # Currencies quoted against USD
    ///   curconv --list EUR      # Currencies quoted against EUR
    #[arg(short, long, value_name = "BASE")]
    pub list: Option<Option<String>>,

    /// Show conversion to all currencies
    #[arg(short, long)]
    pub all: bool,

    /// Clear cached exchange rates
    #[arg(short, long)]
    pub clear_cache: bool,

    /// Use this cache file instead of ~/.currency_cache.json
    #[arg(long, value_name = "PATH")]
    pub cache_file: Option<PathBuf>,

    /// Hours before cached rates are refreshed
    #[arg(long, value_name = "HOURS")]
    pub ttl_hours: Option<u64>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// What a single run of the converter does
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Delete the cache file
    ClearCache,
    /// List currencies quoted against `base`
    List { base: String },
    /// Convert `amount` of `from` into `to`
    Convert { amount: f64, from: String, to: String },
    /// Convert `amount` of `from` into every available currency
    ConvertAll { amount: f64, from: String },
    /// Amount and source given but no target: hint and list currencies
    MissingTarget { amount: f64, from: String },
    /// Not enough arguments to do anything
    Help,
}

impl Action {
    /// Determines the action from parsed CLI arguments.
    ///
    /// Clearing the cache wins over listing, and listing wins over conversion.
    /// Currency codes are normalized to uppercase.
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.clear_cache {
            return Action::ClearCache;
        }

        if let Some(base) = &cli.list {
            let base = base
                .as_deref()
                .or(cli.from_currency.as_deref())
                .unwrap_or(DEFAULT_BASE);
            return Action::List {
                base: normalize_code(base),
            };
        }

        let (Some(amount), Some(from)) = (cli.amount, cli.from_currency.as_deref()) else {
            return Action::Help;
        };
        let from = normalize_code(from);

        match (&cli.to_currency, cli.all) {
            (_, true) => Action::ConvertAll { amount, from },
            (Some(to), false) => Action::Convert {
                amount,
                from,
                to: normalize_code(to),
            },
            (None, false) => Action::MissingTarget { amount, from },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(args: &[&str]) -> Action {
        let mut argv = vec!["curconv"];
        argv.extend_from_slice(args);
        Action::from_cli(&Cli::parse_from(argv))
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["curconv"]);
        assert!(cli.amount.is_none());
        assert!(cli.list.is_none());
        assert!(!cli.all);
        assert!(!cli.clear_cache);
    }

    #[test]
    fn test_cli_parse_positionals() {
        let cli = Cli::parse_from(["curconv", "100", "usd", "eur"]);
        assert_eq!(cli.amount, Some(100.0));
        assert_eq!(cli.from_currency.as_deref(), Some("usd"));
        assert_eq!(cli.to_currency.as_deref(), Some("eur"));
    }

    #[test]
    fn test_cli_parse_list_with_and_without_base() {
        let cli = Cli::parse_from(["curconv", "--list"]);
        assert!(cli.list.as_ref().unwrap().is_none());

        let cli = Cli::parse_from(["curconv", "-l", "EUR"]);
        assert_eq!(cli.list.as_ref().unwrap().as_deref(), Some("EUR"));
    }

    #[test]
    fn test_cli_parse_rejects_non_numeric_amount() {
        assert!(Cli::try_parse_from(["curconv", "ten", "USD", "EUR"]).is_err());
    }

    #[test]
    fn test_action_no_args_is_help() {
        assert_eq!(action(&[]), Action::Help);
    }

    #[test]
    fn test_action_amount_without_source_is_help() {
        assert_eq!(action(&["100"]), Action::Help);
    }

    #[test]
    fn test_action_clear_cache_wins() {
        assert_eq!(action(&["-c", "--list"]), Action::ClearCache);
        assert_eq!(action(&["--clear-cache", "1", "USD", "EUR"]), Action::ClearCache);
    }

    #[test]
    fn test_action_list_defaults_to_usd() {
        assert_eq!(action(&["--list"]), Action::List { base: "USD".to_string() });
    }

    #[test]
    fn test_action_list_uses_given_base() {
        assert_eq!(action(&["--list", "gbp"]), Action::List { base: "GBP".to_string() });
        assert_eq!(
            action(&["1", "jpy", "--list"]),
            Action::List { base: "JPY".to_string() }
        );
    }

    #[test]
    fn test_action_convert_normalizes_codes() {
        assert_eq!(
            action(&["12.5", "usd", "eur"]),
            Action::Convert {
                amount: 12.5,
                from: "USD".to_string(),
                to: "EUR".to_string(),
            }
        );
    }

    #[test]
    fn test_action_negative_amount() {
        assert_eq!(
            action(&["-3", "USD", "EUR"]),
            Action::Convert {
                amount: -3.0,
                from: "USD".to_string(),
                to: "EUR".to_string(),
            }
        );
    }

    #[test]
    fn test_action_all_wins_over_target() {
        let expected = Action::ConvertAll {
            amount: 5.0,
            from: "USD".to_string(),
        };
        assert_eq!(action(&["5", "USD", "--all"]), expected);
        assert_eq!(action(&["5", "USD", "EUR", "-a"]), expected);
    }

    #[test]
    fn test_action_missing_target() {
        assert_eq!(
            action(&["5", "usd"]),
            Action::MissingTarget {
                amount: 5.0,
                from: "USD".to_string(),
            }
        );
    }
}
