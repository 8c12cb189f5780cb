//! Application logic for a single converter run
//!
//! Executes an `Action` against a rate provider and writes the user-facing
//! output. Every failure is reported as a message; the run itself still
//! completes normally.

use std::io::{self, Write};

use crate::cache::RateCache;
use crate::cli::Action;
use crate::data::{convert, ProviderError, RateLookup, RateOrigin, RateProvider, RateSource};
use crate::output::{format_all_conversions, format_conversion, format_currency_grid, STALE_NOTICE};

/// Deletes the cache file and reports the outcome
pub fn clear_cache(cache: &RateCache, out: &mut impl Write) -> io::Result<()> {
    match cache.clear() {
        Ok(true) => writeln!(out, "Cache cleared successfully"),
        Ok(false) => writeln!(out, "No cache file exists"),
        Err(e) => writeln!(out, "Error: failed to clear cache: {e}"),
    }
}

/// Runs a rate-dependent action, writing results to `out`
///
/// `ClearCache` and `Help` need no rates and are handled by the caller;
/// they produce no output here.
pub async fn run<S: RateSource>(
    provider: &RateProvider<S>,
    action: &Action,
    out: &mut impl Write,
) -> io::Result<()> {
    match action {
        Action::List { base } => {
            let Some(lookup) = lookup_rates(provider, base, out).await? else {
                return Ok(());
            };
            writeln!(out, "Base currency: {base}")?;
            writeln!(out)?;
            writeln!(out, "{}", format_currency_grid(&lookup.rates))
        }
        Action::Convert { amount, from, to } => {
            let Some(lookup) = lookup_rates(provider, from, out).await? else {
                return Ok(());
            };
            match convert(*amount, &lookup.rates, to) {
                Ok(converted) => writeln!(out, "{}", format_conversion(*amount, from, converted, to)),
                Err(e) => writeln!(out, "Error: {e}"),
            }
        }
        Action::ConvertAll { amount, from } => {
            let Some(lookup) = lookup_rates(provider, from, out).await? else {
                return Ok(());
            };
            writeln!(out)?;
            writeln!(out, "{}", format_all_conversions(*amount, from, &lookup.rates))
        }
        Action::MissingTarget { from, .. } => {
            let Some(lookup) = lookup_rates(provider, from, out).await? else {
                return Ok(());
            };
            writeln!(
                out,
                "Please specify a target currency or use --all to convert to all currencies"
            )?;
            writeln!(out)?;
            writeln!(out, "{}", format_currency_grid(&lookup.rates))
        }
        Action::ClearCache | Action::Help => Ok(()),
    }
}

/// Fetches rates for `base`, reporting failures and staleness to `out`
///
/// Returns `None` when no rates are available.
async fn lookup_rates<S: RateSource>(
    provider: &RateProvider<S>,
    base: &str,
    out: &mut impl Write,
) -> io::Result<Option<RateLookup>> {
    match provider.get_rates(base).await {
        Ok(lookup) => {
            if let RateOrigin::StaleCache { reason } = &lookup.origin {
                writeln!(out, "Error fetching exchange rates: {reason}")?;
                writeln!(out, "{STALE_NOTICE}")?;
            }
            Ok(Some(lookup))
        }
        Err(ProviderError::Upstream { error_type, .. }) => {
            writeln!(out, "Error: {error_type}")?;
            Ok(None)
        }
        Err(e @ ProviderError::Unavailable { .. }) => {
            writeln!(out, "Error fetching exchange rates: {e}")?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, CacheEntry};
    use crate::data::{RateTable, SourceError};
    use chrono::Utc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Rate source that always fails the way a refused connection would surface
    struct OfflineSource;

    impl RateSource for OfflineSource {
        async fn fetch_rates(&self, _base: &str) -> Result<RateTable, SourceError> {
            Err(SourceError::MissingField("rates".to_string()))
        }
    }

    /// Rate source that always reports an upstream failure
    struct RejectingSource;

    impl RateSource for RejectingSource {
        async fn fetch_rates(&self, _base: &str) -> Result<RateTable, SourceError> {
            Err(SourceError::Upstream("unsupported-code".to_string()))
        }
    }

    fn seeded_cache(temp_dir: &TempDir, age_secs: f64) -> RateCache {
        let cache = RateCache::new(temp_dir.path().join("rates.json"));
        let now = Utc::now().timestamp() as f64;
        let rates = RateTable::from([
            ("USD".to_string(), 1.0),
            ("EUR".to_string(), 0.9),
            ("GBP".to_string(), 0.8),
        ]);
        let mut seeded = Cache::new();
        seeded.insert("USD".to_string(), CacheEntry::new(now - age_secs, rates));
        cache.save(&seeded);
        cache
    }

    async fn run_to_string<S: RateSource>(provider: &RateProvider<S>, action: Action) -> String {
        let mut out = Vec::new();
        run(provider, &action, &mut out).await.expect("Writing to a Vec should not fail");
        String::from_utf8(out).expect("Output should be UTF-8")
    }

    fn day() -> Duration {
        Duration::from_secs(86_400)
    }

    #[tokio::test]
    async fn test_convert_from_fresh_cache() {
        let temp_dir = TempDir::new().unwrap();
        let provider = RateProvider::new(seeded_cache(&temp_dir, 60.0), OfflineSource, day());

        let output = run_to_string(
            &provider,
            Action::Convert {
                amount: 10.0,
                from: "USD".to_string(),
                to: "EUR".to_string(),
            },
        )
        .await;

        assert_eq!(output, "10 USD = 9.00 EUR\n");
    }

    #[tokio::test]
    async fn test_convert_unknown_target_prints_error() {
        let temp_dir = TempDir::new().unwrap();
        let provider = RateProvider::new(seeded_cache(&temp_dir, 60.0), OfflineSource, day());

        let output = run_to_string(
            &provider,
            Action::Convert {
                amount: 10.0,
                from: "USD".to_string(),
                to: "JPY".to_string(),
            },
        )
        .await;

        assert_eq!(output, "Error: Target currency 'JPY' not found\n");
    }

    #[tokio::test]
    async fn test_stale_rates_print_notice_before_result() {
        let temp_dir = TempDir::new().unwrap();
        let provider = RateProvider::new(seeded_cache(&temp_dir, 3.0 * 86_400.0), OfflineSource, day());

        let output = run_to_string(
            &provider,
            Action::Convert {
                amount: 1.0,
                from: "USD".to_string(),
                to: "GBP".to_string(),
            },
        )
        .await;

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Error fetching exchange rates:"));
        assert_eq!(lines[1], STALE_NOTICE);
        assert_eq!(lines[2], "1 USD = 0.80 GBP");
    }

    #[tokio::test]
    async fn test_unavailable_rates_print_error_only() {
        let temp_dir = TempDir::new().unwrap();
        let cache = RateCache::new(temp_dir.path().join("rates.json"));
        let provider = RateProvider::new(cache, OfflineSource, day());

        let output = run_to_string(&provider, Action::List { base: "USD".to_string() }).await;

        assert!(output.starts_with("Error fetching exchange rates:"));
        assert_eq!(output.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_upstream_error_prints_error_type() {
        let temp_dir = TempDir::new().unwrap();
        let cache = RateCache::new(temp_dir.path().join("rates.json"));
        let provider = RateProvider::new(cache, RejectingSource, day());

        let output = run_to_string(&provider, Action::List { base: "XXX".to_string() }).await;

        assert_eq!(output, "Error: unsupported-code\n");
    }

    #[tokio::test]
    async fn test_list_prints_base_and_grid() {
        let temp_dir = TempDir::new().unwrap();
        let provider = RateProvider::new(seeded_cache(&temp_dir, 60.0), OfflineSource, day());

        let output = run_to_string(&provider, Action::List { base: "USD".to_string() }).await;

        assert_eq!(
            output,
            "Base currency: USD\n\nAvailable currencies:\n  EUR  GBP  USD\n"
        );
    }

    #[tokio::test]
    async fn test_convert_all_prints_table() {
        let temp_dir = TempDir::new().unwrap();
        let provider = RateProvider::new(seeded_cache(&temp_dir, 60.0), OfflineSource, day());

        let output = run_to_string(
            &provider,
            Action::ConvertAll {
                amount: 2.0,
                from: "USD".to_string(),
            },
        )
        .await;

        assert_eq!(
            output,
            "\nConversions for 2 USD:\n  EUR : 1.80\n  GBP : 1.60\n  USD : 2.00\n"
        );
    }

    #[tokio::test]
    async fn test_missing_target_prints_hint_and_grid() {
        let temp_dir = TempDir::new().unwrap();
        let provider = RateProvider::new(seeded_cache(&temp_dir, 60.0), OfflineSource, day());

        let output = run_to_string(
            &provider,
            Action::MissingTarget {
                amount: 2.0,
                from: "USD".to_string(),
            },
        )
        .await;

        assert!(output.starts_with("Please specify a target currency"));
        assert!(output.contains("  EUR  GBP  USD"));
    }

    #[test]
    fn test_clear_cache_messages() {
        let temp_dir = TempDir::new().unwrap();
        let cache = seeded_cache(&temp_dir, 0.0);

        let mut out = Vec::new();
        clear_cache(&cache, &mut out).unwrap();
        clear_cache(&cache, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Cache cleared successfully\nNo cache file exists\n"
        );
    }
}
