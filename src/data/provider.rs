//! Rate provider combining the on-disk cache with a remote source
//!
//! A cached table younger than the TTL is served without touching the network.
//! Otherwise a single fetch is attempted; when it fails for transport reasons
//! the cached table is served anyway, flagged as possibly outdated.

use chrono::Utc;
use std::time::Duration;
use thiserror::Error;

use super::source::{RateSource, SourceError};
use super::RateTable;
use crate::cache::{is_fresh, CacheEntry, RateCache};

/// Errors that end a rate lookup without any usable rate table
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The rate service answered with a failure status
    #[error("{error_type}")]
    Upstream { base: String, error_type: String },

    /// The fetch failed and nothing is cached for the base currency
    #[error("{source}")]
    Unavailable {
        base: String,
        #[source]
        source: SourceError,
    },
}

/// Where the rates of a lookup came from
#[derive(Debug, Clone, PartialEq)]
pub enum RateOrigin {
    /// Fresh cache entry, no network access
    Cache,
    /// Fetched from the rate service just now
    Network,
    /// Cache entry served because the fetch failed; may be outdated
    StaleCache {
        /// Why the fetch failed
        reason: String,
    },
}

/// Rates for a base currency along with their origin
#[derive(Debug, Clone, PartialEq)]
pub struct RateLookup {
    pub rates: RateTable,
    pub origin: RateOrigin,
}

impl RateLookup {
    /// Whether the rates may be outdated
    pub fn is_stale(&self) -> bool {
        matches!(self.origin, RateOrigin::StaleCache { .. })
    }
}

/// Serves rate tables, consulting the cache before the network
#[derive(Debug)]
pub struct RateProvider<S> {
    cache: RateCache,
    source: S,
    ttl: Duration,
}

impl<S: RateSource> RateProvider<S> {
    /// Creates a provider whose cache entries stay fresh for `ttl`
    pub fn new(cache: RateCache, source: S, ttl: Duration) -> Self {
        Self { cache, source, ttl }
    }

    /// Gets rates for `base` as of the current time
    pub async fn get_rates(&self, base: &str) -> Result<RateLookup, ProviderError> {
        self.get_rates_at(base, now_epoch_secs()).await
    }

    /// Gets rates for `base` as of `now` (seconds since the Unix epoch)
    ///
    /// # Returns
    /// * `Ok(RateLookup)` - fresh cache, fetched, or stale fallback rates
    /// * `Err(ProviderError::Upstream)` - the service reported an error; the cache is untouched
    /// * `Err(ProviderError::Unavailable)` - the fetch failed and nothing is cached
    pub async fn get_rates_at(&self, base: &str, now: f64) -> Result<RateLookup, ProviderError> {
        let mut cache = self.cache.load();

        if let Some(entry) = cache.get(base).filter(|entry| is_fresh(entry, now, self.ttl)) {
            tracing::debug!(base, "using cached exchange rates");
            return Ok(RateLookup {
                rates: entry.rates.clone(),
                origin: RateOrigin::Cache,
            });
        }

        match self.source.fetch_rates(base).await {
            Ok(rates) => {
                tracing::info!(base, currencies = rates.len(), "fetched exchange rates");
                cache.insert(base.to_string(), CacheEntry::new(now, rates.clone()));
                self.cache.save(&cache);

                Ok(RateLookup {
                    rates,
                    origin: RateOrigin::Network,
                })
            }
            Err(SourceError::Upstream(error_type)) => {
                tracing::warn!(base, %error_type, "rate service reported an error");
                Err(ProviderError::Upstream {
                    base: base.to_string(),
                    error_type,
                })
            }
            Err(e) => match cache.remove(base) {
                Some(entry) => {
                    tracing::warn!(base, error = %e, "fetch failed, falling back to cached rates");
                    Ok(RateLookup {
                        rates: entry.rates,
                        origin: RateOrigin::StaleCache {
                            reason: e.to_string(),
                        },
                    })
                }
                None => {
                    tracing::warn!(base, error = %e, "fetch failed and no cached rates exist");
                    Err(ProviderError::Unavailable {
                        base: base.to_string(),
                        source: e,
                    })
                }
            },
        }
    }
}

/// Current time in seconds since the Unix epoch
fn now_epoch_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
