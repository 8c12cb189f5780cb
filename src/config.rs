//! Runtime configuration for rate lookups
//!
//! Holds the cache location, freshness window, service URL, and request
//! timeout. Defaults match the public ExchangeRate-API setup; the CLI may
//! override the cache location and TTL.

use directories::BaseDirs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;

/// File name of the cache in the user's home directory
pub const CACHE_FILE_NAME: &str = ".currency_cache.json";

/// Default rate service URL template; `{base}` is replaced by the base currency
pub const DEFAULT_API_URL: &str = "https://open.er-api.com/v6/latest/{base}";

/// Default freshness window for cached rates (24 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default bound on a single rate request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the rate cache and provider
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Location of the cache file
    pub cache_path: PathBuf,
    /// Maximum age of a cache entry served without refreshing
    pub ttl: Duration,
    /// Rate service URL template
    pub api_url: String,
    /// Timeout applied to each HTTP request
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_path: default_cache_path(),
            ttl: DEFAULT_TTL,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Creates a Config from the defaults, applying overrides from parsed CLI arguments
    pub fn from_cli(cli: &Cli) -> Self {
        let mut config = Self::default();

        if let Some(path) = &cli.cache_file {
            config.cache_path = path.clone();
        }
        if let Some(hours) = cli.ttl_hours {
            config.ttl = Duration::from_secs(hours.saturating_mul(60 * 60));
        }

        config
    }
}

/// Returns `~/.currency_cache.json`, or a file in the working directory
/// when no home directory can be determined
pub fn default_cache_path() -> PathBuf {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(CACHE_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(CACHE_FILE_NAME))
}
