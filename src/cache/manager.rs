//! Rate cache persisted as a single JSON file
//!
//! Provides a `RateCache` that stores one rate table per base currency together
//! with the time it was fetched. Every failure on the read path degrades to an
//! empty cache and every failure on the write path is logged and swallowed.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::data::RateTable;

/// A cached rate table for one base currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the rates were fetched, in seconds since the Unix epoch
    pub timestamp: f64,
    /// Rates relative to one unit of the base currency
    pub rates: RateTable,
}

impl CacheEntry {
    /// Creates an entry fetched at `timestamp`
    pub fn new(timestamp: f64, rates: RateTable) -> Self {
        Self { timestamp, rates }
    }
}

/// Cached entries keyed by base currency code
pub type Cache = BTreeMap<String, CacheEntry>;

/// Reads and writes the cache file
///
/// The whole cache lives in one file (`~/.currency_cache.json` by default),
/// shaped as `{"USD": {"timestamp": ..., "rates": {...}}, ...}`. It is reloaded
/// on every query and never held open between calls.
#[derive(Debug, Clone)]
pub struct RateCache {
    /// Location of the cache file
    path: PathBuf,
}

impl RateCache {
    /// Creates a RateCache backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cache from disk
    ///
    /// A missing, empty, or unparseable file yields an empty cache.
    pub fn load(&self) -> Cache {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), error = %e, "failed to read rate cache");
                }
                return Cache::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt rate cache");
                Cache::new()
            }
        }
    }

    /// Writes the full cache back to disk, replacing the previous content
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save(&self, cache: &Cache) {
        match self.write(cache) {
            Ok(()) => tracing::debug!(path = %self.path.display(), entries = cache.len(), "saved rate cache"),
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "failed to save rate cache"),
        }
    }

    fn write(&self, cache: &Cache) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(cache)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        fs::write(&self.path, json)
    }

    /// Deletes the cache file
    ///
    /// # Returns
    /// * `Ok(true)` if a file existed and was removed
    /// * `Ok(false)` if there was no file to remove
    /// * `Err` if the file exists but could not be removed
    pub fn clear(&self) -> io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "cleared rate cache");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Returns true iff `entry` is younger than `ttl` at time `now` (epoch seconds)
///
/// An entry exactly `ttl` old is stale.
pub fn is_fresh(entry: &CacheEntry, now: f64, ttl: Duration) -> bool {
    now - entry.timestamp < ttl.as_secs_f64()
}
