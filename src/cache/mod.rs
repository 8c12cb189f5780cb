//! Cache module for storing exchange rates on disk
//!
//! This module provides a rate cache that persists one rate table per base
//! currency in a single JSON file, together with the freshness check used to
//! decide whether a cached table can be served without a network call.

mod manager;

pub use manager::{is_fresh, Cache, CacheEntry, RateCache};
