//! Currency Converter Library
//!
//! This module exposes the rate cache, provider, and CLI modules for use in
//! integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod output;
