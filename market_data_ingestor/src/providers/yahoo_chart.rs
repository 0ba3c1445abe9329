//! Yahoo Finance chart API (`/v8/finance/chart/{symbol}`).
//!
//! No API key is needed; the endpoint serves one symbol per request, so the
//! provider walks the requested symbols sequentially behind a rate limiter.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::{YahooProvider, YahooProviderConfig};
