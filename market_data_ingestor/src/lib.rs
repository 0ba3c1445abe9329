//! Vendor-agnostic market data models and the providers that fill them.

pub mod models;
pub mod providers;
