//! Bollinger Band / MACD screener for a list of exchange-listed symbols.
//!
//! The pipeline is linear: symbols are loaded from a CSV file
//! ([`symbols`]), daily bars are fetched through a
//! [`DataProvider`](market_data_ingestor::providers::DataProvider), indicators
//! are computed ([`indicators`]), the momentum filters decide inclusion
//! ([`filters`]) and surviving symbols are drawn ([`render`]). [`screener`]
//! ties the stages together.

pub mod cli;
pub mod config;
pub mod errors;
pub mod filters;
pub mod indicators;
pub mod render;
pub mod screener;
pub mod series;
pub mod symbols;
