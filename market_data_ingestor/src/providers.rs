//! Provider abstraction for market data sources.
//!
//! This module defines the [`DataProvider`] trait, which serves as a unified interface
//! for fetching time-series bar data from any market data vendor (e.g., Yahoo Finance).
//!
//! Each concrete provider implementation should implement [`DataProvider`] to handle
//! vendor-specific API logic and validation.
//!
//! The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
//! for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{
//!     bar::BarSeries,
//!     request_params::BarsRequestParams,
//! };
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_bars(
//!         &self,
//!         _params: BarsRequestParams,
//!     ) -> Result<Vec<BarSeries>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```
//!

pub mod yahoo_chart;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar::BarSeries, request_params::BarsRequestParams};

/// Trait for fetching time-series bar data from a market data provider.
///
/// Implement this trait for each concrete data vendor.
/// The trait is designed for async usage and supports dynamic dispatch (`dyn DataProvider`)
/// for runtime selection of providers.
#[async_trait]
pub trait DataProvider {
    /// Fetches time-series bar data for the given request parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameters specifying symbols, timeframe, and date range.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<BarSeries>)` - A vector of bar series, one per requested symbol, in
    ///   request order. A symbol the vendor knows nothing about yields an empty series.
    /// * `Err(ProviderError)` - If the request fails.
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"), context(false))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// A configured header value contains invalid characters.
    #[snafu(display("Invalid header value: {source}"), context(false))]
    InvalidHeader {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },

    /// The configured base URL cannot be used.
    #[snafu(display("Invalid base URL {url:?}: {message}"))]
    InvalidBaseUrl {
        url: String,
        message: String,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"), context(false))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API returned an error status or error payload.
    #[snafu(display("API error ({status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An internal error occurred while processing data within the provider.
    #[snafu(display("Internal provider error: {message}"))]
    Internal {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"), context(false))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::models::{asset::AssetClass, timeframe::TimeFrame};

    struct YahooStub;
    struct EmptyStub;

    #[async_trait]
    impl DataProvider for YahooStub {
        async fn fetch_bars(
            &self,
            params: BarsRequestParams,
        ) -> Result<Vec<BarSeries>, ProviderError> {
            Ok(params
                .symbols
                .iter()
                .map(|s| BarSeries::empty(s.clone(), params.timeframe))
                .collect())
        }
    }

    #[async_trait]
    impl DataProvider for EmptyStub {
        async fn fetch_bars(
            &self,
            _params: BarsRequestParams,
        ) -> Result<Vec<BarSeries>, ProviderError> {
            ValidationSnafu {
                message: "stub rejects everything",
            }
            .fail()
        }
    }

    // Picks a provider at runtime; only possible through `Box<dyn DataProvider>`.
    fn get_provider(name: &str) -> Box<dyn DataProvider + Send + Sync> {
        if name == "yahoo" {
            Box::new(YahooStub)
        } else {
            Box::new(EmptyStub)
        }
    }

    #[tokio::test]
    async fn test_dynamic_provider() {
        let now = Utc::now();

        let provider = get_provider("yahoo");
        let params = BarsRequestParams::daily("INFY.NS", now, now, AssetClass::Equity);
        let result = provider.fetch_bars(params).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].symbol, "INFY.NS");
        assert_eq!(result[0].timeframe, TimeFrame::day());

        let provider = get_provider("other");
        let params = BarsRequestParams::daily("INFY.NS", now, now, AssetClass::Equity);
        let err = provider.fetch_bars(params).await.unwrap_err();
        assert!(matches!(err, ProviderError::Validation { .. }));
    }
}
