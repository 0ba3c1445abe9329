use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{asset::AssetClass, timeframe::TimeFrame};

/// Universal parameters for requesting time-series bar data from any market data provider.
///
/// This struct is designed to be vendor-agnostic and supports multiple asset classes
/// (e.g., equities, indices). It is intended as the standard input for all
/// [`DataProvider`](crate::providers::DataProvider) implementations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BarsRequestParams {
    /// List of symbols to request (e.g., `["RELIANCE.NS"]`, `["^NSEI"]`).
    pub symbols: Vec<String>,

    /// The time interval for each bar (e.g., 1 minute, 1 day).
    ///
    /// **Validation of allowed values is performed by each data provider
    /// implementation, according to their own API rules.**
    pub timeframe: TimeFrame,

    /// Start of the requested time range (inclusive, UTC).
    pub start: DateTime<Utc>,

    /// End of the requested time range (exclusive, UTC).
    pub end: DateTime<Utc>,

    /// The asset class for the requested symbols.
    ///
    /// Providers use it to shape the request, e.g. whether corporate
    /// action events are worth asking for.
    pub asset_class: AssetClass,
}

impl BarsRequestParams {
    /// Daily bars for a single symbol over `[start, end)`.
    pub fn daily(
        symbol: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        asset_class: AssetClass,
    ) -> Self {
        Self {
            symbols: vec![symbol.into()],
            timeframe: TimeFrame::day(),
            start,
            end,
            asset_class,
        }
    }
}
