//! Canonical in-memory representation of a time-series bar (OHLCV).
//!
//! This struct is used as the standard output for all [`DataProvider`](crate::providers::DataProvider)
//! implementations, regardless of asset class (equities, indices, etc.).

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};

use crate::models::timeframe::TimeFrame;

/// A single time-series bar (OHLCV) for a given timestamp.
///
/// This struct is vendor-agnostic and is used throughout the data ingestion pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// The timestamp for this bar (UTC).
    pub timestamp: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price during the bar interval.
    pub high: f64,

    /// Lowest price during the bar interval.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Volume traded during the bar interval.
    pub volume: f64,
}

impl Bar {
    /// Calendar date of this bar as seen from the exchange's local time.
    pub fn trading_date(&self, exchange_offset: FixedOffset) -> NaiveDate {
        self.timestamp.with_timezone(&exchange_offset).date_naive()
    }
}

/// Represents a complete set of time-series data for a single symbol.
///
/// This struct groups a vector of [`Bar`]s with their corresponding symbol
/// and [`TimeFrame`], making the data set self-describing.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    /// The symbol this data represents (e.g., "RELIANCE.NS", "^NSEI").
    pub symbol: String,
    /// The time interval for each bar in the series.
    pub timeframe: TimeFrame,
    /// UTC offset of the exchange the symbol trades on.
    ///
    /// Daily bars are stamped with the session open, so the trading date must
    /// be read in exchange-local time rather than UTC.
    pub exchange_offset: FixedOffset,
    /// The collection of OHLCV bars.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// A series with no bars, e.g. for a delisted or unknown symbol.
    pub fn empty(symbol: impl Into<String>, timeframe: TimeFrame) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe,
            exchange_offset: Utc.fix(),
            bars: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn trading_date_uses_exchange_offset() {
        // 2024-03-04 22:30 UTC is already 2024-03-05 in Kolkata (+05:30).
        let bar = Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 22, 30, 0).unwrap(),
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            volume: 0.0,
        };
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        assert_eq!(bar.trading_date(ist), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        let utc = FixedOffset::east_opt(0).unwrap();
        assert_eq!(bar.trading_date(utc), NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }
}
