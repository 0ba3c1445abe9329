//! Date-indexed daily price series for one symbol.

use chrono::NaiveDate;
use market_data_ingestor::models::bar::BarSeries;

/// One trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Chronologically ordered daily bars, at most one per date.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Builds a series, enforcing its ordering invariant.
    ///
    /// Bars are sorted by date, bars with a non-finite close are dropped and,
    /// for a repeated date, the bar that came last in the input wins.
    pub fn new(symbol: impl Into<String>, mut bars: Vec<PriceBar>) -> Self {
        bars.retain(|b| b.close.is_finite());
        // Stable, so equal dates keep their input order.
        bars.sort_by_key(|b| b.date);

        let mut unique: Vec<PriceBar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match unique.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => unique.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: unique,
        }
    }

    pub fn from_bar_series(series: &BarSeries) -> Self {
        let bars = series
            .bars
            .iter()
            .map(|b| PriceBar {
                date: b.trading_date(series.exchange_offset),
                open: b.open,
                high: b.high,
                low: b.low,
                close: b.close,
                volume: b.volume,
            })
            .collect();
        Self::new(series.symbol.clone(), bars)
    }

    /// A closes-only series on consecutive calendar days from `start`.
    pub fn from_closes(symbol: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let bars = start
            .iter_days()
            .zip(closes)
            .map(|(date, &close)| PriceBar {
                date,
                open: close,
                high: close,
                low: close,
                close,
                volume: 0.0,
            })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn first_close(&self) -> Option<f64> {
        self.bars.first().map(|b| b.close)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Close of the `n`-th observation counted from the end (`n = 1` is the latest).
    pub fn close_from_end(&self, n: usize) -> Option<f64> {
        if n == 0 || n > self.bars.len() {
            return None;
        }
        Some(self.bars[self.bars.len() - n].close)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};
    use market_data_ingestor::models::{bar::Bar, timeframe::TimeFrame};

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn bar(d: u32, close: f64) -> PriceBar {
        PriceBar {
            date: day(d),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn sorts_and_keeps_last_duplicate() {
        let series = PriceSeries::new(
            "X",
            vec![bar(3, 3.0), bar(1, 1.0), bar(3, 3.5), bar(2, f64::NAN), bar(2, 2.0)],
        );
        assert_eq!(series.dates(), vec![day(1), day(2), day(3)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.5]);
    }

    #[test]
    fn close_from_end_is_positional() {
        let series = PriceSeries::from_closes("X", day(1), &[10.0, 11.0, 12.0]);
        assert_eq!(series.close_from_end(1), Some(12.0));
        assert_eq!(series.close_from_end(3), Some(10.0));
        assert_eq!(series.close_from_end(4), None);
        assert_eq!(series.close_from_end(0), None);
    }

    #[test]
    fn bar_series_dates_follow_the_exchange() {
        let ist = FixedOffset::east_opt(19800).unwrap();
        let mk = |h: u32, d: u32, close: f64| Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 5, d, h, 45, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        };
        let bar_series = BarSeries {
            symbol: "TCS.NS".into(),
            timeframe: TimeFrame::day(),
            exchange_offset: ist,
            // The second bar is a live quote for the same session as the first.
            bars: vec![mk(3, 6, 100.0), mk(9, 6, 101.0), mk(3, 7, 102.0)],
        };

        let series = PriceSeries::from_bar_series(&bar_series);
        assert_eq!(series.symbol(), "TCS.NS");
        assert_eq!(series.dates(), vec![day(6), day(7)]);
        assert_eq!(series.closes(), vec![101.0, 102.0]);
    }
}
