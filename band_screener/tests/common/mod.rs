#![allow(dead_code)]

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use band_screener::{
    errors::SinkError,
    render::{ChartInput, ChartSink},
};
use chrono::{Duration, FixedOffset, TimeZone, Utc};
use market_data_ingestor::{
    models::{
        bar::{Bar, BarSeries},
        request_params::BarsRequestParams,
        timeframe::TimeFrame,
    },
    providers::{ApiSnafu, DataProvider, ProviderError},
};

/// Daily bars at 04:00 UTC (09:30 IST) on consecutive days from 2024-01-01.
pub fn daily_series(symbol: &str, closes: &[f64]) -> BarSeries {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 4, 0, 0).unwrap();
    BarSeries {
        symbol: symbol.to_string(),
        timeframe: TimeFrame::day(),
        exchange_offset: FixedOffset::east_opt(19800).unwrap(),
        bars: closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close * 1.01,
                low: close * 0.99,
                close,
                volume: 1_000.0,
            })
            .collect(),
    }
}

/// `n` closes growing by `step` per observation from 100.
pub fn trend(n: usize, step: f64) -> Vec<f64> {
    (0..n).map(|i| 100.0 + step * i as f64).collect()
}

/// Serves canned series; unknown symbols come back empty.
#[derive(Default)]
pub struct StubProvider {
    pub series: HashMap<String, BarSeries>,
    pub failing: HashSet<String>,
    pub requests: Mutex<Vec<BarsRequestParams>>,
}

impl StubProvider {
    pub fn with(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.series.insert(symbol.to_string(), daily_series(symbol, closes));
        self
    }

    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }
}

#[async_trait]
impl DataProvider for StubProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        self.requests.lock().unwrap().push(params.clone());
        let mut out = Vec::new();
        for symbol in &params.symbols {
            if self.failing.contains(symbol) {
                return ApiSnafu {
                    status: 503u16,
                    message: format!("{symbol} unavailable"),
                }
                .fail();
            }
            out.push(
                self.series
                    .get(symbol)
                    .cloned()
                    .unwrap_or_else(|| BarSeries::empty(symbol.clone(), params.timeframe)),
            );
        }
        Ok(out)
    }
}

/// Remembers which symbols were drawn instead of drawing them.
#[derive(Default)]
pub struct RecordingSink {
    pub drawn: RefCell<Vec<String>>,
}

impl ChartSink for RecordingSink {
    type Output = String;

    fn write(&self, chart: &ChartInput<'_>) -> Result<String, SinkError> {
        assert_eq!(chart.series.len(), chart.indicators.len());
        let symbol = chart.series.symbol().to_string();
        self.drawn.borrow_mut().push(symbol.clone());
        Ok(symbol)
    }
}
