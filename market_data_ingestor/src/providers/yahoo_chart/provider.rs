use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, StatusCode, Url, header};
use tracing::debug;

use crate::{
    models::{
        bar::{Bar, BarSeries},
        request_params::BarsRequestParams,
        timeframe::TimeFrame,
    },
    providers::{
        ApiSnafu, DataProvider, InternalSnafu, InvalidBaseUrlSnafu, ProviderError,
        ProviderInitError,
        yahoo_chart::{
            params::{chart_url, construct_params, validate_timeframe},
            response::{ChartResponse, ChartResult},
        },
    },
};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

// The chart endpoint rejects requests without a browser-like agent.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Connection settings for [`YahooProvider`].
#[derive(Clone, Debug)]
pub struct YahooProviderConfig {
    /// Scheme and host, without the `/v8/...` path.
    pub base_url: String,
    /// Upper bound on outgoing requests per second.
    pub requests_per_second: NonZeroU32,
    pub user_agent: String,
}

impl Default for YahooProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            requests_per_second: nonzero!(2u32),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

pub struct YahooProvider {
    client: Client,
    base_url: Url,
    limiter: DefaultDirectRateLimiter,
}

impl YahooProvider {
    pub fn with_config(config: YahooProviderConfig) -> Result<Self, ProviderInitError> {
        let base_url = match Url::parse(&config.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            Ok(_) => {
                return InvalidBaseUrlSnafu {
                    url: config.base_url,
                    message: "expected an http(s) URL",
                }
                .fail();
            }
            Err(e) => {
                return InvalidBaseUrlSnafu {
                    url: config.base_url,
                    message: e.to_string(),
                }
                .fail();
            }
        };

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)?,
        );
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url,
            limiter: RateLimiter::direct(Quota::per_second(config.requests_per_second)),
        })
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        params: &BarsRequestParams,
        interval: &str,
    ) -> Result<BarSeries, ProviderError> {
        self.limiter.until_ready().await;

        let url = chart_url(&self.base_url, symbol);
        let query_params = construct_params(params, interval);
        debug!(%symbol, %url, "requesting chart");

        let response = self.client.get(url).query(&query_params).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(%symbol, "symbol not found");
            return Ok(BarSeries::empty(symbol, params.timeframe));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                status: status.as_u16(),
                message,
            }
            .fail();
        }

        let body = response.json::<ChartResponse>().await?;
        if let Some(err) = body.chart.error {
            if err.is_not_found() {
                return Ok(BarSeries::empty(symbol, params.timeframe));
            }
            return ApiSnafu {
                status: status.as_u16(),
                message: err.description.unwrap_or(err.code),
            }
            .fail();
        }

        match body.chart.result.and_then(|r| r.into_iter().next()) {
            Some(result) => into_bar_series(symbol, params.timeframe, result),
            None => Ok(BarSeries::empty(symbol, params.timeframe)),
        }
    }
}

/// Turns the column-oriented chart payload into a row-oriented [`BarSeries`].
///
/// Rows without a close are dropped; missing open/high/low fall back to the
/// close and a missing volume to zero.
pub fn into_bar_series(
    symbol: &str,
    timeframe: TimeFrame,
    result: ChartResult,
) -> Result<BarSeries, ProviderError> {
    let exchange_offset = match FixedOffset::east_opt(result.meta.gmt_offset) {
        Some(offset) => offset,
        None => {
            return InternalSnafu {
                message: format!("invalid gmtoffset {}", result.meta.gmt_offset),
            }
            .fail();
        }
    };

    fn cell(column: &[Option<f64>], i: usize) -> Option<f64> {
        column.get(i).copied().flatten()
    }

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = cell(&quote.close, i) else {
            continue;
        };
        let Some(timestamp) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            return InternalSnafu {
                message: format!("timestamp {ts} out of range"),
            }
            .fail();
        };
        bars.push(Bar {
            timestamp,
            open: cell(&quote.open, i).unwrap_or(close),
            high: cell(&quote.high, i).unwrap_or(close),
            low: cell(&quote.low, i).unwrap_or(close),
            close,
            volume: cell(&quote.volume, i).unwrap_or(0.0),
        });
    }

    Ok(BarSeries {
        symbol: symbol.to_string(),
        timeframe,
        exchange_offset: if bars.is_empty() {
            Utc.fix()
        } else {
            exchange_offset
        },
        bars,
    })
}

#[async_trait]
impl DataProvider for YahooProvider {
    async fn fetch_bars(&self, params: BarsRequestParams) -> Result<Vec<BarSeries>, ProviderError> {
        // Validate the timeframe before touching the network.
        let interval = validate_timeframe(&params.timeframe)?;

        let mut result = Vec::with_capacity(params.symbols.len());
        for symbol in &params.symbols {
            let series = self.fetch_symbol(symbol, &params, interval).await?;
            debug!(%symbol, bars = series.bars.len(), "chart fetched");
            result.push(series);
        }
        Ok(result)
    }
}
