use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Url;

use crate::{
    models::{
        asset::AssetClass,
        request_params::BarsRequestParams,
        timeframe::{TimeFrame, TimeFrameUnit},
    },
    providers::{ProviderError, ValidationSnafu},
};

/// Characters left as-is in a ticker path segment; `^` and `&` get escaped.
const TICKER: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'=');

/// Maps a [`TimeFrame`] onto one of the interval strings the chart API accepts.
pub fn validate_timeframe(timeframe: &TimeFrame) -> Result<&'static str, ProviderError> {
    let interval = match (timeframe.unit, timeframe.amount) {
        (TimeFrameUnit::Minute, 1) => "1m",
        (TimeFrameUnit::Minute, 2) => "2m",
        (TimeFrameUnit::Minute, 5) => "5m",
        (TimeFrameUnit::Minute, 15) => "15m",
        (TimeFrameUnit::Minute, 30) => "30m",
        (TimeFrameUnit::Minute, 60) | (TimeFrameUnit::Hour, 1) => "1h",
        (TimeFrameUnit::Minute, 90) => "90m",
        (TimeFrameUnit::Day, 1) => "1d",
        (TimeFrameUnit::Day, 5) => "5d",
        (TimeFrameUnit::Week, 1) => "1wk",
        (TimeFrameUnit::Month, 1) => "1mo",
        (TimeFrameUnit::Month, 3) => "3mo",
        _ => {
            return ValidationSnafu {
                message: format!("Yahoo chart API does not support a {timeframe} interval"),
            }
            .fail();
        }
    };
    Ok(interval)
}

/// Builds the query string for one chart request.
///
/// Dividend and split events are only requested for equities; indices have none.
pub fn construct_params(params: &BarsRequestParams, interval: &str) -> Vec<(String, String)> {
    let mut query = vec![
        ("period1".to_string(), params.start.timestamp().to_string()),
        ("period2".to_string(), params.end.timestamp().to_string()),
        ("interval".to_string(), interval.to_string()),
        ("includePrePost".to_string(), "false".to_string()),
    ];
    if params.asset_class == AssetClass::Equity {
        query.push(("events".to_string(), "div,splits".to_string()));
    }
    query
}

/// `{base}/v8/finance/chart/{symbol}`, keeping any path prefix of `base`.
pub fn chart_url(base: &Url, symbol: &str) -> Url {
    let mut url = base.clone();
    let path = format!(
        "{}/v8/finance/chart/{}",
        base.path().trim_end_matches('/'),
        utf8_percent_encode(symbol, TICKER)
    );
    url.set_path(&path);
    url
}
