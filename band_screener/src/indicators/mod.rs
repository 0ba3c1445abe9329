//! Bollinger Bands and MACD over a [`PriceSeries`].

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod sma;

use crate::series::PriceSeries;

pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_K: f64 = 2.0;
pub const MACD_SHORT_SPAN: usize = 12;
pub const MACD_LONG_SPAN: usize = 26;
pub const MACD_SIGNAL_SPAN: usize = 9;
/// Trend overlay on the price panel; not part of [`IndicatorSet`].
pub const DISPLAY_EMA_SPAN: usize = 50;

/// Indicator series aligned index-for-index with the source series.
///
/// The first `BOLLINGER_WINDOW - 1` entries of the band fields are `None`;
/// the EMA-derived fields are defined everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub sma: Vec<Option<f64>>,
    pub std: Vec<Option<f64>>,
    pub upper_band: Vec<Option<f64>>,
    pub lower_band: Vec<Option<f64>>,
    pub short_ema: Vec<f64>,
    pub long_ema: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl IndicatorSet {
    pub fn compute(series: &PriceSeries) -> Self {
        let closes = series.closes();
        let bands = bollinger::bollinger_bands(&closes, BOLLINGER_WINDOW, BOLLINGER_K);
        let m = macd::macd(&closes, MACD_SHORT_SPAN, MACD_LONG_SPAN, MACD_SIGNAL_SPAN);

        Self {
            sma: bands.middle,
            std: bands.std,
            upper_band: bands.upper,
            lower_band: bands.lower,
            short_ema: m.short_ema,
            long_ema: m.long_ema,
            macd: m.line,
            signal: m.signal,
        }
    }

    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    pub fn histogram(&self) -> Vec<f64> {
        self.macd.iter().zip(&self.signal).map(|(m, s)| m - s).collect()
    }
}
