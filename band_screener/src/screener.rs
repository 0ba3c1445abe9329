//! Orchestrates one screening run: fetch, compute, filter, render.
//!
//! A run is strictly sequential. The benchmark is fetched once up front and
//! shared read-only by every symbol; each symbol is fetched, evaluated and
//! (if it survives the filters) drawn before the next one starts.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use market_data_ingestor::{
    models::{asset::AssetClass, request_params::BarsRequestParams},
    providers::{
        DataProvider, ProviderError,
        yahoo_chart::{YahooProvider, YahooProviderConfig},
    },
};
use tracing::{info, warn};

use crate::{
    config::ScreenConfig,
    errors::ScreenError,
    filters::Rejection,
    indicators::IndicatorSet,
    render::{ChartInput, ChartSink, SvgChartSink},
    series::PriceSeries,
};

/// What happened to one input symbol.
#[derive(Debug)]
pub enum SymbolOutcome<T> {
    /// Passed every selected filter; carries the sink's output.
    Rendered(T),
    /// Data was fetched but at least one selected filter rejected it.
    Excluded(Vec<Rejection>),
    /// The provider has no bars for the symbol (delisted or unknown).
    NoData,
    /// The per-symbol request failed; the run carried on without it.
    FetchFailed(String),
}

#[derive(Debug)]
pub struct SymbolReport<T> {
    /// Symbol as requested from the provider, market suffix included.
    pub symbol: String,
    pub outcome: SymbolOutcome<T>,
}

/// Per-symbol outcomes of a run, in input order.
#[derive(Debug)]
pub struct RunSummary<T> {
    pub benchmark_observations: usize,
    pub reports: Vec<SymbolReport<T>>,
}

impl<T> RunSummary<T> {
    pub fn rendered(&self) -> impl Iterator<Item = (&str, &T)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            SymbolOutcome::Rendered(out) => Some((r.symbol.as_str(), out)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&SymbolOutcome<T>) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}

impl<T> fmt::Display for RunSummary<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rendered, {} excluded, {} without data, {} failed",
            self.count(|o| matches!(o, SymbolOutcome::Rendered(_))),
            self.count(|o| matches!(o, SymbolOutcome::Excluded(_))),
            self.count(|o| matches!(o, SymbolOutcome::NoData)),
            self.count(|o| matches!(o, SymbolOutcome::FetchFailed(_))),
        )
    }
}

pub struct Screener<S> {
    provider: Box<dyn DataProvider + Send + Sync>,
    sink: S,
    config: ScreenConfig,
}

impl Screener<SvgChartSink> {
    /// Yahoo provider and SVG files under `config.out_dir`.
    pub fn from_config(config: ScreenConfig) -> Result<Self, ScreenError> {
        let provider = YahooProvider::with_config(YahooProviderConfig {
            base_url: config.base_url.clone(),
            requests_per_second: config.requests_per_second,
            ..Default::default()
        })?;
        let sink = SvgChartSink::new(&config.out_dir)?;
        Ok(Self::new(Box::new(provider), sink, config))
    }
}

impl<S: ChartSink> Screener<S> {
    pub fn new(
        provider: Box<dyn DataProvider + Send + Sync>,
        sink: S,
        config: ScreenConfig,
    ) -> Self {
        Self {
            provider,
            sink,
            config,
        }
    }

    /// Screens `symbols` (bare tickers) with a fetch window ending now.
    pub async fn run(&self, symbols: &[String]) -> Result<RunSummary<S::Output>, ScreenError> {
        self.run_at(symbols, Utc::now()).await
    }

    /// Screens `symbols` with a fetch window ending at `end`.
    pub async fn run_at(
        &self,
        symbols: &[String],
        end: DateTime<Utc>,
    ) -> Result<RunSummary<S::Output>, ScreenError> {
        let start = end - Duration::days(i64::from(self.config.fetch_window_days));
        let filters = self.config.filters;
        info!(
            symbols = symbols.len(),
            %start,
            %end,
            relative_strength = filters.relative_strength,
            self_momentum = filters.self_momentum,
            period = %filters.period,
            "screening started"
        );

        let benchmark_symbol = self.config.benchmark_symbol.as_str();
        let benchmark = self
            .fetch(benchmark_symbol, AssetClass::Index, start, end)
            .await
            .map_err(|source| ScreenError::Benchmark {
                symbol: benchmark_symbol.to_string(),
                source,
            })?;
        if benchmark.is_empty() {
            warn!(symbol = benchmark_symbol, "benchmark has no data; relative strength cannot pass");
        }

        let mut reports = Vec::with_capacity(symbols.len());
        for bare in symbols {
            let symbol = self.config.qualify(bare);
            let outcome = self.screen_symbol(&symbol, &benchmark, start, end).await?;
            reports.push(SymbolReport { symbol, outcome });
        }

        let summary = RunSummary {
            benchmark_observations: benchmark.len(),
            reports,
        };
        info!(%summary, "screening finished");
        Ok(summary)
    }

    async fn screen_symbol(
        &self,
        symbol: &str,
        benchmark: &PriceSeries,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SymbolOutcome<S::Output>, ScreenError> {
        let series = match self.fetch(symbol, AssetClass::Equity, start, end).await {
            Ok(series) => series,
            Err(e) => {
                warn!(%symbol, error = %e, "fetch failed, skipping");
                return Ok(SymbolOutcome::FetchFailed(e.to_string()));
            }
        };
        if series.is_empty() {
            info!(%symbol, "no data, skipping");
            return Ok(SymbolOutcome::NoData);
        }

        let indicators = IndicatorSet::compute(&series);
        let verdict = self.config.filters.evaluate(&series, benchmark);
        if !verdict.included() {
            for reason in &verdict.rejections {
                info!(%symbol, %reason, "excluded");
            }
            return Ok(SymbolOutcome::Excluded(verdict.rejections));
        }

        let output = self.sink.write(&ChartInput {
            series: &series,
            indicators: &indicators,
        })?;
        Ok(SymbolOutcome::Rendered(output))
    }

    async fn fetch(
        &self,
        symbol: &str,
        asset_class: AssetClass,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<PriceSeries, ProviderError> {
        let params = BarsRequestParams::daily(symbol, start, end, asset_class);
        let fetched = self.provider.fetch_bars(params).await?;
        let series = fetched
            .iter()
            .find(|s| s.symbol == symbol)
            .map(PriceSeries::from_bar_series)
            .unwrap_or_else(|| PriceSeries::new(symbol, Vec::new()));
        Ok(series)
    }
}
