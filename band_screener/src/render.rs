//! Two-panel chart per symbol: price with Bollinger Bands on top, MACD below.
//!
//! Charts are drawn with `plotters` into an in-memory SVG document and then
//! handed to a [`ChartSink`]. Nothing is kept once `write` returns.

use std::{fs, path::PathBuf};

use chrono::{Duration, NaiveDate};
use plotters::{coord::Shift, prelude::*};
use tracing::info;

use crate::{
    errors::SinkError,
    indicators::{DISPLAY_EMA_SPAN, IndicatorSet, ema::ema},
    series::PriceSeries,
};

/// Output size in pixels (a 10 x 6 inch figure at 100 dpi).
pub const CHART_SIZE: (u32, u32) = (1000, 600);

const CLOSE_BLUE: RGBColor = RGBColor(31, 119, 180);
const UPPER_ORANGE: RGBColor = RGBColor(255, 127, 14);
const LOWER_GREEN: RGBColor = RGBColor(44, 160, 44);
const EMA_PURPLE: RGBColor = RGBColor(128, 0, 128);
const BAND_GREY: RGBColor = RGBColor(128, 128, 128);
const MACD_RED: RGBColor = RGBColor(220, 20, 20);
const SIGNAL_GREEN: RGBColor = RGBColor(0, 128, 0);
const NO_FRAME: RGBAColor = RGBAColor(0, 0, 0, 0.0);

/// Histogram bar width in days.
const BAR_WIDTH: f64 = 0.6;

/// Everything needed to draw one symbol.
pub struct ChartInput<'a> {
    pub series: &'a PriceSeries,
    pub indicators: &'a IndicatorSet,
}

/// Destination for rendered charts.
pub trait ChartSink {
    /// What a successful write hands back, e.g. the path of the written file.
    type Output;

    fn write(&self, chart: &ChartInput<'_>) -> Result<Self::Output, SinkError>;
}

/// Writes `<out_dir>/<symbol>.svg`.
pub struct SvgChartSink {
    out_dir: PathBuf,
}

impl SvgChartSink {
    /// Creates the output directory if needed.
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir).map_err(|source| SinkError::OutputDir {
            path: out_dir.clone(),
            source,
        })?;
        Ok(Self { out_dir })
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        let name: String = symbol
            .chars()
            .map(|c| match c {
                'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '-' | '_' => c,
                _ => '_',
            })
            .collect();
        self.out_dir.join(format!("{name}.svg"))
    }
}

impl ChartSink for SvgChartSink {
    type Output = PathBuf;

    fn write(&self, chart: &ChartInput<'_>) -> Result<PathBuf, SinkError> {
        let symbol = chart.series.symbol();
        let svg = render_svg(chart)?;
        let path = self.path_for(symbol);
        fs::write(&path, svg).map_err(|e| SinkError::Draw {
            symbol: symbol.to_string(),
            message: format!("cannot write {}: {e}", path.display()),
        })?;
        info!(%symbol, path = %path.display(), "chart written");
        Ok(path)
    }
}

/// Renders the chart to an SVG document.
pub fn render_svg(chart: &ChartInput<'_>) -> Result<String, SinkError> {
    let symbol = chart.series.symbol();
    let draw_err = |message: String| SinkError::Draw {
        symbol: symbol.to_string(),
        message,
    };

    if chart.series.is_empty() {
        return Err(draw_err("series is empty".into()));
    }
    if chart.indicators.len() != chart.series.len() {
        return Err(draw_err(format!(
            "indicator length {} does not match series length {}",
            chart.indicators.len(),
            chart.series.len()
        )));
    }

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, CHART_SIZE).into_drawing_area();
        draw_panels(&root, chart).map_err(|e| draw_err(e.to_string()))?;
        root.present().map_err(|e| draw_err(e.to_string()))?;
    }
    Ok(svg)
}

fn draw_panels<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartInput<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let series = chart.series;
    let ind = chart.indicators;

    let dates = series.dates();
    let first = dates[0];
    let xs: Vec<f64> = dates.iter().map(|d| (*d - first).num_days() as f64).collect();
    let x_range = -1.0..xs[xs.len() - 1] + 1.0;

    let closes = series.closes();
    let trend = ema(&closes, DISPLAY_EMA_SPAN);
    let band: Vec<(f64, f64, f64)> = xs
        .iter()
        .zip(ind.upper_band.iter().zip(&ind.lower_band))
        .filter_map(|(x, (u, l))| Some((*x, (*u)?, (*l)?)))
        .collect();
    let hist = ind.histogram();

    root.fill(&WHITE)?;
    let root = root.titled(series.symbol(), ("sans-serif", 22))?;
    let (_, height) = root.dim_in_pixel();
    let (top, bottom) = root.split_vertically((height * 3 / 4) as i32);

    // Price panel.
    let (lo, hi) = bounds(
        closes
            .iter()
            .chain(&trend)
            .copied()
            .chain(band.iter().flat_map(|(_, u, l)| [*u, *l])),
    );
    let mut price = ChartBuilder::on(&top)
        .margin(8)
        .margin_bottom(2)
        .x_label_area_size(0)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), lo..hi)?;
    price.configure_mesh().disable_x_mesh().y_labels(6).draw()?;

    if !band.is_empty() {
        let mut outline: Vec<(f64, f64)> = band.iter().map(|(x, u, _)| (*x, *u)).collect();
        outline.extend(band.iter().rev().map(|(x, _, l)| (*x, *l)));
        price.draw_series(std::iter::once(Polygon::new(
            outline,
            BAND_GREY.mix(0.1).filled(),
        )))?;
    }

    price
        .draw_series(LineSeries::new(
            xs.iter().copied().zip(closes.iter().copied()),
            &CLOSE_BLUE,
        ))?
        .label("Close Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &CLOSE_BLUE));
    price
        .draw_series(DashedLineSeries::new(
            band.iter().map(|(x, u, _)| (*x, *u)),
            6,
            4,
            UPPER_ORANGE.stroke_width(1),
        ))?
        .label("Upper Bollinger Band")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &UPPER_ORANGE));
    price
        .draw_series(DashedLineSeries::new(
            band.iter().map(|(x, _, l)| (*x, *l)),
            6,
            4,
            LOWER_GREEN.stroke_width(1),
        ))?
        .label("Lower Bollinger Band")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &LOWER_GREEN));
    price
        .draw_series(LineSeries::new(
            xs.iter().copied().zip(trend.iter().copied()),
            &EMA_PURPLE,
        ))?
        .label(format!("{DISPLAY_EMA_SPAN} EMA"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &EMA_PURPLE));
    price
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&NO_FRAME)
        .border_style(&NO_FRAME)
        .draw()?;

    // MACD panel.
    let (lo, hi) = bounds(
        ind.macd
            .iter()
            .chain(&ind.signal)
            .chain(&hist)
            .copied()
            .chain([0.0]),
    );
    let mut osc = ChartBuilder::on(&bottom)
        .margin(8)
        .margin_top(2)
        .x_label_area_size(28)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range.clone(), lo..hi)?;
    let date_label = |x: &f64| date_at(first, *x).format("%b %Y").to_string();
    osc.configure_mesh()
        .disable_x_mesh()
        .x_labels(8)
        .y_labels(4)
        .x_label_formatter(&date_label)
        .draw()?;

    osc.draw_series(xs.iter().zip(&hist).map(|(&x, &h)| {
        let color = if h > 0.0 { SIGNAL_GREEN } else { MACD_RED };
        Rectangle::new(
            [(x - BAR_WIDTH / 2.0, 0.0), (x + BAR_WIDTH / 2.0, h)],
            color.filled(),
        )
    }))?;
    osc.draw_series(LineSeries::new(
        xs.iter().copied().zip(ind.macd.iter().copied()),
        &MACD_RED,
    ))?
    .label("MACD")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &MACD_RED));
    osc.draw_series(LineSeries::new(
        xs.iter().copied().zip(ind.signal.iter().copied()),
        &SIGNAL_GREEN,
    ))?
    .label("Signal Line")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &SIGNAL_GREEN));
    osc.draw_series(DashedLineSeries::new(
        [(x_range.start, 0.0), (x_range.end, 0.0)],
        6,
        4,
        BAND_GREY.stroke_width(1),
    ))?;
    osc.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&NO_FRAME)
        .border_style(&NO_FRAME)
        .draw()?;

    Ok(())
}

fn date_at(first: NaiveDate, offset_days: f64) -> NaiveDate {
    first + Duration::days(offset_days.round() as i64)
}

/// Padded `(min, max)` of the finite values; `(-1, 1)` when there are none.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (-1.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad, hi + pad)
}
