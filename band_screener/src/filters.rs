//! Momentum filters.
//!
//! Each filter returns an explicit outcome instead of a bare `bool` so a
//! rejected symbol can say *why*. Outcomes collapse to pass/fail only in
//! [`FilterSelection::evaluate`].

use std::fmt;

use crate::{
    config::{FilterSelection, MomentumWindow},
    series::PriceSeries,
};

/// Relative strength of a stock against a benchmark over `period` observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelativeStrength {
    /// One of the series is shorter than the look-back.
    InsufficientData {
        needed: usize,
        stock_len: usize,
        benchmark_len: usize,
    },
    /// A base close is zero (or the returns are not finite), so no return exists.
    Undefined,
    Computed {
        stock_return: f64,
        benchmark_return: f64,
    },
}

impl RelativeStrength {
    pub fn passes(&self) -> bool {
        matches!(
            self,
            Self::Computed { stock_return, benchmark_return } if stock_return > benchmark_return
        )
    }
}

/// Latest close against a base close of the same series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelfMomentum {
    InsufficientData { needed: usize, available: usize },
    Computed { base_close: f64, last_close: f64 },
}

impl SelfMomentum {
    pub fn passes(&self) -> bool {
        matches!(self, Self::Computed { base_close, last_close } if last_close > base_close)
    }
}

/// Simple return from the `period`-th observation from the end to the latest one.
fn period_return(series: &PriceSeries, period: usize) -> Option<f64> {
    let base = series.close_from_end(period)?;
    let last = series.last_close()?;
    if base == 0.0 {
        return None;
    }
    let r = (last - base) / base;
    r.is_finite().then_some(r)
}

/// Compares the stock's return over the last `period` observations with the
/// benchmark's return over its own last `period` observations.
///
/// Offsets are positional, so the two series need not share a calendar.
pub fn relative_strength(
    stock: &PriceSeries,
    benchmark: &PriceSeries,
    period: usize,
) -> RelativeStrength {
    if period == 0 || stock.len() < period || benchmark.len() < period {
        return RelativeStrength::InsufficientData {
            needed: period.max(1),
            stock_len: stock.len(),
            benchmark_len: benchmark.len(),
        };
    }

    match (period_return(stock, period), period_return(benchmark, period)) {
        (Some(stock_return), Some(benchmark_return)) => RelativeStrength::Computed {
            stock_return,
            benchmark_return,
        },
        _ => RelativeStrength::Undefined,
    }
}

/// Whether the latest close exceeds the base close chosen by `window`.
pub fn self_momentum(stock: &PriceSeries, window: MomentumWindow, period: usize) -> SelfMomentum {
    let base = match window {
        MomentumWindow::FetchWindow => stock.first_close(),
        MomentumWindow::SelectedPeriod => stock.close_from_end(period),
    };
    match (base, stock.last_close()) {
        (Some(base_close), Some(last_close)) => SelfMomentum::Computed {
            base_close,
            last_close,
        },
        _ => SelfMomentum::InsufficientData {
            needed: match window {
                MomentumWindow::FetchWindow => 1,
                MomentumWindow::SelectedPeriod => period.max(1),
            },
            available: stock.len(),
        },
    }
}

/// Why a symbol was left out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    RelativeStrength(RelativeStrength),
    SelfMomentum(SelfMomentum),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::RelativeStrength(RelativeStrength::InsufficientData {
                needed,
                stock_len,
                benchmark_len,
            }) => write!(
                f,
                "relative strength: need {needed} observations (stock {stock_len}, benchmark {benchmark_len})"
            ),
            Rejection::RelativeStrength(RelativeStrength::Undefined) => {
                write!(f, "relative strength: return undefined (zero base close)")
            }
            Rejection::RelativeStrength(RelativeStrength::Computed {
                stock_return,
                benchmark_return,
            }) => write!(
                f,
                "relative strength: return {:.2}% <= benchmark {:.2}%",
                stock_return * 100.0,
                benchmark_return * 100.0
            ),
            Rejection::SelfMomentum(SelfMomentum::InsufficientData { needed, available }) => {
                write!(f, "self momentum: need {needed} observations, have {available}")
            }
            Rejection::SelfMomentum(SelfMomentum::Computed {
                base_close,
                last_close,
            }) => write!(f, "self momentum: last close {last_close:.2} <= base {base_close:.2}"),
        }
    }
}

/// Combined result of the selected filters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterVerdict {
    pub rejections: Vec<Rejection>,
}

impl FilterVerdict {
    pub fn included(&self) -> bool {
        self.rejections.is_empty()
    }
}

impl FilterSelection {
    /// Runs every selected filter. A symbol is included iff all of them pass.
    pub fn evaluate(&self, stock: &PriceSeries, benchmark: &PriceSeries) -> FilterVerdict {
        let period = self.period.observations();
        let mut rejections = Vec::new();

        if self.relative_strength {
            let rs = relative_strength(stock, benchmark, period);
            tracing::debug!(symbol = stock.symbol(), ?rs, "relative strength");
            if !rs.passes() {
                rejections.push(Rejection::RelativeStrength(rs));
            }
        }
        if self.self_momentum {
            let sm = self_momentum(stock, self.momentum_window, period);
            tracing::debug!(symbol = stock.symbol(), ?sm, "self momentum");
            if !sm.passes() {
                rejections.push(Rejection::SelfMomentum(sm));
            }
        }

        FilterVerdict { rejections }
    }
}
