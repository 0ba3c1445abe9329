//! Trailing-window statistics.
//!
//! Outputs are aligned with the input: index `i` summarises
//! `values[i + 1 - window..=i]`, and the first `window - 1` entries are
//! `None` because there is not yet a full window behind them.

/// Simple moving average over a trailing `window`.
///
/// `window == 0` or `values.len() < window` yields all `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| Some(mean(w)))
}

/// Sample standard deviation (n - 1 denominator) over a trailing `window`.
///
/// A one-element window has no sample deviation, so `window < 2` yields all `None`.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window < 2 {
        return vec![None; values.len()];
    }
    rolling(values, window, |w| {
        let m = mean(w);
        let ss: f64 = w.iter().map(|x| (x - m).powi(2)).sum();
        Some((ss / (w.len() - 1) as f64).sqrt())
    })
}

fn rolling<F>(values: &[f64], window: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    out.resize(window - 1, None);
    out.extend(values.windows(window).map(f));
    out
}

fn mean(w: &[f64]) -> f64 {
    w.iter().sum::<f64>() / w.len() as f64
}
