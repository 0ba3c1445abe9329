use super::ema::ema;

/// MACD line, its signal line and the difference between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Macd {
    pub short_ema: Vec<f64>,
    pub long_ema: Vec<f64>,
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
}

impl Macd {
    /// MACD minus signal, per observation.
    pub fn histogram(&self) -> Vec<f64> {
        self.line.iter().zip(&self.signal).map(|(m, s)| m - s).collect()
    }
}

pub fn macd(values: &[f64], short_span: usize, long_span: usize, signal_span: usize) -> Macd {
    let short_ema = ema(values, short_span);
    let long_ema = ema(values, long_span);
    let line: Vec<f64> = short_ema.iter().zip(&long_ema).map(|(s, l)| s - l).collect();
    let signal = ema(&line, signal_span);
    Macd {
        short_ema,
        long_ema,
        line,
        signal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_prices_have_zero_macd() {
        let m = macd(&[100.0; 40], 12, 26, 9);
        assert!(m.line.iter().all(|v| v.abs() < 1e-12));
        assert!(m.histogram().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn rising_prices_push_macd_positive() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let m = macd(&closes, 12, 26, 9);
        assert_eq!(m.line[0], 0.0);
        assert!(m.line[59] > 0.0);
        // The signal lags the line on a steady trend.
        assert!(m.histogram()[59] > 0.0);
    }
}
