use super::sma::{rolling_std, sma};

/// Middle band with an envelope of `k` rolling standard deviations.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub middle: Vec<Option<f64>>,
    pub std: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger_bands(values: &[f64], window: usize, k: f64) -> BollingerBands {
    let middle = sma(values, window);
    let std = rolling_std(values, window);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&std)
            .map(|(m, s)| Some((*m)? + sign * k * (*s)?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerBands {
        middle,
        std,
        upper,
        lower,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn envelope_around_middle() {
        let closes: Vec<f64> = (1..=25).map(f64::from).collect();
        let bb = bollinger_bands(&closes, 20, 2.0);
        assert!(bb.upper[18].is_none());
        let (u, m, l) = (bb.upper[24].unwrap(), bb.middle[24].unwrap(), bb.lower[24].unwrap());
        assert!(u > m && m > l);
        assert!((m - 15.5).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn width_is_four_std(values in proptest::collection::vec(1.0f64..1e4, 20..60)) {
            let bb = bollinger_bands(&values, 20, 2.0);
            for i in 0..values.len() {
                match (bb.upper[i], bb.lower[i], bb.std[i]) {
                    (Some(u), Some(l), Some(s)) => {
                        prop_assert!((u - l - 4.0 * s).abs() <= 1e-9 * (1.0 + s.abs() + u.abs()));
                    }
                    (None, None, None) => prop_assert!(i < 19),
                    other => prop_assert!(false, "misaligned bands at {}: {:?}", i, other),
                }
            }
        }
    }
}
