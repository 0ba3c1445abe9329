// Exponential moving average, recursive form:
//
//   alpha  = 2 / (span + 1)
//   EMA_0  = x_0
//   EMA_t  = alpha * x_t + (1 - alpha) * EMA_{t-1}
//
// Seeded with the first observation, not with an SMA of the first `span`
// values, so the output is defined from the very first input.

/// EMA of `values` with the given `span`. Output length equals input length.
///
/// A `span` of zero is treated as one (no smoothing).
pub fn ema(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span.max(1) as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for &x in values {
        let next = match prev {
            None => x,
            Some(p) => alpha * x + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn seeded_with_first_value() {
        // span 3 -> alpha 0.5
        let out = ema(&[10.0, 20.0, 20.0], 3);
        assert_eq!(out, vec![10.0, 15.0, 17.5]);
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(ema(&[], 12).is_empty());
    }

    #[test]
    fn span_one_tracks_input() {
        assert_eq!(ema(&[1.0, 5.0, 2.0], 1), vec![1.0, 5.0, 2.0]);
        assert_eq!(ema(&[1.0, 5.0, 2.0], 0), vec![1.0, 5.0, 2.0]);
    }

    proptest! {
        #[test]
        fn defined_everywhere(
            values in proptest::collection::vec(-1e6f64..1e6, 1..80),
            span in 1usize..60,
        ) {
            let out = ema(&values, span);
            prop_assert_eq!(out.len(), values.len());
            prop_assert_eq!(out[0], values[0]);
            prop_assert!(out.iter().all(|v| v.is_finite()));
        }
    }
}
