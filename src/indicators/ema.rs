// =============================================================================
// Exponential Moving Average (EMA) and Wilder smoothing
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)        (EMA)
//   alpha  = 1 / period            (Wilder)
//   S_t    = x_t * alpha + S_{t-1} * (1 - alpha)
//
// The first value is seeded with the SMA of the first `period` defined
// inputs, so the output is NA until that many consecutive values exist.
// =============================================================================

use super::rolling::mean;
use super::Series;

/// Exponentially smooth `values` with weight `alpha`, seeding from the mean
/// of the first run of `period` consecutive defined values.
///
/// After seeding, an NA input yields an NA output and leaves the running
/// state untouched.
pub fn exp_smooth(values: &[Option<f64>], period: usize, alpha: f64) -> Series {
    let mut result = vec![None; values.len()];
    if period == 0 {
        return result;
    }

    let mut state: Option<f64> = None;
    let mut run = 0usize;

    for (i, value) in values.iter().enumerate() {
        match (state, *value) {
            (None, Some(_)) => {
                run += 1;
                if run == period {
                    let window: Vec<f64> = values[i + 1 - period..=i]
                        .iter()
                        .flatten()
                        .copied()
                        .collect();
                    let seed = mean(&window);
                    if seed.is_finite() {
                        state = Some(seed);
                        result[i] = state;
                    } else {
                        run = 0;
                    }
                }
            }
            (None, None) => run = 0,
            (Some(prev), Some(x)) => {
                let next = x * alpha + prev * (1.0 - alpha);
                if next.is_finite() {
                    state = Some(next);
                    result[i] = state;
                }
            }
            (Some(_), None) => {}
        }
    }

    result
}

/// EMA with span-derived weight `2 / (span + 1)`.
pub fn ema(values: &[Option<f64>], span: usize) -> Series {
    exp_smooth(values, span, 2.0 / (span + 1) as f64)
}

/// Wilder's smoothing: an EMA variant with weight `1 / period`.
pub fn wilder(values: &[Option<f64>], period: usize) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }
    exp_smooth(values, period, 1.0 / period as f64)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, first_defined};

    fn series(xs: &[f64]) -> Series {
        xs.iter().map(|&x| Some(x)).collect()
    }

    #[test]
    fn ema_empty_input() {
        assert!(ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_period_zero() {
        assert_eq!(ema(&series(&[1.0, 2.0, 3.0]), 0), vec![None, None, None]);
    }

    #[test]
    fn ema_insufficient_data() {
        assert_eq!(ema(&series(&[1.0, 2.0]), 5), vec![None, None]);
    }

    #[test]
    fn ema_period_equals_length() {
        let out = ema(&series(&[2.0, 4.0, 6.0]), 3);
        // Seed is the SMA = (2+4+6)/3 = 4.0
        assert_eq!(first_defined(&out), Some(2));
        assert_approx(out[2].unwrap(), 4.0);
    }

    #[test]
    fn ema_known_values() {
        // 5-period EMA of [1..=10]: SMA seed 3.0, multiplier 1/3.
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = ema(&series(&closes), 5);

        let mult = 2.0 / 6.0;
        let mut expected = 3.0;
        assert_approx(out[4].unwrap(), expected);
        for i in 5..10 {
            expected = closes[i] * mult + expected * (1.0 - mult);
            assert_approx(out[i].unwrap(), expected);
        }
    }

    #[test]
    fn seed_waits_for_leading_na() {
        // A series that starts NA (like the MACD line) seeds from its first
        // full run of defined values.
        let input = vec![None, None, Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let out = ema(&input, 3);
        assert_eq!(first_defined(&out), Some(4));
        assert_approx(out[4].unwrap(), 2.0);
        assert_approx(out[5].unwrap(), 4.0 * 0.5 + 2.0 * 0.5);
    }

    #[test]
    fn na_after_seed_holds_state() {
        let input = vec![Some(2.0), Some(2.0), None, Some(4.0)];
        let out = wilder(&input, 2);
        assert_approx(out[1].unwrap(), 2.0);
        assert_eq!(out[2], None);
        assert_approx(out[3].unwrap(), 3.0);
    }

    #[test]
    fn wilder_uses_reciprocal_weight() {
        let out = wilder(&series(&[1.0, 1.0, 1.0, 5.0]), 3);
        assert_approx(out[2].unwrap(), 1.0);
        assert_approx(out[3].unwrap(), 1.0 + (5.0 - 1.0) / 3.0);
    }
}
