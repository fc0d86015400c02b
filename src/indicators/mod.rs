// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the signal
// panel. Every indicator maps the candle history to a `Series` aligned
// index-for-index with the candles; `None` marks NA (warm-up or undefined
// input), never zero.

pub mod adx;
pub mod bollinger;
pub mod cci;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod stochastic;

pub use frame::{IndicatorFrame, IndicatorKey, IndicatorValues};

/// An indicator column. `None` is NA.
pub type Series = Vec<Option<f64>>;

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0,
/// volume = 1000.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<crate::market_data::Candle> {
    use crate::market_data::Candle;
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                date: None,
                open: Some(open),
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: Some(1000.0),
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal.
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "assert_approx failed: actual={actual}, expected={expected}"
    );
}

/// Index of the first defined value.
#[cfg(test)]
pub fn first_defined(series: &[Option<f64>]) -> Option<usize> {
    series.iter().position(Option::is_some)
}

/// Number of defined values.
#[cfg(test)]
pub fn defined(series: &[Option<f64>]) -> usize {
    series.iter().filter(|v| v.is_some()).count()
}

// =============================================================================
// Property tests
// =============================================================================
#[cfg(test)]
mod property_tests {
    use super::*;
    use super::frame::compute_indicators;
    use proptest::prelude::*;

    /// Random walk closes wrapped into plausible candles.
    fn arb_closes() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-3.0..3.0_f64, 1..120).prop_map(|steps| {
            let mut price = 100.0;
            steps
                .into_iter()
                .map(|s| {
                    price = (price + s).max(1.0);
                    price
                })
                .collect()
        })
    }

    proptest! {
        /// Oscillators stay inside [0, 100] whenever they are defined.
        #[test]
        fn bounded_oscillators(closes in arb_closes()) {
            let frame = compute_indicators(make_candles(&closes));
            for v in frame.rsi.iter().chain(&frame.stoch_k).chain(&frame.stoch_d).flatten() {
                prop_assert!((-1e-9..=100.0 + 1e-9).contains(v), "oscillator {} out of range", v);
            }
        }

        /// Nothing is defined before an indicator's own lookback.
        #[test]
        fn no_value_before_lookback(closes in arb_closes()) {
            let frame = compute_indicators(make_candles(&closes));
            for key in IndicatorKey::ALL {
                if let Some(first) = first_defined(frame.series(key)) {
                    prop_assert!(first >= key.lookback(), "{} defined at {}", key, first);
                }
            }
        }

        /// Values at index i never depend on candles after i.
        #[test]
        fn no_lookahead(closes in arb_closes(), cut in 0.0..1.0_f64) {
            let full = compute_indicators(make_candles(&closes));
            let len = ((closes.len() as f64) * cut) as usize;
            let truncated = compute_indicators(make_candles(&closes[..len]));
            for key in IndicatorKey::ALL {
                let prefix = &full.series(key)[..len];
                prop_assert_eq!(prefix, truncated.series(key).as_slice(), "{} leaks future data", key);
            }
        }
    }
}
