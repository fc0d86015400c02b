// =============================================================================
// Stochastic Oscillator (%K / %D)
// =============================================================================
//
//   %K = 100 * (close - lowest_low(n)) / (highest_high(n) - lowest_low(n))
//   %D = SMA(%K, smooth)
//
// A zero high-low range leaves %K undefined (NA) rather than dividing by zero.
// =============================================================================

use super::rolling::{rolling_max, rolling_min, sma};
use super::Series;
use crate::market_data::Candle;

pub const K_WINDOW: usize = 14;
pub const D_WINDOW: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct StochasticSeries {
    pub k: Series,
    pub d: Series,
}

pub fn stochastic(candles: &[Candle], window: usize, smooth: usize) -> StochasticSeries {
    let highs: Series = candles.iter().map(|c| Some(c.high)).collect();
    let lows: Series = candles.iter().map(|c| Some(c.low)).collect();

    let lowest = rolling_min(&lows, window);
    let highest = rolling_max(&highs, window);

    let k: Series = candles
        .iter()
        .zip(lowest.iter().zip(&highest))
        .map(|(c, (lo, hi))| {
            let (lo, hi) = ((*lo)?, (*hi)?);
            let range = hi - lo;
            if range == 0.0 {
                return None;
            }
            Some(100.0 * (c.close - lo) / range)
        })
        .collect();
    let d = sma(&k, smooth);

    StochasticSeries { k, d }
}
