// =============================================================================
// Commodity Channel Index (CCI)
// =============================================================================
//
//   TP  = (high + low + close) / 3
//   CCI = (TP - SMA(TP, n)) / (0.015 * MAD(TP, n))
//
// MAD is the mean absolute deviation of TP from its own n-period mean. A
// window with zero deviation has no defined CCI.
// =============================================================================

use super::rolling::{rolling_mean_abs_dev, sma};
use super::Series;
use crate::market_data::Candle;

const LAMBERT_CONSTANT: f64 = 0.015;

pub fn cci(candles: &[Candle], window: usize) -> Series {
    let typical: Series = candles.iter().map(|c| Some(c.typical_price())).collect();
    let mean = sma(&typical, window);
    let deviation = rolling_mean_abs_dev(&typical, window);

    typical
        .iter()
        .zip(mean.iter().zip(&deviation))
        .map(|(tp, (m, d))| {
            let (tp, m, d) = ((*tp)?, (*m)?, (*d)?);
            if d == 0.0 {
                return None;
            }
            let value = (tp - m) / (LAMBERT_CONSTANT * d);
            value.is_finite().then_some(value)
        })
        .collect()
}
