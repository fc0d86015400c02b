// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). σ is the population standard deviation of
// the same window.

use super::rolling::{rolling_std, sma};
use super::Series;

/// Aligned band series.
#[derive(Debug, Clone, Default)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Each band is NA until `period` closes are available.
pub fn bollinger(closes: &[Option<f64>], period: usize, num_std: f64) -> BollingerSeries {
    let middle = sma(closes, period);
    let std_dev = rolling_std(closes, period);

    let band = |sign: f64| -> Series {
        middle
            .iter()
            .zip(&std_dev)
            .map(|(m, s)| Some((*m)? + sign * num_std * (*s)?))
            .collect()
    };
    let upper = band(1.0);
    let lower = band(-1.0);

    BollingerSeries {
        upper,
        middle,
        lower,
    }
}
