// =============================================================================
// Relative Strength Index (RSI): Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1: Compute price changes (deltas) from consecutive closes.
// Step 2: Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3: Apply Wilder's exponential smoothing (weight 1 / period).
// Step 4: RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The first defined value sits at index `period`: `period` deltas need
// `period + 1` closes.
// =============================================================================

use super::ema::wilder;
use super::Series;

/// Compute the RSI series aligned with `closes`.
///
/// # Edge cases
/// - `period == 0` or fewer than `period + 1` closes => all NA
/// - Average loss of zero (no down moves, or no movement at all) => 100.0
pub fn rsi(closes: &[f64], period: usize) -> Series {
    let n = closes.len();

    let mut gains: Series = vec![None; n];
    let mut losses: Series = vec![None; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        gains[i] = Some(delta.max(0.0));
        losses[i] = Some((-delta).max(0.0));
    }

    let avg_gain = wilder(&gains, period);
    let avg_loss = wilder(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| rsi_from_averages((*g)?, (*l)?))
        .collect()
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    };
    rsi.is_finite().then_some(rsi)
}
