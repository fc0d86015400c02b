// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   macd        = EMA(close, fast) - EMA(close, slow)
//   macd_signal = EMA(macd, signal)
//   macd_hist   = macd - macd_signal
//
// With the classic 12 / 26 / 9 settings the line is defined from index 25 and
// the signal / histogram from index 33.
// =============================================================================

use super::ema::ema;
use super::Series;

pub const FAST_SPAN: usize = 12;
pub const SLOW_SPAN: usize = 26;
pub const SIGNAL_SPAN: usize = 9;

/// The three aligned MACD series.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Series,
    pub signal: Series,
    pub histogram: Series,
}

pub fn macd(closes: &[Option<f64>], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = ema(closes, fast);
    let slow_ema = ema(closes, slow);

    let line: Series = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema(&line, signal);
    let histogram = line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    MacdSeries {
        macd: line,
        signal: signal_line,
        histogram,
    }
}
