// =============================================================================
// Rolling-window primitives
// =============================================================================
//
// Every function here maps an aligned input series to an aligned output
// series of the same length. Output index `i` is defined only when all of
// the `window` inputs ending at `i` are defined, so NA propagates and the
// first `window - 1` outputs are always NA. Nothing at `i` reads `i + 1..`.
// =============================================================================

use super::Series;

/// Apply `f` to every full window of defined values.
///
/// `f` receives the window oldest-first and may itself decline to produce a
/// value (e.g. a zero divisor).
pub fn rolling<F>(values: &[Option<f64>], window: usize, f: F) -> Series
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    let mut buf = Vec::with_capacity(window);
    for end in (window - 1)..values.len() {
        buf.clear();
        buf.extend(values[end + 1 - window..=end].iter().map_while(|v| *v));
        if buf.len() == window {
            result[end] = f(&buf).filter(|x| x.is_finite());
        }
    }
    result
}

/// Simple moving average.
pub fn sma(values: &[Option<f64>], window: usize) -> Series {
    rolling(values, window, |w| Some(mean(w)))
}

/// Linearly weighted moving average: weight `1` on the oldest value up to
/// `window` on the newest.
pub fn wma(values: &[Option<f64>], window: usize) -> Series {
    let weight_sum = (window * (window + 1)) as f64 / 2.0;
    rolling(values, window, |w| {
        let weighted: f64 = w.iter().enumerate().map(|(i, x)| (i + 1) as f64 * x).sum();
        Some(weighted / weight_sum)
    })
}

/// Rolling population standard deviation (ddof = 0).
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Series {
    rolling(values, window, |w| {
        let m = mean(w);
        let variance = w.iter().map(|x| (x - m).powi(2)).sum::<f64>() / w.len() as f64;
        Some(variance.sqrt())
    })
}

/// Rolling mean absolute deviation from the window mean.
pub fn rolling_mean_abs_dev(values: &[Option<f64>], window: usize) -> Series {
    rolling(values, window, |w| {
        let m = mean(w);
        Some(w.iter().map(|x| (x - m).abs()).sum::<f64>() / w.len() as f64)
    })
}

pub fn rolling_min(values: &[Option<f64>], window: usize) -> Series {
    rolling(values, window, |w| w.iter().copied().reduce(f64::min))
}

pub fn rolling_max(values: &[Option<f64>], window: usize) -> Series {
    rolling(values, window, |w| w.iter().copied().reduce(f64::max))
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
