// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute +DM (positive directional movement) and -DM per bar.
//   2. Compute True Range (TR) per bar.
//   3. Apply Wilder's smoothing (period) to +DM, -DM, and TR.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothed average of DX over `period` bars.
//
// The first bar has no predecessor, so DX is first defined at index `period`
// and ADX at index `2 * period - 1`.
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use super::ema::wilder;
use super::Series;
use crate::market_data::Candle;

/// Compute the ADX series aligned with `candles`.
pub fn adx(candles: &[Candle], period: usize) -> Series {
    let n = candles.len();
    if period == 0 || n < period + 1 {
        return vec![None; n];
    }

    let period_f = period as f64;

    // ------------------------------------------------------------------
    // Step 1 & 2: Raw +DM, -DM, and True Range for each consecutive pair
    // ------------------------------------------------------------------
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    let mut tr_vals = vec![0.0; n];

    for i in 1..n {
        let (cur, prev) = (&candles[i], &candles[i - 1]);

        tr_vals[i] = (cur.high - cur.low)
            .max((cur.high - prev.close).abs())
            .max((cur.low - prev.close).abs());

        let up_move = cur.high - prev.high;
        let down_move = prev.low - cur.low;

        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    // ------------------------------------------------------------------
    // Step 3–5: Wilder running sums seeded over bars 1..=period, then DX
    // ------------------------------------------------------------------
    let mut dx: Series = vec![None; n];

    let mut smooth_plus_dm: f64 = plus_dm[1..=period].iter().sum();
    let mut smooth_minus_dm: f64 = minus_dm[1..=period].iter().sum();
    let mut smooth_tr: f64 = tr_vals[1..=period].iter().sum();
    dx[period] = compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr);

    for i in (period + 1)..n {
        smooth_plus_dm = smooth_plus_dm - smooth_plus_dm / period_f + plus_dm[i];
        smooth_minus_dm = smooth_minus_dm - smooth_minus_dm / period_f + minus_dm[i];
        smooth_tr = smooth_tr - smooth_tr / period_f + tr_vals[i];
        dx[i] = compute_dx(smooth_plus_dm, smooth_minus_dm, smooth_tr);
    }

    // ------------------------------------------------------------------
    // Step 6: ADX = Wilder's smoothed average of DX
    // ------------------------------------------------------------------
    wilder(&dx, period)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Compute DX from smoothed +DM, -DM, and TR values.
///
/// Returns `None` if the smoothed true range is zero or the result is
/// non-finite.
fn compute_dx(smooth_plus_dm: f64, smooth_minus_dm: f64, smooth_tr: f64) -> Option<f64> {
    if smooth_tr == 0.0 {
        return None;
    }

    let plus_di = (smooth_plus_dm / smooth_tr) * 100.0;
    let minus_di = (smooth_minus_dm / smooth_tr) * 100.0;

    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        // Both +DI and -DI are zero, no directional movement.
        return Some(0.0);
    }

    let dx = ((plus_di - minus_di).abs() / di_sum) * 100.0;
    dx.is_finite().then_some(dx)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::first_defined;

    fn candle(open: f64, high: f64, low: f64, close: f64) -> Candle {
        Candle {
            date: None,
            open: Some(open),
            high,
            low,
            close,
            volume: Some(1.0),
        }
    }

    #[test]
    fn adx_period_zero() {
        let candles = vec![candle(1.0, 2.0, 0.5, 1.5); 50];
        assert!(adx(&candles, 0).iter().all(Option::is_none));
    }

    #[test]
    fn adx_insufficient_data() {
        let candles = vec![candle(1.0, 2.0, 0.5, 1.5); 10];
        let out = adx(&candles, 14);
        assert_eq!(out.len(), 10);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn adx_first_value_index() {
        let candles: Vec<Candle> = (0..40)
            .map(|i| {
                let base = 100.0 + i as f64;
                candle(base, base + 1.0, base - 0.5, base + 0.5)
            })
            .collect();
        assert_eq!(first_defined(&adx(&candles, 14)), Some(27));

        // Exactly 2 * period candles is the minimum.
        assert!(adx(&candles[..28], 14)[27].is_some());
        assert!(adx(&candles[..27], 14).iter().all(Option::is_none));
    }

    #[test]
    fn adx_strong_uptrend() {
        let candles: Vec<Candle> = (0..60)
            .map(|i| {
                let base = 100.0 + i as f64 * 2.0;
                candle(base, base + 1.5, base - 0.5, base + 1.0)
            })
            .collect();

        let value = adx(&candles, 14)[59].unwrap();
        assert!(
            value > 25.0,
            "expected ADX > 25 for strong trend, got {value}"
        );
    }

    #[test]
    fn adx_flat_market() {
        // Identical candles, no directional movement, DX = 0 every bar.
        let candles = vec![candle(100.0, 101.0, 99.0, 100.0); 60];
        let value = adx(&candles, 14)[59].unwrap();
        assert!(
            value < 1.0,
            "expected ADX near 0 for flat market, got {value}"
        );
    }

    #[test]
    fn adx_zero_range_is_na() {
        let candles = vec![candle(100.0, 100.0, 100.0, 100.0); 60];
        assert!(adx(&candles, 14).iter().all(Option::is_none));
    }

    #[test]
    fn adx_result_range() {
        let candles: Vec<Candle> = (0..100)
            .map(|i| {
                let base = 50.0 + (i as f64 * 0.3).sin() * 10.0;
                candle(base - 0.5, base + 1.0, base - 1.0, base + 0.5)
            })
            .collect();
        for value in adx(&candles, 14).into_iter().flatten() {
            assert!(
                (0.0..=100.0).contains(&value),
                "ADX {value} out of [0,100] range"
            );
        }
    }
}
