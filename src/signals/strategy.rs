// =============================================================================
// Signal Strategies: one rule per indicator
// =============================================================================
//
// Each strategy is a stateless pure function of the latest candle and the
// latest indicator values. A strategy whose inputs include an NA value
// answers `N/A`; thresholds are strict (`<` / `>`), so a value sitting exactly
// on a threshold is HOLD.
// =============================================================================

use crate::indicators::{IndicatorKey, IndicatorValues};
use crate::market_data::Candle;
use crate::types::SignalLabel;

const RSI_OVERSOLD: f64 = 30.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const STOCH_OVERSOLD: f64 = 20.0;
const STOCH_OVERBOUGHT: f64 = 80.0;
const ADX_TREND_FLOOR: f64 = 20.0;
const CCI_OVERSOLD: f64 = -100.0;
const CCI_OVERBOUGHT: f64 = 100.0;

/// A rule that turns the latest candle and indicator values into a signal.
///
/// Implementations must be pure: identical inputs give identical labels.
pub trait SignalStrategy: Send + Sync {
    /// Human-readable name shown in the snapshot.
    fn label(&self) -> &str;

    fn compute(&self, latest: &Candle, values: &IndicatorValues) -> SignalLabel;
}

/// Oscillator rule: below `low` is BUY, above `high` is SELL.
fn band_signal(value: f64, low: f64, high: f64) -> SignalLabel {
    if value < low {
        SignalLabel::Buy
    } else if value > high {
        SignalLabel::Sell
    } else {
        SignalLabel::Hold
    }
}

// =============================================================================
// RSI
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct RsiSignal;

impl SignalStrategy for RsiSignal {
    fn label(&self) -> &str {
        "RSI (14)"
    }

    fn compute(&self, _latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let Some(rsi) = values.rsi else {
            return SignalLabel::NotAvailable;
        };
        band_signal(rsi, RSI_OVERSOLD, RSI_OVERBOUGHT)
    }
}

// =============================================================================
// MACD
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct MacdSignal;

impl SignalStrategy for MacdSignal {
    fn label(&self) -> &str {
        "MACD"
    }

    fn compute(&self, _latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let (Some(macd), Some(signal)) = (values.macd, values.macd_signal) else {
            return SignalLabel::NotAvailable;
        };
        SignalLabel::from_comparison(macd, signal)
    }
}

// =============================================================================
// Stochastic
// =============================================================================

/// BUY / SELL only when %K and %D agree on the extreme.
#[derive(Debug, Clone, Default)]
pub struct StochasticSignal;

impl SignalStrategy for StochasticSignal {
    fn label(&self) -> &str {
        "Stochastic Oscillator"
    }

    fn compute(&self, _latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let (Some(k), Some(d)) = (values.stoch_k, values.stoch_d) else {
            return SignalLabel::NotAvailable;
        };
        if k < STOCH_OVERSOLD && d < STOCH_OVERSOLD {
            SignalLabel::Buy
        } else if k > STOCH_OVERBOUGHT && d > STOCH_OVERBOUGHT {
            SignalLabel::Sell
        } else {
            SignalLabel::Hold
        }
    }
}

// =============================================================================
// ADX
// =============================================================================

/// Trend filter: a weak trend (ADX < 20) is HOLD, otherwise the side of the
/// close relative to SMA(20) decides.
#[derive(Debug, Clone, Default)]
pub struct AdxSignal;

impl SignalStrategy for AdxSignal {
    fn label(&self) -> &str {
        "ADX (14)"
    }

    fn compute(&self, latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let (Some(adx), Some(sma)) = (values.adx, values.sma_20) else {
            return SignalLabel::NotAvailable;
        };
        if adx < ADX_TREND_FLOOR {
            return SignalLabel::Hold;
        }
        SignalLabel::from_comparison(latest.close, sma)
    }
}

// =============================================================================
// CCI
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct CciSignal;

impl SignalStrategy for CciSignal {
    fn label(&self) -> &str {
        "CCI (20)"
    }

    fn compute(&self, _latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let Some(cci) = values.cci else {
            return SignalLabel::NotAvailable;
        };
        band_signal(cci, CCI_OVERSOLD, CCI_OVERBOUGHT)
    }
}

// =============================================================================
// Moving-average comparator
// =============================================================================

/// Close above the moving average is BUY, below is SELL.
///
/// One type serves SMA, EMA and WMA: `MovingAverageSignal::new("SMA (20)",
/// IndicatorKey::Sma20)`.
#[derive(Debug, Clone)]
pub struct MovingAverageSignal {
    label: String,
    key: IndicatorKey,
}

impl MovingAverageSignal {
    pub fn new(label: impl Into<String>, key: IndicatorKey) -> Self {
        Self {
            label: label.into(),
            key,
        }
    }
}

impl SignalStrategy for MovingAverageSignal {
    fn label(&self) -> &str {
        &self.label
    }

    fn compute(&self, latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let Some(ma) = values.get(self.key) else {
            return SignalLabel::NotAvailable;
        };
        SignalLabel::from_comparison(latest.close, ma)
    }
}

// =============================================================================
// Bollinger Bands
// =============================================================================

/// Mean reversion: a close below the lower band is BUY, above the upper band
/// SELL.
#[derive(Debug, Clone, Default)]
pub struct BollingerSignal;

impl SignalStrategy for BollingerSignal {
    fn label(&self) -> &str {
        "Bollinger Bands"
    }

    fn compute(&self, latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let (Some(lower), Some(upper)) = (values.bb_lower, values.bb_upper) else {
            return SignalLabel::NotAvailable;
        };
        band_signal(latest.close, lower, upper)
    }
}

// =============================================================================
// Volume SMA
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct VolumeSmaSignal;

impl SignalStrategy for VolumeSmaSignal {
    fn label(&self) -> &str {
        "Volume SMA (20)"
    }

    fn compute(&self, latest: &Candle, values: &IndicatorValues) -> SignalLabel {
        let (Some(volume), Some(vol_sma)) = (latest.volume, values.vol_sma_20) else {
            return SignalLabel::NotAvailable;
        };
        SignalLabel::from_comparison(volume, vol_sma)
    }
}

// =============================================================================
// Default panel
// =============================================================================

/// The registered strategies, in display order.
pub fn default_strategies() -> Vec<Box<dyn SignalStrategy>> {
    vec![
        Box::new(RsiSignal),
        Box::new(MacdSignal),
        Box::new(StochasticSignal),
        Box::new(AdxSignal),
        Box::new(CciSignal),
        Box::new(MovingAverageSignal::new("SMA (20)", IndicatorKey::Sma20)),
        Box::new(MovingAverageSignal::new("EMA (20)", IndicatorKey::Ema20)),
        Box::new(MovingAverageSignal::new("WMA (20)", IndicatorKey::Wma20)),
        Box::new(BollingerSignal),
        Box::new(VolumeSmaSignal),
    ]
}
