// =============================================================================
// Indicator Frame: candles enriched with aligned indicator columns
// =============================================================================
//
// `compute_indicators` is the single entry point of the indicator engine. It
// runs every indicator over the normalised candle sequence and stores the
// results as columns aligned index-for-index with the candles. All windows
// are fixed constants.
// =============================================================================

use serde::Serialize;
use tracing::debug;

use super::adx::adx;
use super::bollinger::bollinger;
use super::cci::cci;
use super::ema::ema;
use super::macd::{macd, FAST_SPAN, SIGNAL_SPAN, SLOW_SPAN};
use super::rolling::{sma, wma};
use super::rsi::rsi;
use super::stochastic::{stochastic, D_WINDOW, K_WINDOW};
use super::Series;
use crate::market_data::{normalize_candles, Candle, CandleInput};

pub const RSI_WINDOW: usize = 14;
pub const ADX_WINDOW: usize = 14;
pub const CCI_WINDOW: usize = 20;
pub const MA_WINDOW: usize = 20;
pub const BOLLINGER_WINDOW: usize = 20;
pub const BOLLINGER_STD: f64 = 2.0;
pub const VOLUME_WINDOW: usize = 20;

// =============================================================================
// Indicator keys
// =============================================================================

/// The indicator values exposed to strategies and in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKey {
    Rsi,
    Macd,
    MacdSignal,
    StochK,
    StochD,
    Adx,
    Cci,
    Sma20,
    Ema20,
    Wma20,
    BbLower,
    BbUpper,
    VolSma20,
}

impl IndicatorKey {
    #[cfg(test)]
    pub const ALL: [IndicatorKey; 13] = [
        Self::Rsi,
        Self::Macd,
        Self::MacdSignal,
        Self::StochK,
        Self::StochD,
        Self::Adx,
        Self::Cci,
        Self::Sma20,
        Self::Ema20,
        Self::Wma20,
        Self::BbLower,
        Self::BbUpper,
        Self::VolSma20,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rsi => "rsi",
            Self::Macd => "macd",
            Self::MacdSignal => "macd_signal",
            Self::StochK => "stoch_k",
            Self::StochD => "stoch_d",
            Self::Adx => "adx",
            Self::Cci => "cci",
            Self::Sma20 => "sma_20",
            Self::Ema20 => "ema_20",
            Self::Wma20 => "wma_20",
            Self::BbLower => "bb_lower",
            Self::BbUpper => "bb_upper",
            Self::VolSma20 => "vol_sma_20",
        }
    }

    /// Index of the first value that can be defined, given enough clean
    /// input.
    #[cfg(test)]
    pub fn lookback(&self) -> usize {
        match self {
            Self::Rsi => RSI_WINDOW,
            Self::Macd => SLOW_SPAN - 1,
            Self::MacdSignal => SLOW_SPAN + SIGNAL_SPAN - 2,
            Self::StochK => K_WINDOW - 1,
            Self::StochD => K_WINDOW + D_WINDOW - 2,
            Self::Adx => 2 * ADX_WINDOW - 1,
            Self::Cci => CCI_WINDOW - 1,
            Self::Sma20 | Self::Ema20 | Self::Wma20 => MA_WINDOW - 1,
            Self::BbLower | Self::BbUpper => BOLLINGER_WINDOW - 1,
            Self::VolSma20 => VOLUME_WINDOW - 1,
        }
    }
}

impl std::fmt::Display for IndicatorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Latest values
// =============================================================================

/// Indicator values at the latest candle. NA serialises as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorValues {
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub adx: Option<f64>,
    pub cci: Option<f64>,
    pub sma_20: Option<f64>,
    pub ema_20: Option<f64>,
    pub wma_20: Option<f64>,
    pub bb_lower: Option<f64>,
    pub bb_upper: Option<f64>,
    pub vol_sma_20: Option<f64>,
}

impl IndicatorValues {
    pub fn get(&self, key: IndicatorKey) -> Option<f64> {
        match key {
            IndicatorKey::Rsi => self.rsi,
            IndicatorKey::Macd => self.macd,
            IndicatorKey::MacdSignal => self.macd_signal,
            IndicatorKey::StochK => self.stoch_k,
            IndicatorKey::StochD => self.stoch_d,
            IndicatorKey::Adx => self.adx,
            IndicatorKey::Cci => self.cci,
            IndicatorKey::Sma20 => self.sma_20,
            IndicatorKey::Ema20 => self.ema_20,
            IndicatorKey::Wma20 => self.wma_20,
            IndicatorKey::BbLower => self.bb_lower,
            IndicatorKey::BbUpper => self.bb_upper,
            IndicatorKey::VolSma20 => self.vol_sma_20,
        }
    }
}

// =============================================================================
// Frame
// =============================================================================

/// Normalised candles plus one aligned column per indicator.
#[derive(Debug, Clone, Default)]
pub struct IndicatorFrame {
    pub candles: Vec<Candle>,
    pub rsi: Series,
    pub macd: Series,
    pub macd_signal: Series,
    pub macd_hist: Series,
    pub stoch_k: Series,
    pub stoch_d: Series,
    pub adx: Series,
    pub cci: Series,
    pub sma_20: Series,
    pub ema_20: Series,
    pub wma_20: Series,
    pub bb_upper: Series,
    pub bb_middle: Series,
    pub bb_lower: Series,
    pub vol_sma_20: Series,
}

impl IndicatorFrame {
    /// Normalise wire candles and compute every indicator.
    pub fn from_inputs(inputs: &[CandleInput]) -> Self {
        compute_indicators(normalize_candles(inputs))
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn latest_candle(&self) -> Option<&Candle> {
        self.candles.last()
    }

    pub fn series(&self, key: IndicatorKey) -> &Series {
        match key {
            IndicatorKey::Rsi => &self.rsi,
            IndicatorKey::Macd => &self.macd,
            IndicatorKey::MacdSignal => &self.macd_signal,
            IndicatorKey::StochK => &self.stoch_k,
            IndicatorKey::StochD => &self.stoch_d,
            IndicatorKey::Adx => &self.adx,
            IndicatorKey::Cci => &self.cci,
            IndicatorKey::Sma20 => &self.sma_20,
            IndicatorKey::Ema20 => &self.ema_20,
            IndicatorKey::Wma20 => &self.wma_20,
            IndicatorKey::BbLower => &self.bb_lower,
            IndicatorKey::BbUpper => &self.bb_upper,
            IndicatorKey::VolSma20 => &self.vol_sma_20,
        }
    }

    /// Values at the latest index, or `None` for an empty frame.
    pub fn latest_values(&self) -> Option<IndicatorValues> {
        let last = self.len().checked_sub(1)?;
        let at = |key: IndicatorKey| self.series(key).get(last).copied().flatten();
        Some(IndicatorValues {
            rsi: at(IndicatorKey::Rsi),
            macd: at(IndicatorKey::Macd),
            macd_signal: at(IndicatorKey::MacdSignal),
            stoch_k: at(IndicatorKey::StochK),
            stoch_d: at(IndicatorKey::StochD),
            adx: at(IndicatorKey::Adx),
            cci: at(IndicatorKey::Cci),
            sma_20: at(IndicatorKey::Sma20),
            ema_20: at(IndicatorKey::Ema20),
            wma_20: at(IndicatorKey::Wma20),
            bb_lower: at(IndicatorKey::BbLower),
            bb_upper: at(IndicatorKey::BbUpper),
            vol_sma_20: at(IndicatorKey::VolSma20),
        })
    }
}

/// Run the full indicator pipeline over already-normalised candles.
pub fn compute_indicators(candles: Vec<Candle>) -> IndicatorFrame {
    let closes: Series = candles.iter().map(|c| Some(c.close)).collect();
    let volumes: Series = candles.iter().map(|c| c.volume).collect();
    let close_values: Vec<f64> = candles.iter().map(|c| c.close).collect();

    let macd = macd(&closes, FAST_SPAN, SLOW_SPAN, SIGNAL_SPAN);
    let stoch = stochastic(&candles, K_WINDOW, D_WINDOW);
    let bands = bollinger(&closes, BOLLINGER_WINDOW, BOLLINGER_STD);

    let frame = IndicatorFrame {
        rsi: rsi(&close_values, RSI_WINDOW),
        macd: macd.macd,
        macd_signal: macd.signal,
        macd_hist: macd.histogram,
        stoch_k: stoch.k,
        stoch_d: stoch.d,
        adx: adx(&candles, ADX_WINDOW),
        cci: cci(&candles, CCI_WINDOW),
        sma_20: sma(&closes, MA_WINDOW),
        ema_20: ema(&closes, MA_WINDOW),
        wma_20: wma(&closes, MA_WINDOW),
        bb_upper: bands.upper,
        bb_middle: bands.middle,
        bb_lower: bands.lower,
        vol_sma_20: sma(&volumes, VOLUME_WINDOW),
        candles,
    };

    if frame.is_empty() {
        debug!("no usable candles, indicator frame is empty");
    } else {
        debug!(
            candles = frame.len(),
            macd_hist = ?latest(&frame.macd_hist),
            bb_middle = ?latest(&frame.bb_middle),
            "indicator frame computed"
        );
    }
    frame
}

fn latest(series: &Series) -> Option<f64> {
    series.last().copied().flatten()
}
