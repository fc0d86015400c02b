// =============================================================================
// Signal Engine: snapshot builder
// =============================================================================
//
// Pipeline per request:
//   1. Normalise candles and compute the indicator frame
//   2. Read the latest candle and the latest indicator values
//   3. Run every registered strategy
//   4. Reduce the labels with the majority vote
//   5. Attach the caller's timeframe and the post-filter candle count
//
// The engine holds only the immutable strategy list, so one instance is
// shared by every request handler.
// =============================================================================

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::debug;

use super::strategy::{default_strategies, SignalStrategy};
use super::vote::majority_vote;
use crate::indicators::{IndicatorFrame, IndicatorValues};
use crate::market_data::candle::format_date;
use crate::market_data::{Candle, CandleInput};
use crate::types::SignalLabel;

// =============================================================================
// Snapshot types
// =============================================================================

/// OHLCV fields of the last candle as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestCandle {
    pub date: Option<String>,
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl From<&Candle> for LatestCandle {
    fn from(c: &Candle) -> Self {
        Self {
            // An unparseable date stays None and reports as null, not a sentinel.
            date: c.date.as_ref().map(format_date),
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        }
    }
}

/// Strategy label → signal, kept in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategySignals(Vec<(String, SignalLabel)>);

impl StrategySignals {
    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<SignalLabel> {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, signal)| *signal)
    }

    pub fn labels(&self) -> Vec<SignalLabel> {
        self.0.iter().map(|(_, signal)| *signal).collect()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, SignalLabel)> {
        self.0.iter().map(|(l, s)| (l.as_str(), *s))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for StrategySignals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, signal) in &self.0 {
            map.serialize_entry(label, signal)?;
        }
        map.end()
    }
}

/// Result of one evaluation. `latest` and `values` serialise as `{}` when
/// there was no usable candle.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    #[serde(serialize_with = "empty_object_if_none")]
    pub latest: Option<LatestCandle>,
    #[serde(serialize_with = "empty_object_if_none")]
    pub values: Option<IndicatorValues>,
    pub signals: StrategySignals,
    pub overall: SignalLabel,
    pub timeframe: String,
    pub candles_used: usize,
}

fn empty_object_if_none<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    match value {
        Some(v) => v.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Runs the registered strategies and produces snapshots.
pub struct SignalEngine {
    strategies: Vec<Box<dyn SignalStrategy>>,
}

impl SignalEngine {
    pub fn new(strategies: Vec<Box<dyn SignalStrategy>>) -> Self {
        debug_assert!(
            {
                let mut labels: Vec<&str> = strategies.iter().map(|s| s.label()).collect();
                labels.sort_unstable();
                labels.windows(2).all(|w| w[0] != w[1])
            },
            "strategy labels must be unique"
        );
        Self { strategies }
    }

    pub fn strategy_count(&self) -> usize {
        self.strategies.len()
    }

    /// Normalise `inputs`, compute indicators and build the snapshot.
    pub fn evaluate(&self, inputs: &[CandleInput], timeframe: impl Into<String>) -> Snapshot {
        let frame = IndicatorFrame::from_inputs(inputs);
        self.build_snapshot(&frame, timeframe)
    }

    /// Build a snapshot from an already computed frame.
    ///
    /// An empty frame short-circuits to an all-NA snapshot without invoking
    /// any strategy.
    pub fn build_snapshot(&self, frame: &IndicatorFrame, timeframe: impl Into<String>) -> Snapshot {
        let timeframe = timeframe.into();

        let (Some(latest), Some(values)) = (frame.latest_candle(), frame.latest_values()) else {
            return Snapshot {
                latest: None,
                values: None,
                signals: StrategySignals::default(),
                overall: SignalLabel::NotAvailable,
                timeframe,
                candles_used: 0,
            };
        };

        let signals = StrategySignals(
            self.strategies
                .iter()
                .map(|strategy| {
                    let signal = strategy.compute(latest, &values);
                    debug!(strategy = strategy.label(), %signal, "strategy evaluated");
                    (strategy.label().to_string(), signal)
                })
                .collect(),
        );
        let overall = majority_vote(&signals.labels());

        Snapshot {
            latest: Some(LatestCandle::from(latest)),
            values: Some(values),
            signals,
            overall,
            timeframe,
            candles_used: frame.len(),
        }
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(default_strategies())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rising_inputs(n: usize) -> Vec<CandleInput> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                let open = if i == 0 { close } else { close - 1.0 };
                CandleInput {
                    date: Some(format!("2024-01-{:02}", i + 1)),
                    open: Some(open),
                    high: Some(close + 1.0),
                    low: Some(open - 1.0),
                    close: Some(close),
                    volume: Some(1000.0),
                }
            })
            .collect()
    }

    #[test]
    fn empty_input_short_circuits() {
        let snap = SignalEngine::default().evaluate(&[], "daily");
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(
            json,
            json!({
                "latest": {},
                "values": {},
                "signals": {},
                "overall": "N/A",
                "timeframe": "daily",
                "candles_used": 0,
            })
        );
    }

    #[test]
    fn all_rows_filtered_is_empty_snapshot() {
        let inputs = vec![CandleInput {
            close: Some(1.0),
            ..Default::default()
        }];
        let snap = SignalEngine::default().evaluate(&inputs, "weekly");
        assert!(snap.latest.is_none());
        assert!(snap.signals.is_empty());
        assert_eq!(snap.overall, SignalLabel::NotAvailable);
        assert_eq!(snap.timeframe, "weekly");
        assert_eq!(snap.candles_used, 0);
    }

    #[test]
    fn short_history_is_all_na() {
        let snap = SignalEngine::default().evaluate(&rising_inputs(5), "daily");
        assert_eq!(snap.candles_used, 5);
        assert_eq!(snap.signals.len(), 10);
        assert!(snap
            .signals
            .iter()
            .all(|(_, s)| s == SignalLabel::NotAvailable));
        assert_eq!(snap.overall, SignalLabel::NotAvailable);
        assert_eq!(snap.latest.unwrap().close, 104.0);
    }

    #[test]
    fn rising_market_votes_buy() {
        let snap = SignalEngine::default().evaluate(&rising_inputs(30), "daily");
        let s = &snap.signals;

        assert_eq!(s.get("SMA (20)"), Some(SignalLabel::Buy));
        assert_eq!(s.get("EMA (20)"), Some(SignalLabel::Buy));
        assert_eq!(s.get("WMA (20)"), Some(SignalLabel::Buy));
        assert_eq!(s.get("ADX (14)"), Some(SignalLabel::Buy));
        // Only gains: RSI pins at 100, overbought.
        assert_eq!(s.get("RSI (14)"), Some(SignalLabel::Sell));
        assert_eq!(s.get("Stochastic Oscillator"), Some(SignalLabel::Sell));
        assert_eq!(s.get("CCI (20)"), Some(SignalLabel::Sell));
        assert_eq!(s.get("Bollinger Bands"), Some(SignalLabel::Hold));
        assert_eq!(s.get("Volume SMA (20)"), Some(SignalLabel::Hold));
        // MACD signal line needs 34 candles.
        assert_eq!(s.get("MACD"), Some(SignalLabel::NotAvailable));

        assert_eq!(snap.overall, SignalLabel::Buy);
        assert_eq!(snap.candles_used, 30);
    }

    #[test]
    fn latest_reports_last_row() {
        let snap = SignalEngine::default().evaluate(&rising_inputs(30), "1h");
        let latest = snap.latest.unwrap();
        assert_eq!(latest.date.as_deref(), Some("2024-01-30 00:00:00"));
        assert_eq!(latest.open, Some(128.0));
        assert_eq!(latest.close, 129.0);
        assert_eq!(latest.volume, Some(1000.0));
        assert_eq!(snap.timeframe, "1h");
    }

    #[test]
    fn snapshot_serialises_stable_keys() {
        let snap = SignalEngine::default().evaluate(&rising_inputs(30), "daily");
        let json = serde_json::to_value(&snap).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "latest",
            "values",
            "signals",
            "overall",
            "timeframe",
            "candles_used",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj["overall"], "BUY");
        assert_eq!(obj["signals"]["MACD"], "N/A");
        assert!(obj["values"]["macd_signal"].is_null());
        assert_eq!(obj["latest"]["close"], 129.0);

        // Signals keep registration order on the wire.
        let text = serde_json::to_string(&snap.signals).unwrap();
        let rsi_at = text.find("RSI (14)").unwrap();
        let volume_at = text.find("Volume SMA (20)").unwrap();
        assert!(rsi_at < volume_at);
    }

    #[test]
    fn missing_volume_column_only_affects_volume_strategy() {
        let inputs: Vec<CandleInput> = rising_inputs(30)
            .into_iter()
            .map(|c| CandleInput { volume: None, ..c })
            .collect();
        let snap = SignalEngine::default().evaluate(&inputs, "daily");
        assert_eq!(
            snap.signals.get("Volume SMA (20)"),
            Some(SignalLabel::NotAvailable)
        );
        assert_eq!(snap.signals.get("SMA (20)"), Some(SignalLabel::Buy));
        assert!(snap.values.unwrap().vol_sma_20.is_none());
    }

    struct AlwaysSell;

    impl SignalStrategy for AlwaysSell {
        fn label(&self) -> &str {
            "Always Sell"
        }

        fn compute(&self, _latest: &Candle, _values: &IndicatorValues) -> SignalLabel {
            SignalLabel::Sell
        }
    }

    #[test]
    fn custom_strategies_plug_in() {
        let strategies: Vec<Box<dyn SignalStrategy>> =
            vec![Box::new(AlwaysSell), Box::new(AlwaysSellTwo)];
        let engine = SignalEngine::new(strategies);
        assert_eq!(engine.strategy_count(), 2);
        let snap = engine.evaluate(&rising_inputs(3), "daily");
        assert_eq!(snap.signals.get("Always Sell"), Some(SignalLabel::Sell));
        assert_eq!(snap.overall, SignalLabel::Sell);
    }

    struct AlwaysSellTwo;

    impl SignalStrategy for AlwaysSellTwo {
        fn label(&self) -> &str {
            "Always Sell Again"
        }

        fn compute(&self, _latest: &Candle, _values: &IndicatorValues) -> SignalLabel {
            SignalLabel::Sell
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let engine = SignalEngine::default();
        let inputs = rising_inputs(40);
        let a = engine.evaluate(&inputs, "daily");
        let b = engine.evaluate(&inputs, "daily");
        assert_eq!(
            serde_json::to_value(a).unwrap(),
            serde_json::to_value(b).unwrap()
        );
    }
}
