use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::debug;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A candle exactly as it arrives on the wire.
///
/// Numeric fields accept JSON numbers or numeric strings. Anything else
/// (`null`, `"abc"`, objects, missing keys, literals beyond the `f64` range)
/// decodes to `None` instead of rejecting the whole request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandleInput {
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

/// A candle that survived normalisation: high, low and close are always
/// present. `open` and `volume` are carried through but may be NA.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub date: Option<NaiveDateTime>,
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl Candle {
    /// `(high + low + close) / 3`
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Coerce the wire candles and drop every row missing high, low or close.
///
/// Input order is preserved; callers supply candles oldest first.
pub fn normalize_candles(inputs: &[CandleInput]) -> Vec<Candle> {
    let candles: Vec<Candle> = inputs
        .iter()
        .filter_map(|input| {
            Some(Candle {
                date: input.date.as_deref().and_then(parse_date),
                open: input.open,
                high: input.high?,
                low: input.low?,
                close: input.close?,
                volume: input.volume,
            })
        })
        .collect();

    let dropped = inputs.len() - candles.len();
    if dropped > 0 {
        debug!(
            dropped,
            kept = candles.len(),
            "dropped candles missing high/low/close"
        );
    }

    candles
}

/// Parse the date formats seen in practice: RFC 3339 (offsets are folded to
/// UTC), ISO date-times with a space or `T` separator, and bare dates.
/// Unparseable input yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Render a candle date the way the snapshot reports it.
pub fn format_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Numeric coercion: finite numbers and numeric strings pass, everything
/// else becomes NA.
///
/// serde_json runs with `arbitrary_precision`, so a number literal reaches
/// this point as text and an overflowing one parses to infinity here rather
/// than failing the body.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|x| x.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_f64))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}
