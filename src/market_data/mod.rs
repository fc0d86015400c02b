pub mod candle;

// Re-export the candle types for convenient access (e.g. `use crate::market_data::Candle`).
pub use candle::{normalize_candles, Candle, CandleInput};
