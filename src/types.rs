// =============================================================================
// Shared types used across the signals service
// =============================================================================

use serde::Serialize;

/// Discrete outcome of a single strategy, or of the overall vote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SignalLabel {
    #[serde(rename = "BUY")]
    Buy,
    #[serde(rename = "SELL")]
    Sell,
    #[serde(rename = "HOLD")]
    Hold,
    /// A required input was NA, so no signal can be given.
    #[default]
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl SignalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
            Self::NotAvailable => "N/A",
        }
    }

    /// Three-way comparison shared by the crossover-style strategies:
    /// `value > reference` is bullish, `value < reference` bearish.
    pub fn from_comparison(value: f64, reference: f64) -> Self {
        if value > reference {
            Self::Buy
        } else if value < reference {
            Self::Sell
        } else {
            Self::Hold
        }
    }
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
