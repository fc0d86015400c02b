// =============================================================================
// Majority Vote: combine strategy labels into one overall signal
// =============================================================================
//
// N/A labels abstain. Among BUY / SELL / HOLD the label with the strictly
// highest count wins; any tie at the top resolves to HOLD, so a tie can never
// produce BUY or SELL. No votes at all gives N/A.
// =============================================================================

use crate::types::SignalLabel;

pub fn majority_vote(labels: &[SignalLabel]) -> SignalLabel {
    let (mut buy, mut sell, mut hold) = (0usize, 0usize, 0usize);
    for label in labels {
        match label {
            SignalLabel::Buy => buy += 1,
            SignalLabel::Sell => sell += 1,
            SignalLabel::Hold => hold += 1,
            SignalLabel::NotAvailable => {}
        }
    }

    if buy + sell + hold == 0 {
        return SignalLabel::NotAvailable;
    }
    if buy > sell && buy > hold {
        return SignalLabel::Buy;
    }
    if sell > buy && sell > hold {
        return SignalLabel::Sell;
    }
    SignalLabel::Hold
}
