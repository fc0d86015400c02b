// =============================================================================
// Signals Module
// =============================================================================
//
// Strategy evaluation on top of the indicator frame:
// - Rule-based strategies (one label per indicator)
// - Majority vote over the strategy labels
// - Snapshot builder tying the pipeline together

pub mod engine;
pub mod strategy;
pub mod vote;

pub use engine::{SignalEngine, Snapshot};
