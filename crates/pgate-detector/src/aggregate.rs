//! Folding fired signals into one overall level.

use pgate_core::{AnomalySignal, OverallLevel, SignalLevel};

/// Count-based aggregation.
///
/// Rules, first match wins:
/// - 2+ high, or 1 high with 2+ medium: `Critical`
/// - 1 high, or 3+ medium: `High`
/// - 1+ medium: `Medium`
/// - otherwise: `Normal`
///
/// `OverallLevel::Low` is never produced, even for low-only signal sets.
pub struct Aggregator;

impl Aggregator {
    pub fn aggregate(signals: &[AnomalySignal]) -> OverallLevel {
        let high = count(signals, SignalLevel::High);
        let medium = count(signals, SignalLevel::Medium);

        if high >= 2 || (high >= 1 && medium >= 2) {
            OverallLevel::Critical
        } else if high >= 1 || medium >= 3 {
            OverallLevel::High
        } else if medium >= 1 {
            OverallLevel::Medium
        } else {
            OverallLevel::Normal
        }
    }
}

fn count(signals: &[AnomalySignal], level: SignalLevel) -> usize {
    signals.iter().filter(|s| s.level == level).count()
}
