//! Mapping overall severity to a prediction gate action.

use pgate_core::{AnomalySignal, AnomalyType, GateAction, OverallLevel};

/// Signal types that escalate a `High` level from warning to suspend.
pub const SUSPEND_TRIGGERS: [AnomalyType; 3] = [
    AnomalyType::VolatilitySpike,
    AnomalyType::TrendReversal,
    AnomalyType::MarketStructureTrending,
];

pub struct GateDecider;

impl GateDecider {
    pub fn decide(level: OverallLevel, signals: &[AnomalySignal]) -> GateAction {
        match level {
            OverallLevel::Critical => GateAction::Block,
            OverallLevel::High => {
                if signals
                    .iter()
                    .any(|s| SUSPEND_TRIGGERS.contains(&s.anomaly_type))
                {
                    GateAction::Suspend
                } else {
                    GateAction::Warning
                }
            }
            OverallLevel::Medium => GateAction::Warning,
            OverallLevel::Low | OverallLevel::Normal => GateAction::Allow,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgate_core::SignalLevel;

    fn signal(anomaly_type: AnomalyType) -> AnomalySignal {
        AnomalySignal::new(anomaly_type, SignalLevel::High, String::new())
    }

    #[test]
    fn test_critical_blocks() {
        assert_eq!(
            GateDecider::decide(OverallLevel::Critical, &[]),
            GateAction::Block
        );
    }

    #[test]
    fn test_high_suspends_on_trigger_types() {
        for t in SUSPEND_TRIGGERS {
            assert_eq!(
                GateDecider::decide(OverallLevel::High, &[signal(t)]),
                GateAction::Suspend
            );
        }
    }

    #[test]
    fn test_high_warns_otherwise() {
        let signals = [
            signal(AnomalyType::PriceGapDown),
            signal(AnomalyType::MarketStructureMeanReverting),
        ];
        assert_eq!(
            GateDecider::decide(OverallLevel::High, &signals),
            GateAction::Warning
        );
    }

    #[test]
    fn test_lower_levels() {
        assert_eq!(
            GateDecider::decide(OverallLevel::Medium, &[]),
            GateAction::Warning
        );
        assert_eq!(GateDecider::decide(OverallLevel::Low, &[]), GateAction::Allow);
        assert_eq!(
            GateDecider::decide(OverallLevel::Normal, &[]),
            GateAction::Allow
        );
    }
}
