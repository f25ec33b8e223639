//! Anomaly signal types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of abnormal behaviour a detector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    VolatilitySpike,
    PriceGapUp,
    PriceGapDown,
    VolumeSpike,
    AbnormalPriceMovement,
    TrendReversal,
    MarketStructureTrending,
    MarketStructureMeanReverting,
}

impl AnomalyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VolatilitySpike => "volatility_spike",
            Self::PriceGapUp => "price_gap_up",
            Self::PriceGapDown => "price_gap_down",
            Self::VolumeSpike => "volume_spike",
            Self::AbnormalPriceMovement => "abnormal_price_movement",
            Self::TrendReversal => "trend_reversal",
            Self::MarketStructureTrending => "market_structure_trending",
            Self::MarketStructureMeanReverting => "market_structure_mean_reverting",
        }
    }

    /// What this anomaly means for a price prediction made right now.
    pub fn impact(&self) -> &'static str {
        match self {
            Self::VolatilitySpike => {
                "Prediction confidence intervals are unreliable while volatility is elevated"
            }
            Self::PriceGapUp | Self::PriceGapDown => {
                "Overnight information shock; models trained on continuous prices may lag"
            }
            Self::VolumeSpike => "Unusual participation may precede a regime change",
            Self::AbnormalPriceMovement => {
                "Recent moves are outside the historical return distribution"
            }
            Self::TrendReversal => "Trend-following features point the wrong way",
            Self::MarketStructureTrending => {
                "Market is persistently trending; mean-reversion assumptions break down"
            }
            Self::MarketStructureMeanReverting => {
                "Market is strongly mean-reverting; momentum features are unreliable"
            }
        }
    }
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a single signal.
///
/// No detector currently emits `Low`; it is kept for wire compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalLevel {
    Low,
    Medium,
    High,
}

impl SignalLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for SignalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detector firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalySignal {
    #[serde(rename = "type")]
    pub anomaly_type: AnomalyType,
    pub level: SignalLevel,
    /// Detector-specific measurements, keyed by name. Ordered so that
    /// serialized output is stable.
    pub metrics: BTreeMap<String, f64>,
    pub description: String,
    pub impact: String,
}

impl AnomalySignal {
    /// Create a signal with the type's standard impact text and no metrics.
    pub fn new(anomaly_type: AnomalyType, level: SignalLevel, description: String) -> Self {
        Self {
            anomaly_type,
            level,
            metrics: BTreeMap::new(),
            description,
            impact: anomaly_type.impact().to_string(),
        }
    }

    /// Attach a named measurement.
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_serializes_snake_case() {
        let json = serde_json::to_string(&AnomalyType::MarketStructureMeanReverting).unwrap();
        assert_eq!(json, "\"market_structure_mean_reverting\"");
        assert_eq!(AnomalyType::PriceGapDown.to_string(), "price_gap_down");
    }

    #[test]
    fn test_signal_wire_shape() {
        let signal = AnomalySignal::new(
            AnomalyType::VolumeSpike,
            SignalLevel::High,
            "volume 4.0 sigma above baseline".to_string(),
        )
        .with_metric("z_score", 4.0);

        let value = serde_json::to_value(&signal).unwrap();
        assert_eq!(value["type"], "volume_spike");
        assert_eq!(value["level"], "high");
        assert_eq!(value["metrics"]["z_score"], 4.0);
        assert_eq!(value["impact"], AnomalyType::VolumeSpike.impact());
        assert_eq!(signal.metric("z_score"), Some(4.0));
    }

    #[test]
    fn test_level_ordering() {
        assert!(SignalLevel::High > SignalLevel::Medium);
        assert!(SignalLevel::Medium > SignalLevel::Low);
    }
}
