//! Aggregated severity and the gating policy derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall anomaly severity for one detection.
///
/// Ordered from least to most severe. `Low` is part of the vocabulary but is
/// not produced by the current aggregation rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OverallLevel {
    #[default]
    Normal,
    Low,
    Medium,
    High,
    Critical,
}

impl OverallLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for OverallLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What downstream prediction consumers must do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateAction {
    /// Predict normally.
    #[default]
    Allow,
    /// Predict, but surface the anomaly alongside the prediction.
    Warning,
    /// Withhold predictions until conditions normalise.
    Suspend,
    /// Refuse predictions outright.
    Block,
}

impl GateAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Warning => "warning",
            Self::Suspend => "suspend",
            Self::Block => "block",
        }
    }

    /// Whether a prediction may still be served.
    pub fn allows_prediction(&self) -> bool {
        matches!(self, Self::Allow | Self::Warning)
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Suspend | Self::Block)
    }
}

impl fmt::Display for GateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
