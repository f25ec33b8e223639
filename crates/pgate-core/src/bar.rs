//! Daily OHLCV bars and the validated series the engine consumes.

use crate::error::{CoreError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single trading day's open, high, low, close and volume.
///
/// `high >= max(open, close)` and `low <= min(open, close)` are expected of
/// upstream data but are not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Check that every numeric field is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];

        for (name, value) in fields {
            if !value.is_finite() {
                return Err(CoreError::InvalidBar {
                    date: self.date,
                    reason: format!("{name} is not finite"),
                });
            }
            if value < 0.0 {
                return Err(CoreError::InvalidBar {
                    date: self.date,
                    reason: format!("{name} is negative ({value})"),
                });
            }
        }

        Ok(())
    }
}

/// Bars in strictly ascending date order, validated on construction.
///
/// Built fresh for every detection call and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct BarSeries {
    bars: Vec<PriceBar>,
}

impl BarSeries {
    /// Validate and wrap a vector of bars.
    ///
    /// Rejects non-finite or negative fields, duplicate dates and
    /// descending dates.
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        for bar in &bars {
            bar.validate()?;
        }

        for pair in bars.windows(2) {
            let (previous, current) = (pair[0].date, pair[1].date);
            if current == previous {
                return Err(CoreError::DuplicateDate(current));
            }
            if current < previous {
                return Err(CoreError::OutOfOrder { previous, current });
            }
        }

        Ok(Self { bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// The trailing `n` bars (all of them when fewer exist).
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        tail(&self.bars, n)
    }

    /// Close prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        closes(&self.bars)
    }
}

impl TryFrom<Vec<PriceBar>> for BarSeries {
    type Error = CoreError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self> {
        Self::new(bars)
    }
}

impl From<BarSeries> for Vec<PriceBar> {
    fn from(series: BarSeries) -> Self {
        series.bars
    }
}

/// The trailing `n` elements of a slice.
pub fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub fn volumes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume).collect()
}

/// Simple close-to-close returns. Pairs with a zero prior close are skipped.
pub fn returns(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect()
}

/// Log returns `ln(close[t] / close[t-1])`. Pairs with a non-positive close are skipped.
pub fn log_returns(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2)
        .filter(|w| w[0].close > 0.0 && w[1].close > 0.0)
        .map(|w| (w[1].close / w[0].close).ln())
        .collect()
}

/// Overnight gaps `(open[t] - close[t-1]) / close[t-1]`.
pub fn gaps(bars: &[PriceBar]) -> Vec<f64> {
    bars.windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].open - w[0].close) / w[0].close)
        .collect()
}
