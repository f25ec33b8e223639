//! Bar file parsing.
//!
//! Accepts either `{"stock_code": ..., "bars": [...]}` or a bare array of
//! bars. Dates are `YYYY-MM-DD`.

use crate::error::{AppError, AppResult};
use pgate_core::{BarSeries, PriceBar};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInput {
    Document {
        #[serde(default)]
        stock_code: Option<String>,
        bars: Vec<PriceBar>,
    },
    Bare(Vec<PriceBar>),
}

/// Parsed and validated input.
#[derive(Debug, Clone, PartialEq)]
pub struct BarInput {
    pub stock_code: Option<String>,
    pub bars: BarSeries,
}

impl BarInput {
    pub fn parse(json: &str) -> AppResult<Self> {
        let raw: RawInput = serde_json::from_str(json).map_err(|e| {
            AppError::Input(format!("expected a bar array or {{\"bars\": [...]}}: {e}"))
        })?;

        let (stock_code, bars) = match raw {
            RawInput::Document { stock_code, bars } => (stock_code, bars),
            RawInput::Bare(bars) => (None, bars),
        };

        Ok(Self {
            stock_code: stock_code.filter(|code| !code.is_empty()),
            bars: BarSeries::new(bars)?,
        })
    }

    /// Read from a file path, or stdin when `source` is `-`.
    pub fn read(source: &str) -> AppResult<Self> {
        let content = if source == "-" {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        } else {
            std::fs::read_to_string(source)?
        };
        Self::parse(&content)
    }
}
