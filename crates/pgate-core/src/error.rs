//! Error types for pgate-core.

use chrono::NaiveDate;
use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid bar on {date}: {reason}")]
    InvalidBar { date: NaiveDate, reason: String },

    #[error("Bars out of order: {current} follows {previous}")]
    OutOfOrder {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Duplicate bar date: {0}")]
    DuplicateDate(NaiveDate),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
