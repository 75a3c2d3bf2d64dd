//! Error types for cycletrace

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while loading observations.
///
/// The computational core (detection, prediction, resolution) never fails:
/// empty or partial input reduces to a defined fallback value. Errors are
/// confined to the load boundary.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("Observation source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Failed to parse journal document: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
}
