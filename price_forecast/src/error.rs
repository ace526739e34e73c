//! Error types for the price_forecast crate

use market_data::MarketDataError;
use thiserror::Error;

/// Failure modes of the forecasting pipeline.
///
/// Every variant carries a human-readable message; none of them should ever
/// escalate to a panic in the serving process. There is no retry policy:
/// training on fixed input is deterministic enough that a failure without a
/// change of input stays a failure.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Too few rows to form windows and a non-trivial train/test split
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Missing or non-numeric fields, mismatched lengths
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Degenerate numeric conditions (flat scaler range, zero denominators)
    #[error("Numeric instability: {0}")]
    NumericInstability(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<MarketDataError> for ForecastError {
    fn from(err: MarketDataError) -> Self {
        ForecastError::InvalidInput(err.to_string())
    }
}
