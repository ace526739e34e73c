//! Accuracy metrics for backtested forecasts

use crate::error::{ForecastError, Result};

/// Root-mean-squared error between actual and predicted values.
///
/// Always non-negative, and zero exactly when every prediction matches its
/// actual value.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    let n = actual.len() as f64;
    let mse = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;

    Ok(mse.sqrt())
}

/// Mean absolute percentage error.
///
/// Undefined when any actual value is zero; that case fails with
/// [`ForecastError::NumericInstability`] instead of dividing by zero.
pub fn mape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    check_lengths(actual, predicted)?;

    if actual.iter().any(|&a| a == 0.0) {
        return Err(ForecastError::NumericInstability(
            "MAPE is undefined when an actual value is zero".to_string(),
        ));
    }

    let n = actual.len() as f64;
    let total = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| ((a - p) / a).abs())
        .sum::<f64>();

    Ok(total / n * 100.0)
}

/// Diagnostic accuracy derived from MAPE: 100 − MAPE
pub fn accuracy_from_mape(mape: f64) -> f64 {
    100.0 - mape
}

fn check_lengths(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.len() != predicted.len() || actual.is_empty() {
        return Err(ForecastError::InvalidInput(format!(
            "Actual ({}) and predicted ({}) must have the same non-zero length",
            actual.len(),
            predicted.len()
        )));
    }
    Ok(())
}
