//! Sliding-window construction over scaled price series

use crate::error::{ForecastError, Result};

/// Build supervised training windows over the scaled training series.
///
/// Window `i` covers positions `[i, i + window_size)` and its label is the
/// value at position `i + window_size`. A series of length `L` yields
/// exactly `L - window_size` (window, label) pairs.
pub fn training_windows(
    scaled_train: &[f64],
    window_size: usize,
) -> Result<(Vec<Vec<f64>>, Vec<f64>)> {
    if scaled_train.len() <= window_size {
        return Err(ForecastError::InsufficientData(format!(
            "Training partition has {} points; need more than the window size {}",
            scaled_train.len(),
            window_size
        )));
    }

    let count = scaled_train.len() - window_size;
    let mut windows = Vec::with_capacity(count);
    let mut labels = Vec::with_capacity(count);

    for i in 0..count {
        windows.push(scaled_train[i..i + window_size].to_vec());
        labels.push(scaled_train[i + window_size]);
    }

    Ok((windows, labels))
}

/// Build test windows whose history bridges the train/test boundary.
///
/// The first test window must not start cold: its history is the final
/// `window_size` scaled training values, and subsequent windows slide into
/// the test series. A test partition of length `L_test` yields exactly
/// `L_test` windows, each predicting one test position in order.
pub fn bridged_test_windows(
    scaled_train: &[f64],
    scaled_test: &[f64],
    window_size: usize,
) -> Result<Vec<Vec<f64>>> {
    if scaled_train.len() < window_size {
        return Err(ForecastError::InsufficientData(format!(
            "Training partition has {} points; need at least {} to bridge into the test set",
            scaled_train.len(),
            window_size
        )));
    }
    if scaled_test.is_empty() {
        return Err(ForecastError::InsufficientData(
            "Test partition is empty; nothing to backtest".to_string(),
        ));
    }

    let mut bridged = Vec::with_capacity(window_size + scaled_test.len());
    bridged.extend_from_slice(&scaled_train[scaled_train.len() - window_size..]);
    bridged.extend_from_slice(scaled_test);

    let windows = (0..scaled_test.len())
        .map(|i| bridged[i..i + window_size].to_vec())
        .collect();

    Ok(windows)
}

/// Build the single next-step forecast window.
///
/// Uses the most recent `window_size` scaled observations known at the end
/// of training, equivalently the last `window_size - 1` values of the final
/// training window plus its label. Test data is deliberately not included:
/// the forecast step is decoupled from the backtest.
pub fn forecast_input(scaled_train: &[f64], window_size: usize) -> Result<Vec<f64>> {
    if scaled_train.len() < window_size {
        return Err(ForecastError::InsufficientData(format!(
            "Training partition has {} points; need at least {} for a forecast window",
            scaled_train.len(),
            window_size
        )));
    }

    Ok(scaled_train[scaled_train.len() - window_size..].to_vec())
}
