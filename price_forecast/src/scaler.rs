//! Min-max scaling fitted on the training partition

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};

/// Linear min-max scaler mapping a reference range onto [0, 1].
///
/// The scaler is fitted once, on the training partition only, and the same
/// fitted parameters are applied to the test partition and the forecast
/// input window. Refitting per partition would leak test data into the
/// scale and make forecast values uninterpretable, so a fitted scaler is
/// immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fit the scaler on reference values (the training closes).
    ///
    /// Fails with [`ForecastError::NumericInstability`] when the range is
    /// degenerate, i.e. every value is equal.
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InvalidInput(
                "Cannot fit a scaler on an empty slice".to_string(),
            ));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            if !v.is_finite() {
                return Err(ForecastError::InvalidInput(format!(
                    "Non-finite value {} in scaler reference data",
                    v
                )));
            }
            min = min.min(v);
            max = max.max(v);
        }

        if max - min == 0.0 {
            return Err(ForecastError::NumericInstability(format!(
                "All reference values equal {}; min-max range is degenerate",
                min
            )));
        }

        Ok(Self { min, max })
    }

    /// Scale a single value into the fitted range
    pub fn transform_one(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// Scale a slice of values
    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform_one(v)).collect()
    }

    /// Map a scaled value back to the original units
    pub fn inverse_one(&self, scaled: f64) -> f64 {
        scaled * (self.max - self.min) + self.min
    }

    /// Map scaled values back to the original units
    pub fn inverse(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&v| self.inverse_one(v)).collect()
    }

    /// Minimum of the fitted reference range
    pub fn fitted_min(&self) -> f64 {
        self.min
    }

    /// Maximum of the fitted reference range
    pub fn fitted_max(&self) -> f64 {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_map_to_unit_interval() {
        let scaler = MinMaxScaler::fit(&[10.0, 15.0, 20.0]).unwrap();

        assert_eq!(scaler.transform_one(10.0), 0.0);
        assert_eq!(scaler.transform_one(20.0), 1.0);
        assert_eq!(scaler.transform_one(15.0), 0.5);
    }

    #[test]
    fn degenerate_range_is_rejected() {
        let result = MinMaxScaler::fit(&[7.0, 7.0, 7.0]);
        assert!(matches!(
            result,
            Err(ForecastError::NumericInstability(_))
        ));
    }

    #[test]
    fn round_trip_recovers_value() {
        let scaler = MinMaxScaler::fit(&[100.0, 250.0]).unwrap();
        for &x in &[100.0, 137.5, 200.0, 250.0, 300.0] {
            let back = scaler.inverse_one(scaler.transform_one(x));
            assert!((back - x).abs() < 1e-9);
        }
    }
}
