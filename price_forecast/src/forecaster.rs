//! End-to-end forecasting pipeline

use crate::error::{ForecastError, Result};
use crate::metrics;
use crate::model::{LstmConfig, LstmNetwork};
use crate::scaler::MinMaxScaler;
use crate::window;
use market_data::PriceSeries;
use serde::{Deserialize, Serialize};

/// Pipeline configuration: split policy, window size and model
/// hyperparameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Length of each model input window
    pub window_size: usize,
    /// Fraction of the series used for training, split by position
    pub train_ratio: f64,
    /// Minimum number of records required to run the pipeline
    pub min_points: usize,
    /// Recurrent network hyperparameters
    pub model: LstmConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_size: 7,
            train_ratio: 0.8,
            min_points: 15,
            model: LstmConfig::default(),
        }
    }
}

/// Result of one forecasting run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastOutcome {
    /// Point forecast for the next period, in price units
    pub prediction: f64,
    /// Backtest root-mean-squared error over the test partition
    pub rmse: f64,
    /// Actual test-partition closes, in order
    pub actual: Vec<f64>,
    /// Predicted values for the same positions
    pub predicted: Vec<f64>,
    /// Test-partition volumes aligned to the same positions
    pub volume_tail: Vec<f64>,
    /// Mean absolute percentage error, when defined
    pub mape: Option<f64>,
    /// Diagnostic accuracy (100 − MAPE), when defined
    pub accuracy: Option<f64>,
}

/// Stateless next-period price forecaster.
///
/// Every [`run`](Forecaster::run) retrains from scratch: a fresh scaler is
/// fitted on the training partition and a fresh model is constructed,
/// trained and consumed within the call. Nothing is shared between
/// invocations, so a run is never biased by earlier requests.
#[derive(Debug, Clone, Default)]
pub struct Forecaster {
    config: ForecastConfig,
}

impl Forecaster {
    /// Create a forecaster with the given configuration
    pub fn new(config: ForecastConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Train on the leading partition of `series`, backtest on the trailing
    /// partition, and forecast the next period.
    pub fn run(&self, series: &PriceSeries) -> Result<ForecastOutcome> {
        if self.config.window_size == 0 {
            return Err(ForecastError::InvalidInput(
                "Window size must be positive".to_string(),
            ));
        }
        if series.len() < self.config.min_points {
            return Err(ForecastError::InsufficientData(format!(
                "Series has {} records; at least {} are required",
                series.len(),
                self.config.min_points
            )));
        }

        let (train, test) = series.split_at_ratio(self.config.train_ratio)?;
        if test.is_empty() {
            return Err(ForecastError::InsufficientData(
                "Test partition is empty; cannot backtest the model".to_string(),
            ));
        }
        tracing::debug!(
            total = series.len(),
            train = train.len(),
            test = test.len(),
            "partitioned series"
        );

        // The scaler is fitted on training closes only and reused, never
        // refitted, for the test partition and the forecast input.
        let scaler = MinMaxScaler::fit(&train.closes())?;
        let scaled_train = scaler.transform(&train.closes());
        let scaled_test = scaler.transform(&test.closes());

        let (train_windows, train_labels) =
            window::training_windows(&scaled_train, self.config.window_size)?;
        let test_windows =
            window::bridged_test_windows(&scaled_train, &scaled_test, self.config.window_size)?;
        let forecast_window = window::forecast_input(&scaled_train, self.config.window_size)?;

        let mut model = LstmNetwork::new(self.config.model.clone())?;
        model.train(&train_windows, &train_labels)?;

        let predicted = scaler.inverse(&model.predict(&test_windows));
        let actual = test.closes();

        let rmse = metrics::rmse(&actual, &predicted)?;
        let mape = metrics::mape(&actual, &predicted).ok();
        let accuracy = mape.map(metrics::accuracy_from_mape);

        let prediction = scaler.inverse_one(model.predict_one(&forecast_window));
        tracing::debug!(prediction, rmse, "forecast complete");

        Ok(ForecastOutcome {
            prediction,
            rmse,
            actual,
            predicted,
            volume_tail: test.volumes(),
            mape,
            accuracy,
        })
    }
}
