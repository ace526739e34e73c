//! # Price Forecast
//!
//! Next-period stock price forecasting with a stacked LSTM, backtested
//! against a held-out tail of the series.
//!
//! ## Pipeline
//!
//! Given a chronological series of daily closes and volumes, one run:
//!
//! 1. splits the series 80/20 by position (no shuffling),
//! 2. fits a min-max scaler on the training closes only and reuses it,
//!    unrefitted, for the test partition and the forecast input,
//! 3. builds 7-step sliding windows, bridging test-window history across
//!    the train/test boundary,
//! 4. trains a fresh recurrent network on mean-squared error,
//! 5. backtests on the test windows (RMSE, optional MAPE/accuracy) and
//!    forecasts the next period from the end-of-training window.
//!
//! Each invocation retrains from scratch; no model or scaler state survives
//! a call.
//!
//! ## Quick Start
//!
//! ```no_run
//! use market_data::PriceSeries;
//! use price_forecast::{ForecastConfig, Forecaster};
//!
//! let series = PriceSeries::from_csv("prices.csv")?;
//! let forecaster = Forecaster::new(ForecastConfig::default());
//!
//! let outcome = forecaster.run(&series)?;
//! println!("next close: {:.2} (backtest RMSE {:.2})", outcome.prediction, outcome.rmse);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod forecaster;
pub mod metrics;
pub mod model;
pub mod scaler;
pub mod service;
pub mod window;

// Re-export commonly used types
pub use crate::error::ForecastError;
pub use crate::forecaster::{ForecastConfig, ForecastOutcome, Forecaster};
pub use crate::model::LstmConfig;
pub use crate::scaler::MinMaxScaler;
pub use crate::service::{ForecastRequest, ForecastResponse, ForecastService, ServiceError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
