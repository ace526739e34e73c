//! # Market Data
//!
//! `market_data` provides the daily price record types shared by the
//! forecasting and portfolio crates. A [`PriceSeries`] is a validated,
//! chronologically ordered sequence of [`DailyPrice`] records: every close
//! is a finite, non-negative number and dates never move backwards.
//!
//! ## Usage Example
//!
//! ```
//! use chrono::NaiveDate;
//! use market_data::{DailyPrice, PriceSeries};
//!
//! let records: Vec<DailyPrice> = (0..20)
//!     .map(|i| DailyPrice {
//!         date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i),
//!         close: 100.0 + i as f64,
//!         volume: 1_000.0,
//!     })
//!     .collect();
//!
//! let series = PriceSeries::from_records(records).unwrap();
//! let (train, test) = series.split_at_ratio(0.8).unwrap();
//! assert_eq!(train.len(), 16);
//! assert_eq!(test.len(), 4);
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while building or loading price data
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Empty price series")]
    EmptySeries,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;

/// One daily observation of a stock: closing price and traded volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrice {
    /// Trading date of the observation
    pub date: NaiveDate,
    /// Closing price
    pub close: f64,
    /// Traded volume
    #[serde(default)]
    pub volume: f64,
}

/// Chronologically ordered, validated sequence of daily prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    records: Vec<DailyPrice>,
}

impl PriceSeries {
    /// Build a series from raw records, validating each one.
    ///
    /// Rejects empty input, non-finite or negative closes, non-finite or
    /// negative volumes, and dates that move backwards.
    pub fn from_records(records: Vec<DailyPrice>) -> Result<Self> {
        if records.is_empty() {
            return Err(MarketDataError::EmptySeries);
        }

        for (i, record) in records.iter().enumerate() {
            if !record.close.is_finite() || record.close < 0.0 {
                return Err(MarketDataError::InvalidRecord(format!(
                    "Close price at position {} ({}) is not a valid price",
                    i, record.close
                )));
            }
            if !record.volume.is_finite() || record.volume < 0.0 {
                return Err(MarketDataError::InvalidRecord(format!(
                    "Volume at position {} ({}) is not a valid volume",
                    i, record.volume
                )));
            }
            if i > 0 && record.date < records[i - 1].date {
                return Err(MarketDataError::InvalidRecord(format!(
                    "Date {} at position {} is earlier than the preceding date {}",
                    record.date,
                    i,
                    records[i - 1].date
                )));
            }
        }

        Ok(Self { records })
    }

    /// Load a series from a CSV file with `date,close,volume` columns
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();

        for row in reader.deserialize() {
            let record: DailyPrice = row?;
            records.push(record);
        }

        Self::from_records(records)
    }

    /// Parse a series from a JSON array of `{date, close, volume}` objects
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<DailyPrice> = serde_json::from_str(json)
            .map_err(|e| MarketDataError::InvalidRecord(e.to_string()))?;
        Self::from_records(records)
    }

    /// Number of records in the series
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The underlying records, oldest first
    pub fn records(&self) -> &[DailyPrice] {
        &self.records
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.close).collect()
    }

    /// Traded volumes, oldest first
    pub fn volumes(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.volume).collect()
    }

    /// Trading dates, oldest first
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Split the series by position: the first `floor(ratio * len)` records
    /// form the left partition, the rest the right partition. Order is
    /// preserved on both sides; no shuffling ever happens.
    pub fn split_at_ratio(&self, ratio: f64) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(MarketDataError::InvalidRecord(format!(
                "Split ratio {} is outside [0, 1]",
                ratio
            )));
        }

        let split = (ratio * self.records.len() as f64).floor() as usize;
        let (left, right) = self.records.split_at(split);

        Ok((
            Self {
                records: left.to_vec(),
            },
            Self {
                records: right.to_vec(),
            },
        ))
    }
}
