//! Request-facing service layer: payload types and admission control

use crate::error::ForecastError;
use crate::forecaster::{ForecastConfig, Forecaster};
use market_data::{DailyPrice, PriceSeries};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by the forecast service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The forecasting pipeline rejected or failed on the input
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// All training slots are busy; the request was rejected, not queued
    #[error("Service at capacity: {0} training jobs already running")]
    AtCapacity(usize),
}

/// Forecast request: a list of daily price records, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRequest {
    #[serde(rename = "stockData")]
    pub stock_data: Vec<DailyPrice>,
}

/// Paired actual/predicted series over the backtest partition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActualVsPredicted {
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
}

/// Forecast response in the wire shape served to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub prediction: f64,
    pub error: Option<f64>,
    pub actual_vs_predicted: ActualVsPredicted,
    pub volume_tail: Vec<f64>,
}

/// Stateless service entry point: validate the records, run the full
/// train-and-forecast pipeline, and shape the result for the wire.
///
/// Every call retrains from scratch on exactly the supplied records.
pub fn forecast_records(
    records: Vec<DailyPrice>,
    config: &ForecastConfig,
) -> Result<ForecastResponse, ServiceError> {
    let series = PriceSeries::from_records(records).map_err(ForecastError::from)?;
    let outcome = Forecaster::new(config.clone()).run(&series)?;

    Ok(ForecastResponse {
        prediction: outcome.prediction,
        error: Some(outcome.rmse),
        actual_vs_predicted: ActualVsPredicted {
            actual: outcome.actual,
            predicted: outcome.predicted,
        },
        volume_tail: outcome.volume_tail,
    })
}

/// Admission-controlled forecast service.
///
/// Training dominates request latency, so concurrent jobs are bounded by a
/// fixed slot count sized to available compute. A request that arrives with
/// every slot busy is rejected immediately with
/// [`ServiceError::AtCapacity`]; queueing would only hide latency the
/// caller should see and react to.
#[derive(Debug, Clone)]
pub struct ForecastService {
    config: ForecastConfig,
    slots: Arc<JobSlots>,
}

impl ForecastService {
    /// Create a service running at most `max_concurrent_jobs` trainings
    pub fn new(config: ForecastConfig, max_concurrent_jobs: usize) -> Self {
        Self {
            config,
            slots: Arc::new(JobSlots::new(max_concurrent_jobs.max(1))),
        }
    }

    /// Handle one forecast request, holding a job slot for its duration
    pub fn handle(&self, request: ForecastRequest) -> Result<ForecastResponse, ServiceError> {
        let _slot = JobSlots::try_acquire(&self.slots).ok_or_else(|| {
            tracing::warn!(max = self.slots.max, "rejecting forecast request at capacity");
            ServiceError::AtCapacity(self.slots.max)
        })?;

        tracing::info!(records = request.stock_data.len(), "forecast job admitted");
        forecast_records(request.stock_data, &self.config)
    }

    /// Number of jobs currently holding a slot
    pub fn active_jobs(&self) -> usize {
        self.slots.active()
    }
}

/// Counting gate over training job slots
#[derive(Debug)]
struct JobSlots {
    max: usize,
    active: Mutex<usize>,
}

impl JobSlots {
    fn new(max: usize) -> Self {
        Self {
            max,
            active: Mutex::new(0),
        }
    }

    fn try_acquire(slots: &Arc<Self>) -> Option<SlotGuard> {
        let mut active = slots.active.lock().unwrap_or_else(|e| e.into_inner());
        if *active >= slots.max {
            return None;
        }
        *active += 1;
        Some(SlotGuard {
            slots: Arc::clone(slots),
        })
    }

    fn active(&self) -> usize {
        *self.active.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Releases its job slot on drop, on every exit path
struct SlotGuard {
    slots: Arc<JobSlots>,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        let mut active = self.slots.active.lock().unwrap_or_else(|e| e.into_inner());
        *active -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_reject_beyond_capacity() {
        let slots = Arc::new(JobSlots::new(2));

        let a = JobSlots::try_acquire(&slots);
        let b = JobSlots::try_acquire(&slots);
        assert!(a.is_some());
        assert!(b.is_some());
        assert!(JobSlots::try_acquire(&slots).is_none());

        drop(a);
        assert!(JobSlots::try_acquire(&slots).is_some());
    }

    #[test]
    fn guard_releases_on_drop() {
        let slots = Arc::new(JobSlots::new(1));
        {
            let _guard = JobSlots::try_acquire(&slots).unwrap();
            assert_eq!(slots.active(), 1);
        }
        assert_eq!(slots.active(), 0);
    }
}
