use chrono::NaiveDate;
use market_data::{DailyPrice, PriceSeries};
use pretty_assertions::assert_eq;
use price_forecast::error::ForecastError;
use price_forecast::{ForecastConfig, Forecaster, LstmConfig};

fn daily_series<F: Fn(usize) -> f64>(n: usize, close: F) -> PriceSeries {
    let records = (0..n)
        .map(|i| DailyPrice {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64),
            close: close(i),
            volume: 10_000.0 + 100.0 * i as f64,
        })
        .collect();
    PriceSeries::from_records(records).unwrap()
}

fn seeded_default_config() -> ForecastConfig {
    ForecastConfig {
        model: LstmConfig::default().with_seed(99),
        ..ForecastConfig::default()
    }
}

#[test]
fn end_to_end_on_rising_series() {
    // 30 daily points, close = 100 + i; split leaves 24 train / 6 test
    let series = daily_series(30, |i| 100.0 + i as f64);
    let outcome = Forecaster::new(seeded_default_config()).run(&series).unwrap();

    assert!(outcome.prediction.is_finite());
    assert!(outcome.rmse.is_finite());
    assert!(outcome.rmse >= 0.0);

    assert_eq!(outcome.actual.len(), 6);
    assert_eq!(outcome.predicted.len(), 6);
    assert_eq!(outcome.volume_tail.len(), 6);

    // The backtest tail is the last 6 closes and volumes, in order
    assert_eq!(
        outcome.actual,
        vec![124.0, 125.0, 126.0, 127.0, 128.0, 129.0]
    );
    assert_eq!(outcome.volume_tail[0], 12_400.0);

    assert!(outcome.predicted.iter().all(|p| p.is_finite()));
}

#[test]
fn diagnostics_are_present_for_nonzero_actuals() {
    let series = daily_series(30, |i| 100.0 + i as f64);
    let outcome = Forecaster::new(seeded_default_config()).run(&series).unwrap();

    let mape = outcome.mape.expect("no zero closes, MAPE should be defined");
    assert!(mape >= 0.0);
    let accuracy = outcome.accuracy.unwrap();
    assert_eq!(accuracy, 100.0 - mape);
}

#[test]
fn zero_close_disables_diagnostics_but_not_rmse() {
    // A zero close in the test tail makes MAPE undefined; RMSE still works
    let series = daily_series(30, |i| if i == 29 { 0.0 } else { 100.0 + i as f64 });
    let outcome = Forecaster::new(seeded_default_config()).run(&series).unwrap();

    assert!(outcome.mape.is_none());
    assert!(outcome.accuracy.is_none());
    assert!(outcome.rmse.is_finite());
}

#[test]
fn fourteen_points_are_insufficient() {
    let series = daily_series(14, |i| 100.0 + i as f64);
    let result = Forecaster::new(seeded_default_config()).run(&series);
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn fifteen_points_are_enough() {
    let series = daily_series(15, |i| 100.0 + i as f64);
    let outcome = Forecaster::new(seeded_default_config()).run(&series).unwrap();

    // 12 train / 3 test
    assert_eq!(outcome.actual.len(), 3);
    assert_eq!(outcome.predicted.len(), 3);
}

#[test]
fn empty_test_partition_never_reaches_rmse() {
    let config = ForecastConfig {
        train_ratio: 1.0,
        ..seeded_default_config()
    };
    let result = Forecaster::new(config).run(&daily_series(40, |i| 100.0 + i as f64));
    assert!(matches!(result, Err(ForecastError::InsufficientData(_))));
}

#[test]
fn reruns_are_independent() {
    // Same seed, same input: retraining from scratch gives the same result
    let series = daily_series(30, |i| 100.0 + (i as f64).sin() + i as f64);
    let forecaster = Forecaster::new(seeded_default_config());

    let first = forecaster.run(&series).unwrap();
    let second = forecaster.run(&series).unwrap();

    assert_eq!(first.prediction, second.prediction);
    assert_eq!(first.rmse, second.rmse);
}
