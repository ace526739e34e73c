use approx::assert_relative_eq;
use price_forecast::error::ForecastError;
use price_forecast::scaler::MinMaxScaler;
use rstest::rstest;

#[test]
fn fitted_bounds_map_to_zero_and_one() {
    let train = vec![104.0, 100.0, 112.0, 108.0];
    let scaler = MinMaxScaler::fit(&train).unwrap();

    assert_relative_eq!(scaler.transform_one(100.0), 0.0);
    assert_relative_eq!(scaler.transform_one(112.0), 1.0);
    assert_eq!(scaler.fitted_min(), 100.0);
    assert_eq!(scaler.fitted_max(), 112.0);
}

#[rstest]
#[case(100.0)]
#[case(106.5)]
#[case(112.0)]
#[case(150.0)] // outside the fitted range still round-trips
#[case(75.0)]
fn scaling_round_trips(#[case] value: f64) {
    let scaler = MinMaxScaler::fit(&[100.0, 112.0]).unwrap();
    let back = scaler.inverse_one(scaler.transform_one(value));
    assert_relative_eq!(back, value, max_relative = 1e-12);
}

#[test]
fn slice_round_trips() {
    let scaler = MinMaxScaler::fit(&[50.0, 150.0]).unwrap();
    let values = vec![50.0, 75.0, 100.0, 149.0];

    let recovered = scaler.inverse(&scaler.transform(&values));
    for (orig, back) in values.iter().zip(recovered.iter()) {
        assert_relative_eq!(orig, back, max_relative = 1e-12);
    }
}

#[test]
fn same_fit_applies_to_later_partitions() {
    // The test partition must be scaled with the training fit, so values
    // above the training maximum land above 1.0 instead of being squashed.
    let scaler = MinMaxScaler::fit(&[100.0, 110.0]).unwrap();
    assert!(scaler.transform_one(115.0) > 1.0);
}

#[test]
fn constant_training_data_is_degenerate() {
    let result = MinMaxScaler::fit(&[42.0; 10]);
    assert!(matches!(result, Err(ForecastError::NumericInstability(_))));
}

#[test]
fn empty_reference_is_invalid() {
    let result = MinMaxScaler::fit(&[]);
    assert!(matches!(result, Err(ForecastError::InvalidInput(_))));
}
