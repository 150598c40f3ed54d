//! Diagnostics tests: leverage, residuals, influence, VIF.

mod common;

use approx::assert_relative_eq;
use common::generate_linear_data;
use faer::{Col, Mat};
use stepreg::prelude::*;

#[test]
fn test_leverage_properties_on_fitted_model() {
    let (x, y, _) = generate_linear_data(50, 2, 1.0, 0.1, 42);

    let fitted = OlsRegressor::builder()
        .with_intercept(true)
        .build()
        .fit(&x, &y)
        .unwrap();

    let leverage = compute_leverage(&x, true);
    let total: f64 = leverage.iter().sum();
    assert_relative_eq!(total, fitted.result().n_parameters as f64, epsilon = 1e-6);
}

#[test]
fn test_outlier_shows_up_in_studentized_residuals() {
    let (x, mut y, _) = generate_linear_data(50, 2, 1.0, 0.1, 7);
    y[25] += 20.0;

    let fitted = OlsRegressor::builder()
        .with_intercept(true)
        .build()
        .fit(&x, &y)
        .unwrap();

    let leverage = compute_leverage(&x, true);
    let result = fitted.result();
    let studentized = studentized_residuals(&result.residuals, &leverage, result.mse);

    let outliers = residual_outliers(&studentized, 3.0);
    assert!(outliers.contains(&25), "outliers = {:?}", outliers);
}

#[test]
fn test_influential_point_flagged_by_cooks_and_dffits() {
    // A point far out in x with a shifted response.
    let mut x = Mat::from_fn(40, 1, |i, _| i as f64 * 0.1);
    let mut y = Col::from_fn(40, |i| 2.0 * (i as f64 * 0.1));
    x[(39, 0)] = 30.0;
    y[39] = 100.0;

    let fitted = OlsRegressor::builder()
        .with_intercept(true)
        .build()
        .fit(&x, &y)
        .unwrap();

    let result = fitted.result();
    let leverage = compute_leverage(&x, true);
    let n_params = result.n_parameters;

    let cooks = cooks_distance(&result.residuals, &leverage, result.mse, n_params);
    let d = dffits(&result.residuals, &leverage, result.mse, n_params);

    assert!(influential_cooks(&cooks, None).contains(&39));
    assert!(influential_dffits(&d, n_params, None).contains(&39));
}

#[test]
fn test_vif_flags_duplicated_predictor() {
    let mut x = Mat::zeros(60, 3);
    for i in 0..60 {
        let t = i as f64;
        x[(i, 0)] = t;
        x[(i, 1)] = t + 0.001 * t.sin();
        x[(i, 2)] = (t * 0.5).cos();
    }

    let vif = variance_inflation_factor(&x);
    let high = high_vif_predictors(&vif, 10.0);
    assert!(high.contains(&0));
    assert!(high.contains(&1));
    assert!(!high.contains(&2));
}

#[test]
fn test_high_leverage_default_threshold() {
    let mut x = Mat::from_fn(30, 1, |i, _| (i as f64).sin());
    x[(29, 0)] = 50.0;

    let leverage = compute_leverage(&x, true);
    let high = high_leverage_points(&leverage, 2, None);
    assert_eq!(high, vec![29]);
}
