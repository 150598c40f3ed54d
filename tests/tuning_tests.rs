//! Cross-validation and hyperparameter search tests.

mod common;

use common::generate_linear_data;
use stepreg::prelude::*;

// ============================================================================
// K-fold cross-validation
// ============================================================================

#[test]
fn test_cross_val_rmse_tracks_noise_level() {
    let (x, y, _) = generate_linear_data(100, 2, 1.0, 0.5, 42);

    let model = OlsRegressor::builder().with_intercept(true).build();
    let rmse = cross_val_rmse(&model, &x, &y, &KFold::new(5)).unwrap();

    // Out-of-fold RMSE should be near the injected noise scale.
    assert!(rmse > 0.05 && rmse < 1.5, "rmse = {}", rmse);
}

#[test]
fn test_shuffled_folds_change_with_seed() {
    let a = KFold::shuffled(5, Some(1)).split(50).unwrap();
    let b = KFold::shuffled(5, Some(2)).split(50).unwrap();
    assert_ne!(a[0].1, b[0].1);
}

#[test]
fn test_train_test_split_disjoint_and_complete() {
    let (train, test) = train_test_split(40, 0.2, Some(5)).unwrap();
    assert_eq!(train.len() + test.len(), 40);
    for t in &test {
        assert!(!train.contains(t));
    }
}

// ============================================================================
// Lambda scanning
// ============================================================================

#[test]
fn test_ridge_scan_full_table_and_refit() {
    let (x, y, _) = generate_linear_data(60, 2, 1.0, 0.2, 17);

    let result = LambdaScan::ridge()
        .lambdas(vec![0.01, 0.1, 1.0, 10.0])
        .folds(KFold::new(4))
        .scan(&x, &y)
        .unwrap();

    assert_eq!(result.table.len(), 4);
    assert!(result.best_rmse > 0.0);
    assert!(matches!(result.model, ScanModel::Ridge(_)));
    assert_eq!(result.model.result().coefficients.nrows(), 2);
}

#[test]
fn test_elastic_net_scan_covers_lambda_alpha_grid() {
    let (x, y, _) = generate_linear_data(60, 3, 0.0, 0.2, 19);

    let result = LambdaScan::elastic_net()
        .lambdas(vec![0.01, 0.1])
        .alphas(vec![0.2, 0.5, 0.8])
        .scan(&x, &y)
        .unwrap();

    assert_eq!(result.table.len(), 6);
    assert!(result.best_alpha >= 0.2 && result.best_alpha <= 0.8);
}

#[test]
fn test_best_grid_point_has_minimal_rmse() {
    let (x, y, _) = generate_linear_data(60, 2, 1.0, 0.3, 29);

    let result = LambdaScan::lasso()
        .lambdas(vec![0.001, 0.1, 10.0])
        .scan(&x, &y)
        .unwrap();

    let min = result
        .table
        .iter()
        .map(|p| p.rmse)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(result.best_rmse, min);
}

// ============================================================================
// Random search
// ============================================================================

#[test]
fn test_random_search_tunes_ridge_lambda() {
    let (x, y, _) = generate_linear_data(60, 2, 1.0, 0.3, 37);

    let search = RandomSearch::new(
        vec![ParamRange::log("lambda", 1e-4, 1e3).unwrap()],
        30,
    )
    .seed(42);

    let outcome = search
        .run(|params| {
            let model = RidgeRegressor::builder().lambda(params[0]).build();
            cross_val_rmse(&model, &x, &y, &KFold::new(4))
        })
        .unwrap();

    assert_eq!(outcome.trials.len(), 30);
    // Huge penalties hurt on informative data, so the winner is moderate.
    assert!(outcome.best.params[0] < 100.0);
}
