//! Input validation tests across the crate's construction paths.

mod common;

use faer::{Col, Mat};
use stepreg::prelude::*;

// ============================================================================
// Dataset construction
// ============================================================================

#[test]
fn test_dataset_shape_mismatch() {
    let x = Mat::from_fn(10, 2, |i, j| (i + j) as f64);
    let y = Col::from_fn(8, |i| i as f64);

    let err = Dataset::new(x, y, vec!["a".into(), "b".into()]).unwrap_err();
    assert!(matches!(err, DataError::ShapeMismatch { .. }));
}

#[test]
fn test_dataset_name_count_mismatch() {
    let x = Mat::from_fn(10, 2, |i, j| (i + j) as f64);
    let y = Col::from_fn(10, |i| i as f64);

    let err = Dataset::new(x, y, vec!["only_one".into()]).unwrap_err();
    assert!(matches!(err, DataError::NameCountMismatch { .. }));
}

#[test]
fn test_dataset_rejects_non_finite_values() {
    let mut x = Mat::from_fn(10, 2, |i, j| (i + j) as f64);
    x[(3, 1)] = f64::NAN;
    let y = Col::from_fn(10, |i| i as f64);

    let err = Dataset::new(x, y, vec!["a".into(), "b".into()]).unwrap_err();
    assert!(matches!(err, DataError::NonFiniteValue { .. }));

    let x = Mat::from_fn(10, 2, |i, j| (i + j) as f64);
    let mut y = Col::from_fn(10, |i| i as f64);
    y[5] = f64::INFINITY;

    let err = Dataset::new(x, y, vec!["a".into(), "b".into()]).unwrap_err();
    assert!(matches!(err, DataError::NonFiniteResponse { row: 5 }));
}

#[test]
fn test_dataset_rejects_duplicate_and_empty_names() {
    let x = Mat::from_fn(10, 2, |i, j| (i + j) as f64);
    let y = Col::from_fn(10, |i| i as f64);

    let err = Dataset::new(x.clone(), y.clone(), vec!["a".into(), "a".into()]).unwrap_err();
    assert!(matches!(err, DataError::DuplicateName(_)));

    let err = Dataset::new(x, y, vec!["a".into(), "".into()]).unwrap_err();
    assert!(matches!(err, DataError::EmptyName(1)));
}

#[test]
fn test_dataset_rejects_empty() {
    let x: Mat<f64> = Mat::zeros(0, 2);
    let y: Col<f64> = Col::zeros(0);

    let err = Dataset::new(x, y, vec!["a".into(), "b".into()]).unwrap_err();
    assert!(matches!(err, DataError::Empty));
}

#[test]
fn test_sorted_column_order_is_lexicographic() {
    let x = Mat::from_fn(5, 3, |i, j| (i * 3 + j) as f64);
    let y = Col::from_fn(5, |i| i as f64);
    let dataset = Dataset::new(x, y, vec!["beta".into(), "alpha".into(), "gamma".into()]).unwrap();

    let order = dataset.sorted_column_indices();
    let names: Vec<&str> = order.iter().map(|&i| dataset.names()[i].as_str()).collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

// ============================================================================
// Solver validation
// ============================================================================

#[test]
fn test_solver_dimension_mismatch() {
    let x = Mat::from_fn(10, 1, |i, _| i as f64);
    let y = Col::from_fn(9, |i| i as f64);

    let err = OlsRegressor::builder().build().fit(&x, &y).unwrap_err();
    assert!(matches!(err, RegressionError::DimensionMismatch { .. }));
}

#[test]
fn test_options_validation() {
    assert!(RegressionOptionsBuilder::new()
        .confidence_level(1.5)
        .build()
        .is_err());
    assert!(RegressionOptionsBuilder::new().lambda(-1.0).build().is_err());
    assert!(RegressionOptionsBuilder::new().alpha(2.0).build().is_err());
}

#[test]
fn test_knn_neighbor_count_validation() {
    let x = Mat::from_fn(5, 1, |i, _| i as f64);
    let y = Col::from_fn(5, |i| i as f64);

    assert!(matches!(
        KnnRegressor::new(6).fit(&x, &y),
        Err(RegressionError::InvalidNeighbors(6))
    ));
}
