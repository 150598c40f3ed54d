//! Stepwise and exhaustive selection tests.

mod common;

use common::generate_selection_data;
use stepreg::prelude::*;

/// Predictors and response built from Fourier modes at distinct frequencies
/// over a full period: every column is exactly orthogonal to the others, to
/// the constant, and to the response wiggle, so no subset improves on the
/// intercept-only model.
fn orthogonal_noise_dataset() -> Dataset {
    use faer::{Col, Mat};
    use std::f64::consts::PI;

    let n = 64;
    let x = Mat::from_fn(n, 3, |i, j| {
        (2.0 * PI * (j + 1) as f64 * i as f64 / n as f64).cos()
    });
    let y = Col::from_fn(n, |i| {
        1.0 + 0.5 * (2.0 * PI * 7.0 * i as f64 / n as f64).cos()
    });
    Dataset::new(x, y, vec!["u".into(), "v".into(), "w".into()]).unwrap()
}

// ============================================================================
// Forward selection
// ============================================================================

#[test]
fn test_forward_aic_recovers_informative_columns() {
    let dataset = generate_selection_data(80, 3, 3, 42);

    let result = StepwiseSelector::builder()
        .direction(Direction::Forward)
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .expect("selection should run");

    for j in 0..3 {
        let name = format!("real{}", j);
        assert!(
            result.selected.contains(&name),
            "expected {} in {:?}",
            name,
            result.selected
        );
    }
}

#[test]
fn test_forward_bic_drops_noise_columns() {
    let dataset = generate_selection_data(80, 2, 4, 7);

    let result = StepwiseSelector::builder()
        .criterion(Criterion::Bic)
        .build()
        .select(&dataset)
        .unwrap();

    for name in &result.selected {
        assert!(
            !name.starts_with("zz_noise"),
            "noise column {} selected",
            name
        );
    }
}

#[test]
fn test_forward_trace_replays_selection_order() {
    let dataset = generate_selection_data(60, 2, 2, 3);

    let result = StepwiseSelector::builder()
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .unwrap();

    // First entry is the null model, then one Added step per selected name,
    // in selection order.
    let steps = result.trace.steps();
    assert_eq!(steps[0].action, StepAction::Start);
    let added: Vec<&str> = steps[1..]
        .iter()
        .filter_map(|s| match &s.action {
            StepAction::Added(name) => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let selected: Vec<&str> = result.selected.iter().map(|s| s.as_str()).collect();
    assert_eq!(added, selected);
}

#[test]
fn test_forward_scores_strictly_decrease() {
    let dataset = generate_selection_data(60, 3, 2, 11);

    let result = StepwiseSelector::builder()
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .unwrap();

    let scores = result.trace.scores();
    for pair in scores.windows(2) {
        assert!(pair[1] < pair[0]);
    }
}

#[test]
fn test_adj_r_squared_criterion_runs() {
    let dataset = generate_selection_data(60, 2, 2, 19);

    let result = StepwiseSelector::builder()
        .criterion(Criterion::AdjRSquared)
        .build()
        .select(&dataset)
        .unwrap();

    assert!(result.n_selected() >= 2);
    // Scores are 1 − adjusted R², bounded by 1 at the null model.
    assert!(result.trace.steps()[0].score <= 1.0 + 1e-12);
}

#[test]
fn test_forward_converges_to_null_model_on_uninformative_data() {
    let dataset = orthogonal_noise_dataset();

    let result = StepwiseSelector::builder()
        .direction(Direction::Forward)
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .unwrap();

    assert!(result.selected.is_empty(), "selected {:?}", result.selected);
    assert!(result.model.is_none());
    // The trace holds only the null-model entry.
    assert_eq!(result.trace.steps().len(), 1);
    assert_eq!(result.trace.steps()[0].action, StepAction::Start);
}

// ============================================================================
// Backward selection and p-value elimination
// ============================================================================

#[test]
fn test_backward_matches_forward_on_clear_signal() {
    let dataset = generate_selection_data(80, 2, 3, 23);

    let forward = StepwiseSelector::builder()
        .direction(Direction::Forward)
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .unwrap();
    let backward = StepwiseSelector::builder()
        .direction(Direction::Backward)
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .unwrap();

    let mut f = forward.selected.clone();
    let mut b = backward.selected.clone();
    f.sort();
    b.sort();
    assert_eq!(f, b);
}

#[test]
fn test_backward_trace_starts_with_full_model() {
    let dataset = generate_selection_data(60, 2, 2, 29);

    let result = StepwiseSelector::builder()
        .direction(Direction::Backward)
        .criterion(Criterion::Bic)
        .build()
        .select(&dataset)
        .unwrap();

    let first = &result.trace.steps()[0];
    assert_eq!(first.action, StepAction::Start);
    assert_eq!(first.features.len(), 4);
}

#[test]
fn test_pvalue_elimination_leaves_significant_model() {
    let dataset = generate_selection_data(80, 2, 3, 31);

    let result = StepwiseSelector::builder()
        .direction(Direction::Backward)
        .criterion(Criterion::PValue)
        .p_threshold(0.05)
        .build()
        .select(&dataset)
        .unwrap();

    let model = result.model.expect("informative columns survive");
    let p_values = model.result().p_values.as_ref().unwrap();
    for i in 0..p_values.nrows() {
        assert!(p_values[i] <= 0.05, "p[{}] = {}", i, p_values[i]);
    }
}

#[test]
fn test_prune_insignificant_appends_to_trace() {
    let dataset = generate_selection_data(60, 2, 2, 37);

    let pruned = StepwiseSelector::builder()
        .criterion(Criterion::AdjRSquared)
        .prune_insignificant(true)
        .p_threshold(0.05)
        .build()
        .select(&dataset)
        .unwrap();

    // Whatever survives pruning is significant.
    if let Some(model) = &pruned.model {
        let p_values = model.result().p_values.as_ref().unwrap();
        for i in 0..p_values.nrows() {
            assert!(p_values[i] <= 0.05);
        }
    }
}

// ============================================================================
// Exhaustive search
// ============================================================================

#[test]
fn test_exhaustive_agrees_with_forward_on_clear_signal() {
    let dataset = generate_selection_data(80, 2, 2, 41);

    let exhaustive = ExhaustiveSelector::new(Criterion::Aic)
        .select(&dataset)
        .unwrap();
    let forward = StepwiseSelector::builder()
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .unwrap();

    let mut e = exhaustive.selected.clone();
    let mut f = forward.selected.clone();
    e.sort();
    f.sort();
    assert_eq!(e, f);
}

#[test]
fn test_exhaustive_ranking_reports_top_ten() {
    // 2^4 = 16 subsets; ranking is capped at 10.
    let dataset = generate_selection_data(60, 2, 2, 43);
    let result = ExhaustiveSelector::new(Criterion::Bic)
        .select(&dataset)
        .unwrap();

    assert_eq!(result.ranking.len(), 10);
    assert_eq!(result.ranking[0].features, result.selected);
    for pair in result.ranking.windows(2) {
        assert!(pair[0].score <= pair[1].score);
    }
}

#[test]
fn test_exhaustive_empty_subset_wins_on_uninformative_data() {
    let dataset = orthogonal_noise_dataset();

    let result = ExhaustiveSelector::new(Criterion::Aic)
        .select(&dataset)
        .unwrap();

    assert!(result.selected.is_empty(), "selected {:?}", result.selected);
    assert!(result.selected_indices.is_empty());
    assert!(result.model.is_none());
    assert!(result.ranking[0].features.is_empty());
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_dummy_columns_rejected_before_any_fit() {
    use faer::{Col, Mat};

    let x = Mat::from_fn(20, 2, |i, j| if j == 0 { (i % 2) as f64 } else { i as f64 });
    let y = Col::from_fn(20, |i| i as f64);
    let dataset = Dataset::new(x, y, vec!["dummy".into(), "x".into()]).unwrap();

    let err = StepwiseSelector::new().select(&dataset).unwrap_err();
    assert!(matches!(err, SelectionError::DummyColumns(_)));

    let err = ExhaustiveSelector::new(Criterion::Aic)
        .select(&dataset)
        .unwrap_err();
    assert!(matches!(err, SelectionError::DummyColumns(_)));
}

#[test]
fn test_final_model_statistics_match_refit() {
    use faer::Mat;
    use stepreg::solvers::{OlsRegressor, Regressor};

    let dataset = generate_selection_data(60, 2, 2, 47);
    let result = StepwiseSelector::builder()
        .criterion(Criterion::Aic)
        .build()
        .select(&dataset)
        .unwrap();

    // Refitting the selected columns reproduces the trace's final AIC.
    let model = result.model.as_ref().unwrap();
    let x_sel = Mat::from_fn(dataset.n_rows(), result.selected_indices.len(), |i, k| {
        dataset.x()[(i, result.selected_indices[k])]
    });
    let refit = OlsRegressor::builder()
        .with_intercept(true)
        .build()
        .fit(&x_sel, dataset.y())
        .unwrap();

    let last = result.trace.last().unwrap();
    assert!((refit.result().aic - last.aic).abs() < 1e-8);
    assert!((model.result().aic - last.aic).abs() < 1e-8);
}
