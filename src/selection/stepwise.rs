//! Greedy stepwise subset search.
//!
//! Forward search grows the model from the intercept-only null model; backward
//! search shrinks it from the full candidate set. Both accept a move only on
//! strict improvement of the criterion score, so the search visits at most one
//! move per candidate and always terminates. Candidates are visited in
//! lexicographic name order, which makes tie-breaks deterministic: the first
//! candidate reaching the best score wins.

use crate::core::stats::compute_fit_statistics;
use crate::core::{DataError, Dataset};
use crate::selection::criterion::Criterion;
use crate::selection::trace::{SelectionTrace, StepAction};
use crate::solvers::{FittedOls, FittedRegressor, OlsRegressor, RegressionError, Regressor};
use faer::Col;
use log::{debug, trace};
use thiserror::Error;

/// Errors from subset search.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("model fit failed during search: {0}")]
    Fit(#[from] RegressionError),

    #[error("indicator (0/1 dummy) columns are not supported: {0}")]
    DummyColumns(String),

    #[error("dataset has no candidate features")]
    NoFeatures,

    #[error("the p-value criterion requires backward selection")]
    PValueRequiresBackward,

    #[error("exhaustive search supports at most {max} features, got {got}")]
    TooManyFeatures { max: usize, got: usize },

    #[error("inference statistics unavailable for p-value elimination")]
    MissingInference,
}

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Grow from the intercept-only model.
    #[default]
    Forward,
    /// Shrink from the full candidate set.
    Backward,
}

/// Outcome of a stepwise (or exhaustive) search.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    /// Criterion the search minimized.
    pub criterion: Criterion,
    /// Direction the search ran in.
    pub direction: Direction,
    /// Selected feature names: selection order for forward search,
    /// lexicographic order otherwise.
    pub selected: Vec<String>,
    /// Column indices of the selected features in the original dataset.
    pub selected_indices: Vec<usize>,
    /// Every step the search visited.
    pub trace: SelectionTrace,
    /// The selected subset refit with inference enabled. `None` when the
    /// search converged to the intercept-only model.
    pub model: Option<FittedOls>,
}

impl SelectionResult {
    /// Number of selected features.
    pub fn n_selected(&self) -> usize {
        self.selected.len()
    }

    /// Final criterion score (the last trace entry).
    pub fn final_score(&self) -> Option<f64> {
        self.trace.last().map(|s| s.score)
    }
}

/// Fit statistics of one candidate subset. The empty subset is the
/// intercept-only null model, which has no `FittedOls` behind it.
pub(crate) struct SubsetFit {
    pub aic: f64,
    pub bic: f64,
    pub adj_r_squared: f64,
    pub model: Option<FittedOls>,
}

impl SubsetFit {
    pub(crate) fn score(&self, criterion: Criterion) -> f64 {
        match criterion {
            Criterion::Aic => self.aic,
            Criterion::Bic => self.bic,
            Criterion::AdjRSquared => 1.0 - self.adj_r_squared,
            Criterion::PValue => f64::NAN,
        }
    }
}

/// Fit the subset of columns given by `indices` with an intercept. The empty
/// subset yields the null model: fitted values are the response mean, and the
/// adjusted R² is 0 by convention.
pub(crate) fn fit_subset(
    dataset: &Dataset,
    indices: &[usize],
    with_inference: bool,
) -> Result<SubsetFit, SelectionError> {
    if indices.is_empty() {
        let y = dataset.y();
        let n = y.nrows();
        let y_mean: f64 = y.iter().sum::<f64>() / n as f64;
        let residuals = Col::from_fn(n, |i| y[i] - y_mean);
        let stats = compute_fit_statistics(y, &residuals, 1, true);
        return Ok(SubsetFit {
            aic: stats.aic,
            bic: stats.bic,
            adj_r_squared: stats.adj_r_squared,
            model: None,
        });
    }

    let x = dataset.subset(indices);
    let fitted = OlsRegressor::builder()
        .with_intercept(true)
        .compute_inference(with_inference)
        .build()
        .fit(&x, dataset.y())?;

    let result = fitted.result();
    Ok(SubsetFit {
        aic: result.aic,
        bic: result.bic,
        adj_r_squared: result.adj_r_squared,
        model: Some(fitted),
    })
}

fn names_of(dataset: &Dataset, indices: &[usize]) -> Vec<String> {
    indices.iter().map(|&i| dataset.names()[i].clone()).collect()
}

/// Stepwise feature selector.
///
/// ```no_run
/// use stepreg::prelude::*;
/// # fn demo(dataset: &Dataset) -> Result<(), SelectionError> {
/// let result = StepwiseSelector::builder()
///     .direction(Direction::Forward)
///     .criterion(Criterion::Aic)
///     .build()
///     .select(dataset)?;
/// println!("selected: {:?}", result.selected);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StepwiseSelector {
    direction: Direction,
    criterion: Criterion,
    p_threshold: f64,
    prune_insignificant: bool,
}

impl Default for StepwiseSelector {
    fn default() -> Self {
        Self {
            direction: Direction::Forward,
            criterion: Criterion::Aic,
            p_threshold: 0.05,
            prune_insignificant: false,
        }
    }
}

impl StepwiseSelector {
    /// Create a forward-AIC selector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuring the selector.
    pub fn builder() -> StepwiseSelectorBuilder {
        StepwiseSelectorBuilder::default()
    }

    /// Run the search over all columns of the dataset.
    pub fn select(&self, dataset: &Dataset) -> Result<SelectionResult, SelectionError> {
        self.validate(dataset)?;

        let order = dataset.sorted_column_indices();
        let mut trace = SelectionTrace::new();

        let mut selected = match (self.direction, self.criterion) {
            (Direction::Forward, Criterion::PValue) => {
                return Err(SelectionError::PValueRequiresBackward)
            }
            (Direction::Forward, _) => self.forward(dataset, &order, &mut trace)?,
            (Direction::Backward, Criterion::PValue) => {
                let mut selected = order.clone();
                self.eliminate_by_pvalue(dataset, &mut selected, &mut trace, true)?;
                selected
            }
            (Direction::Backward, _) => self.backward(dataset, &order, &mut trace)?,
        };

        if self.prune_insignificant && self.criterion.is_scalar() {
            self.eliminate_by_pvalue(dataset, &mut selected, &mut trace, false)?;
        }

        let model = if selected.is_empty() {
            None
        } else {
            let model = fit_subset(dataset, &selected, true)?.model;
            if let Some(fitted) = &model {
                debug!(
                    "final refit: {} features, {} = {:.6}",
                    selected.len(),
                    self.criterion,
                    self.criterion.score(fitted.result())
                );
            }
            model
        };

        Ok(SelectionResult {
            criterion: self.criterion,
            direction: self.direction,
            selected: names_of(dataset, &selected),
            selected_indices: selected,
            trace,
            model,
        })
    }

    fn validate(&self, dataset: &Dataset) -> Result<(), SelectionError> {
        if dataset.n_cols() == 0 {
            return Err(SelectionError::NoFeatures);
        }

        let dummies = dataset.indicator_columns();
        if !dummies.is_empty() {
            let names = names_of(dataset, &dummies).join(", ");
            return Err(SelectionError::DummyColumns(names));
        }

        Ok(())
    }

    fn forward(
        &self,
        dataset: &Dataset,
        order: &[usize],
        trace: &mut SelectionTrace,
    ) -> Result<Vec<usize>, SelectionError> {
        let null = fit_subset(dataset, &[], false)?;
        let mut best_score = null.score(self.criterion);
        trace.push(
            StepAction::Start,
            Vec::new(),
            null.aic,
            null.bic,
            null.adj_r_squared,
            best_score,
        );

        let mut selected: Vec<usize> = Vec::new();
        let mut remaining: Vec<usize> = order.to_vec();

        while !remaining.is_empty() {
            let mut best_move: Option<(usize, SubsetFit, f64)> = None;

            for (pos, &candidate) in remaining.iter().enumerate() {
                let mut candidate_set = selected.clone();
                candidate_set.push(candidate);

                let fit = fit_subset(dataset, &candidate_set, false)?;
                let score = fit.score(self.criterion);
                trace!(
                    "forward: trying {} -> {} = {:.6}",
                    dataset.names()[candidate],
                    self.criterion,
                    score
                );
                if !score.is_finite() {
                    continue;
                }

                // Strict < keeps the lexicographically first name on ties.
                let improves = match &best_move {
                    None => true,
                    Some((_, _, best)) => score < *best,
                };
                if improves {
                    best_move = Some((pos, fit, score));
                }
            }

            match best_move {
                Some((pos, fit, score)) if score < best_score => {
                    let candidate = remaining.remove(pos);
                    selected.push(candidate);
                    best_score = score;
                    debug!(
                        "forward: added {} ({} = {:.6})",
                        dataset.names()[candidate],
                        self.criterion,
                        score
                    );
                    trace.push(
                        StepAction::Added(dataset.names()[candidate].clone()),
                        names_of(dataset, &selected),
                        fit.aic,
                        fit.bic,
                        fit.adj_r_squared,
                        score,
                    );
                }
                _ => break,
            }
        }

        Ok(selected)
    }

    fn backward(
        &self,
        dataset: &Dataset,
        order: &[usize],
        trace: &mut SelectionTrace,
    ) -> Result<Vec<usize>, SelectionError> {
        let mut selected: Vec<usize> = order.to_vec();

        let full = fit_subset(dataset, &selected, false)?;
        let mut best_score = full.score(self.criterion);
        trace.push(
            StepAction::Start,
            names_of(dataset, &selected),
            full.aic,
            full.bic,
            full.adj_r_squared,
            best_score,
        );

        while !selected.is_empty() {
            let mut best_move: Option<(usize, SubsetFit, f64)> = None;

            for pos in 0..selected.len() {
                let mut candidate_set = selected.clone();
                let dropped = candidate_set.remove(pos);

                let fit = fit_subset(dataset, &candidate_set, false)?;
                let score = fit.score(self.criterion);
                trace!(
                    "backward: trying without {} -> {} = {:.6}",
                    dataset.names()[dropped],
                    self.criterion,
                    score
                );
                if !score.is_finite() {
                    continue;
                }

                let improves = match &best_move {
                    None => true,
                    Some((_, _, best)) => score < *best,
                };
                if improves {
                    best_move = Some((pos, fit, score));
                }
            }

            match best_move {
                Some((pos, fit, score)) if score < best_score => {
                    let dropped = selected.remove(pos);
                    best_score = score;
                    debug!(
                        "backward: removed {} ({} = {:.6})",
                        dataset.names()[dropped],
                        self.criterion,
                        score
                    );
                    trace.push(
                        StepAction::Removed(dataset.names()[dropped].clone()),
                        names_of(dataset, &selected),
                        fit.aic,
                        fit.bic,
                        fit.adj_r_squared,
                        score,
                    );
                }
                _ => break,
            }
        }

        Ok(selected)
    }

    /// Repeatedly drop the least significant coefficient until all remaining
    /// coefficients are at or below the threshold. Aliased coefficients carry
    /// NaN p-values and drop first. The intercept is exempt.
    fn eliminate_by_pvalue(
        &self,
        dataset: &Dataset,
        selected: &mut Vec<usize>,
        trace: &mut SelectionTrace,
        record_start: bool,
    ) -> Result<(), SelectionError> {
        if selected.is_empty() {
            return Ok(());
        }

        let mut current = fit_subset(dataset, selected, true)?;

        if record_start {
            let worst = worst_p_value(&current)?.map(|(_, p)| p).unwrap_or(f64::NAN);
            trace.push(
                StepAction::Start,
                names_of(dataset, selected),
                current.aic,
                current.bic,
                current.adj_r_squared,
                worst,
            );
        }

        while !selected.is_empty() {
            let worst = worst_p_value(&current)?;
            let (pos, p_value) = match worst {
                Some((pos, p)) if p.is_nan() || p > self.p_threshold => (pos, p),
                _ => break,
            };

            let dropped = selected.remove(pos);
            debug!(
                "elimination: removed {} (p = {:.4})",
                dataset.names()[dropped],
                p_value
            );

            current = fit_subset(dataset, selected, true)?;
            trace.push(
                StepAction::Removed(dataset.names()[dropped].clone()),
                names_of(dataset, selected),
                current.aic,
                current.bic,
                current.adj_r_squared,
                p_value,
            );
        }

        Ok(())
    }
}

/// Position and p-value of the least significant coefficient. NaN (aliased)
/// p-values sort as +inf so they are eliminated first; ties keep the first
/// position, which is the lexicographically first name.
fn worst_p_value(fit: &SubsetFit) -> Result<Option<(usize, f64)>, SelectionError> {
    let model = match &fit.model {
        Some(m) => m,
        None => return Ok(None),
    };
    let p_values = model
        .result()
        .p_values
        .as_ref()
        .ok_or(SelectionError::MissingInference)?;

    let mut worst: Option<(usize, f64)> = None;
    for pos in 0..p_values.nrows() {
        let p = p_values[pos];
        let key = if p.is_nan() { f64::INFINITY } else { p };
        let current = worst.map(|(w, _)| {
            let wp = p_values[w];
            if wp.is_nan() {
                f64::INFINITY
            } else {
                wp
            }
        });
        if current.map_or(true, |c| key > c) {
            worst = Some((pos, p));
        }
    }
    Ok(worst)
}

/// Builder for `StepwiseSelector`.
#[derive(Debug, Clone, Default)]
pub struct StepwiseSelectorBuilder {
    selector: StepwiseSelector,
}

impl StepwiseSelectorBuilder {
    /// Create a new builder with forward-AIC defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search direction.
    pub fn direction(mut self, direction: Direction) -> Self {
        self.selector.direction = direction;
        self
    }

    /// Set the scoring criterion.
    pub fn criterion(mut self, criterion: Criterion) -> Self {
        self.selector.criterion = criterion;
        self
    }

    /// Set the significance threshold for p-value elimination and pruning.
    pub fn p_threshold(mut self, threshold: f64) -> Self {
        self.selector.p_threshold = threshold;
        self
    }

    /// Enable p-value pruning of the converged selection.
    pub fn prune_insignificant(mut self, prune: bool) -> Self {
        self.selector.prune_insignificant = prune;
        self
    }

    /// Build the selector.
    pub fn build(self) -> StepwiseSelector {
        self.selector
    }
}
