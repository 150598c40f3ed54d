//! Brute-force enumeration of all candidate subsets.

use crate::core::Dataset;
use crate::selection::criterion::Criterion;
use crate::selection::stepwise::{fit_subset, SelectionError};
use crate::selection::trace::{SelectionTrace, StepAction};
use crate::solvers::{FittedOls, FittedRegressor};
use log::{debug, trace};

/// Hard cap on candidate count: 2^20 subsets is the most the enumeration
/// will attempt.
pub const MAX_EXHAUSTIVE_FEATURES: usize = 20;

/// How many top-ranked subsets the result reports.
const REPORT_TOP_N: usize = 10;

/// One ranked subset in an [`ExhaustiveResult`].
#[derive(Debug, Clone)]
pub struct RankedSubset {
    /// Feature names of the subset, in lexicographic order.
    pub features: Vec<String>,
    /// AIC of this subset's fit.
    pub aic: f64,
    /// BIC of this subset's fit.
    pub bic: f64,
    /// Adjusted R² of this subset's fit.
    pub adj_r_squared: f64,
    /// Score under the search criterion.
    pub score: f64,
}

/// Outcome of an exhaustive search.
#[derive(Debug, Clone)]
pub struct ExhaustiveResult {
    /// Criterion the subsets were ranked by.
    pub criterion: Criterion,
    /// Names of the winning subset, in lexicographic order.
    pub selected: Vec<String>,
    /// Column indices of the winning subset in the original dataset.
    pub selected_indices: Vec<usize>,
    /// The best subsets in rank order, at most ten.
    pub ranking: Vec<RankedSubset>,
    /// Single-entry trace recording the winning subset; the full ordering
    /// lives in `ranking`.
    pub trace: SelectionTrace,
    /// The winning subset refit with inference. `None` when the null model
    /// wins.
    pub model: Option<FittedOls>,
}

impl ExhaustiveResult {
    /// Score of the winning subset.
    pub fn best_score(&self) -> f64 {
        self.ranking.first().map(|r| r.score).unwrap_or(f64::NAN)
    }
}

/// Exhaustive subset selector: fits all 2^k subsets of the k candidates
/// (including the empty, intercept-only subset) and ranks them by criterion.
/// Refuses to run for k > 20.
#[derive(Debug, Clone, Default)]
pub struct ExhaustiveSelector {
    criterion: Criterion,
}

impl ExhaustiveSelector {
    /// Create a selector ranking by the given criterion. The p-value
    /// criterion is not a subset score and is rejected at `select` time.
    pub fn new(criterion: Criterion) -> Self {
        Self { criterion }
    }

    /// Enumerate and rank every subset of the dataset's columns.
    pub fn select(&self, dataset: &Dataset) -> Result<ExhaustiveResult, SelectionError> {
        if !self.criterion.is_scalar() {
            return Err(SelectionError::PValueRequiresBackward);
        }

        let k = dataset.n_cols();
        if k == 0 {
            return Err(SelectionError::NoFeatures);
        }
        if k > MAX_EXHAUSTIVE_FEATURES {
            return Err(SelectionError::TooManyFeatures {
                max: MAX_EXHAUSTIVE_FEATURES,
                got: k,
            });
        }

        let dummies = dataset.indicator_columns();
        if !dummies.is_empty() {
            let names: Vec<String> = dummies
                .iter()
                .map(|&i| dataset.names()[i].clone())
                .collect();
            return Err(SelectionError::DummyColumns(names.join(", ")));
        }

        let order = dataset.sorted_column_indices();
        debug!("exhaustive: scoring {} subsets of {} features", 1u64 << k, k);

        let mut scored: Vec<(Vec<usize>, RankedSubset)> = Vec::with_capacity(1 << k);

        // Ascending mask order makes ranking ties deterministic: smaller
        // subsets of earlier-sorted names come first and stable sort keeps
        // them ahead on equal scores.
        for mask in 0u32..(1u32 << k) {
            let indices: Vec<usize> = (0..k)
                .filter(|&bit| mask & (1 << bit) != 0)
                .map(|bit| order[bit])
                .collect();

            let fit = fit_subset(dataset, &indices, false)?;
            let score = fit.score(self.criterion);
            trace!("exhaustive: mask {:#b} -> {} = {:.6}", mask, self.criterion, score);

            let features: Vec<String> = indices
                .iter()
                .map(|&i| dataset.names()[i].clone())
                .collect();
            scored.push((
                indices,
                RankedSubset {
                    features,
                    aic: fit.aic,
                    bic: fit.bic,
                    adj_r_squared: fit.adj_r_squared,
                    score,
                },
            ));
        }

        // NaN scores rank last.
        scored.sort_by(|a, b| a.1.score.total_cmp(&b.1.score));

        let (best_indices, best) = scored[0].clone();

        let mut trace = SelectionTrace::new();
        trace.push(
            StepAction::Start,
            best.features.clone(),
            best.aic,
            best.bic,
            best.adj_r_squared,
            best.score,
        );

        let ranking: Vec<RankedSubset> = scored
            .into_iter()
            .take(REPORT_TOP_N)
            .map(|(_, ranked)| ranked)
            .collect();

        let model = if best_indices.is_empty() {
            None
        } else {
            let model = fit_subset(dataset, &best_indices, true)?.model;
            if let Some(fitted) = &model {
                debug!(
                    "winner refit: {} = {:.6}",
                    self.criterion,
                    self.criterion.score(fitted.result())
                );
            }
            model
        };

        Ok(ExhaustiveResult {
            criterion: self.criterion,
            selected: best.features,
            selected_indices: best_indices,
            ranking,
            trace,
            model,
        })
    }
}
