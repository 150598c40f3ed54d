//! k-nearest-neighbour regression.

use crate::core::{IntervalType, PredictionResult, RegressionResult};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use faer::{Col, Mat};

/// Neighbour weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KnnWeighting {
    /// All k neighbours contribute equally.
    #[default]
    Uniform,
    /// Neighbours are weighted by inverse Euclidean distance. An exact match
    /// (distance zero) takes the full weight.
    Distance,
}

/// k-nearest-neighbour regressor.
///
/// A non-parametric estimator: predictions average the responses of the k
/// training points closest to the query in Euclidean distance. The fitted
/// model stores the training data, so `result()` carries fit statistics but
/// no coefficients.
#[derive(Debug, Clone)]
pub struct KnnRegressor {
    k: usize,
    weighting: KnnWeighting,
}

impl KnnRegressor {
    /// Create a regressor with the given neighbour count and uniform weights.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            weighting: KnnWeighting::Uniform,
        }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> KnnRegressorBuilder {
        KnnRegressorBuilder::default()
    }
}

impl Regressor for KnnRegressor {
    type Fitted = FittedKnn;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }
        if self.k == 0 || self.k > x.nrows() {
            return Err(RegressionError::InvalidNeighbors(self.k));
        }

        let fitted = FittedKnn {
            k: self.k,
            weighting: self.weighting,
            x_train: x.clone(),
            y_train: y.clone(),
            result: RegressionResult::empty(x.ncols(), x.nrows()),
        };

        // Training-set fit statistics (each point is its own nearest
        // neighbour, so these are optimistic by construction).
        let fitted_values = fitted.predict(x);
        let residuals = Col::from_fn(y.nrows(), |i| y[i] - fitted_values[i]);
        let stats = crate::core::stats::compute_fit_statistics(y, &residuals, 1, false);

        let mut fitted = fitted;
        fitted.result.fitted_values = fitted_values;
        fitted.result.residuals = residuals;
        stats.write_into(&mut fitted.result);

        Ok(fitted)
    }
}

/// A fitted k-nearest-neighbour model.
#[derive(Debug, Clone)]
pub struct FittedKnn {
    k: usize,
    weighting: KnnWeighting,
    x_train: Mat<f64>,
    y_train: Col<f64>,
    result: RegressionResult,
}

impl FittedKnn {
    /// Get the neighbour count.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Get the weighting scheme.
    pub fn weighting(&self) -> KnnWeighting {
        self.weighting
    }

    fn predict_one(&self, query: &[f64]) -> f64 {
        let n_train = self.x_train.nrows();
        let n_features = self.x_train.ncols();

        let mut distances: Vec<(f64, usize)> = (0..n_train)
            .map(|i| {
                let mut d2 = 0.0;
                for j in 0..n_features {
                    let diff = self.x_train[(i, j)] - query[j];
                    d2 += diff * diff;
                }
                (d2.sqrt(), i)
            })
            .collect();

        distances.sort_by(|a, b| a.0.total_cmp(&b.0));
        let neighbours = &distances[..self.k];

        match self.weighting {
            KnnWeighting::Uniform => {
                neighbours.iter().map(|&(_, i)| self.y_train[i]).sum::<f64>() / self.k as f64
            }
            KnnWeighting::Distance => {
                // Exact matches dominate: average them and ignore the rest.
                let exact: Vec<usize> = neighbours
                    .iter()
                    .filter(|&&(d, _)| d < 1e-12)
                    .map(|&(_, i)| i)
                    .collect();
                if !exact.is_empty() {
                    return exact.iter().map(|&i| self.y_train[i]).sum::<f64>()
                        / exact.len() as f64;
                }

                let mut weight_sum = 0.0;
                let mut weighted = 0.0;
                for &(d, i) in neighbours {
                    let w = 1.0 / d;
                    weight_sum += w;
                    weighted += w * self.y_train[i];
                }
                weighted / weight_sum
            }
        }
    }
}

impl FittedRegressor for FittedKnn {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        let n_features = self.x_train.ncols();
        Col::from_fn(x.nrows(), |i| {
            let query: Vec<f64> = (0..n_features).map(|j| x[(i, j)]).collect();
            self.predict_one(&query)
        })
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }

    fn predict_with_interval(
        &self,
        x: &Mat<f64>,
        _interval: Option<IntervalType>,
        _level: f64,
    ) -> PredictionResult {
        // No parametric interval theory for kNN; point predictions only.
        PredictionResult::without_intervals(self.predict(x))
    }
}

/// Builder for `KnnRegressor`.
#[derive(Debug, Clone)]
pub struct KnnRegressorBuilder {
    k: usize,
    weighting: KnnWeighting,
}

impl Default for KnnRegressorBuilder {
    fn default() -> Self {
        Self {
            k: 5,
            weighting: KnnWeighting::Uniform,
        }
    }
}

impl KnnRegressorBuilder {
    /// Create a new builder with k = 5 and uniform weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of neighbours.
    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the neighbour weighting scheme.
    pub fn weighting(mut self, weighting: KnnWeighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Build the kNN regressor.
    pub fn build(self) -> KnnRegressor {
        KnnRegressor {
            k: self.k,
            weighting: self.weighting,
        }
    }
}
