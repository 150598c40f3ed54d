//! Elastic Net solver (combined L1 and L2 regularization).

use crate::core::stats::compute_fit_statistics;
use crate::core::{
    IntervalType, PredictionResult, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
};
use crate::inference::{
    compute_prediction_intervals, compute_xtx_inverse, compute_xtx_inverse_augmented_reduced,
};
use crate::solvers::ols::linear_predict;
use crate::solvers::ridge::RidgeRegressor;
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, detect_constant_columns};
use faer::{Col, Mat};

/// Elastic Net regression estimator using coordinate descent.
///
/// Minimizes ||y - Xβ||² + λ(α||β||₁ + (1−α)||β||₂²):
///
/// - α = 1 is pure Lasso (L1)
/// - α = 0 is pure Ridge (L2), which delegates to [`RidgeRegressor`]
/// - 0 < α < 1 mixes both penalties
///
/// Coefficients driven exactly to zero by the L1 penalty are reported as
/// inactive via the result's `aliased` mask.
#[derive(Debug, Clone)]
pub struct ElasticNetRegressor {
    options: RegressionOptions,
}

impl ElasticNetRegressor {
    /// Create a new Elastic Net regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> ElasticNetRegressorBuilder {
        ElasticNetRegressorBuilder::default()
    }

    /// Create a pure-Lasso regressor (α = 1) with the given lambda.
    pub fn lasso(lambda: f64) -> Self {
        Self::new(RegressionOptions::lasso(lambda))
    }

    /// Soft thresholding operator: S(z, γ) = sign(z) * max(|z| − γ, 0).
    fn soft_threshold(z: f64, gamma: f64) -> f64 {
        if z > gamma {
            z - gamma
        } else if z < -gamma {
            z + gamma
        } else {
            0.0
        }
    }
}

/// Least-squares inverse over the active (non-aliased) columns, sized to match
/// the design matrix the interval code reconstructs for this fit.
fn reduced_inverse(x: &Mat<f64>, aliased: &[bool], with_intercept: bool) -> Option<Mat<f64>> {
    if with_intercept {
        compute_xtx_inverse_augmented_reduced(x, aliased).ok()
    } else {
        let active: Vec<usize> = (0..x.ncols()).filter(|&j| !aliased[j]).collect();
        if active.is_empty() {
            return None;
        }
        let x_active = Mat::from_fn(x.nrows(), active.len(), |i, k| x[(i, active[k])]);
        compute_xtx_inverse(&x_active).ok()
    }
}

impl Regressor for ElasticNetRegressor {
    type Fitted = FittedElasticNet;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        // Pure L2 has a closed form; hand it to Ridge.
        if self.options.alpha == 0.0 {
            let ridge = RidgeRegressor::new(self.options.clone());
            let ridge_fitted = ridge.fit(x, y)?;
            let aliased = ridge_fitted.result().aliased.clone();
            let xtx_inverse = reduced_inverse(x, &aliased, self.options.with_intercept);
            return Ok(FittedElasticNet {
                options: self.options.clone(),
                result: ridge_fitted.result().clone(),
                xtx_inverse,
            });
        }

        let n_samples = x.nrows();
        let n_features = x.ncols();

        if x.nrows() != y.nrows() {
            return Err(RegressionError::DimensionMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }

        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }

        let constant_cols = detect_constant_columns(x, self.options.rank_tolerance);

        let (coefficients, intercept) = if self.options.with_intercept {
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let coefficients = self.coordinate_descent(&x_centered, &y_centered);

            let mut intercept = y_mean;
            for j in 0..n_features {
                if !constant_cols[j] {
                    intercept -= x_means[j] * coefficients[j];
                }
            }
            (coefficients, Some(intercept))
        } else {
            (self.coordinate_descent(x, y), None)
        };

        // Inactive = constant column or zeroed out by the L1 penalty.
        let mut aliased = constant_cols;
        for j in 0..n_features {
            if coefficients[j].abs() < 1e-10 {
                aliased[j] = true;
            }
        }

        let fitted_values = linear_predict(x, &coefficients, &aliased, intercept.unwrap_or(0.0));
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let n_nonzero = aliased.iter().filter(|&&a| !a).count();
        let n_params = n_nonzero + usize::from(intercept.is_some());
        let stats = compute_fit_statistics(y, &residuals, n_params.max(1), intercept.is_some());

        let mut result = RegressionResult::empty(n_features, n_samples);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = n_nonzero;
        result.n_parameters = n_params;
        result.aliased = aliased.clone();
        result.rank_tolerance = self.options.rank_tolerance;
        result.confidence_level = self.options.confidence_level;
        stats.write_into(&mut result);

        // Approximate: intervals from the active-set least-squares inverse.
        let xtx_inverse = reduced_inverse(x, &aliased, self.options.with_intercept);

        Ok(FittedElasticNet {
            options: self.options.clone(),
            result,
            xtx_inverse,
        })
    }
}

impl ElasticNetRegressor {
    /// Cyclic coordinate descent with soft thresholding.
    fn coordinate_descent(&self, x: &Mat<f64>, y: &Col<f64>) -> Col<f64> {
        let n_samples = x.nrows();
        let n_features = x.ncols();
        let alpha = self.options.alpha;
        let lambda = self.options.lambda;

        // Precompute per-column squared norms.
        let mut x_col_sq = vec![0.0; n_features];
        for j in 0..n_features {
            for i in 0..n_samples {
                x_col_sq[j] += x[(i, j)] * x[(i, j)];
            }
        }

        let l1_penalty = lambda * alpha;
        let l2_penalty = lambda * (1.0 - alpha);

        let mut coefficients: Col<f64> = Col::zeros(n_features);
        let mut residuals = y.clone();

        for _iter in 0..self.options.max_iterations {
            let mut max_change = 0.0f64;

            for j in 0..n_features {
                if x_col_sq[j] < 1e-14 {
                    continue;
                }

                let old_coef = coefficients[j];

                // ρ = x_j'(r + x_j β_j): the partial fit with β_j removed.
                let mut rho = 0.0;
                for i in 0..n_samples {
                    rho += x[(i, j)] * residuals[i];
                }
                rho += x_col_sq[j] * old_coef;

                let new_coef = Self::soft_threshold(rho, l1_penalty) / (x_col_sq[j] + l2_penalty);

                let delta = new_coef - old_coef;
                if delta.abs() > 1e-14 {
                    for i in 0..n_samples {
                        residuals[i] -= x[(i, j)] * delta;
                    }
                }

                coefficients[j] = new_coef;
                max_change = max_change.max(delta.abs());
            }

            if max_change < self.options.tolerance {
                break;
            }
        }

        coefficients
    }
}

/// A fitted Elastic Net model.
#[derive(Debug, Clone)]
pub struct FittedElasticNet {
    options: RegressionOptions,
    result: RegressionResult,
    /// Active-set (X'X)⁻¹ for approximate prediction intervals.
    xtx_inverse: Option<Mat<f64>>,
}

impl FittedElasticNet {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Get the regularization strength.
    pub fn lambda(&self) -> f64 {
        self.options.lambda
    }

    /// Get the L1/L2 mixing parameter.
    pub fn alpha(&self) -> f64 {
        self.options.alpha
    }

    /// Count non-zero coefficients (sparsity).
    pub fn n_nonzero(&self) -> usize {
        self.result
            .coefficients
            .iter()
            .filter(|&&c| c.abs() > 1e-10)
            .count()
    }

    /// Reduce x to the active (non-aliased) columns.
    fn active_columns(&self, x: &Mat<f64>) -> Mat<f64> {
        let active: Vec<usize> = self
            .result
            .aliased
            .iter()
            .enumerate()
            .filter(|(_, &a)| !a)
            .map(|(j, _)| j)
            .collect();

        Mat::from_fn(x.nrows(), active.len(), |i, k| x[(i, active[k])])
    }
}

impl FittedRegressor for FittedElasticNet {
    fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        linear_predict(
            x,
            &self.result.coefficients,
            &self.result.aliased,
            self.result.intercept.unwrap_or(0.0),
        )
    }

    fn result(&self) -> &RegressionResult {
        &self.result
    }

    fn predict_with_interval(
        &self,
        x: &Mat<f64>,
        interval: Option<IntervalType>,
        level: f64,
    ) -> PredictionResult {
        let predictions = self.predict(x);

        match (interval, &self.xtx_inverse) {
            (None, _) => PredictionResult::point_only(predictions),
            (Some(interval_type), Some(xtx_inv)) => {
                // The stored inverse covers only the active columns.
                let x_active = self.active_columns(x);
                compute_prediction_intervals(
                    &x_active,
                    xtx_inv,
                    &predictions,
                    self.result.mse,
                    self.result.residual_df() as f64,
                    level,
                    interval_type,
                    self.result.intercept.is_some(),
                )
            }
            (Some(_), None) => PredictionResult::without_intervals(predictions),
        }
    }
}

/// Builder for `ElasticNetRegressor`.
#[derive(Debug, Clone, Default)]
pub struct ElasticNetRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl ElasticNetRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set the regularization strength (lambda).
    pub fn lambda(mut self, lambda: f64) -> Self {
        self.builder = self.builder.lambda(lambda);
        self
    }

    /// Set the L1/L2 mixing parameter: 1 = Lasso, 0 = Ridge.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.builder = self.builder.alpha(alpha);
        self
    }

    /// Set maximum iterations for coordinate descent.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.builder = self.builder.max_iterations(max_iter);
        self
    }

    /// Set convergence tolerance.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.tolerance(tol);
        self
    }

    /// Build the Elastic Net regressor.
    pub fn build(self) -> ElasticNetRegressor {
        ElasticNetRegressor::new(self.builder.build_unchecked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elastic_net_basic() {
        let x = Mat::from_fn(20, 2, |i, j| ((i + j * 3) as f64) * 0.1);
        let mut y = Col::zeros(20);
        for i in 0..20 {
            y[i] = 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 1)];
        }

        let model = ElasticNetRegressor::builder()
            .with_intercept(true)
            .lambda(0.01)
            .alpha(0.5)
            .build();

        let fitted = model.fit(&x, &y).expect("model should fit");
        assert!(fitted.r_squared() > 0.9);
    }

    #[test]
    fn test_lasso_sparsity() {
        // With a strong L1 penalty noise features are driven to exactly zero.
        let mut x = Mat::zeros(50, 5);
        let mut y = Col::zeros(50);
        for i in 0..50 {
            for j in 0..5 {
                x[(i, j)] = (((i * 13 + j * 7) % 17) as f64) * 0.1;
            }
            y[i] = 1.0 + 2.0 * x[(i, 0)];
        }

        let model = ElasticNetRegressor::builder()
            .with_intercept(true)
            .lambda(5.0)
            .alpha(1.0)
            .build();

        let fitted = model.fit(&x, &y).expect("model should fit");

        let n_zero = fitted
            .coefficients()
            .iter()
            .filter(|&&c| c.abs() < 1e-10)
            .count();
        assert!(n_zero >= 1, "expected sparsity, got {} zeros", n_zero);
    }

    #[test]
    fn test_alpha_zero_delegates_to_ridge() {
        let x = Mat::from_fn(20, 1, |i, _| i as f64);
        let y = Col::from_fn(20, |i| 2.0 * i as f64);

        let enet = ElasticNetRegressor::builder()
            .lambda(1.0)
            .alpha(0.0)
            .build()
            .fit(&x, &y)
            .unwrap();
        let ridge = RidgeRegressor::builder().lambda(1.0).build().fit(&x, &y).unwrap();

        assert!((enet.coefficients()[0] - ridge.coefficients()[0]).abs() < 1e-12);
    }
}
