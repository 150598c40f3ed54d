//! Ridge regression solver (L2 regularization).

use crate::core::stats::compute_fit_statistics;
use crate::core::{
    IntervalType, PredictionResult, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
};
use crate::inference::{
    compute_prediction_intervals, compute_xtx_inverse, compute_xtx_inverse_augmented,
};
use crate::solvers::ols::{linear_predict, OlsRegressor};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, invert_symmetric, solve_upper_triangular};
use faer::{Col, Mat};

/// Ridge regression estimator with L2 regularization.
///
/// Minimizes ||y - Xβ||² + λ||β||², giving β = (X'X + λI)⁻¹X'y. The intercept
/// is handled by centering and is never penalized. When λ = 0 this reduces to
/// OLS and delegates to it.
#[derive(Debug, Clone)]
pub struct RidgeRegressor {
    options: RegressionOptions,
}

impl RidgeRegressor {
    /// Create a new Ridge regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> RidgeRegressorBuilder {
        RidgeRegressorBuilder::default()
    }
}

impl Regressor for RidgeRegressor {
    type Fitted = FittedRidge;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
        if self.options.lambda == 0.0 {
            let ols = OlsRegressor::new(self.options.clone());
            let ols_fitted = ols.fit(x, y)?;
            let xtx_inverse = if self.options.with_intercept {
                compute_xtx_inverse_augmented(x).ok()
            } else {
                compute_xtx_inverse(x).ok()
            };
            return Ok(FittedRidge {
                options: self.options.clone(),
                result: ols_fitted.result().clone(),
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

        // The penalty keeps X'X + λI full rank, so nothing is aliased.
        let aliased = vec![false; n_features];

        let (coefficients, intercept) = if self.options.with_intercept {
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let coefficients = self.solve_ridge(&x_centered, &y_centered)?;

            let mut intercept = y_mean;
            for j in 0..n_features {
                intercept -= x_means[j] * coefficients[j];
            }
            (coefficients, Some(intercept))
        } else {
            (self.solve_ridge(x, y)?, None)
        };

        let fitted_values = linear_predict(x, &coefficients, &aliased, intercept.unwrap_or(0.0));
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let n_params = n_features + usize::from(intercept.is_some());
        let stats = compute_fit_statistics(y, &residuals, n_params, intercept.is_some());

        let mut result = RegressionResult::empty(n_features, n_samples);
        result.coefficients = coefficients;
        result.intercept = intercept;
        result.residuals = residuals;
        result.fitted_values = fitted_values;
        result.rank = n_features;
        result.n_parameters = n_params;
        result.aliased = aliased;
        result.rank_tolerance = self.options.rank_tolerance;
        result.confidence_level = self.options.confidence_level;
        stats.write_into(&mut result);

        let xtx_inverse = self.regularized_inverse(x);

        Ok(FittedRidge {
            options: self.options.clone(),
            result,
            xtx_inverse,
        })
    }
}

impl RidgeRegressor {
    /// Solve (X'X + λI) β = X'y via QR.
    fn solve_ridge(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Col<f64>, RegressionError> {
        let n_features = x.ncols();

        let mut xtx_reg = x.transpose() * x;
        for j in 0..n_features {
            xtx_reg[(j, j)] += self.options.lambda;
        }

        let xty = x.transpose() * y;

        let qr: faer::linalg::solvers::Qr<f64> = xtx_reg.qr();
        let q = qr.compute_Q();
        let r = qr.R();

        let qty = q.transpose() * &xty;
        let qty_col = Col::from_fn(n_features, |i| qty[i]);

        solve_upper_triangular(&r.to_owned(), &qty_col, 1e-14)
            .ok_or(RegressionError::SingularMatrix)
    }

    /// (X_aug'X_aug + λI)⁻¹ (intercept unpenalized) for prediction intervals.
    fn regularized_inverse(&self, x: &Mat<f64>) -> Option<Mat<f64>> {
        let n_features = x.ncols();

        if self.options.with_intercept {
            let x_aug = crate::utils::augment_with_intercept(x);
            let mut xtx_aug = x_aug.transpose() * &x_aug;
            for j in 1..=n_features {
                xtx_aug[(j, j)] += self.options.lambda;
            }
            invert_symmetric(&xtx_aug, 1e-14)
        } else {
            let mut xtx = x.transpose() * x;
            for j in 0..n_features {
                xtx[(j, j)] += self.options.lambda;
            }
            invert_symmetric(&xtx, 1e-14)
        }
    }
}

/// A fitted Ridge regression model.
#[derive(Debug, Clone)]
pub struct FittedRidge {
    options: RegressionOptions,
    result: RegressionResult,
    /// Regularized (X'X)⁻¹ for approximate prediction intervals.
    xtx_inverse: Option<Mat<f64>>,
}

impl FittedRidge {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }

    /// Get the regularization strength.
    pub fn lambda(&self) -> f64 {
        self.options.lambda
    }
}

impl FittedRegressor for FittedRidge {
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
            (Some(interval_type), Some(xtx_inv)) => compute_prediction_intervals(
                x,
                xtx_inv,
                &predictions,
                self.result.mse,
                self.result.residual_df() as f64,
                level,
                interval_type,
                self.result.intercept.is_some(),
            ),
            (Some(_), None) => PredictionResult::without_intervals(predictions),
        }
    }
}

/// Builder for `RidgeRegressor`.
#[derive(Debug, Clone, Default)]
pub struct RidgeRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl RidgeRegressorBuilder {
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

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Build the Ridge regressor.
    pub fn build(self) -> RidgeRegressor {
        RidgeRegressor::new(self.builder.build_unchecked())
    }
}
