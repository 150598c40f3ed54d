//! Ordinary Least Squares regression solver.

use crate::core::stats::compute_fit_statistics;
use crate::core::{
    IntervalType, PredictionResult, RegressionOptions, RegressionOptionsBuilder, RegressionResult,
};
use crate::inference::{
    compute_prediction_intervals, compute_xtx_inverse, compute_xtx_inverse_augmented,
    CoefficientInference,
};
use crate::solvers::traits::{FittedRegressor, RegressionError, Regressor};
use crate::utils::{center_columns, center_vector, detect_constant_columns};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Ordinary Least Squares regression estimator.
///
/// Uses QR decomposition with column pivoting to handle rank-deficient
/// matrices. Aliased (collinear) coefficients are set to NaN.
///
/// # Example
///
/// ```rust,ignore
/// use stepreg::solvers::{OlsRegressor, Regressor, FittedRegressor};
///
/// let fitted = OlsRegressor::builder()
///     .with_intercept(true)
///     .build()
///     .fit(&x, &y)?;
///
/// println!("R² = {}", fitted.r_squared());
/// ```
#[derive(Debug, Clone)]
pub struct OlsRegressor {
    options: RegressionOptions,
}

impl OlsRegressor {
    /// Create a new OLS regressor with the given options.
    pub fn new(options: RegressionOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> OlsRegressorBuilder {
        OlsRegressorBuilder::default()
    }
}

impl Regressor for OlsRegressor {
    type Fitted = FittedOls;

    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<Self::Fitted, RegressionError> {
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

        let n_params = if self.options.with_intercept {
            n_features + 1
        } else {
            n_features
        };

        if n_samples < n_params {
            return Err(RegressionError::InsufficientObservations {
                needed: n_params,
                got: n_samples,
            });
        }

        let constant_cols = detect_constant_columns(x, self.options.rank_tolerance);

        if self.options.with_intercept {
            // Center the data so the intercept drops out of the solve.
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let (coefficients, aliased, rank) =
                self.solve_with_qr(&x_centered, &y_centered, &constant_cols)?;

            // intercept = ȳ - x̄' β over the active columns
            let mut intercept = y_mean;
            for j in 0..n_features {
                if !aliased[j] && !coefficients[j].is_nan() {
                    intercept -= x_means[j] * coefficients[j];
                }
            }

            let (fitted_values, residuals) =
                predict_training(x, y, &coefficients, &aliased, intercept);

            let result = self.build_result(
                x,
                y,
                &coefficients,
                Some(intercept),
                &residuals,
                &fitted_values,
                &aliased,
                rank,
                rank + 1,
            )?;

            let xtx_inverse = compute_xtx_inverse_augmented(x).ok();

            Ok(FittedOls {
                options: self.options.clone(),
                result,
                xtx_inverse,
            })
        } else {
            if constant_cols.iter().all(|&c| c) {
                return Err(RegressionError::AllFeaturesConstant);
            }

            let (coefficients, aliased, rank) = self.solve_with_qr(x, y, &constant_cols)?;

            let (fitted_values, residuals) = predict_training(x, y, &coefficients, &aliased, 0.0);

            let result = self.build_result(
                x,
                y,
                &coefficients,
                None,
                &residuals,
                &fitted_values,
                &aliased,
                rank,
                rank,
            )?;

            let xtx_inverse = compute_xtx_inverse(x).ok();

            Ok(FittedOls {
                options: self.options.clone(),
                result,
                xtx_inverse,
            })
        }
    }
}

/// Linear predictions over the active (non-aliased) coefficients.
pub(crate) fn linear_predict(
    x: &Mat<f64>,
    coefficients: &Col<f64>,
    aliased: &[bool],
    intercept: f64,
) -> Col<f64> {
    Col::from_fn(x.nrows(), |i| {
        let mut pred = intercept;
        for j in 0..x.ncols() {
            if !aliased[j] && !coefficients[j].is_nan() {
                pred += x[(i, j)] * coefficients[j];
            }
        }
        pred
    })
}

/// Compute in-sample fitted values and residuals from active coefficients.
fn predict_training(
    x: &Mat<f64>,
    y: &Col<f64>,
    coefficients: &Col<f64>,
    aliased: &[bool],
    intercept: f64,
) -> (Col<f64>, Col<f64>) {
    let fitted_values = linear_predict(x, coefficients, aliased, intercept);
    let residuals = Col::from_fn(y.nrows(), |i| y[i] - fitted_values[i]);
    (fitted_values, residuals)
}

impl OlsRegressor {
    /// Solve the least squares problem using QR decomposition with column pivoting.
    fn solve_with_qr(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        constant_cols: &[bool],
    ) -> Result<(Col<f64>, Vec<bool>, usize), RegressionError> {
        let n_features = x.ncols();
        let n_samples = x.nrows();

        let mut aliased = constant_cols.to_vec();

        let qr = x.col_piv_qr();
        let q = qr.compute_Q();
        let r = qr.R();
        let perm = qr.P();

        // perm_inv[j] = position original column j was pivoted to
        let perm_arr = perm.arrays().1;
        let mut perm_inv: Vec<usize> = vec![0; n_features];
        perm_inv[..n_features].copy_from_slice(&perm_arr[..n_features]);

        // Numerical rank from the R diagonal.
        let mut rank = 0;
        for i in 0..n_features.min(n_samples) {
            if r[(i, i)].abs() > self.options.rank_tolerance {
                rank += 1;
            } else {
                break;
            }
        }

        if rank == 0 {
            let mut coefficients = Col::zeros(n_features);
            for j in 0..n_features {
                coefficients[j] = f64::NAN;
                aliased[j] = true;
            }
            return Ok((coefficients, aliased, 0));
        }

        // Columns pivoted past the rank boundary are aliased.
        for j in 0..n_features {
            if constant_cols[j] || perm_inv[j] >= rank {
                aliased[j] = true;
            }
        }

        // Solve R β_perm = Q'y for the leading rank×rank block.
        let qty = q.transpose() * y;

        let mut beta_reduced = Col::zeros(rank);
        for i in (0..rank).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..rank {
                sum -= r[(i, j)] * beta_reduced[j];
            }
            beta_reduced[i] = sum / r[(i, i)];
        }

        // Map back to original column order; aliased columns get NaN.
        let mut coefficients = Col::zeros(n_features);
        for j in 0..n_features {
            if aliased[j] {
                coefficients[j] = f64::NAN;
            } else {
                coefficients[j] = beta_reduced[perm_inv[j]];
            }
        }

        Ok((coefficients, aliased, rank))
    }

    /// Assemble the result structure and optionally compute inference statistics.
    #[allow(clippy::too_many_arguments)]
    fn build_result(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        coefficients: &Col<f64>,
        intercept: Option<f64>,
        residuals: &Col<f64>,
        fitted_values: &Col<f64>,
        aliased: &[bool],
        rank: usize,
        n_params: usize,
    ) -> Result<RegressionResult, RegressionError> {
        let stats = compute_fit_statistics(y, residuals, n_params, intercept.is_some());

        let mut result = RegressionResult::empty(x.ncols(), y.nrows());
        result.coefficients = coefficients.clone();
        result.intercept = intercept;
        result.residuals = residuals.clone();
        result.fitted_values = fitted_values.clone();
        result.rank = rank;
        result.n_parameters = n_params;
        result.aliased = aliased.to_vec();
        result.rank_tolerance = self.options.rank_tolerance;
        result.confidence_level = self.options.confidence_level;
        stats.write_into(&mut result);

        if self.options.compute_inference {
            self.compute_inference(x, &mut result);
        }

        Ok(result)
    }

    /// Compute standard errors, t-statistics, p-values and confidence intervals.
    fn compute_inference(&self, x: &Mat<f64>, result: &mut RegressionResult) {
        let df = result.residual_df() as f64;

        if df <= 0.0 || !result.mse.is_finite() {
            return;
        }

        if result.intercept.is_some() {
            let Ok((se, se_int)) =
                CoefficientInference::standard_errors_with_intercept(x, result.mse, &result.aliased)
            else {
                return;
            };

            let t_stats = CoefficientInference::t_statistics(&result.coefficients, &se);
            let p_vals = CoefficientInference::p_values(&t_stats, df);
            let (ci_lower, ci_upper) = CoefficientInference::confidence_intervals(
                &result.coefficients,
                &se,
                df,
                self.options.confidence_level,
            );

            result.std_errors = Some(se);
            result.t_statistics = Some(t_stats);
            result.p_values = Some(p_vals);
            result.conf_interval_lower = Some(ci_lower);
            result.conf_interval_upper = Some(ci_upper);

            let intercept = result.intercept.unwrap_or(0.0);
            let t_int = if se_int > 0.0 {
                intercept / se_int
            } else {
                f64::NAN
            };

            let t_dist = StudentsT::new(0.0, 1.0, df).ok();
            let p_int = if t_int.is_finite() {
                t_dist
                    .as_ref()
                    .map_or(f64::NAN, |d| 2.0 * (1.0 - d.cdf(t_int.abs())))
            } else {
                f64::NAN
            };
            let t_crit = t_dist.as_ref().map_or(f64::NAN, |d| {
                d.inverse_cdf(1.0 - (1.0 - self.options.confidence_level) / 2.0)
            });

            result.intercept_std_error = Some(se_int);
            result.intercept_t_statistic = Some(t_int);
            result.intercept_p_value = Some(p_int);
            result.intercept_conf_interval =
                Some((intercept - t_crit * se_int, intercept + t_crit * se_int));
        } else {
            let Ok(se) = CoefficientInference::standard_errors(x, result.mse, &result.aliased)
            else {
                return;
            };

            let t_stats = CoefficientInference::t_statistics(&result.coefficients, &se);
            let p_vals = CoefficientInference::p_values(&t_stats, df);
            let (ci_lower, ci_upper) = CoefficientInference::confidence_intervals(
                &result.coefficients,
                &se,
                df,
                self.options.confidence_level,
            );

            result.std_errors = Some(se);
            result.t_statistics = Some(t_stats);
            result.p_values = Some(p_vals);
            result.conf_interval_lower = Some(ci_lower);
            result.conf_interval_upper = Some(ci_upper);
        }
    }
}

/// A fitted OLS regression model.
#[derive(Debug, Clone)]
pub struct FittedOls {
    options: RegressionOptions,
    result: RegressionResult,
    /// (X'X)⁻¹ or (X_aug'X_aug)⁻¹ for prediction intervals.
    xtx_inverse: Option<Mat<f64>>,
}

impl FittedOls {
    /// Get the options used to fit this model.
    pub fn options(&self) -> &RegressionOptions {
        &self.options
    }
}

impl FittedRegressor for FittedOls {
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

/// Builder for `OlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct OlsRegressorBuilder {
    builder: RegressionOptionsBuilder,
}

impl OlsRegressorBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.builder = self.builder.with_intercept(include);
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.builder = self.builder.compute_inference(compute);
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.builder = self.builder.confidence_level(level);
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.builder = self.builder.rank_tolerance(tol);
        self
    }

    /// Build the OLS regressor.
    pub fn build(self) -> OlsRegressor {
        // OLS ignores lambda/alpha, so skip penalty validation.
        OlsRegressor::new(self.builder.build_unchecked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_fit() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let model = OlsRegressor::builder().with_intercept(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        assert!((fitted.coefficients()[0] - 3.0).abs() < 1e-10);
        assert!((fitted.intercept().expect("intercept exists") - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_predict() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let model = OlsRegressor::builder().with_intercept(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        let x_new = Mat::from_fn(2, 1, |i, _| (i + 10) as f64);
        let preds = fitted.predict(&x_new);

        assert!((preds[0] - 32.0).abs() < 1e-10);
        assert!((preds[1] - 35.0).abs() < 1e-10);
    }

    #[test]
    fn test_coefficients_follow_column_order_under_pivoting() {
        // Column scales force col_piv_qr into a non-trivial pivot cycle; the
        // recovered coefficients must still line up with the original columns.
        let mut x = Mat::zeros(30, 3);
        let mut y = Col::zeros(30);
        for i in 0..30 {
            let t = i as f64;
            x[(i, 0)] = 0.01 * (t * 0.7).sin();
            x[(i, 1)] = 100.0 * (t * 0.3).cos();
            x[(i, 2)] = t * 0.5;
            y[i] = 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 1)] + 4.0 * x[(i, 2)];
        }

        let model = OlsRegressor::builder().with_intercept(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        let coef = fitted.coefficients();
        assert!((coef[0] - 2.0).abs() < 1e-6, "coef[0] = {}", coef[0]);
        assert!((coef[1] - 3.0).abs() < 1e-6, "coef[1] = {}", coef[1]);
        assert!((coef[2] - 4.0).abs() < 1e-6, "coef[2] = {}", coef[2]);
        assert!((fitted.result().r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_collinear_column_is_aliased() {
        let mut x = Mat::zeros(10, 2);
        let mut y = Col::zeros(10);
        for i in 0..10 {
            x[(i, 0)] = i as f64;
            x[(i, 1)] = 2.0 * i as f64; // exact copy of column 0, scaled
            y[i] = 1.0 + x[(i, 0)];
        }

        let model = OlsRegressor::builder().with_intercept(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        assert!(fitted.result().has_aliased());
        assert_eq!(fitted.result().n_active_coefficients(), 1);
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(4, |i| i as f64);

        let model = OlsRegressor::builder().build();
        assert!(matches!(
            model.fit(&x, &y),
            Err(RegressionError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_inference_statistics_present() {
        let x = Mat::from_fn(20, 2, |i, j| ((i * (j + 1)) as f64).sin());
        let y = Col::from_fn(20, |i| 1.0 + (i as f64) * 0.1);

        let model = OlsRegressor::builder().compute_inference(true).build();
        let fitted = model.fit(&x, &y).expect("model should fit");

        let result = fitted.result();
        assert!(result.std_errors.is_some());
        assert!(result.p_values.is_some());
        assert!(result.intercept_std_error.is_some());
    }
}
