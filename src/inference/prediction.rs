//! Prediction interval calculations.

use crate::core::{IntervalType, PredictionResult};
use crate::utils::{augment_with_intercept, invert_symmetric};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Compute confidence or prediction intervals for new data points.
///
/// `xtx_inv` is (X'X)⁻¹, or (X_aug'X_aug)⁻¹ when `has_intercept`, from the
/// training fit. The per-point variance is `mse * h` for confidence intervals
/// and `mse * (1 + h)` for prediction intervals, where h = x₀'(X'X)⁻¹x₀.
#[allow(clippy::too_many_arguments)]
pub fn compute_prediction_intervals(
    x_new: &Mat<f64>,
    xtx_inv: &Mat<f64>,
    predictions: &Col<f64>,
    mse: f64,
    df: f64,
    confidence_level: f64,
    interval_type: IntervalType,
    has_intercept: bool,
) -> PredictionResult {
    let n_new = x_new.nrows();
    let n_features = x_new.ncols();

    if df <= 0.0 || mse <= 0.0 || !mse.is_finite() {
        return PredictionResult::without_intervals(predictions.clone());
    }

    let t_dist = match StudentsT::new(0.0, 1.0, df) {
        Ok(d) => d,
        Err(_) => return PredictionResult::without_intervals(predictions.clone()),
    };
    let t_crit = t_dist.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0);

    let mut se = Col::zeros(n_new);
    let mut lower = Col::zeros(n_new);
    let mut upper = Col::zeros(n_new);

    for i in 0..n_new {
        let x0: Col<f64> = if has_intercept {
            Col::from_fn(n_features + 1, |j| {
                if j == 0 {
                    1.0
                } else {
                    x_new[(i, j - 1)]
                }
            })
        } else {
            Col::from_fn(n_features, |j| x_new[(i, j)])
        };

        let h = quadratic_form(&x0, xtx_inv);

        let var = match interval_type {
            IntervalType::Confidence => mse * h,
            IntervalType::Prediction => mse * (1.0 + h),
        };

        se[i] = if var >= 0.0 { var.sqrt() } else { f64::NAN };
        let margin = t_crit * se[i];
        lower[i] = predictions[i] - margin;
        upper[i] = predictions[i] + margin;
    }

    PredictionResult::with_intervals(predictions.clone(), lower, upper, se)
}

/// Compute x₀' M x₀ for a single observation.
fn quadratic_form(x0: &Col<f64>, m: &Mat<f64>) -> f64 {
    let p = x0.nrows();
    let mut h = 0.0;
    for i in 0..p {
        let mut row = 0.0;
        for j in 0..p {
            row += m[(i, j)] * x0[j];
        }
        h += x0[i] * row;
    }
    h
}

/// Compute (X'X)⁻¹ for a design matrix without intercept augmentation.
pub fn compute_xtx_inverse(x: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let xtx = x.transpose() * x;
    invert_symmetric(&xtx, 1e-10).ok_or("matrix is singular")
}

/// Compute (X_aug'X_aug)⁻¹ for the augmented design matrix [1 | X].
pub fn compute_xtx_inverse_augmented(x: &Mat<f64>) -> Result<Mat<f64>, &'static str> {
    let x_aug = augment_with_intercept(x);
    let xtx_aug = x_aug.transpose() * &x_aug;
    invert_symmetric(&xtx_aug, 1e-10).ok_or("augmented matrix is singular")
}

/// Compute (X_aug'X_aug)⁻¹ over the non-aliased columns only.
///
/// Used by the penalized solvers where inactive (zeroed) coefficients would
/// otherwise make the cross-product singular.
pub fn compute_xtx_inverse_augmented_reduced(
    x: &Mat<f64>,
    aliased: &[bool],
) -> Result<Mat<f64>, &'static str> {
    let active: Vec<usize> = (0..x.ncols()).filter(|&j| !aliased[j]).collect();
    if active.is_empty() {
        return Err("all features are aliased");
    }

    let x_active = Mat::from_fn(x.nrows(), active.len(), |i, k| x[(i, active[k])]);
    compute_xtx_inverse_augmented(&x_active)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_form_identity() {
        let x0 = Col::from_fn(2, |i| (i + 1) as f64);
        let eye: Mat<f64> = Mat::identity(2, 2);

        // x₀'Ix₀ = 1² + 2² = 5
        assert!((quadratic_form(&x0, &eye) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_prediction_wider_than_confidence() {
        let x_new = Mat::from_fn(3, 1, |_, _| 1.0);
        let xtx_inv: Mat<f64> = Mat::identity(2, 2);
        let predictions = Col::from_fn(3, |i| i as f64);

        let ci = compute_prediction_intervals(
            &x_new,
            &xtx_inv,
            &predictions,
            1.0,
            10.0,
            0.95,
            IntervalType::Confidence,
            true,
        );
        let pi = compute_prediction_intervals(
            &x_new,
            &xtx_inv,
            &predictions,
            1.0,
            10.0,
            0.95,
            IntervalType::Prediction,
            true,
        );

        for i in 0..3 {
            assert!(pi.upper[i] - pi.lower[i] > ci.upper[i] - ci.lower[i]);
        }
    }

    #[test]
    fn test_zero_df_yields_nan_bounds() {
        let x_new = Mat::from_fn(2, 1, |_, _| 1.0);
        let xtx_inv: Mat<f64> = Mat::identity(2, 2);
        let predictions = Col::from_fn(2, |i| i as f64);

        let out = compute_prediction_intervals(
            &x_new,
            &xtx_inv,
            &predictions,
            1.0,
            0.0,
            0.95,
            IntervalType::Prediction,
            true,
        );

        assert!(out.lower[0].is_nan());
        assert!(out.upper[1].is_nan());
    }
}
