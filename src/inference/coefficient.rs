//! Coefficient inference calculations.

use crate::utils::{augment_with_intercept, invert_symmetric};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Compute standard errors for OLS coefficients (no intercept).
    ///
    /// SE(β_j) = sqrt(σ² * (X'X)⁻¹_{jj})
    pub fn standard_errors(
        x: &Mat<f64>,
        mse: f64,
        aliased: &[bool],
    ) -> Result<Col<f64>, &'static str> {
        let n_features = x.ncols();
        let xtx_inv = Self::xtx_inverse_masked(x, aliased)?;

        let mut se = Col::zeros(n_features);
        for j in 0..n_features {
            if aliased[j] {
                se[j] = f64::NAN;
            } else {
                let var = mse * xtx_inv[(j, j)];
                se[j] = if var >= 0.0 { var.sqrt() } else { f64::NAN };
            }
        }

        Ok(se)
    }

    /// Compute standard errors for intercept and coefficients from the
    /// augmented design matrix [1 | X], matching R's `lm()`.
    ///
    /// Returns (coefficient SEs, intercept SE).
    pub fn standard_errors_with_intercept(
        x: &Mat<f64>,
        mse: f64,
        aliased: &[bool],
    ) -> Result<(Col<f64>, f64), &'static str> {
        let n_features = x.ncols();

        // Aliased columns must be dropped before inverting, then mapped back.
        let active: Vec<usize> = (0..n_features).filter(|&j| !aliased[j]).collect();
        if active.is_empty() {
            return Err("all features are aliased");
        }

        let x_active = Mat::from_fn(x.nrows(), active.len(), |i, k| x[(i, active[k])]);
        let x_aug = augment_with_intercept(&x_active);
        let xtx_aug = x_aug.transpose() * &x_aug;

        let inv = invert_symmetric(&xtx_aug, 1e-10).ok_or("augmented matrix is singular")?;

        let se_intercept = (mse * inv[(0, 0)]).sqrt();

        let mut se = Col::zeros(n_features);
        let mut k = 0;
        for j in 0..n_features {
            if aliased[j] {
                se[j] = f64::NAN;
            } else {
                let var = mse * inv[(k + 1, k + 1)];
                se[j] = if var >= 0.0 { var.sqrt() } else { f64::NAN };
                k += 1;
            }
        }

        Ok((se, se_intercept))
    }

    /// Compute t-statistics: t_j = β_j / SE(β_j).
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Compute two-sided p-values from t-statistics with `df` degrees of freedom.
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        let n = t_statistics.nrows();

        if df <= 0.0 {
            return Col::from_fn(n, |_| f64::NAN);
        }

        let t_dist = match StudentsT::new(0.0, 1.0, df) {
            Ok(d) => d,
            Err(_) => return Col::from_fn(n, |_| f64::NAN),
        };

        Col::from_fn(n, |j| {
            if t_statistics[j].is_nan() {
                f64::NAN
            } else {
                2.0 * (1.0 - t_dist.cdf(t_statistics[j].abs()))
            }
        })
    }

    /// Compute confidence intervals: β_j ± t_{α/2, df} * SE(β_j).
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();

        let t_crit = match StudentsT::new(0.0, 1.0, df) {
            Ok(d) if df > 0.0 => d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0),
            _ => f64::NAN,
        };

        let lower = Col::from_fn(n, |j| {
            if std_errors[j].is_nan() {
                f64::NAN
            } else {
                coefficients[j] - t_crit * std_errors[j]
            }
        });
        let upper = Col::from_fn(n, |j| {
            if std_errors[j].is_nan() {
                f64::NAN
            } else {
                coefficients[j] + t_crit * std_errors[j]
            }
        });

        (lower, upper)
    }

    /// (X'X)⁻¹ over the non-aliased columns, mapped back to full size.
    fn xtx_inverse_masked(x: &Mat<f64>, aliased: &[bool]) -> Result<Mat<f64>, &'static str> {
        let n_features = x.ncols();
        let active: Vec<usize> = (0..n_features).filter(|&j| !aliased[j]).collect();

        if active.is_empty() {
            return Err("all features are aliased");
        }

        let x_active = Mat::from_fn(x.nrows(), active.len(), |i, k| x[(i, active[k])]);
        let xtx = x_active.transpose() * &x_active;
        let inv_active = invert_symmetric(&xtx, 1e-10).ok_or("matrix is singular")?;

        let mut inv = Mat::zeros(n_features, n_features);
        for (ai, &i) in active.iter().enumerate() {
            for (aj, &j) in active.iter().enumerate() {
                inv[(i, j)] = inv_active[(ai, aj)];
            }
        }

        Ok(inv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_t_statistics() {
        let coefficients = Col::from_fn(3, |i| (i + 1) as f64);
        let std_errors = Col::from_fn(3, |_| 0.5);

        let t_stats = CoefficientInference::t_statistics(&coefficients, &std_errors);

        assert!((t_stats[0] - 2.0).abs() < 1e-10);
        assert!((t_stats[1] - 4.0).abs() < 1e-10);
        assert!((t_stats[2] - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_t_statistics_nan_se() {
        let coefficients = Col::from_fn(2, |_| 1.0);
        let mut std_errors = Col::from_fn(2, |_| 0.5);
        std_errors[1] = f64::NAN;

        let t_stats = CoefficientInference::t_statistics(&coefficients, &std_errors);
        assert!(t_stats[0].is_finite());
        assert!(t_stats[1].is_nan());
    }

    #[test]
    fn test_p_values_bounds() {
        let t_stats = Col::from_fn(3, |i| (i + 1) as f64);
        let p_vals = CoefficientInference::p_values(&t_stats, 10.0);

        for p in p_vals.iter() {
            assert!(*p >= 0.0 && *p <= 1.0);
        }
        // Larger |t| means smaller p.
        assert!(p_vals[2] < p_vals[0]);
    }

    #[test]
    fn test_confidence_interval_contains_estimate() {
        let coefficients = Col::from_fn(2, |i| (i as f64) - 0.5);
        let std_errors = Col::from_fn(2, |_| 0.1);

        let (lower, upper) =
            CoefficientInference::confidence_intervals(&coefficients, &std_errors, 20.0, 0.95);

        for j in 0..2 {
            assert!(lower[j] < coefficients[j]);
            assert!(upper[j] > coefficients[j]);
        }
    }
}
