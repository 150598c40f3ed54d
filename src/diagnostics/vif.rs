//! Variance Inflation Factor.

use crate::solvers::{FittedRegressor, OlsRegressor, Regressor};
use faer::{Col, Mat};

/// VIF per predictor: 1 / (1 − R²_j), where R²_j comes from regressing
/// column j on all other predictors.
///
/// A VIF of 1 means no correlation with the other predictors; values above
/// 5 (or 10, by convention) flag multicollinearity. With fewer than two
/// predictors every VIF is 1.
pub fn variance_inflation_factor(x: &Mat<f64>) -> Col<f64> {
    let n = x.nrows();
    let p = x.ncols();

    if n < 3 || p < 2 {
        return Col::from_fn(p, |_| 1.0);
    }

    let model = OlsRegressor::builder().with_intercept(true).build();

    Col::from_fn(p, |j| {
        let x_other = Mat::from_fn(n, p - 1, |i, k| {
            let col = if k < j { k } else { k + 1 };
            x[(i, col)]
        });
        let y_j = Col::from_fn(n, |i| x[(i, j)]);

        match model.fit(&x_other, &y_j) {
            Ok(fitted) => {
                let r_squared = fitted.r_squared();
                if r_squared < 1.0 - 1e-14 {
                    (1.0 / (1.0 - r_squared)).max(1.0)
                } else {
                    f64::INFINITY
                }
            }
            // A failed auxiliary regression carries no collinearity signal.
            Err(_) => 1.0,
        }
    })
}

/// Indices of predictors with VIF above the threshold (commonly 5 or 10).
pub fn high_vif_predictors(vif: &Col<f64>, threshold: f64) -> Vec<usize> {
    vif.iter()
        .enumerate()
        .filter(|(_, &v)| v > threshold)
        .map(|(i, _)| i)
        .collect()
}
