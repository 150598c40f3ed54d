//! Influence measures: Cook's distance and DFFITS.

use crate::diagnostics::residuals::externally_studentized_residuals;
use faer::Col;

/// Cook's distance per observation:
/// D_i = (e_i² / (p · MSE)) · h_ii / (1 − h_ii)².
pub fn cooks_distance(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();
    if mse <= 0.0 || !mse.is_finite() || n_params == 0 {
        return Col::from_fn(n, |_| f64::NAN);
    }

    Col::from_fn(n, |i| {
        let one_minus_h = (1.0 - leverage[i]).max(1e-14);
        let d = (residuals[i] * residuals[i] / (n_params as f64 * mse))
            * (leverage[i] / (one_minus_h * one_minus_h));
        if d.is_finite() {
            d.max(0.0)
        } else {
            f64::NAN
        }
    })
}

/// DFFITS per observation: the externally studentized residual scaled by
/// √(h_ii / (1 − h_ii)). Measures the change in the fitted value when
/// observation i is deleted.
pub fn dffits(residuals: &Col<f64>, leverage: &Col<f64>, mse: f64, n_params: usize) -> Col<f64> {
    let n = residuals.nrows();
    let r_star = externally_studentized_residuals(residuals, leverage, mse, n_params);

    Col::from_fn(n, |i| {
        let one_minus_h = (1.0 - leverage[i]).max(1e-14);
        r_star[i] * (leverage[i] / one_minus_h).sqrt()
    })
}

/// Indices with Cook's distance above the threshold (default 4/n).
pub fn influential_cooks(cooks_d: &Col<f64>, threshold: Option<f64>) -> Vec<usize> {
    let cutoff = threshold.unwrap_or(4.0 / cooks_d.nrows() as f64);
    cooks_d
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d > cutoff)
        .map(|(i, _)| i)
        .collect()
}

/// Indices with |DFFITS| above the threshold (default 2·√(p/n)).
pub fn influential_dffits(
    dffits: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let n = dffits.nrows();
    let cutoff = threshold.unwrap_or(2.0 * (n_params as f64 / n as f64).sqrt());
    dffits
        .iter()
        .enumerate()
        .filter(|(_, &d)| d.is_finite() && d.abs() > cutoff)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooks_distance_non_negative() {
        let residuals = Col::from_fn(20, |i| i as f64 - 9.5);
        let leverage = Col::from_fn(20, |i| 0.1 + 0.02 * i as f64);

        let cooks = cooks_distance(&residuals, &leverage, 10.0, 3);
        for i in 0..cooks.nrows() {
            assert!(cooks[i] >= 0.0 || cooks[i].is_nan());
        }
    }

    #[test]
    fn test_influential_point_detected() {
        let mut residuals = Col::from_fn(20, |_| 0.1);
        let mut leverage = Col::from_fn(20, |_| 0.1);
        residuals[10] = 10.0;
        leverage[10] = 0.9;

        let cooks = cooks_distance(&residuals, &leverage, 1.0, 2);
        assert!(influential_cooks(&cooks, Some(0.5)).contains(&10));
    }

    #[test]
    fn test_dffits_larger_for_influential_point() {
        let mut residuals = Col::from_fn(30, |_| 0.5);
        let mut leverage = Col::from_fn(30, |_| 0.1);
        residuals[15] = 2.0;
        leverage[15] = 0.4;

        let d = dffits(&residuals, &leverage, 1.0, 2);
        let other_mean: f64 = (0..30)
            .filter(|&i| i != 15 && d[i].is_finite())
            .map(|i| d[i].abs())
            .sum::<f64>()
            / 29.0;
        assert!(d[15].abs() > other_mean);
    }
}
