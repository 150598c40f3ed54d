//! Standardized and studentized residuals.

use faer::Col;

/// Residuals scaled by the residual standard error: e_i / s.
pub fn standardized_residuals(residuals: &Col<f64>, mse: f64) -> Col<f64> {
    let n = residuals.nrows();
    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |i| if residuals[i].abs() < 1e-14 { 0.0 } else { f64::NAN });
    }

    let s = mse.sqrt();
    Col::from_fn(n, |i| residuals[i] / s)
}

/// Internally studentized residuals: e_i / (s · √(1 − h_ii)). Accounts for
/// the leverage-dependent variance of each residual.
pub fn studentized_residuals(residuals: &Col<f64>, leverage: &Col<f64>, mse: f64) -> Col<f64> {
    let n = residuals.nrows();
    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let s = mse.sqrt();
    Col::from_fn(n, |i| {
        residuals[i] / (s * (1.0 - leverage[i]).max(1e-14).sqrt())
    })
}

/// Externally studentized (deleted) residuals, scaled by the leave-one-out
/// standard error. Under the null these follow a t distribution with
/// n − p − 1 degrees of freedom.
pub fn externally_studentized_residuals(
    residuals: &Col<f64>,
    leverage: &Col<f64>,
    mse: f64,
    n_params: usize,
) -> Col<f64> {
    let n = residuals.nrows();
    let df_resid = n.saturating_sub(n_params);
    if df_resid <= 1 || mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(n, |_| f64::NAN);
    }

    let rss = mse * df_resid as f64;
    let df_loo = (df_resid - 1) as f64;

    Col::from_fn(n, |i| {
        let one_minus_h = (1.0 - leverage[i]).max(1e-14);
        let rss_loo = rss - residuals[i] * residuals[i] / one_minus_h;
        if rss_loo <= 0.0 {
            return f64::NAN;
        }
        let s_loo = (rss_loo / df_loo).sqrt();
        residuals[i] / (s_loo * one_minus_h.sqrt())
    })
}

/// Indices of observations whose studentized residual exceeds the threshold
/// in magnitude. Conventional thresholds are 2 or 3.
pub fn residual_outliers(studentized: &Col<f64>, threshold: f64) -> Vec<usize> {
    studentized
        .iter()
        .enumerate()
        .filter(|(_, &r)| r.abs() > threshold)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardized_scaling() {
        let residuals = Col::from_fn(10, |i| i as f64 - 4.5);
        let scaled = standardized_residuals(&residuals, 4.0);
        for i in 0..10 {
            assert!((scaled[i] - residuals[i] / 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_studentized_uniform_leverage() {
        let residuals = Col::from_fn(10, |i| i as f64 - 4.5);
        let leverage = Col::from_fn(10, |_| 0.2);
        let stud = studentized_residuals(&residuals, &leverage, 9.0);

        let factor = 3.0 * 0.8f64.sqrt();
        for i in 0..10 {
            assert!((stud[i] - residuals[i] / factor).abs() < 1e-12);
        }
    }

    #[test]
    fn test_externally_studentized_flags_large_residual() {
        let mut residuals = Col::from_fn(30, |_| 0.3);
        residuals[12] = 5.0;
        let leverage = Col::from_fn(30, |_| 0.1);

        let ext = externally_studentized_residuals(&residuals, &leverage, 1.1, 3);
        assert!(ext[12].abs() > ext[0].abs() * 3.0);
    }

    #[test]
    fn test_outlier_filter() {
        let stud = Col::from_fn(10, |i| if i == 7 { -3.5 } else { 0.2 });
        assert_eq!(residual_outliers(&stud, 2.0), vec![7]);
    }

    #[test]
    fn test_invalid_mse_gives_nan() {
        let residuals = Col::from_fn(5, |_| 1.0);
        let leverage = Col::from_fn(5, |_| 0.1);
        let stud = studentized_residuals(&residuals, &leverage, 0.0);
        assert!(stud[0].is_nan());
    }
}
