//! Scalar fit statistics shared by every solver.
//!
//! The R², adjusted R², MSE, F-test, log-likelihood, and information-criterion
//! block is identical across solvers, so it is computed in one place. The
//! selection module relies on this: the criterion score of a candidate subset
//! is exactly what refitting that subset reports.

use faer::Col;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Scalar summary block for a fitted model.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FitStatistics {
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub mse: f64,
    pub rmse: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub aicc: f64,
    pub bic: f64,
}

/// Compute the scalar fit statistics from the response and residuals.
///
/// `n_params` counts the intercept when present. The Gaussian log-likelihood
/// uses the unbiased variance estimate (RSS / residual df), and AIC/BIC
/// penalize `n_params` parameters.
pub(crate) fn compute_fit_statistics(
    y: &Col<f64>,
    residuals: &Col<f64>,
    n_params: usize,
    has_intercept: bool,
) -> FitStatistics {
    let n = y.nrows();
    let y_mean: f64 = y.iter().sum::<f64>() / n as f64;

    let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();

    let r_squared = if tss > 0.0 {
        (1.0 - rss / tss).clamp(0.0, 1.0)
    } else if rss < 1e-10 {
        1.0
    } else {
        0.0
    };

    let df_total = (n - 1) as f64;
    let df_resid = n.saturating_sub(n_params) as f64;
    let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
        1.0 - (1.0 - r_squared) * df_total / df_resid
    } else {
        f64::NAN
    };

    let mse = if df_resid > 0.0 { rss / df_resid } else { f64::NAN };
    let rmse = mse.sqrt();

    let ess = tss - rss;
    let df_model = n_params.saturating_sub(if has_intercept { 1 } else { 0 }) as f64;
    let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
        (ess / df_model) / mse
    } else {
        f64::NAN
    };

    let f_pvalue = if f_statistic.is_finite() && df_model > 0.0 && df_resid > 0.0 {
        let f_dist = FisherSnedecor::new(df_model, df_resid).ok();
        f_dist.map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
    } else {
        f64::NAN
    };

    let log_likelihood = if mse > 0.0 {
        -0.5 * n as f64 * (1.0 + (2.0 * std::f64::consts::PI).ln() + mse.ln())
    } else {
        f64::NAN
    };

    let k = n_params as f64;
    let aic = if log_likelihood.is_finite() {
        2.0 * k - 2.0 * log_likelihood
    } else {
        f64::NAN
    };

    let aicc = if log_likelihood.is_finite() && (n as f64 - k - 1.0) > 0.0 {
        aic + 2.0 * k * (k + 1.0) / (n as f64 - k - 1.0)
    } else {
        f64::NAN
    };

    let bic = if log_likelihood.is_finite() {
        k * (n as f64).ln() - 2.0 * log_likelihood
    } else {
        f64::NAN
    };

    FitStatistics {
        r_squared,
        adj_r_squared,
        mse,
        rmse,
        f_statistic,
        f_pvalue,
        log_likelihood,
        aic,
        aicc,
        bic,
    }
}

impl FitStatistics {
    /// Copy the scalar block into a result structure.
    pub(crate) fn write_into(&self, result: &mut super::RegressionResult) {
        result.r_squared = self.r_squared;
        result.adj_r_squared = self.adj_r_squared;
        result.mse = self.mse;
        result.rmse = self.rmse;
        result.f_statistic = self.f_statistic;
        result.f_pvalue = self.f_pvalue;
        result.log_likelihood = self.log_likelihood;
        result.aic = self.aic;
        result.aicc = self.aicc;
        result.bic = self.bic;
    }
}
