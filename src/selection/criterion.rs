//! Scoring criteria for subset search.

use crate::core::RegressionResult;
use std::fmt;

/// Criterion used to rank candidate feature subsets. Lower is always better:
/// adjusted R² is scored as 1 − adjusted R² so that every criterion is
/// minimized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Criterion {
    /// Akaike Information Criterion.
    #[default]
    Aic,
    /// Bayesian Information Criterion.
    Bic,
    /// 1 − adjusted R².
    AdjRSquared,
    /// Backward elimination of insignificant coefficients. Not a scalar
    /// subset score; only valid with backward selection.
    PValue,
}

impl Criterion {
    /// Score a fitted model under this criterion. `PValue` has no scalar
    /// subset score and returns NaN; the p-value search drives its own loop.
    pub fn score(&self, result: &RegressionResult) -> f64 {
        match self {
            Criterion::Aic => result.aic,
            Criterion::Bic => result.bic,
            Criterion::AdjRSquared => 1.0 - result.adj_r_squared,
            Criterion::PValue => f64::NAN,
        }
    }

    /// Whether this criterion produces a scalar score per subset.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Criterion::PValue)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::Aic => write!(f, "AIC"),
            Criterion::Bic => write!(f, "BIC"),
            Criterion::AdjRSquared => write!(f, "adjusted R²"),
            Criterion::PValue => write!(f, "p-value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RegressionResult;

    #[test]
    fn test_score_mapping() {
        let mut result = RegressionResult::empty(1, 10);
        result.aic = 12.0;
        result.bic = 15.0;
        result.adj_r_squared = 0.8;

        assert_eq!(Criterion::Aic.score(&result), 12.0);
        assert_eq!(Criterion::Bic.score(&result), 15.0);
        assert!((Criterion::AdjRSquared.score(&result) - 0.2).abs() < 1e-12);
        assert!(Criterion::PValue.score(&result).is_nan());
    }

    #[test]
    fn test_display() {
        assert_eq!(Criterion::Aic.to_string(), "AIC");
        assert_eq!(Criterion::PValue.to_string(), "p-value");
    }
}
