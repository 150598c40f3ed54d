//! Automatic λ / α grid scanning for the regularized solvers.

use crate::core::RegressionResult;
use crate::solvers::{
    ElasticNetRegressor, FittedElasticNet, FittedRegressor, FittedRidge, Regressor,
    RidgeRegressor,
};
use crate::tuning::cv::{cross_val_rmse, KFold, TuningError};
use faer::{Col, Mat};
use log::debug;

/// Which penalized solver the scan tunes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanKind {
    Ridge,
    Lasso,
    ElasticNet,
}

/// One scored grid point.
#[derive(Debug, Clone, Copy)]
pub struct GridPoint {
    pub lambda: f64,
    pub alpha: f64,
    pub rmse: f64,
}

/// The winning model of a scan, refit on the full data.
#[derive(Debug, Clone)]
pub enum ScanModel {
    Ridge(FittedRidge),
    ElasticNet(FittedElasticNet),
}

impl ScanModel {
    /// Predict with the winning model.
    pub fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        match self {
            ScanModel::Ridge(m) => m.predict(x),
            ScanModel::ElasticNet(m) => m.predict(x),
        }
    }

    /// Regression results of the winning model.
    pub fn result(&self) -> &RegressionResult {
        match self {
            ScanModel::Ridge(m) => m.result(),
            ScanModel::ElasticNet(m) => m.result(),
        }
    }
}

/// Outcome of a [`LambdaScan`]: the best hyperparameters, the refit model,
/// and the full CV table for reporting or plotting.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub best_lambda: f64,
    pub best_alpha: f64,
    pub best_rmse: f64,
    /// Every scored grid point, in scan order.
    pub table: Vec<GridPoint>,
    /// The winner refit on the full data.
    pub model: ScanModel,
}

/// Grid scan over regularization strength (and the L1 fraction for elastic
/// net), scored by k-fold CV RMSE.
///
/// The default λ grid is log-spaced over [1e-4, 1e2]; elastic net also scans
/// α over 0.1..=0.9.
#[derive(Debug, Clone)]
pub struct LambdaScan {
    kind: ScanKind,
    lambdas: Vec<f64>,
    alphas: Vec<f64>,
    folds: KFold,
}

/// 30 log-spaced values over [1e-4, 1e2].
fn default_lambda_grid() -> Vec<f64> {
    let (lo, hi, n) = (-4.0f64, 2.0f64, 30usize);
    (0..n)
        .map(|i| 10f64.powf(lo + (hi - lo) * i as f64 / (n - 1) as f64))
        .collect()
}

fn default_alpha_grid() -> Vec<f64> {
    (1..=9).map(|i| i as f64 / 10.0).collect()
}

impl LambdaScan {
    /// Scan λ for ridge regression.
    pub fn ridge() -> Self {
        Self {
            kind: ScanKind::Ridge,
            lambdas: default_lambda_grid(),
            alphas: vec![0.0],
            folds: KFold::new(5),
        }
    }

    /// Scan λ for the lasso (α fixed at 1).
    pub fn lasso() -> Self {
        Self {
            kind: ScanKind::Lasso,
            lambdas: default_lambda_grid(),
            alphas: vec![1.0],
            folds: KFold::new(5),
        }
    }

    /// Scan λ and α jointly for the elastic net.
    pub fn elastic_net() -> Self {
        Self {
            kind: ScanKind::ElasticNet,
            lambdas: default_lambda_grid(),
            alphas: default_alpha_grid(),
            folds: KFold::new(5),
        }
    }

    /// Replace the λ grid.
    pub fn lambdas(mut self, lambdas: Vec<f64>) -> Self {
        self.lambdas = lambdas;
        self
    }

    /// Replace the α grid. Ignored for ridge and lasso scans.
    pub fn alphas(mut self, alphas: Vec<f64>) -> Self {
        if self.kind == ScanKind::ElasticNet {
            self.alphas = alphas;
        }
        self
    }

    /// Replace the fold splitter.
    pub fn folds(mut self, folds: KFold) -> Self {
        self.folds = folds;
        self
    }

    /// Score every grid point by CV RMSE, then refit the best on the full
    /// data. Ties keep the earliest grid point, which is the smallest λ.
    pub fn scan(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<ScanResult, TuningError> {
        if self.lambdas.is_empty() || self.alphas.is_empty() {
            return Err(TuningError::EmptyGrid);
        }

        let mut table = Vec::with_capacity(self.lambdas.len() * self.alphas.len());
        let mut best: Option<GridPoint> = None;

        for &lambda in &self.lambdas {
            for &alpha in &self.alphas {
                let rmse = match self.kind {
                    ScanKind::Ridge => {
                        let model = RidgeRegressor::builder().lambda(lambda).build();
                        cross_val_rmse(&model, x, y, &self.folds)?
                    }
                    ScanKind::Lasso | ScanKind::ElasticNet => {
                        let model = ElasticNetRegressor::builder()
                            .lambda(lambda)
                            .alpha(alpha)
                            .build();
                        cross_val_rmse(&model, x, y, &self.folds)?
                    }
                };

                debug!(
                    "scan: lambda = {:.6}, alpha = {:.2}, rmse = {:.6}",
                    lambda, alpha, rmse
                );

                let point = GridPoint { lambda, alpha, rmse };
                table.push(point);
                let improves = match best {
                    None => true,
                    Some(b) => rmse < b.rmse,
                };
                if improves {
                    best = Some(point);
                }
            }
        }

        // The grid is non-empty, so a best point exists.
        let best = best.ok_or(TuningError::EmptyGrid)?;

        let model = match self.kind {
            ScanKind::Ridge => {
                let fitted = RidgeRegressor::builder().lambda(best.lambda).build().fit(x, y)?;
                ScanModel::Ridge(fitted)
            }
            ScanKind::Lasso | ScanKind::ElasticNet => {
                let fitted = ElasticNetRegressor::builder()
                    .lambda(best.lambda)
                    .alpha(best.alpha)
                    .build()
                    .fit(x, y)?;
                ScanModel::ElasticNet(fitted)
            }
        };

        Ok(ScanResult {
            best_lambda: best.lambda,
            best_alpha: best.alpha,
            best_rmse: best.rmse,
            table,
            model,
        })
    }
}
