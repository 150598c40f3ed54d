//! Out-of-fold stacking with an OLS meta-learner.

use crate::core::{IntervalType, PredictionResult, RegressionResult};
use crate::solvers::{
    ElasticNetRegressor, FittedElasticNet, FittedKnn, FittedOls, FittedRegressor, FittedRidge,
    KnnRegressor, OlsRegressor, RegressionError, Regressor, RidgeRegressor,
};
use crate::tuning::{gather_rows, KFold, TuningError};
use faer::{Col, Mat};
use log::debug;
use thiserror::Error;

/// Errors from ensemble fitting.
#[derive(Debug, Error)]
pub enum EnsembleError {
    #[error("stacking requires at least one base model")]
    NoBaseModels,

    #[error(transparent)]
    Tuning(#[from] TuningError),

    #[error("base model fit failed: {0}")]
    Fit(#[from] RegressionError),
}

/// A base estimator for the stack. The `Regressor` trait has an associated
/// fitted type, so heterogeneous model lists go through this enum.
#[derive(Debug, Clone)]
pub enum BaseModel {
    Ols(OlsRegressor),
    Ridge(RidgeRegressor),
    ElasticNet(ElasticNetRegressor),
    Knn(KnnRegressor),
}

impl BaseModel {
    fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<FittedBase, RegressionError> {
        Ok(match self {
            BaseModel::Ols(m) => FittedBase::Ols(m.fit(x, y)?),
            BaseModel::Ridge(m) => FittedBase::Ridge(m.fit(x, y)?),
            BaseModel::ElasticNet(m) => FittedBase::ElasticNet(m.fit(x, y)?),
            BaseModel::Knn(m) => FittedBase::Knn(m.fit(x, y)?),
        })
    }
}

/// A fitted base estimator.
#[derive(Debug, Clone)]
pub enum FittedBase {
    Ols(FittedOls),
    Ridge(FittedRidge),
    ElasticNet(FittedElasticNet),
    Knn(FittedKnn),
}

impl FittedBase {
    /// Point predictions from the base estimator.
    pub fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        match self {
            FittedBase::Ols(m) => m.predict(x),
            FittedBase::Ridge(m) => m.predict(x),
            FittedBase::ElasticNet(m) => m.predict(x),
            FittedBase::Knn(m) => m.predict(x),
        }
    }

    /// Regression results of the base estimator.
    pub fn result(&self) -> &RegressionResult {
        match self {
            FittedBase::Ols(m) => m.result(),
            FittedBase::Ridge(m) => m.result(),
            FittedBase::ElasticNet(m) => m.result(),
            FittedBase::Knn(m) => m.result(),
        }
    }
}

/// Stacking ensemble: base models feed an OLS meta-learner.
///
/// Fitting computes out-of-fold predictions of every base model, fits the
/// meta-learner on the resulting n × m matrix, then refits each base model on
/// the full data. The out-of-fold step keeps the meta-learner from rewarding
/// base models that overfit the training sample.
#[derive(Debug, Clone)]
pub struct StackingRegressor {
    base_models: Vec<BaseModel>,
    folds: KFold,
}

impl StackingRegressor {
    /// Create a stack with 5 unshuffled folds.
    pub fn new(base_models: Vec<BaseModel>) -> Self {
        Self {
            base_models,
            folds: KFold::new(5),
        }
    }

    /// Replace the fold splitter for the out-of-fold step.
    pub fn folds(mut self, folds: KFold) -> Self {
        self.folds = folds;
        self
    }

    /// Fit the ensemble.
    pub fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<FittedStacking, EnsembleError> {
        if self.base_models.is_empty() {
            return Err(EnsembleError::NoBaseModels);
        }

        let n = x.nrows();
        let m = self.base_models.len();
        let splits = self.folds.split(n)?;

        // Out-of-fold meta-features: row i of column j is base model j's
        // prediction for row i from the fold where i was held out.
        let mut meta_features: Mat<f64> = Mat::zeros(n, m);
        for (j, base) in self.base_models.iter().enumerate() {
            for (train, test) in &splits {
                let (x_train, y_train) = gather_rows(x, y, train);
                let fitted = base.fit(&x_train, &y_train)?;

                let x_test = Mat::from_fn(test.len(), x.ncols(), |i, c| x[(test[i], c)]);
                let predictions = fitted.predict(&x_test);
                for (i, &row) in test.iter().enumerate() {
                    meta_features[(row, j)] = predictions[i];
                }
            }
            debug!("stacking: out-of-fold predictions done for base model {}", j);
        }

        let meta_learner = OlsRegressor::builder()
            .with_intercept(true)
            .compute_inference(true)
            .build()
            .fit(&meta_features, y)?;

        let fitted_bases = self
            .base_models
            .iter()
            .map(|base| base.fit(x, y))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(FittedStacking {
            bases: fitted_bases,
            meta: meta_learner,
        })
    }
}

/// A fitted stacking ensemble.
#[derive(Debug, Clone)]
pub struct FittedStacking {
    bases: Vec<FittedBase>,
    meta: FittedOls,
}

impl FittedStacking {
    /// The fitted base models, refit on the full data.
    pub fn base_models(&self) -> &[FittedBase] {
        &self.bases
    }

    /// The OLS meta-learner fitted on out-of-fold predictions.
    pub fn meta_learner(&self) -> &FittedOls {
        &self.meta
    }

    fn meta_features(&self, x: &Mat<f64>) -> Mat<f64> {
        let mut features = Mat::zeros(x.nrows(), self.bases.len());
        for (j, base) in self.bases.iter().enumerate() {
            let predictions = base.predict(x);
            for i in 0..x.nrows() {
                features[(i, j)] = predictions[i];
            }
        }
        features
    }

    /// Predict by feeding base-model predictions through the meta-learner.
    pub fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        self.meta.predict(&self.meta_features(x))
    }

    /// Predict with intervals from the meta-learner.
    pub fn predict_with_interval(
        &self,
        x: &Mat<f64>,
        interval: Option<IntervalType>,
        level: f64,
    ) -> PredictionResult {
        self.meta
            .predict_with_interval(&self.meta_features(x), interval, level)
    }

    /// R² of the stack on new data.
    pub fn score(&self, x: &Mat<f64>, y: &Col<f64>) -> f64 {
        self.meta.score(&self.meta_features(x), y)
    }
}
