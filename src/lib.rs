//! Regression-modeling helpers built around stepwise feature selection.
//!
//! This library takes a tabular (X, y) regression problem and returns a
//! fitted model together with a full set of diagnostic statistics. It
//! provides:
//!
//! - **Stepwise feature selection**: forward, backward, and exhaustive
//!   subset search minimizing AIC, BIC, or 1 − adjusted R², plus
//!   p-value-driven backward elimination.
//! - **Solvers**: OLS, Ridge, Lasso/Elastic Net, and k-nearest-neighbour
//!   regression behind a common sklearn-style `Regressor` trait.
//! - **Tuning**: k-fold cross-validation, an automatic λ/α grid scan for
//!   the regularized solvers, and seeded random hyperparameter search.
//! - **Stacking**: an out-of-fold stacking ensemble with an OLS meta-learner.
//! - **Diagnostics**: VIF, leverage, studentized residuals, Cook's distance,
//!   DFFITS, and plotters-based diagnostic charts.
//!
//! # Example
//!
//! ```rust,ignore
//! use stepreg::prelude::*;
//!
//! let data = Dataset::new(x, y, names)?;
//!
//! let result = StepwiseSelector::builder()
//!     .direction(Direction::Forward)
//!     .criterion(Criterion::Aic)
//!     .build()
//!     .select(&data)?;
//!
//! println!("selected: {:?}", result.selected);
//! ```

pub mod core;
pub mod diagnostics;
pub mod ensemble;
pub mod inference;
pub mod plot;
pub mod selection;
pub mod solvers;
pub mod tuning;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::{
        DataError, Dataset, IntervalType, PredictionResult, RegressionOptions,
        RegressionOptionsBuilder, RegressionResult,
    };
    pub use crate::diagnostics::{
        compute_leverage, cooks_distance, dffits, high_leverage_points, high_vif_predictors,
        influential_cooks, influential_dffits, residual_outliers, standardized_residuals,
        studentized_residuals, variance_inflation_factor,
    };
    pub use crate::ensemble::{
        BaseModel, EnsembleError, FittedBase, FittedStacking, StackingRegressor,
    };
    pub use crate::selection::{
        Criterion, Direction, ExhaustiveResult, ExhaustiveSelector, RankedSubset, SelectionError,
        SelectionResult, SelectionStep, SelectionTrace, StepAction, StepwiseSelector,
    };
    pub use crate::solvers::{
        ElasticNetRegressor, FittedElasticNet, FittedKnn, FittedOls, FittedRegressor, FittedRidge,
        KnnRegressor, KnnWeighting, OlsRegressor, RegressionError, Regressor, RidgeRegressor,
    };
    pub use crate::tuning::{
        cross_val_rmse, train_test_split, GridPoint, KFold, LambdaScan, ParamRange, RandomSearch,
        ScanModel, ScanResult, SearchOutcome, Trial, TuningError,
    };
}

pub use crate::core::{Dataset, RegressionOptions, RegressionResult};
pub use crate::selection::{Criterion, Direction, SelectionResult, StepwiseSelector};
pub use crate::solvers::{FittedRegressor, RegressionError, Regressor};
