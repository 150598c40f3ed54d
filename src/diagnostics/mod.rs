//! Model criticism: leverage, residual diagnostics, influence, and VIF.
//!
//! The entry points all operate on quantities a fitted model already
//! carries (residuals, MSE, parameter count) plus the design matrix, so
//! they compose with any solver in the crate.

mod influence;
mod leverage;
mod residuals;
mod vif;

pub use influence::{cooks_distance, dffits, influential_cooks, influential_dffits};
pub use leverage::{compute_leverage, high_leverage_points};
pub use residuals::{
    externally_studentized_residuals, residual_outliers, standardized_residuals,
    studentized_residuals,
};
pub use vif::{high_vif_predictors, variance_inflation_factor};
