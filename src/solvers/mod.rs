//! Regression solvers implementing various estimation methods.

mod elastic_net;
mod knn;
mod ols;
mod ridge;
mod traits;

pub use elastic_net::{ElasticNetRegressor, ElasticNetRegressorBuilder, FittedElasticNet};
pub use knn::{FittedKnn, KnnRegressor, KnnRegressorBuilder, KnnWeighting};
pub use ols::{FittedOls, OlsRegressor, OlsRegressorBuilder};
pub use ridge::{FittedRidge, RidgeRegressor, RidgeRegressorBuilder};
pub use traits::{FittedRegressor, RegressionError, Regressor};
