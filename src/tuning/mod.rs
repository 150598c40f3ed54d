//! Cross-validation and hyperparameter search.

mod cv;
mod random_search;
mod scan;

pub use cv::{cross_val_rmse, train_test_split, KFold, TuningError};
pub use random_search::{ParamRange, RandomSearch, SearchOutcome, Trial};
pub use scan::{GridPoint, LambdaScan, ScanModel, ScanResult};

pub(crate) use cv::gather_rows;
