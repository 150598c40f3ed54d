//! Core types: named datasets, options, and result structures.

mod dataset;
mod options;
mod prediction;
mod result;
pub(crate) mod stats;

pub use dataset::{DataError, Dataset};
pub use options::{OptionsError, RegressionOptions, RegressionOptionsBuilder};
pub use prediction::{IntervalType, PredictionResult};
pub use result::RegressionResult;
