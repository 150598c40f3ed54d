//! Model stacking.

mod stacking;

pub use stacking::{BaseModel, EnsembleError, FittedBase, FittedStacking, StackingRegressor};
