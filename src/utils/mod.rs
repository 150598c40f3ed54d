//! Matrix and linear-algebra utilities shared across the crate.

mod linalg;
mod matrix;

pub use linalg::{invert_symmetric, solve_upper_triangular};
pub use matrix::{augment_with_intercept, center_columns, center_vector, detect_constant_columns};
