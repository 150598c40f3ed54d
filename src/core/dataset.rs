//! Named design matrix and response with construction-time validation.

use faer::{Col, Mat};
use thiserror::Error;

/// Errors raised when constructing or querying a [`Dataset`].
///
/// All of these are user-facing validation failures: the inputs are malformed
/// and no model can be fit from them.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dimension mismatch: X has {x_rows} rows but y has {y_len} elements")]
    ShapeMismatch { x_rows: usize, y_len: usize },

    #[error("expected {n_cols} column names, got {n_names}")]
    NameCountMismatch { n_cols: usize, n_names: usize },

    #[error("dataset has no rows")]
    Empty,

    #[error("column {name:?} contains a non-finite value at row {row}")]
    NonFiniteValue { name: String, row: usize },

    #[error("response contains a non-finite value at row {row}")]
    NonFiniteResponse { row: usize },

    #[error("column name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("column name at position {0} is empty")]
    EmptyName(usize),
}

/// A design matrix with named predictor columns and a numeric response.
///
/// Construction validates the invariants the search procedures rely on:
/// matching row counts, finite values everywhere, and non-empty, unique
/// column names. A `Dataset` that exists is safe to fit.
#[derive(Debug, Clone)]
pub struct Dataset {
    x: Mat<f64>,
    y: Col<f64>,
    names: Vec<String>,
}

impl Dataset {
    /// Create a validated dataset from a design matrix, response, and column names.
    pub fn new(x: Mat<f64>, y: Col<f64>, names: Vec<String>) -> Result<Self, DataError> {
        if x.nrows() != y.nrows() {
            return Err(DataError::ShapeMismatch {
                x_rows: x.nrows(),
                y_len: y.nrows(),
            });
        }
        if names.len() != x.ncols() {
            return Err(DataError::NameCountMismatch {
                n_cols: x.ncols(),
                n_names: names.len(),
            });
        }
        if x.nrows() == 0 {
            return Err(DataError::Empty);
        }

        for (j, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(DataError::EmptyName(j));
            }
            if names[..j].contains(name) {
                return Err(DataError::DuplicateName(name.clone()));
            }
        }

        for j in 0..x.ncols() {
            for i in 0..x.nrows() {
                if !x[(i, j)].is_finite() {
                    return Err(DataError::NonFiniteValue {
                        name: names[j].clone(),
                        row: i,
                    });
                }
            }
        }
        for i in 0..y.nrows() {
            if !y[i].is_finite() {
                return Err(DataError::NonFiniteResponse { row: i });
            }
        }

        Ok(Self { x, y, names })
    }

    /// Number of observations.
    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    /// Number of predictor columns.
    pub fn n_cols(&self) -> usize {
        self.x.ncols()
    }

    /// The full design matrix.
    pub fn x(&self) -> &Mat<f64> {
        &self.x
    }

    /// The response vector.
    pub fn y(&self) -> &Col<f64> {
        &self.y
    }

    /// The predictor column names, in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Extract the given columns (by index) into a new matrix, in the given order.
    pub fn subset(&self, columns: &[usize]) -> Mat<f64> {
        Mat::from_fn(self.x.nrows(), columns.len(), |i, k| {
            self.x[(i, columns[k])]
        })
    }

    /// Column indices sorted by name, lexicographically.
    ///
    /// The search procedures iterate candidates in this order so that
    /// criterion ties resolve to the lexicographically first name.
    pub fn sorted_column_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.names.len()).collect();
        order.sort_by(|&a, &b| self.names[a].cmp(&self.names[b]));
        order
    }

    /// Detect indicator (dummy) columns: every value is 0 or 1.
    ///
    /// Stepwise selection rejects these because dropping a single level of a
    /// categorical encoding produces a meaningless model.
    pub fn indicator_columns(&self) -> Vec<usize> {
        let tol = 1e-12;
        (0..self.x.ncols())
            .filter(|&j| {
                (0..self.x.nrows()).all(|i| {
                    let v = self.x[(i, j)];
                    v.abs() < tol || (v - 1.0).abs() < tol
                })
            })
            .collect()
    }
}
