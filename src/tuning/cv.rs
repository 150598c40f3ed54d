//! Cross-validation plumbing.

use crate::solvers::{FittedRegressor, RegressionError, Regressor};
use faer::{Col, Mat};
use log::debug;
use nanorand::{Rng, WyRand};
use thiserror::Error;

/// Errors from cross-validation and hyperparameter search.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("fold count must be between 2 and the row count, got k = {k} for {n} rows")]
    InvalidFolds { k: usize, n: usize },

    #[error("test fraction must lie strictly between 0 and 1, got {0}")]
    InvalidTestFraction(f64),

    #[error("hyperparameter grid is empty")]
    EmptyGrid,

    #[error("at least one trial is required")]
    NoTrials,

    #[error("parameter range low bound {low} must be below high bound {high}")]
    InvalidRange { low: f64, high: f64 },

    #[error("log-scale range requires positive bounds, got [{low}, {high}]")]
    NonPositiveLogRange { low: f64, high: f64 },

    #[error("model fit failed during cross-validation: {0}")]
    Fit(#[from] RegressionError),
}

/// k-fold splitter over row indices, optionally shuffled with a fixed seed.
#[derive(Debug, Clone)]
pub struct KFold {
    k: usize,
    shuffle: bool,
    seed: Option<u64>,
}

impl KFold {
    /// Create an unshuffled splitter with `k` folds.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            shuffle: false,
            seed: None,
        }
    }

    /// Create a shuffled splitter. Pass a seed for reproducible folds.
    pub fn shuffled(k: usize, seed: Option<u64>) -> Self {
        Self {
            k,
            shuffle: true,
            seed,
        }
    }

    /// Number of folds.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Produce `(train, test)` index pairs covering `0..n`. The folds are
    /// disjoint and their union is the full index range; the first `n % k`
    /// folds are one element larger.
    pub fn split(&self, n: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>, TuningError> {
        if self.k < 2 || self.k > n {
            return Err(TuningError::InvalidFolds { k: self.k, n });
        }

        let mut indices: Vec<usize> = (0..n).collect();
        if self.shuffle {
            shuffle_in_place(&mut indices, self.seed);
        }

        let base = n / self.k;
        let extra = n % self.k;

        let mut splits = Vec::with_capacity(self.k);
        let mut offset = 0;
        for fold in 0..self.k {
            let size = base + usize::from(fold < extra);
            let test: Vec<usize> = indices[offset..offset + size].to_vec();
            let train: Vec<usize> = indices[..offset]
                .iter()
                .chain(indices[offset + size..].iter())
                .copied()
                .collect();
            splits.push((train, test));
            offset += size;
        }

        Ok(splits)
    }
}

/// Split `0..n` into shuffled train and test index sets.
pub fn train_test_split(
    n: usize,
    test_fraction: f64,
    seed: Option<u64>,
) -> Result<(Vec<usize>, Vec<usize>), TuningError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TuningError::InvalidTestFraction(test_fraction));
    }

    if n < 2 {
        return Err(TuningError::InvalidFolds { k: 2, n });
    }
    let n_test = ((n as f64 * test_fraction).round() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    shuffle_in_place(&mut indices, seed);

    let test = indices[..n_test].to_vec();
    let train = indices[n_test..].to_vec();
    Ok((train, test))
}

/// Mean out-of-fold RMSE of a model over k folds.
pub fn cross_val_rmse<R: Regressor>(
    model: &R,
    x: &Mat<f64>,
    y: &Col<f64>,
    folds: &KFold,
) -> Result<f64, TuningError> {
    let splits = folds.split(x.nrows())?;
    let mut rmse_sum = 0.0;

    for (fold, (train, test)) in splits.iter().enumerate() {
        let (x_train, y_train) = gather_rows(x, y, train);
        let (x_test, y_test) = gather_rows(x, y, test);

        let fitted = model.fit(&x_train, &y_train)?;
        let predictions = fitted.predict(&x_test);

        let sse: f64 = (0..y_test.nrows())
            .map(|i| (y_test[i] - predictions[i]).powi(2))
            .sum();
        let rmse = (sse / y_test.nrows() as f64).sqrt();
        debug!("cv fold {}: rmse = {:.6}", fold, rmse);
        rmse_sum += rmse;
    }

    Ok(rmse_sum / splits.len() as f64)
}

/// Copy the given rows of `x` and `y` into fresh containers.
pub(crate) fn gather_rows(x: &Mat<f64>, y: &Col<f64>, rows: &[usize]) -> (Mat<f64>, Col<f64>) {
    let x_sub = Mat::from_fn(rows.len(), x.ncols(), |i, j| x[(rows[i], j)]);
    let y_sub = Col::from_fn(rows.len(), |i| y[rows[i]]);
    (x_sub, y_sub)
}

/// Fisher-Yates with an optionally seeded WyRand.
fn shuffle_in_place(indices: &mut [usize], seed: Option<u64>) {
    let mut rng = match seed {
        Some(seed) => WyRand::new_seed(seed),
        None => WyRand::new(),
    };
    for i in (1..indices.len()).rev() {
        let j = rng.generate_range(0..=i);
        indices.swap(i, j);
    }
}
