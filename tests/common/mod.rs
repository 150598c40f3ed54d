//! Common test utilities and data generators.

#![allow(dead_code)]

use faer::{Col, Mat};
use stepreg::Dataset;

/// Deterministic pseudo-random value in [-1, 1].
fn next_rand(state: &mut u64) -> f64 {
    *state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
    ((*state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
}

/// Generate linear data: y = X * beta + intercept + noise, with
/// beta_j = j + 1.
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Col<f64>) {
    let mut state = seed;

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);
    let true_coefficients = Col::from_fn(n_features, |j| (j + 1) as f64);

    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = next_rand(&mut state);
            yi += x[(i, j)] * true_coefficients[j];
        }
        y[i] = yi + noise_std * next_rand(&mut state);
    }

    (x, y, true_coefficients)
}

/// A dataset where only the first `n_informative` columns drive the
/// response; the rest are pure noise.
pub fn generate_selection_data(
    n_samples: usize,
    n_informative: usize,
    n_noise: usize,
    seed: u64,
) -> Dataset {
    let mut state = seed;
    let n_features = n_informative + n_noise;

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        let mut yi = 1.0;
        for j in 0..n_features {
            x[(i, j)] = next_rand(&mut state);
            if j < n_informative {
                yi += (j + 2) as f64 * x[(i, j)];
            }
        }
        y[i] = yi + 0.01 * next_rand(&mut state);
    }

    let names: Vec<String> = (0..n_features)
        .map(|j| {
            if j < n_informative {
                format!("real{}", j)
            } else {
                format!("zz_noise{}", j - n_informative)
            }
        })
        .collect();

    Dataset::new(x, y, names).expect("generated data is valid")
}

/// Generate data with one column perfectly collinear with another.
pub fn generate_collinear_data(n_samples: usize) -> (Mat<f64>, Col<f64>) {
    let mut x = Mat::zeros(n_samples, 3);
    let mut y = Col::zeros(n_samples);

    for i in 0..n_samples {
        x[(i, 0)] = i as f64;
        x[(i, 1)] = 2.0 * i as f64;
        x[(i, 2)] = (i * i) as f64;
        y[i] = 1.0 + 2.0 * x[(i, 0)] + 3.0 * x[(i, 2)];
    }

    (x, y)
}
