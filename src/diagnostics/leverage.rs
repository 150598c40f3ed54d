//! Leverage (hat-matrix diagonal).

use crate::utils::augment_with_intercept;
use faer::{Col, Mat};

/// Diagonal of the hat matrix H = X(X'X)⁻¹X'.
///
/// Computed from the thin QR factorization: H = QQ', so h_ii is the squared
/// norm of row i of Q. h_ii ∈ [0, 1] and Σ h_ii equals the parameter count.
pub fn compute_leverage(x: &Mat<f64>, with_intercept: bool) -> Col<f64> {
    let design = if with_intercept {
        augment_with_intercept(x)
    } else {
        x.clone()
    };

    let qr: faer::linalg::solvers::Qr<f64> = design.qr();
    let q = qr.compute_Q();
    let p = design.ncols().min(design.nrows());

    Col::from_fn(design.nrows(), |i| {
        (0..p).map(|j| q[(i, j)] * q[(i, j)]).sum::<f64>()
    })
}

/// Indices of observations with leverage above the threshold. The default
/// cutoff is the conventional 2p/n.
pub fn high_leverage_points(
    leverage: &Col<f64>,
    n_params: usize,
    threshold: Option<f64>,
) -> Vec<usize> {
    let n = leverage.nrows();
    let cutoff = threshold.unwrap_or(2.0 * n_params as f64 / n as f64);

    leverage
        .iter()
        .enumerate()
        .filter(|(_, &h)| h > cutoff)
        .map(|(i, _)| i)
        .collect()
}
