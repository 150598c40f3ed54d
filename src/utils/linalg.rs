//! QR-based inversion and triangular solves.

use faer::{Col, Mat};

/// Solve R x = b by back-substitution, where R is upper triangular.
///
/// Returns `None` if a diagonal element is (numerically) zero.
pub fn solve_upper_triangular(r: &Mat<f64>, b: &Col<f64>, tolerance: f64) -> Option<Col<f64>> {
    let n = b.nrows();
    let mut x = Col::zeros(n);

    for i in (0..n).rev() {
        if r[(i, i)].abs() < tolerance {
            return None;
        }
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= r[(i, j)] * x[j];
        }
        x[i] = sum / r[(i, i)];
    }

    Some(x)
}

/// Invert a symmetric positive (semi-)definite matrix via QR decomposition.
///
/// Returns `None` if the matrix is singular at the given tolerance. Used for
/// (X'X)⁻¹ and its regularized variants.
pub fn invert_symmetric(matrix: &Mat<f64>, tolerance: f64) -> Option<Mat<f64>> {
    let n = matrix.nrows();

    let qr: faer::linalg::solvers::Qr<f64> = matrix.qr();
    let q = qr.compute_Q();
    let r = qr.R();

    for i in 0..n {
        if r[(i, i)].abs() < tolerance {
            return None;
        }
    }

    let qt = q.transpose();
    let mut inv = Mat::zeros(n, n);

    // Solve R * inv_col = Q' * e_col for each column of the identity.
    for col in 0..n {
        for i in (0..n).rev() {
            let mut sum = qt[(i, col)];
            for j in (i + 1)..n {
                sum -= r[(i, j)] * inv[(j, col)];
            }
            inv[(i, col)] = sum / r[(i, i)];
        }
    }

    Some(inv)
}
