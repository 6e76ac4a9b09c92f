//! Small dense linear algebra.
//!
//! Only what the closed-form proximal references need: Cholesky solves of
//! symmetric positive definite systems and a few vector helpers.

use crate::types::Matrix;

/// Pivot magnitude below which the factorisation is treated as singular.
const PIVOT_EPS: f64 = 1e-30;

/// Solves `A x = b` for symmetric positive definite `A` via Cholesky.
///
/// Returns `None` if `A` is not square, does not match `b`, or is not
/// numerically positive definite.
///
/// # Examples
/// ```
/// use prox_core::math::linalg::solve_spd;
/// use prox_core::types::Matrix;
///
/// let a = Matrix::from_rows(&[vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
/// let x = solve_spd(&a, &[1.0, 2.0]).unwrap();
/// assert!((4.0 * x[0] + x[1] - 1.0).abs() < 1e-12);
/// assert!((x[0] + 3.0 * x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_spd(a: &Matrix, b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.shape() != (n, n) {
        return None;
    }

    // A = L L^T, L stored row-major
    let mut l = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a.get(i, j);
            for k in 0..j {
                sum -= l[i * n + k] * l[j * n + k];
            }

            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i * n + j] = sum.sqrt();
            } else {
                if l[j * n + j].abs() < PIVOT_EPS {
                    return None;
                }
                l[i * n + j] = sum / l[j * n + j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i * n + j] * y[j];
        }
        y[i] = sum / l[i * n + i];
    }

    // L^T x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j * n + i] * x[j];
        }
        x[i] = sum / l[i * n + i];
    }

    Some(x)
}

/// `A v` for a square or rectangular `A`.
///
/// # Panics
///
/// Panics if `v.len() != a.cols()`.
pub fn mat_vec(a: &Matrix, v: &[f64]) -> Vec<f64> {
    assert_eq!(a.cols(), v.len(), "dimension mismatch");
    a.iter_rows().map(|row| dot(row, v)).collect()
}

/// Inner product.
#[inline]
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// `‖a − b‖²`.
#[inline]
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
