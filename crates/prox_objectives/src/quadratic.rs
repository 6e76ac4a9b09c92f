//! Convex quadratic.

use prox_core::math::linalg::{dot, mat_vec, solve_spd};
use prox_core::traits::BatchObjective;
use prox_core::types::{Device, Matrix};

use crate::error::ObjectiveError;
use crate::reference::{check_step, ProximalReference};

/// `f(y) = ½ yᵀAy + bᵀy + c`.
///
/// The proximal solves `(I + tA) p = x − t b`, factorised by Cholesky, so `A`
/// must be symmetric positive semidefinite for the reference to exist.
///
/// # Examples
///
/// ```rust
/// use prox_objectives::{ProximalReference, Quadratic};
///
/// // ½‖y‖²: prox_t(x) = x / (1 + t)
/// let f = Quadratic::identity(2);
/// let p = f.prox(&[3.0, 4.0], 1.0).unwrap();
/// assert!((p[0] - 1.5).abs() < 1e-12);
/// assert!((p[1] - 2.0).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Quadratic {
    a: Matrix,
    b: Vec<f64>,
    c: f64,
}

impl Quadratic {
    /// Creates the quadratic from its coefficients.
    ///
    /// # Errors
    ///
    /// - `ObjectiveError::NotSquare` if `a` is not square or is empty
    /// - `ObjectiveError::DimensionMismatch` if `b` does not match `a`
    pub fn new(a: Matrix, b: Vec<f64>, c: f64) -> Result<Self, ObjectiveError> {
        if a.rows() != a.cols() || a.rows() == 0 {
            return Err(ObjectiveError::NotSquare {
                rows: a.rows(),
                cols: a.cols(),
            });
        }
        if b.len() != a.rows() {
            return Err(ObjectiveError::DimensionMismatch {
                expected: a.rows(),
                got: b.len(),
            });
        }
        Ok(Self { a, b, c })
    }

    /// `½‖y‖²` in dimension `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn identity(n: usize) -> Self {
        assert!(n > 0, "dimension must be positive");
        let mut a = Matrix::zeros(n, n);
        for i in 0..n {
            a.as_mut_slice()[i * n + i] = 1.0;
        }
        Self {
            a,
            b: vec![0.0; n],
            c: 0.0,
        }
    }

    /// Dimension of the domain.
    #[inline]
    pub fn dim(&self) -> usize {
        self.b.len()
    }

    /// Quadratic form matrix.
    #[inline]
    pub fn a(&self) -> &Matrix {
        &self.a
    }

    /// Linear coefficient.
    #[inline]
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Constant term.
    #[inline]
    pub fn c(&self) -> f64 {
        self.c
    }
}

impl BatchObjective for Quadratic {
    /// # Panics
    ///
    /// Panics if the sample width differs from [`Quadratic::dim`].
    fn evaluate(&mut self, samples: &Matrix, _device: &Device) -> Vec<f64> {
        assert_eq!(samples.cols(), self.dim(), "sample width must match the quadratic");
        samples.map_rows(|y| self.value(y))
    }
}

impl ProximalReference for Quadratic {
    fn value(&self, y: &[f64]) -> f64 {
        0.5 * dot(y, &mat_vec(&self.a, y)) + dot(&self.b, y) + self.c
    }

    fn prox(&self, x: &[f64], t: f64) -> Result<Vec<f64>, ObjectiveError> {
        check_step(t)?;
        let n = self.dim();
        if x.len() != n {
            return Err(ObjectiveError::DimensionMismatch {
                expected: n,
                got: x.len(),
            });
        }

        let mut system = self.a.clone();
        for (k, v) in system.as_mut_slice().iter_mut().enumerate() {
            *v *= t;
            if k % (n + 1) == 0 {
                *v += 1.0;
            }
        }
        let rhs: Vec<f64> = x.iter().zip(&self.b).map(|(xi, bi)| xi - t * bi).collect();

        solve_spd(&system, &rhs).ok_or(ObjectiveError::NotPositiveDefinite { t })
    }
}
