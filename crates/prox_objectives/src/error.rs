//! Objective construction and reference evaluation errors.

use thiserror::Error;

/// Errors from building an objective or evaluating its closed-form reference.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ObjectiveError {
    /// The quadratic form matrix is not square.
    #[error("Matrix must be square: got {rows}x{cols}")]
    NotSquare {
        /// Rows of the offending matrix.
        rows: usize,
        /// Columns of the offending matrix.
        cols: usize,
    },

    /// A vector does not match the objective's dimension.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Dimension of the objective.
        expected: usize,
        /// Dimension supplied.
        got: usize,
    },

    /// `I + tA` is not numerically positive definite.
    #[error("Proximal system is not positive definite at t = {t}")]
    NotPositiveDefinite {
        /// Step size at which the factorisation failed.
        t: f64,
    },

    /// The reference step size is not positive and finite.
    #[error("Invalid step size: {0}")]
    InvalidStep(f64),

    /// A noise level is negative or non-finite.
    #[error("Invalid noise level: {0}")]
    InvalidNoise(f64),
}
