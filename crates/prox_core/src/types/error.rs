//! Error types for structured error handling.
//!
//! This module provides:
//! - `ProxError`: Errors from proximal estimation (shape, overflow, convergence)
//! - `ConfigError`: Errors from estimator configuration validation
//!
//! Numerical instability of the importance weights is not an error: it is
//! recovered inside the estimator by shrinking the scale parameter, and only
//! surfaces as [`ProxError::NotConverged`] once the attempt limit is spent.

use thiserror::Error;

/// Configuration error for the proximal estimator.
///
/// These errors occur during construction or at call time when a parameter
/// lies outside its valid range.
///
/// # Examples
/// ```
/// use prox_core::types::ConfigError;
///
/// let err = ConfigError::InvalidSampleCount(0);
/// assert!(format!("{}", err).contains("Invalid sample count 0"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Sample count outside valid range [1, 10_000_000].
    #[error("Invalid sample count {0}: must be in range [1, 10_000_000]")]
    InvalidSampleCount(usize),

    /// Attempt limit of zero.
    #[error("Invalid attempt limit {0}: must be at least 1")]
    InvalidAttemptLimit(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidParameter`].
    pub fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            value: value.into(),
        }
    }
}

/// Categorised proximal estimation errors.
///
/// # Variants
/// - `InvalidPointShape`, `ObjectiveLength`, `DataLength`: shape violations, never retried
/// - `Overflow`: the weighted estimate is non-finite despite passing the stability check
/// - `NotConverged`: the weights stayed degenerate for every allowed attempt
/// - `Config`: a parameter failed validation
///
/// # Examples
/// ```
/// use prox_core::types::ProxError;
///
/// let err = ProxError::InvalidPointShape { rows: 3, cols: 2 };
/// assert!(err.is_shape_error());
/// assert!(format!("{}", err).contains("3 x 2"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProxError {
    /// The input point is not an `n x 1` column vector with `n >= 1`.
    #[error("Input point must be an n x 1 column vector with n >= 1, got {rows} x {cols}")]
    InvalidPointShape {
        /// Number of rows supplied.
        rows: usize,
        /// Number of columns supplied.
        cols: usize,
    },

    /// The objective returned a different number of values than rows evaluated.
    #[error("Objective returned {got} values for a batch of {expected} rows")]
    ObjectiveLength {
        /// Number of rows in the evaluated batch.
        expected: usize,
        /// Number of values returned.
        got: usize,
    },

    /// Flat matrix data does not match the requested shape.
    #[error("Matrix data of length {got} does not fit shape {rows} x {cols}")]
    DataLength {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Length of the supplied data.
        got: usize,
    },

    /// The aggregated estimate is non-finite after a passing stability check.
    #[error("Proximal estimate overflowed after {attempts} attempts (alpha = {alpha})")]
    Overflow {
        /// Attempts consumed, including the overflowing one.
        attempts: usize,
        /// Scale parameter of the overflowing attempt.
        alpha: f64,
    },

    /// Importance weights remained degenerate for every allowed attempt.
    #[error("Importance weights still degenerate after {attempts} attempts (alpha = {alpha})")]
    NotConverged {
        /// Attempts consumed.
        attempts: usize,
        /// Scale parameter of the last attempt.
        alpha: f64,
    },

    /// Configuration or precondition violation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ProxError {
    /// Returns `true` for the shape family of errors.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPointShape { .. } | Self::ObjectiveLength { .. } | Self::DataLength { .. }
        )
    }
}
