//! Closed-form proximal references.

use prox_core::math::linalg::squared_distance;

use crate::error::ObjectiveError;

/// Objective with a known pointwise value and proximal operator.
///
/// Used to check Monte Carlo estimates against ground truth.
pub trait ProximalReference {
    /// Objective value at a single point.
    fn value(&self, y: &[f64]) -> f64;

    /// Exact `prox_{tf}(x)`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectiveError::InvalidStep` if `t` is not positive and
    /// finite, and implementation-specific errors otherwise.
    fn prox(&self, x: &[f64], t: f64) -> Result<Vec<f64>, ObjectiveError>;

    /// Exact Moreau envelope `f(p) + ‖p − x‖² / (2t)` with `p = prox_{tf}(x)`.
    fn envelope(&self, x: &[f64], t: f64) -> Result<f64, ObjectiveError> {
        let p = self.prox(x, t)?;
        Ok(self.value(&p) + squared_distance(&p, x) / (2.0 * t))
    }
}

pub(crate) fn check_step(t: f64) -> Result<(), ObjectiveError> {
    if t.is_finite() && t > 0.0 {
        Ok(())
    } else {
        Err(ObjectiveError::InvalidStep(t))
    }
}
