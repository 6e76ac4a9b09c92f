//! ℓ1 norm.

use prox_core::traits::BatchObjective;
use prox_core::types::{Device, Matrix};

use crate::error::ObjectiveError;
use crate::reference::{check_step, ProximalReference};

/// `f(y) = ‖y‖₁`.
///
/// The proximal is the soft-threshold `sign(x) · max(|x| − t, 0)` and the
/// envelope is the Huber function.
///
/// # Examples
///
/// ```rust
/// use prox_objectives::{L1Norm, ProximalReference};
///
/// let p = L1Norm.prox(&[2.0, -0.05], 0.1).unwrap();
/// assert!((p[0] - 1.9).abs() < 1e-12);
/// assert_eq!(p[1], 0.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct L1Norm;

impl BatchObjective for L1Norm {
    fn evaluate(&mut self, samples: &Matrix, _device: &Device) -> Vec<f64> {
        samples.map_rows(|y| self.value(y))
    }
}

impl ProximalReference for L1Norm {
    fn value(&self, y: &[f64]) -> f64 {
        y.iter().map(|v| v.abs()).sum()
    }

    fn prox(&self, x: &[f64], t: f64) -> Result<Vec<f64>, ObjectiveError> {
        check_step(t)?;
        Ok(x.iter()
            .map(|&v| v.signum() * (v.abs() - t).max(0.0))
            .collect())
    }
}
