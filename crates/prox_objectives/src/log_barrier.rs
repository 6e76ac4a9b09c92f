//! Logarithmic barrier of the positive orthant.

use prox_core::traits::BatchObjective;
use prox_core::types::{Device, Matrix};

use crate::error::ObjectiveError;
use crate::reference::{check_step, ProximalReference};

/// `f(y) = −Σ ln y_i`, `+∞` outside the open positive orthant.
///
/// The proximal is `½(x + √(x² + 4t))` componentwise, which is always
/// strictly positive.
///
/// `f` is unbounded below; wrap it in [`Shifted`](crate::Shifted) when the
/// sampled region reaches values above one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogBarrier;

impl BatchObjective for LogBarrier {
    fn evaluate(&mut self, samples: &Matrix, _device: &Device) -> Vec<f64> {
        samples.map_rows(|y| self.value(y))
    }
}

impl ProximalReference for LogBarrier {
    fn value(&self, y: &[f64]) -> f64 {
        if y.iter().any(|&v| !(v > 0.0)) {
            return f64::INFINITY;
        }
        -y.iter().map(|v| v.ln()).sum::<f64>()
    }

    fn prox(&self, x: &[f64], t: f64) -> Result<Vec<f64>, ObjectiveError> {
        check_step(t)?;
        Ok(x.iter()
            .map(|&v| 0.5 * (v + (v * v + 4.0 * t).sqrt()))
            .collect())
    }
}
