//! Constant offset.

use prox_core::traits::BatchObjective;
use prox_core::types::{Device, Matrix};

use crate::error::ObjectiveError;
use crate::reference::ProximalReference;

/// `f(y) + offset`.
///
/// The proximal is unchanged; the envelope shifts by `offset`. Use it to
/// lift a function that is bounded below into the non-negative range the
/// estimator expects.
///
/// # Examples
///
/// ```rust
/// use prox_objectives::{LogBarrier, ProximalReference, Shifted};
///
/// let f = Shifted::new(LogBarrier, 5.0);
/// assert_eq!(f.value(&[1.0]), 5.0);
/// assert_eq!(f.prox(&[1.0], 0.1).unwrap(), LogBarrier.prox(&[1.0], 0.1).unwrap());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Shifted<O> {
    inner: O,
    offset: f64,
}

impl<O> Shifted<O> {
    /// Wraps `inner`, adding `offset` to every value.
    pub fn new(inner: O, offset: f64) -> Self {
        Self { inner, offset }
    }

    /// The constant added to every value.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Wrapped objective.
    #[inline]
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: BatchObjective> BatchObjective for Shifted<O> {
    fn evaluate(&mut self, samples: &Matrix, device: &Device) -> Vec<f64> {
        let mut values = self.inner.evaluate(samples, device);
        for v in &mut values {
            *v += self.offset;
        }
        values
    }
}

impl<O: ProximalReference> ProximalReference for Shifted<O> {
    fn value(&self, y: &[f64]) -> f64 {
        self.inner.value(y) + self.offset
    }

    fn prox(&self, x: &[f64], t: f64) -> Result<Vec<f64>, ObjectiveError> {
        self.inner.prox(x, t)
    }
}
