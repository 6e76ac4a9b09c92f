//! Additive Gaussian observation noise.

use prox_core::traits::BatchObjective;
use prox_core::types::{Device, Matrix};
use prox_engine::rng::ProxRng;

use crate::error::ObjectiveError;
use crate::quadratic::Quadratic;
use crate::reference::ProximalReference;
use crate::{L1Norm, LogBarrier};

/// Noise level of [`Noisy::l1_norm`].
pub const L1_NOISE: f64 = 0.1;
/// Noise level of [`Noisy::quadratic`].
pub const QUADRATIC_NOISE: f64 = 0.05;
/// Noise level of [`Noisy::log_barrier`].
pub const LOG_BARRIER_NOISE: f64 = 0.1;

/// `f(y) + ε`, `ε ~ N(0, σ²)` drawn independently for every row and call.
///
/// The noise has zero mean, so the closed-form reference is that of the
/// wrapped objective.
///
/// # Examples
///
/// ```rust
/// use prox_core::traits::BatchObjective;
/// use prox_core::types::{Device, Matrix};
/// use prox_objectives::Noisy;
///
/// let mut f = Noisy::l1_norm(42);
/// let batch = Matrix::from_rows(&[vec![1.0], vec![1.0]]).unwrap();
/// let values = f.evaluate(&batch, &Device::cpu());
/// assert_ne!(values[0], values[1]);
/// ```
#[derive(Clone, Debug)]
pub struct Noisy<O> {
    inner: O,
    sigma: f64,
    rng: ProxRng,
}

impl<O> Noisy<O> {
    /// Wraps `inner` with noise of standard deviation `sigma`.
    ///
    /// # Errors
    ///
    /// Returns `ObjectiveError::InvalidNoise` if `sigma` is negative or
    /// non-finite.
    pub fn new(inner: O, sigma: f64, seed: u64) -> Result<Self, ObjectiveError> {
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(ObjectiveError::InvalidNoise(sigma));
        }
        Ok(Self {
            inner,
            sigma,
            rng: ProxRng::from_seed(seed),
        })
    }

    /// Noise standard deviation.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Wrapped objective.
    #[inline]
    pub fn inner(&self) -> &O {
        &self.inner
    }

    fn with_preset(inner: O, sigma: f64, seed: u64) -> Self {
        Self {
            inner,
            sigma,
            rng: ProxRng::from_seed(seed),
        }
    }
}

impl Noisy<L1Norm> {
    /// ℓ1 norm with `σ = 0.1`.
    pub fn l1_norm(seed: u64) -> Self {
        Self::with_preset(L1Norm, L1_NOISE, seed)
    }
}

impl Noisy<Quadratic> {
    /// Quadratic with `σ = 0.05`.
    pub fn quadratic(inner: Quadratic, seed: u64) -> Self {
        Self::with_preset(inner, QUADRATIC_NOISE, seed)
    }
}

impl Noisy<LogBarrier> {
    /// Log barrier with `σ = 0.1`.
    pub fn log_barrier(seed: u64) -> Self {
        Self::with_preset(LogBarrier, LOG_BARRIER_NOISE, seed)
    }
}

impl<O: BatchObjective> BatchObjective for Noisy<O> {
    fn evaluate(&mut self, samples: &Matrix, device: &Device) -> Vec<f64> {
        let mut values = self.inner.evaluate(samples, device);
        for v in &mut values {
            *v += self.sigma * self.rng.gen_normal();
        }
        values
    }
}

impl<O: ProximalReference> ProximalReference for Noisy<O> {
    fn value(&self, y: &[f64]) -> f64 {
        self.inner.value(y)
    }

    fn prox(&self, x: &[f64], t: f64) -> Result<Vec<f64>, ObjectiveError> {
        self.inner.prox(x, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejects_invalid_sigma() {
        for bad in [-0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                Noisy::new(L1Norm, bad, 0),
                Err(ObjectiveError::InvalidNoise(_))
            ));
        }
    }

    #[test]
    fn test_presets() {
        assert_eq!(Noisy::l1_norm(0).sigma(), 0.1);
        assert_eq!(Noisy::quadratic(Quadratic::identity(2), 0).sigma(), 0.05);
        assert_eq!(Noisy::log_barrier(0).sigma(), 0.1);
    }

    #[test]
    fn test_zero_sigma_is_exact() {
        let mut f = Noisy::new(L1Norm, 0.0, 3).unwrap();
        let batch = Matrix::from_rows(&[vec![1.0, -1.0]]).unwrap();
        assert_eq!(f.evaluate(&batch, &Device::cpu()), vec![2.0]);
    }

    #[test]
    fn test_noise_moments() {
        let mut f = Noisy::l1_norm(9);
        let batch = Matrix::zeros(20_000, 1);
        let values = f.evaluate(&batch, &Device::cpu());

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);

        assert!(mean.abs() < 0.005, "mean {}", mean);
        assert_relative_eq!(var.sqrt(), 0.1, max_relative = 0.05);
    }

    #[test]
    fn test_same_seed_same_noise() {
        let batch = Matrix::zeros(10, 2);
        let a = Noisy::l1_norm(5).evaluate(&batch, &Device::cpu());
        let b = Noisy::l1_norm(5).evaluate(&batch, &Device::cpu());
        assert_eq!(a, b);
    }

    #[test]
    fn test_reference_ignores_noise() {
        let f = Noisy::l1_norm(0);
        assert_eq!(f.prox(&[2.0], 0.1).unwrap(), L1Norm.prox(&[2.0], 0.1).unwrap());
        assert_eq!(f.value(&[-1.5]), 1.5);
    }
}
