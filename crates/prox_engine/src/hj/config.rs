//! Estimator configuration.
//!
//! This module provides [`HjProxConfig`] and its builder. The two stability
//! tests and the two envelope formulas are selectable here instead of living
//! in separate code paths.

use prox_core::types::{ConfigError, Device};

/// Maximum number of Monte Carlo samples per attempt.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Default smoothing scale.
pub const DEFAULT_DELTA: f64 = 0.1;
/// Default Monte Carlo batch size.
pub const DEFAULT_INT_SAMPLES: usize = 1000;
/// Default initial scale parameter.
pub const DEFAULT_ALPHA: f64 = 2.0;
/// Default multiplicative decay of alpha on a stability failure.
pub const DEFAULT_ALPHA_DECAY: f64 = 0.631;
/// Default weight threshold below which a sample counts as underflowed.
pub const DEFAULT_UNDERFLOW_TOL: f64 = 1.0e-6;
/// Default fraction of underflowed samples that triggers a retry.
pub const DEFAULT_TOL_UNDERFLOW: f64 = 0.9;
/// Default attempt limit.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Test deciding whether an attempt's importance weights are usable.
///
/// # Variants
///
/// * `UnderflowFraction` - retry when more than `tol_underflow` of the samples
///   have `exp(z) <= tol`
/// * `NonFiniteWeights` - retry when `softmax(z)` contains a non-finite weight
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StabilityCriterion {
    /// Underflow-fraction test.
    UnderflowFraction {
        /// Weight threshold at or below which a sample counts as underflowed.
        tol: f64,
        /// Largest tolerated fraction of underflowed samples.
        tol_underflow: f64,
    },

    /// Overflow-guard test on the normalised weights.
    NonFiniteWeights,
}

impl Default for StabilityCriterion {
    fn default() -> Self {
        Self::UnderflowFraction {
            tol: DEFAULT_UNDERFLOW_TOL,
            tol_underflow: DEFAULT_TOL_UNDERFLOW,
        }
    }
}

/// Formula for the optional Moreau envelope value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnvelopeFormula {
    /// `-(delta/alpha) · log(mean(exp(z)))` over the accepted batch.
    ///
    /// Costs no extra objective evaluation.
    #[default]
    LogMeanExp,

    /// `f(prox) + ‖prox − x‖² / (2t)`.
    ///
    /// Costs one extra single-row objective evaluation.
    Direct,
}

/// Proximal estimator configuration.
///
/// Immutable configuration; use [`HjProxConfigBuilder`] to construct
/// validated instances.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `delta` | 0.1 | Smoothing scale |
/// | `int_samples` | 1000 | Samples per attempt |
/// | `alpha` | 2.0 | Initial scale parameter |
/// | `alpha_decay` | 0.631 | Shrink factor on retry |
/// | `stability` | underflow fraction (1e-6, 0.9) | Retry test |
/// | `envelope` | log-mean-exp | Envelope formula |
/// | `max_attempts` | 100 | Attempt limit |
/// | `device` | `cpu` | Forwarded to the objective |
///
/// # Examples
///
/// ```rust
/// use prox_engine::hj::{EnvelopeFormula, HjProxConfig, StabilityCriterion};
///
/// let config = HjProxConfig::builder()
///     .delta(0.05)
///     .int_samples(2000)
///     .stability(StabilityCriterion::NonFiniteWeights)
///     .envelope(EnvelopeFormula::Direct)
///     .verbose(true)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.int_samples(), 2000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct HjProxConfig {
    delta: f64,
    int_samples: usize,
    alpha: f64,
    alpha_decay: f64,
    stability: StabilityCriterion,
    envelope: EnvelopeFormula,
    max_attempts: usize,
    device: Device,
    verbose: bool,
    return_samples: bool,
    seed: Option<u64>,
}

impl Default for HjProxConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            int_samples: DEFAULT_INT_SAMPLES,
            alpha: DEFAULT_ALPHA,
            alpha_decay: DEFAULT_ALPHA_DECAY,
            stability: StabilityCriterion::default(),
            envelope: EnvelopeFormula::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            device: Device::default(),
            verbose: false,
            return_samples: false,
            seed: None,
        }
    }
}

impl HjProxConfig {
    /// Creates a new configuration builder seeded with the defaults.
    #[inline]
    pub fn builder() -> HjProxConfigBuilder {
        HjProxConfigBuilder::default()
    }

    /// Builder preset for the overflow-guard formulation: 100 samples,
    /// `alpha = 1`, halving decay, non-finite weight test and direct envelope.
    pub fn overflow_guard_builder() -> HjProxConfigBuilder {
        HjProxConfigBuilder::default()
            .int_samples(100)
            .alpha(1.0)
            .alpha_decay(0.5)
            .stability(StabilityCriterion::NonFiniteWeights)
            .envelope(EnvelopeFormula::Direct)
    }

    /// Smoothing scale.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Samples drawn per attempt.
    #[inline]
    pub fn int_samples(&self) -> usize {
        self.int_samples
    }

    /// Initial scale parameter.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Multiplicative decay applied to alpha on each retry.
    #[inline]
    pub fn alpha_decay(&self) -> f64 {
        self.alpha_decay
    }

    /// Stability test.
    #[inline]
    pub fn stability(&self) -> StabilityCriterion {
        self.stability
    }

    /// Envelope formula.
    #[inline]
    pub fn envelope(&self) -> EnvelopeFormula {
        self.envelope
    }

    /// Maximum number of attempts before giving up.
    #[inline]
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Execution context forwarded to the objective.
    #[inline]
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Whether the envelope value is computed.
    #[inline]
    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the accepted sample batch, weights and alpha are returned.
    #[inline]
    pub fn return_samples(&self) -> bool {
        self.return_samples
    }

    /// Optional RNG seed.
    #[inline]
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns a copy with the RNG seed replaced.
    ///
    /// The seed never affects validity, so no revalidation is needed.
    #[inline]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `delta` or `alpha` is not a positive finite number
    /// - `int_samples` is 0 or greater than 10,000,000
    /// - `alpha_decay` is outside `(0, 1)`
    /// - the underflow thresholds are outside `(0, 1)` and `[0, 1]`
    /// - `max_attempts` is 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(ConfigError::invalid(
                "delta",
                format!("must be positive and finite, got {}", self.delta),
            ));
        }
        if self.int_samples == 0 || self.int_samples > MAX_SAMPLES {
            return Err(ConfigError::InvalidSampleCount(self.int_samples));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(ConfigError::invalid(
                "alpha",
                format!("must be positive and finite, got {}", self.alpha),
            ));
        }
        if !(self.alpha_decay > 0.0 && self.alpha_decay < 1.0) {
            return Err(ConfigError::invalid(
                "alpha_decay",
                format!("must lie in (0, 1), got {}", self.alpha_decay),
            ));
        }
        if let StabilityCriterion::UnderflowFraction { tol, tol_underflow } = self.stability {
            if !(tol > 0.0 && tol < 1.0) {
                return Err(ConfigError::invalid(
                    "tol",
                    format!("must lie in (0, 1), got {}", tol),
                ));
            }
            if !(0.0..=1.0).contains(&tol_underflow) {
                return Err(ConfigError::invalid(
                    "tol_underflow",
                    format!("must lie in [0, 1], got {}", tol_underflow),
                ));
            }
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidAttemptLimit(self.max_attempts));
        }
        Ok(())
    }
}

/// Checks the proximal step size `t`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidParameter` unless `t` is positive and finite.
pub fn validate_time(t: f64) -> Result<(), ConfigError> {
    if t.is_finite() && t > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            "t",
            format!("must be positive and finite, got {}", t),
        ))
    }
}

/// Builder for [`HjProxConfig`].
///
/// Unset fields take the defaults listed on [`HjProxConfig`]; validation
/// happens in [`build`](Self::build).
#[derive(Clone, Debug, Default)]
pub struct HjProxConfigBuilder {
    delta: Option<f64>,
    int_samples: Option<usize>,
    alpha: Option<f64>,
    alpha_decay: Option<f64>,
    stability: Option<StabilityCriterion>,
    envelope: Option<EnvelopeFormula>,
    max_attempts: Option<usize>,
    device: Option<Device>,
    verbose: bool,
    return_samples: bool,
    seed: Option<u64>,
}

impl HjProxConfigBuilder {
    /// Sets the smoothing scale.
    #[inline]
    pub fn delta(mut self, delta: f64) -> Self {
        self.delta = Some(delta);
        self
    }

    /// Sets the number of samples per attempt.
    #[inline]
    pub fn int_samples(mut self, int_samples: usize) -> Self {
        self.int_samples = Some(int_samples);
        self
    }

    /// Sets the initial scale parameter.
    #[inline]
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    /// Sets the decay factor, in `(0, 1)`.
    #[inline]
    pub fn alpha_decay(mut self, alpha_decay: f64) -> Self {
        self.alpha_decay = Some(alpha_decay);
        self
    }

    /// Sets the stability test.
    #[inline]
    pub fn stability(mut self, stability: StabilityCriterion) -> Self {
        self.stability = Some(stability);
        self
    }

    /// Shorthand for the underflow-fraction test with explicit thresholds.
    #[inline]
    pub fn underflow_tolerance(self, tol: f64, tol_underflow: f64) -> Self {
        self.stability(StabilityCriterion::UnderflowFraction { tol, tol_underflow })
    }

    /// Sets the envelope formula.
    #[inline]
    pub fn envelope(mut self, envelope: EnvelopeFormula) -> Self {
        self.envelope = Some(envelope);
        self
    }

    /// Sets the attempt limit.
    #[inline]
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Sets the execution context forwarded to the objective.
    #[inline]
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Requests the envelope value.
    #[inline]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Requests the accepted samples, weights and final alpha.
    #[inline]
    pub fn return_samples(mut self, return_samples: bool) -> Self {
        self.return_samples = return_samples;
        self
    }

    /// Sets the RNG seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any parameter is invalid; see
    /// [`HjProxConfig::validate`].
    pub fn build(self) -> Result<HjProxConfig, ConfigError> {
        let config = HjProxConfig {
            delta: self.delta.unwrap_or(DEFAULT_DELTA),
            int_samples: self.int_samples.unwrap_or(DEFAULT_INT_SAMPLES),
            alpha: self.alpha.unwrap_or(DEFAULT_ALPHA),
            alpha_decay: self.alpha_decay.unwrap_or(DEFAULT_ALPHA_DECAY),
            stability: self.stability.unwrap_or_default(),
            envelope: self.envelope.unwrap_or_default(),
            max_attempts: self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            device: self.device.unwrap_or_default(),
            verbose: self.verbose,
            return_samples: self.return_samples,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HjProxConfig::builder().build().unwrap();
        assert_eq!(config, HjProxConfig::default());
        assert_eq!(config.delta(), 0.1);
        assert_eq!(config.int_samples(), 1000);
        assert_eq!(config.alpha(), 2.0);
        assert_eq!(config.alpha_decay(), 0.631);
        assert_eq!(config.max_attempts(), 100);
        assert_eq!(config.device().name(), "cpu");
        assert_eq!(config.envelope(), EnvelopeFormula::LogMeanExp);
        assert!(matches!(
            config.stability(),
            StabilityCriterion::UnderflowFraction { tol, tol_underflow }
                if tol == 1e-6 && tol_underflow == 0.9
        ));
        assert!(!config.verbose());
        assert!(!config.return_samples());
        assert_eq!(config.seed(), None);
    }

    #[test]
    fn test_overflow_guard_preset() {
        let config = HjProxConfig::overflow_guard_builder().build().unwrap();
        assert_eq!(config.int_samples(), 100);
        assert_eq!(config.alpha(), 1.0);
        assert_eq!(config.alpha_decay(), 0.5);
        assert_eq!(config.stability(), StabilityCriterion::NonFiniteWeights);
        assert_eq!(config.envelope(), EnvelopeFormula::Direct);
    }

    #[test]
    fn test_invalid_zero_samples() {
        let result = HjProxConfig::builder().int_samples(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidSampleCount(0))));
    }

    #[test]
    fn test_invalid_too_many_samples() {
        let result = HjProxConfig::builder().int_samples(MAX_SAMPLES + 1).build();
        assert!(matches!(result, Err(ConfigError::InvalidSampleCount(_))));
    }

    #[test]
    fn test_invalid_delta_and_alpha() {
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                HjProxConfig::builder().delta(bad).build(),
                Err(ConfigError::InvalidParameter { name: "delta", .. })
            ));
            assert!(matches!(
                HjProxConfig::builder().alpha(bad).build(),
                Err(ConfigError::InvalidParameter { name: "alpha", .. })
            ));
        }
    }

    #[test]
    fn test_invalid_alpha_decay() {
        for bad in [0.0, 1.0, 1.5, -0.5, f64::NAN] {
            assert!(matches!(
                HjProxConfig::builder().alpha_decay(bad).build(),
                Err(ConfigError::InvalidParameter {
                    name: "alpha_decay",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_invalid_underflow_thresholds() {
        assert!(matches!(
            HjProxConfig::builder().underflow_tolerance(0.0, 0.9).build(),
            Err(ConfigError::InvalidParameter { name: "tol", .. })
        ));
        assert!(matches!(
            HjProxConfig::builder().underflow_tolerance(1e-6, 1.5).build(),
            Err(ConfigError::InvalidParameter {
                name: "tol_underflow",
                ..
            })
        ));
        assert!(HjProxConfig::builder()
            .underflow_tolerance(1e-6, 1.0)
            .build()
            .is_ok());
    }

    #[test]
    fn test_invalid_attempt_limit() {
        let result = HjProxConfig::builder().max_attempts(0).build();
        assert!(matches!(result, Err(ConfigError::InvalidAttemptLimit(0))));
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time(0.1).is_ok());
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                validate_time(bad),
                Err(ConfigError::InvalidParameter { name: "t", .. })
            ));
        }
    }
}
