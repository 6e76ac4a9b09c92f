//! Hamilton-Jacobi proximal estimator.
//!
//! Estimates
//!
//! ```text
//! prox_{tf}(x) = argmin_y f(y) + ‖y − x‖² / (2t)
//! ```
//!
//! from objective values alone, through the Hopf-Lax representation of the
//! Moreau envelope:
//!
//! 1. Draw `y_i ~ N(x, (delta·t/alpha) I)`, `i = 1..int_samples`
//! 2. Score `z_i = -f(y_i) · alpha / delta`
//! 3. If the weights `softmax(z)` are degenerate, shrink alpha and resample
//! 4. Otherwise return `Σ_i softmax(z)_i · y_i`
//!
//! # Workspace Reuse
//!
//! The estimator owns a [`SampleWorkspace`] reused across attempts and
//! calls, so a retry or a second point of the same dimension allocates
//! nothing beyond the objective's own output.

use prox_core::math::linalg::squared_distance;
use prox_core::math::softmax::{log_mean_exp, softmax_into, underflow_fraction};
use prox_core::traits::BatchObjective;
use prox_core::types::{ConfigError, Matrix, ProxError};

use super::config::{validate_time, EnvelopeFormula, HjProxConfig, StabilityCriterion};
use super::observer::{EstimatorEvent, EstimatorObserver, FailureReason, NoopObserver};
use super::result::{HjProxResult, SampleDiagnostics};
use super::workspace::SampleWorkspace;
use crate::rng::ProxRng;

/// Monte Carlo proximal estimator with adaptive scale recovery.
///
/// # Examples
///
/// ```rust
/// use prox_core::types::Matrix;
/// use prox_engine::hj::{HjProxConfig, HjProxEstimator};
///
/// let config = HjProxConfig::builder().seed(42).build().unwrap();
/// let mut estimator = HjProxEstimator::new(config).unwrap();
///
/// // f(y) = |y|, whose proximal is the soft-threshold: prox(2.0) = 1.9 at t = 0.1
/// let mut f = |y: &Matrix| y.map_rows(|r| r.iter().map(|v| v.abs()).sum());
/// let x = Matrix::column(&[2.0]);
///
/// let result = estimator.estimate(&x, 0.1, &mut f).unwrap();
/// assert_eq!(result.prox.shape(), (1, 1));
/// assert!((result.prox_values()[0] - 1.9).abs() < 0.05);
/// ```
#[derive(Clone, Debug)]
pub struct HjProxEstimator {
    config: HjProxConfig,
    workspace: SampleWorkspace,
    rng: ProxRng,
}

impl HjProxEstimator {
    /// Creates an estimator, seeding its RNG from the configuration or,
    /// when no seed is configured, from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration is invalid.
    pub fn new(config: HjProxConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed() {
            Some(seed) => ProxRng::from_seed(seed),
            None => ProxRng::from_entropy(),
        };
        let workspace = SampleWorkspace::new(config.int_samples(), 0);

        tracing::debug!(
            seed = rng.seed(),
            int_samples = config.int_samples(),
            delta = config.delta(),
            alpha = config.alpha(),
            "proximal estimator initialised"
        );

        Ok(Self {
            config,
            workspace,
            rng,
        })
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &HjProxConfig {
        &self.config
    }

    /// Returns the seed the RNG was initialised with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Restarts the RNG from `seed`.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ProxRng::from_seed(seed);
    }

    /// Estimates `prox_{tf}(x)`.
    ///
    /// # Arguments
    ///
    /// * `x` - Point, an `n x 1` column vector with `n >= 1`
    /// * `t` - Step size, positive and finite
    /// * `f` - Objective, expected to be non-negative
    ///
    /// # Errors
    ///
    /// - [`ProxError::InvalidPointShape`] if `x` is not a column vector
    /// - [`ProxError::Config`] if `t` is not positive and finite
    /// - [`ProxError::ObjectiveLength`] if `f` returns the wrong number of values
    /// - [`ProxError::Overflow`] if the accepted estimate is non-finite
    /// - [`ProxError::NotConverged`] if every allowed attempt was degenerate
    pub fn estimate<O>(&mut self, x: &Matrix, t: f64, f: &mut O) -> Result<HjProxResult, ProxError>
    where
        O: BatchObjective + ?Sized,
    {
        self.estimate_observed(x, t, f, &mut NoopObserver)
    }

    /// Same as [`estimate`](Self::estimate), reporting each attempt to `observer`.
    pub fn estimate_observed<O, B>(
        &mut self,
        x: &Matrix,
        t: f64,
        f: &mut O,
        observer: &mut B,
    ) -> Result<HjProxResult, ProxError>
    where
        O: BatchObjective + ?Sized,
        B: EstimatorObserver + ?Sized,
    {
        if !x.is_column_vector() {
            return Err(ProxError::InvalidPointShape {
                rows: x.rows(),
                cols: x.cols(),
            });
        }
        validate_time(t)?;

        let n_samples = self.config.int_samples();
        let delta = self.config.delta();
        let decay = self.config.alpha_decay();
        let max_attempts = self.config.max_attempts();
        self.workspace.ensure_shape(n_samples, x.rows());

        let mut alpha = self.config.alpha();
        for attempt in 1..=max_attempts {
            let std_dev = (delta * t / alpha).sqrt();
            observer.on_event(&EstimatorEvent::AttemptStarted {
                attempt,
                alpha,
                std_dev,
            });

            // Fresh samples every attempt: the distribution depends on alpha
            self.rng
                .fill_gaussian_rows(self.workspace.samples_mut(), x.as_slice(), std_dev);
            let values = f.evaluate(self.workspace.samples(), self.config.device());
            if values.len() != n_samples {
                return Err(ProxError::ObjectiveLength {
                    expected: n_samples,
                    got: values.len(),
                });
            }

            let scale = alpha / delta;
            for (z, v) in self.workspace.scores_mut().iter_mut().zip(&values) {
                *z = -v * scale;
            }
            let (scores, weights) = self.workspace.scores_and_weights_mut();
            softmax_into(scores, weights);

            if let Some(reason) = self.stability_failure() {
                observer.on_event(&EstimatorEvent::StabilityFailure {
                    attempt,
                    alpha,
                    reason,
                });
                if attempt == max_attempts {
                    tracing::warn!(attempts = attempt, alpha, reason = %reason, "attempt limit reached");
                    return Err(ProxError::NotConverged {
                        attempts: attempt,
                        alpha,
                    });
                }
                alpha *= decay;
                continue;
            }

            observer.on_event(&EstimatorEvent::Accepted {
                attempts: attempt,
                alpha,
            });
            return self.finalize(x, t, f, alpha, attempt);
        }

        // max_attempts >= 1 is validated, so the loop always returns
        Err(ProxError::NotConverged {
            attempts: max_attempts,
            alpha,
        })
    }

    /// Applies the configured stability test to the current scores and weights.
    fn stability_failure(&self) -> Option<FailureReason> {
        match self.config.stability() {
            StabilityCriterion::UnderflowFraction { tol, tol_underflow } => {
                let fraction = underflow_fraction(self.workspace.scores(), tol);
                (fraction > tol_underflow).then_some(FailureReason::Underflow { fraction })
            }
            StabilityCriterion::NonFiniteWeights => self
                .workspace
                .weights()
                .iter()
                .any(|w| !w.is_finite())
                .then_some(FailureReason::NonFiniteWeights),
        }
    }

    fn finalize<O>(
        &self,
        x: &Matrix,
        t: f64,
        f: &mut O,
        alpha: f64,
        attempts: usize,
    ) -> Result<HjProxResult, ProxError>
    where
        O: BatchObjective + ?Sized,
    {
        let centroid = self.workspace.weighted_centroid();
        // Can still happen after a passing underflow test, e.g. a NaN objective value
        if !centroid.iter().all(|v| v.is_finite()) {
            tracing::warn!(attempts, alpha, "proximal estimate is not finite");
            return Err(ProxError::Overflow { attempts, alpha });
        }

        let envelope = if self.config.verbose() {
            Some(self.envelope(x, t, f, alpha, &centroid)?)
        } else {
            None
        };

        let diagnostics = self.config.return_samples().then(|| SampleDiagnostics {
            samples: self.workspace.samples().clone(),
            weights: self.workspace.weights().to_vec(),
            alpha,
        });

        Ok(HjProxResult {
            prox: Matrix::column(&centroid),
            attempts,
            envelope,
            diagnostics,
        })
    }

    fn envelope<O>(
        &self,
        x: &Matrix,
        t: f64,
        f: &mut O,
        alpha: f64,
        centroid: &[f64],
    ) -> Result<f64, ProxError>
    where
        O: BatchObjective + ?Sized,
    {
        match self.config.envelope() {
            EnvelopeFormula::LogMeanExp => {
                Ok(-(self.config.delta() / alpha) * log_mean_exp(self.workspace.scores()))
            }
            EnvelopeFormula::Direct => {
                let values = f.evaluate(&Matrix::row_vector(centroid), self.config.device());
                match values.as_slice() {
                    [value] => Ok(value + squared_distance(centroid, x.as_slice()) / (2.0 * t)),
                    _ => Err(ProxError::ObjectiveLength {
                        expected: 1,
                        got: values.len(),
                    }),
                }
            }
        }
    }
}

/// One-shot estimation with a freshly constructed estimator.
///
/// # Examples
///
/// ```rust
/// use prox_core::types::Matrix;
/// use prox_engine::hj::{estimate_prox, HjProxConfig};
///
/// let config = HjProxConfig::builder().seed(7).verbose(true).build().unwrap();
/// let mut f = |y: &Matrix| y.map_rows(|r| 0.5 * r.iter().map(|v| v * v).sum::<f64>());
///
/// let result = estimate_prox(&Matrix::column(&[3.0, 4.0]), 1.0, &mut f, &config).unwrap();
/// assert!(result.envelope.is_some());
/// ```
pub fn estimate_prox<O>(
    x: &Matrix,
    t: f64,
    f: &mut O,
    config: &HjProxConfig,
) -> Result<HjProxResult, ProxError>
where
    O: BatchObjective + ?Sized,
{
    HjProxEstimator::new(config.clone())?.estimate(x, t, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prox_core::types::Device;

    fn l1(y: &Matrix) -> Vec<f64> {
        y.map_rows(|r| r.iter().map(|v| v.abs()).sum())
    }

    fn seeded(seed: u64) -> HjProxEstimator {
        HjProxEstimator::new(HjProxConfig::builder().seed(seed).build().unwrap()).unwrap()
    }

    #[test]
    fn test_shape_invariance() {
        let mut estimator = seeded(1);
        for n in 1..=6 {
            let x = Matrix::column(&vec![1.0; n]);
            let result = estimator.estimate(&x, 0.5, &mut l1).unwrap();
            assert_eq!(result.prox.shape(), (n, 1));
            assert!(result.prox.is_finite());
            assert!(result.attempts >= 1);
        }
    }

    #[test]
    fn test_rejects_non_column_points() {
        let mut estimator = seeded(1);
        for x in [
            Matrix::row_vector(&[1.0, 2.0]),
            Matrix::zeros(3, 2),
            Matrix::column(&[]),
        ] {
            let err = estimator.estimate(&x, 0.1, &mut l1).unwrap_err();
            assert!(err.is_shape_error(), "{}", err);
            assert!(matches!(err, ProxError::InvalidPointShape { .. }));
        }
    }

    #[test]
    fn test_rejects_invalid_time() {
        let mut estimator = seeded(1);
        let x = Matrix::column(&[1.0]);
        for t in [0.0, -0.5, f64::NAN] {
            let err = estimator.estimate(&x, t, &mut l1).unwrap_err();
            assert!(matches!(
                err,
                ProxError::Config(ConfigError::InvalidParameter { name: "t", .. })
            ));
        }
    }

    #[test]
    fn test_rejects_wrong_objective_length() {
        let mut estimator = seeded(1);
        let mut short = |y: &Matrix| vec![0.0; y.rows() - 1];
        let err = estimator
            .estimate(&Matrix::column(&[1.0]), 0.1, &mut short)
            .unwrap_err();
        assert_eq!(
            err,
            ProxError::ObjectiveLength {
                expected: 1000,
                got: 999
            }
        );
    }

    #[test]
    fn test_same_seed_same_estimate() {
        let x = Matrix::column(&[0.3, -1.2]);
        let a = seeded(99).estimate(&x, 0.2, &mut l1).unwrap();
        let b = seeded(99).estimate(&x, 0.2, &mut l1).unwrap();
        assert_eq!(a, b);

        let mut estimator = seeded(5);
        let first = estimator.estimate(&x, 0.2, &mut l1).unwrap();
        estimator.reseed(5);
        let replay = estimator.estimate(&x, 0.2, &mut l1).unwrap();
        assert_eq!(first, replay);
        assert_eq!(estimator.seed(), 5);
    }

    #[test]
    fn test_soft_threshold_scenario() {
        let x = Matrix::column(&[2.0]);
        for seed in 0..5 {
            let result = seeded(seed).estimate(&x, 0.1, &mut l1).unwrap();
            assert!(
                (result.prox_values()[0] - 1.9).abs() < 0.05,
                "seed {}: {}",
                seed,
                result.prox_values()[0]
            );
        }
    }

    #[test]
    fn test_weights_normalised_and_samples_returned() {
        let config = HjProxConfig::builder()
            .seed(3)
            .int_samples(500)
            .return_samples(true)
            .build()
            .unwrap();
        let mut estimator = HjProxEstimator::new(config).unwrap();
        let result = estimator
            .estimate(&Matrix::column(&[1.0, 2.0, 3.0]), 0.3, &mut l1)
            .unwrap();

        let diagnostics = result.diagnostics.as_ref().expect("samples requested");
        assert_eq!(diagnostics.samples.shape(), (500, 3));
        assert_eq!(diagnostics.weights.len(), 500);
        assert_relative_eq!(
            diagnostics.weights.iter().sum::<f64>(),
            1.0,
            epsilon = 1e-10
        );
        assert!(diagnostics.weights.iter().all(|&w| w >= 0.0));
        assert_relative_eq!(
            diagnostics.alpha,
            2.0 * 0.631_f64.powi(result.decay_steps() as i32),
            max_relative = 1e-12
        );
        assert!(result.envelope.is_none());
    }

    #[test]
    fn test_monotone_recovery_from_underflow() {
        // Constant f = 1000: every sample underflows until alpha * 1e4 < -ln(1e-6)
        let mut f = |y: &Matrix| vec![1000.0; y.rows()];
        let config = HjProxConfig::builder()
            .seed(11)
            .return_samples(true)
            .build()
            .unwrap();
        let mut estimator = HjProxEstimator::new(config).unwrap();

        let mut events = Vec::new();
        let mut observer = |e: &EstimatorEvent| events.push(*e);
        let result = estimator
            .estimate_observed(&Matrix::column(&[0.5, 0.5]), 1.0, &mut f, &mut observer)
            .unwrap();

        let threshold = -(1e-6_f64).ln();
        let mut expected_decays = 0;
        let mut alpha = 2.0;
        while alpha * 1000.0 / 0.1 >= threshold {
            alpha *= 0.631;
            expected_decays += 1;
        }

        assert_eq!(result.decay_steps(), expected_decays);
        assert_eq!(result.attempts, expected_decays + 1);

        let failed_alphas: Vec<f64> = events
            .iter()
            .filter_map(|e| match e {
                EstimatorEvent::StabilityFailure { alpha, .. } => Some(*alpha),
                _ => None,
            })
            .collect();
        assert_eq!(failed_alphas.len(), expected_decays);
        assert!(failed_alphas.windows(2).all(|w| w[1] < w[0]));

        let final_alpha = result.diagnostics.unwrap().alpha;
        assert!(final_alpha < *failed_alphas.last().unwrap());
        assert_relative_eq!(final_alpha, alpha, max_relative = 1e-12);
        assert!(matches!(
            events.last(),
            Some(EstimatorEvent::Accepted { attempts, .. }) if *attempts == expected_decays + 1
        ));
    }

    #[test]
    fn test_attempt_limit_underflow() {
        let mut f = |y: &Matrix| vec![f64::INFINITY; y.rows()];
        let config = HjProxConfig::builder()
            .seed(1)
            .max_attempts(5)
            .build()
            .unwrap();
        let err = HjProxEstimator::new(config)
            .unwrap()
            .estimate(&Matrix::column(&[1.0]), 0.1, &mut f)
            .unwrap_err();
        match err {
            ProxError::NotConverged { attempts, alpha } => {
                assert_eq!(attempts, 5);
                assert_relative_eq!(alpha, 2.0 * 0.631_f64.powi(4), max_relative = 1e-12);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_attempt_limit_non_finite_weights() {
        let mut f = |y: &Matrix| vec![f64::INFINITY; y.rows()];
        let config = HjProxConfig::overflow_guard_builder()
            .seed(1)
            .max_attempts(3)
            .build()
            .unwrap();
        let err = estimate_prox(&Matrix::column(&[1.0]), 0.1, &mut f, &config).unwrap_err();
        assert!(matches!(err, ProxError::NotConverged { attempts: 3, .. }));
    }

    #[test]
    fn test_overflow_after_passing_underflow_test() {
        // A single NaN does not trip the underflow fraction but poisons the weights
        let mut f = |y: &Matrix| {
            let mut v = vec![0.0; y.rows()];
            v[0] = f64::NAN;
            v
        };
        let config = HjProxConfig::builder().seed(2).build().unwrap();
        let err = estimate_prox(&Matrix::column(&[1.0]), 0.1, &mut f, &config).unwrap_err();
        assert_eq!(
            err,
            ProxError::Overflow {
                attempts: 1,
                alpha: 2.0
            }
        );
    }

    #[test]
    fn test_negative_objective_keeps_shape() {
        let mut f = |y: &Matrix| y.map_rows(|r| -r.iter().map(|v| v * v).sum::<f64>());
        let x = Matrix::column(&[0.5, -0.5, 1.0]);
        let result = seeded(4).estimate(&x, 1.0, &mut f).unwrap();
        assert_eq!(result.prox.shape(), (3, 1));
        assert!(result.prox.is_finite());
    }

    #[test]
    fn test_log_mean_exp_envelope_of_constant() {
        let mut f = |y: &Matrix| vec![0.7; y.rows()];
        let config = HjProxConfig::builder().seed(8).verbose(true).build().unwrap();
        let result = estimate_prox(&Matrix::column(&[1.0, 1.0]), 0.5, &mut f, &config).unwrap();
        assert_relative_eq!(result.envelope.unwrap(), 0.7, epsilon = 1e-9);
    }

    #[test]
    fn test_direct_envelope_of_constant() {
        let mut f = |y: &Matrix| vec![0.7; y.rows()];
        let config = HjProxConfig::builder()
            .seed(8)
            .verbose(true)
            .envelope(EnvelopeFormula::Direct)
            .build()
            .unwrap();
        let result = estimate_prox(&Matrix::column(&[1.0, 1.0]), 0.5, &mut f, &config).unwrap();
        let envelope = result.envelope.unwrap();
        // The uniform-weight centroid sits within a few standard errors of x
        assert!(envelope >= 0.7);
        assert!(envelope < 0.7 + 1e-2);
    }

    #[test]
    fn test_direct_envelope_rejects_wrong_length() {
        let mut calls = 0;
        let mut f = |y: &Matrix| {
            calls += 1;
            if calls == 1 {
                vec![0.0; y.rows()]
            } else {
                vec![0.0; 2]
            }
        };
        let config = HjProxConfig::builder()
            .seed(8)
            .verbose(true)
            .envelope(EnvelopeFormula::Direct)
            .build()
            .unwrap();
        let err = estimate_prox(&Matrix::column(&[1.0]), 0.5, &mut f, &config).unwrap_err();
        assert_eq!(
            err,
            ProxError::ObjectiveLength {
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn test_device_is_forwarded() {
        struct DeviceCheck;
        impl BatchObjective for DeviceCheck {
            fn evaluate(&mut self, samples: &Matrix, device: &Device) -> Vec<f64> {
                assert_eq!(device.name(), "cuda:0");
                vec![0.0; samples.rows()]
            }
        }

        let config = HjProxConfig::builder()
            .seed(1)
            .device(Device::new("cuda:0"))
            .build()
            .unwrap();
        let result = estimate_prox(&Matrix::column(&[1.0]), 0.1, &mut DeviceCheck, &config);
        assert!(result.is_ok());
    }

    #[test]
    fn test_dyn_objective() {
        let mut boxed: Box<dyn BatchObjective> = Box::new(l1 as fn(&Matrix) -> Vec<f64>);
        let result = seeded(6)
            .estimate(&Matrix::column(&[0.0]), 0.1, boxed.as_mut())
            .unwrap();
        assert_eq!(result.prox.shape(), (1, 1));
    }
}
