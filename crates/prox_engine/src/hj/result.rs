//! Estimation results.

use prox_core::types::Matrix;

/// Accepted sample batch, returned when `return_samples` is set.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-results", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleDiagnostics {
    /// Sample batch of the accepted attempt (n_samples × dim).
    pub samples: Matrix,
    /// Softmax weights of the accepted attempt; sums to one.
    pub weights: Vec<f64>,
    /// Scale parameter of the accepted attempt.
    pub alpha: f64,
}

/// Result of one proximal estimation.
///
/// # Examples
///
/// ```rust
/// use prox_core::types::Matrix;
/// use prox_engine::hj::HjProxResult;
///
/// let result = HjProxResult {
///     prox: Matrix::column(&[1.9]),
///     attempts: 3,
///     envelope: Some(1.95),
///     diagnostics: None,
/// };
/// assert_eq!(result.decay_steps(), 2);
/// assert_eq!(result.prox_values(), &[1.9]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-results", derive(serde::Serialize, serde::Deserialize))]
pub struct HjProxResult {
    /// Proximal estimate, same `n × 1` shape as the input point.
    pub prox: Matrix,
    /// Attempts consumed; `1` when the initial alpha was accepted.
    pub attempts: usize,
    /// Moreau envelope estimate, present when `verbose` is set.
    pub envelope: Option<f64>,
    /// Accepted samples, present when `return_samples` is set.
    pub diagnostics: Option<SampleDiagnostics>,
}

impl HjProxResult {
    /// Number of alpha decays applied before acceptance.
    #[inline]
    pub fn decay_steps(&self) -> usize {
        self.attempts.saturating_sub(1)
    }

    /// Estimate as a flat slice of length `n`.
    #[inline]
    pub fn prox_values(&self) -> &[f64] {
        self.prox.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_steps_on_first_attempt() {
        let result = HjProxResult {
            prox: Matrix::column(&[0.0, 1.0]),
            attempts: 1,
            envelope: None,
            diagnostics: None,
        };
        assert_eq!(result.decay_steps(), 0);
        assert_eq!(result.prox_values().len(), 2);
    }

    // Serde tests (feature-gated)
    #[cfg(feature = "serde-results")]
    mod serde_tests {
        use super::*;

        #[test]
        fn test_result_serde_roundtrip() {
            let result = HjProxResult {
                prox: Matrix::column(&[1.9, -0.25]),
                attempts: 4,
                envelope: Some(1.95),
                diagnostics: Some(SampleDiagnostics {
                    samples: Matrix::from_rows(&[vec![1.8, -0.2], vec![2.0, -0.3]]).unwrap(),
                    weights: vec![0.25, 0.75],
                    alpha: 0.5,
                }),
            };

            let json = serde_json::to_string(&result).unwrap();
            let parsed: HjProxResult = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, result);
            assert_eq!(parsed.diagnostics.unwrap().samples.shape(), (2, 2));
        }

        #[test]
        fn test_result_without_optionals_serde_roundtrip() {
            let result = HjProxResult {
                prox: Matrix::column(&[3.0]),
                attempts: 1,
                envelope: None,
                diagnostics: None,
            };

            let json = serde_json::to_string(&result).unwrap();
            assert!(json.contains("\"envelope\":null"));
            let parsed: HjProxResult = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, result);
        }
    }
}
