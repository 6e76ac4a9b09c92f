//! Estimator events and observation hooks.
//!
//! The estimator reports every attempt through an [`EstimatorObserver`]
//! instead of printing. [`NoopObserver`] discards events,
//! [`TracingObserver`] forwards them to `tracing`, and any
//! `FnMut(&EstimatorEvent)` closure can collect them.

use std::fmt;

/// Why an attempt's weights were rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FailureReason {
    /// Too many samples had `exp(z) <= tol`.
    Underflow {
        /// Observed fraction of underflowed samples.
        fraction: f64,
    },
    /// `softmax(z)` produced a non-finite weight.
    NonFiniteWeights,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Underflow { fraction } => {
                write!(f, "{:.1}% of weights underflowed", 100.0 * fraction)
            }
            Self::NonFiniteWeights => write!(f, "non-finite softmax weights"),
        }
    }
}

/// Event emitted while estimating a proximal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EstimatorEvent {
    /// A fresh batch is about to be sampled.
    AttemptStarted {
        /// 1-based attempt number.
        attempt: usize,
        /// Scale parameter for this attempt.
        alpha: f64,
        /// Per-coordinate sampling standard deviation.
        std_dev: f64,
    },
    /// The attempt's weights were degenerate; alpha will be decayed.
    StabilityFailure {
        /// 1-based attempt number.
        attempt: usize,
        /// Scale parameter of the rejected attempt.
        alpha: f64,
        /// Why the weights were rejected.
        reason: FailureReason,
    },
    /// The attempt's weights passed the stability test.
    Accepted {
        /// Attempts consumed, including this one.
        attempts: usize,
        /// Scale parameter of the accepted attempt.
        alpha: f64,
    },
}

/// Receiver of [`EstimatorEvent`]s.
pub trait EstimatorObserver {
    /// Called synchronously for each event.
    fn on_event(&mut self, event: &EstimatorEvent);
}

impl<F> EstimatorObserver for F
where
    F: FnMut(&EstimatorEvent),
{
    #[inline]
    fn on_event(&mut self, event: &EstimatorEvent) {
        self(event)
    }
}

/// Observer that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl EstimatorObserver for NoopObserver {
    #[inline]
    fn on_event(&mut self, _event: &EstimatorEvent) {}
}

/// Observer that forwards events to `tracing`.
///
/// Attempts are logged at `trace`, stability failures and acceptance at `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl EstimatorObserver for TracingObserver {
    fn on_event(&mut self, event: &EstimatorEvent) {
        match *event {
            EstimatorEvent::AttemptStarted {
                attempt,
                alpha,
                std_dev,
            } => tracing::trace!(attempt, alpha, std_dev, "sampling attempt"),
            EstimatorEvent::StabilityFailure {
                attempt,
                alpha,
                reason,
            } => tracing::debug!(attempt, alpha, reason = %reason, "degenerate weights, decaying alpha"),
            EstimatorEvent::Accepted { attempts, alpha } => {
                tracing::debug!(attempts, alpha, "weights accepted")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_observer_collects() {
        let mut seen = Vec::new();
        {
            let mut observer = |e: &EstimatorEvent| seen.push(*e);
            observer.on_event(&EstimatorEvent::Accepted {
                attempts: 1,
                alpha: 2.0,
            });
        }
        assert_eq!(
            seen,
            vec![EstimatorEvent::Accepted {
                attempts: 1,
                alpha: 2.0
            }]
        );
    }

    #[test]
    fn test_failure_reason_display() {
        let r = FailureReason::Underflow { fraction: 0.95 };
        assert_eq!(r.to_string(), "95.0% of weights underflowed");
        assert_eq!(
            FailureReason::NonFiniteWeights.to_string(),
            "non-finite softmax weights"
        );
    }

    #[test]
    fn test_builtin_observers_accept_all_events() {
        let events = [
            EstimatorEvent::AttemptStarted {
                attempt: 1,
                alpha: 2.0,
                std_dev: 0.1,
            },
            EstimatorEvent::StabilityFailure {
                attempt: 1,
                alpha: 2.0,
                reason: FailureReason::NonFiniteWeights,
            },
            EstimatorEvent::Accepted {
                attempts: 2,
                alpha: 1.262,
            },
        ];
        for e in &events {
            NoopObserver.on_event(e);
            TracingObserver.on_event(e);
        }
    }
}
