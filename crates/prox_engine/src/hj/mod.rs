//! Sampling-based proximal estimation.
//!
//! This module provides:
//! - [`HjProxConfig`]: Estimator configuration and builder
//! - [`HjProxEstimator`]: The adaptive Monte Carlo estimator
//! - [`HjProxResult`]: Estimate, attempt count, optional envelope and samples
//! - [`estimate_many`]: Rayon-parallel estimation over many points
//! - [`EstimatorObserver`]: Per-attempt event hook
//!
//! # Architecture
//!
//! Each attempt fills a [`SampleWorkspace`] with Gaussian samples around the
//! point, evaluates the objective once on the whole batch, and turns the
//! values into softmax weights. A [`StabilityCriterion`] decides whether the
//! weights are usable; if not, `alpha` decays geometrically, which widens the
//! sampling distribution and flattens the scores, and the attempt repeats.
//!
//! # Examples
//!
//! ```rust
//! use prox_core::types::Matrix;
//! use prox_engine::hj::{HjProxConfig, HjProxEstimator, TracingObserver};
//!
//! let config = HjProxConfig::builder().seed(0).build().unwrap();
//! let mut estimator = HjProxEstimator::new(config).unwrap();
//! let mut f = |y: &Matrix| y.map_rows(|r| r.iter().map(|v| v.abs()).sum());
//!
//! let result = estimator
//!     .estimate_observed(&Matrix::column(&[2.0, -2.0]), 0.1, &mut f, &mut TracingObserver)
//!     .unwrap();
//! assert_eq!(result.prox.shape(), (2, 1));
//! ```

mod config;
mod estimator;
mod observer;
mod parallel;
mod result;
mod workspace;

pub use config::{
    validate_time, EnvelopeFormula, HjProxConfig, HjProxConfigBuilder, StabilityCriterion,
    DEFAULT_ALPHA, DEFAULT_ALPHA_DECAY, DEFAULT_DELTA, DEFAULT_INT_SAMPLES, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_TOL_UNDERFLOW, DEFAULT_UNDERFLOW_TOL, MAX_SAMPLES,
};
pub use estimator::{estimate_prox, HjProxEstimator};
pub use observer::{EstimatorEvent, EstimatorObserver, FailureReason, NoopObserver, TracingObserver};
pub use parallel::estimate_many;
pub use result::{HjProxResult, SampleDiagnostics};
pub use workspace::SampleWorkspace;
