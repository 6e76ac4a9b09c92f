//! # prox_engine: Monte Carlo Proximal Estimation Engine
//!
//! ## Layer 2 Role
//!
//! prox_engine estimates proximal operators of black-box objectives from
//! function values alone:
//! - Seeded Gaussian sampling (`rng`)
//! - The adaptive Hamilton-Jacobi estimator and its workspace (`hj`)
//! - Rayon-parallel estimation over independent points (`hj::estimate_many`)
//! - Configuration from TOML files and `HJPROX_*` environment variables (`settings`)
//!
//! ## Usage Example
//!
//! ```rust
//! use prox_core::types::Matrix;
//! use prox_engine::hj::{HjProxConfig, HjProxEstimator};
//!
//! let config = HjProxConfig::builder().seed(42).verbose(true).build().unwrap();
//! let mut estimator = HjProxEstimator::new(config).unwrap();
//!
//! // f(y) = |y|, whose proximal at x = 2, t = 0.1 is the soft-threshold 1.9
//! let mut f = |y: &Matrix| y.map_rows(|r| r.iter().map(|v| v.abs()).sum());
//! let result = estimator
//!     .estimate(&Matrix::column(&[2.0]), 0.1, &mut f)
//!     .unwrap();
//!
//! assert_eq!(result.prox.shape(), (1, 1));
//! assert!((result.prox_values()[0] - 1.9).abs() < 0.05);
//! assert!(result.envelope.is_some());
//! ```
//!
//! ## Logging
//!
//! The engine emits `tracing` events and never installs a subscriber.
//! Terminal failures are logged at `warn`; per-attempt detail is available
//! through [`hj::TracingObserver`].
//!
//! ## Feature Flags
//!
//! - `serde-results`: Enable serialisation of [`hj::HjProxResult`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod hj;
pub mod rng;
pub mod settings;

pub use hj::{estimate_many, estimate_prox, HjProxConfig, HjProxEstimator, HjProxResult};
pub use settings::{load_config, EstimatorSettings, SettingsError};
