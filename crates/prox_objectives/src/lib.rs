//! # prox_objectives: Reference Objectives
//!
//! ## Layer 3 Role
//!
//! Objectives with closed-form proximal operators, used to validate the
//! estimator in `prox_engine` against ground truth:
//! - [`L1Norm`]: soft-threshold proximal
//! - [`Quadratic`]: linear-system proximal via Cholesky
//! - [`LogBarrier`]: positive-root proximal
//! - [`Noisy`]: zero-mean Gaussian observation noise around any objective
//! - [`Shifted`]: constant offset into the non-negative range
//!
//! Every type implements [`BatchObjective`](prox_core::traits::BatchObjective)
//! and, through [`ProximalReference`], exposes its exact proximal and
//! Moreau envelope.
//!
//! ## Usage Example
//!
//! ```rust
//! use prox_core::types::Matrix;
//! use prox_engine::hj::{HjProxConfig, HjProxEstimator};
//! use prox_objectives::{L1Norm, ProximalReference};
//!
//! let config = HjProxConfig::builder().seed(42).build().unwrap();
//! let mut estimator = HjProxEstimator::new(config).unwrap();
//!
//! let x = [2.0, -2.0];
//! let estimate = estimator.estimate(&Matrix::column(&x), 0.1, &mut L1Norm).unwrap();
//! let exact = L1Norm.prox(&x, 0.1).unwrap();
//!
//! for (e, p) in estimate.prox_values().iter().zip(&exact) {
//!     assert!((e - p).abs() < 0.15);
//! }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

mod error;
mod l1;
mod log_barrier;
pub mod noisy;
mod quadratic;
mod reference;
mod shifted;

pub use error::ObjectiveError;
pub use l1::L1Norm;
pub use log_barrier::LogBarrier;
pub use noisy::Noisy;
pub use quadratic::Quadratic;
pub use reference::ProximalReference;
pub use shifted::Shifted;
