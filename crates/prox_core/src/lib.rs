//! # prox_core: Foundation for Monte Carlo Proximal Estimation
//!
//! ## Layer 1 (Foundation) Role
//!
//! prox_core serves as the bottom layer of the workspace, providing:
//! - Dense row-major matrices for points and sample batches (`types::matrix`)
//! - The error taxonomy shared by every layer (`types::error`)
//! - The opaque execution context forwarded to objectives (`types::device`)
//! - Numerically stable `log_sum_exp` and `softmax` (`math::softmax`)
//! - Cholesky solves for small SPD systems (`math::linalg`)
//! - The batch objective capability (`traits::objective`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other prox_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Structured error types
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use prox_core::math::softmax::{log_sum_exp, softmax};
//! use prox_core::types::Matrix;
//!
//! // A point in R^3 is a 3 x 1 column vector
//! let x = Matrix::column(&[1.0, -2.0, 0.5]);
//! assert!(x.is_column_vector());
//!
//! // Stable softmax never overflows on large scores
//! let weights = softmax(&[1000.0_f64, 1000.0]);
//! assert!((weights[0] - 0.5).abs() < 1e-12);
//!
//! let lse = log_sum_exp(&[0.0_f64, 0.0]);
//! assert!((lse - 2.0_f64.ln()).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for `Matrix` and `Device`

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod traits;
pub mod types;
