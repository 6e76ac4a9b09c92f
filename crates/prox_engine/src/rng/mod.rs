//! # Random Number Generation Infrastructure
//!
//! Seeded Gaussian sampling for the proximal estimator.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: All generators carry their seed, even when drawn from entropy
//! - **Efficiency**: Zero-allocation batch operations via `&mut [f64]` slices
//! - **Injectability**: Estimators own a [`ProxRng`] that callers can reseed
//!
//! ## Usage Example
//!
//! ```rust
//! use prox_engine::rng::ProxRng;
//!
//! let mut rng = ProxRng::from_seed(12345);
//!
//! // Standard normal variates (mean=0, std=1)
//! let normal_value = rng.gen_normal();
//!
//! // Four samples around (1, 2) with std 0.5, row-major
//! let mut rows = vec![0.0; 4 * 2];
//! rng.fill_gaussian_rows(&mut rows, &[1.0, 2.0], 0.5);
//! ```

mod prng;

pub use prng::ProxRng;

#[cfg(test)]
mod tests;
