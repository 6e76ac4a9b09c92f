//! Mathematical primitives.
//!
//! - [`softmax`]: stable `log_sum_exp`, `log_mean_exp`, `softmax` and underflow counting
//! - [`linalg`]: Cholesky solves and vector helpers for closed-form references

pub mod linalg;
pub mod softmax;
