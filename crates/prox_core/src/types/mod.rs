//! Core value types shared across the workspace.
//!
//! This module provides:
//! - [`Matrix`]: Dense row-major matrix used for points and sample batches
//! - [`Device`]: Opaque execution context forwarded to objectives
//! - [`ProxError`], [`ConfigError`]: Structured error types

mod device;
pub mod error;
mod matrix;

pub use device::Device;
pub use error::{ConfigError, ProxError};
pub use matrix::Matrix;
