//! Opaque execution context.

use std::fmt;

/// Execution context forwarded unchanged to objectives.
///
/// The estimator never inspects the device; it exists so that an objective
/// backed by an accelerator can learn where the caller wants work to run.
///
/// # Examples
/// ```
/// use prox_core::types::Device;
///
/// assert_eq!(Device::default().name(), "cpu");
/// assert_eq!(Device::new("cuda:0").to_string(), "cuda:0");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Device(String);

impl Device {
    /// Creates a device with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The host CPU.
    pub fn cpu() -> Self {
        Self::new("cpu")
    }

    /// Returns the device name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Default for Device {
    fn default() -> Self {
        Self::cpu()
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
