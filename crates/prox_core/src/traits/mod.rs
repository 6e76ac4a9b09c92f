//! Capability traits.
//!
//! - [`BatchObjective`]: row-batch evaluation of the function whose proximal is estimated

mod objective;

pub use objective::BatchObjective;
