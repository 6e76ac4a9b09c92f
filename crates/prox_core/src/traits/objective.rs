//! Batch objective capability.
//!
//! An objective maps a batch of row vectors (`m x n`) to one real value per
//! row. The estimator treats it as a black box: it may be non-smooth,
//! stochastic, or backed by an external device.

use crate::types::{Device, Matrix};

/// Objective evaluated on batches of row vectors.
///
/// Methods take `&mut self` so implementors can own a noise generator,
/// count evaluations, or cache buffers.
///
/// # Contract
///
/// - Return exactly one value per row of `samples`.
/// - Tolerate repeated calls with freshly sampled batches.
/// - Values are expected to be non-negative; callers offset `f` otherwise.
///
/// Any `FnMut(&Matrix) -> Vec<f64>` closure is an objective that ignores the
/// device:
///
/// ```rust
/// use prox_core::traits::BatchObjective;
/// use prox_core::types::{Device, Matrix};
///
/// let mut l1 = |y: &Matrix| y.map_rows(|r| r.iter().map(|v| v.abs()).sum());
/// let batch = Matrix::from_rows(&[vec![1.0, -1.0]]).unwrap();
/// assert_eq!(l1.evaluate(&batch, &Device::cpu()), vec![2.0]);
/// ```
pub trait BatchObjective {
    /// Evaluates the objective on every row of `samples`.
    fn evaluate(&mut self, samples: &Matrix, device: &Device) -> Vec<f64>;
}

impl<F> BatchObjective for F
where
    F: FnMut(&Matrix) -> Vec<f64>,
{
    #[inline]
    fn evaluate(&mut self, samples: &Matrix, _device: &Device) -> Vec<f64> {
        self(samples)
    }
}
