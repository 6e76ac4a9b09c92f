//! Pre-allocated workspace buffers for proximal estimation.
//!
//! This module provides [`SampleWorkspace`], which holds the buffers one
//! estimation attempt writes into so that retries and repeated calls reuse
//! the same allocations.
//!
//! # Memory Layout
//!
//! All buffers are contiguous:
//! - `samples`: n_samples × dim, row-major (one Gaussian sample per row)
//! - `scores`: n_samples (`z = -f(y) · alpha / delta`)
//! - `weights`: n_samples (softmax of the scores)

use prox_core::types::Matrix;

/// Pre-allocated workspace for one estimator.
///
/// Buffers only ever grow; shrinking the logical shape keeps the capacity.
/// Contents carry no meaning between attempts: every attempt overwrites the
/// samples, scores and weights before reading them.
///
/// # Examples
///
/// ```rust
/// use prox_engine::hj::SampleWorkspace;
///
/// let mut workspace = SampleWorkspace::new(1000, 3);
/// assert_eq!(workspace.samples().shape(), (1000, 3));
///
/// workspace.ensure_shape(500, 2);
/// assert_eq!(workspace.scores().len(), 500);
/// ```
#[derive(Clone, Debug)]
pub struct SampleWorkspace {
    /// Sample batch (n_samples × dim).
    samples: Matrix,
    /// Scores per sample (n_samples).
    scores: Vec<f64>,
    /// Normalised weights per sample (n_samples).
    weights: Vec<f64>,
}

impl SampleWorkspace {
    /// Creates a workspace for `n_samples` samples of dimension `dim`.
    pub fn new(n_samples: usize, dim: usize) -> Self {
        Self {
            samples: Matrix::zeros(n_samples, dim),
            scores: vec![0.0; n_samples],
            weights: vec![0.0; n_samples],
        }
    }

    /// Sets the logical shape, growing buffers if necessary.
    ///
    /// Never shrinks allocations, avoiding repeated allocation when the
    /// dimension of successive points varies.
    pub fn ensure_shape(&mut self, n_samples: usize, dim: usize) {
        if self.samples.shape() != (n_samples, dim) {
            self.samples.resize(n_samples, dim);
        }
        self.scores.resize(n_samples, 0.0);
        self.weights.resize(n_samples, 0.0);
    }

    /// Logical number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.samples.rows()
    }

    /// Logical sample dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.samples.cols()
    }

    /// Sample batch.
    #[inline]
    pub fn samples(&self) -> &Matrix {
        &self.samples
    }

    /// Mutable row-major sample data for filling.
    #[inline]
    pub fn samples_mut(&mut self) -> &mut [f64] {
        self.samples.as_mut_slice()
    }

    /// Scores of the last attempt.
    #[inline]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Mutable scores.
    #[inline]
    pub fn scores_mut(&mut self) -> &mut [f64] {
        &mut self.scores
    }

    /// Weights of the last attempt.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Immutable scores and mutable weights, for normalisation.
    #[inline]
    pub fn scores_and_weights_mut(&mut self) -> (&[f64], &mut [f64]) {
        (&self.scores, &mut self.weights)
    }

    /// Weighted centroid `Σ_i w_i y_i` of the sample rows.
    ///
    /// Returns a vector of length `dim`.
    pub fn weighted_centroid(&self) -> Vec<f64> {
        let mut centroid = vec![0.0; self.dim()];
        for (row, &w) in self.samples.iter_rows().zip(&self.weights) {
            for (c, &y) in centroid.iter_mut().zip(row) {
                *c += w * y;
            }
        }
        centroid
    }

    /// Total memory reserved by all buffers in bytes.
    #[inline]
    pub fn memory_usage(&self) -> usize {
        (self.samples.as_slice().len() + self.scores.capacity() + self.weights.capacity())
            * std::mem::size_of::<f64>()
    }
}

impl Default for SampleWorkspace {
    fn default() -> Self {
        Self::new(0, 0)
    }
}
