//! Dense row-major matrix.
//!
//! Points are `n x 1` column vectors and sample batches are
//! `n_samples x n` matrices whose rows are individual samples. Data is stored
//! contiguously in row-major order so a batch row is a plain `&[f64]` slice.

use super::error::ProxError;

/// Dense row-major `f64` matrix.
///
/// # Examples
///
/// ```rust
/// use prox_core::types::Matrix;
///
/// let batch = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
/// assert_eq!(batch.shape(), (2, 2));
/// assert_eq!(batch.row(1), &[3.0, 4.0]);
///
/// let x = Matrix::column(&[3.0, 4.0]);
/// assert_eq!(x.shape(), (2, 1));
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a zero-filled matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Wraps row-major data in a matrix of the given shape.
    ///
    /// # Errors
    ///
    /// Returns [`ProxError::DataLength`] if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, ProxError> {
        if data.len() != rows * cols {
            return Err(ProxError::DataLength {
                rows,
                cols,
                got: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from equal-length rows.
    ///
    /// # Errors
    ///
    /// Returns [`ProxError::DataLength`] if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ProxError> {
        let cols = rows.first().map_or(0, Vec::len);
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::from_vec(rows.len(), cols, data)
    }

    /// Creates an `n x 1` column vector.
    pub fn column(values: &[f64]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    /// Creates a `1 x n` row vector.
    pub fn row_vector(values: &[f64]) -> Self {
        Self {
            rows: 1,
            cols: values.len(),
            data: values.to_vec(),
        }
    }

    /// Reshapes to `rows x cols`, keeping the allocation when shrinking.
    ///
    /// Contents are not preserved positionally across a change of width;
    /// callers overwrite the buffer after resizing.
    pub fn resize(&mut self, rows: usize, cols: usize) {
        self.data.resize(rows * cols, 0.0);
        self.rows = rows;
        self.cols = cols;
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns `true` for an `n x 1` matrix with `n >= 1`.
    #[inline]
    pub fn is_column_vector(&self) -> bool {
        self.cols == 1 && self.rows >= 1
    }

    /// Element at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    /// Borrows row `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterates over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        // chunks_exact panics on a zero chunk size; a zero-width matrix has no data anyway
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Applies `g` to every row, collecting one value per row.
    ///
    /// This is the natural way to write a batch objective:
    ///
    /// ```rust
    /// use prox_core::types::Matrix;
    ///
    /// let batch = Matrix::from_rows(&[vec![1.0, -2.0], vec![0.5, 0.5]]).unwrap();
    /// let l1 = batch.map_rows(|y| y.iter().map(|v| v.abs()).sum());
    /// assert_eq!(l1, vec![3.0, 1.0]);
    /// ```
    pub fn map_rows<F>(&self, g: F) -> Vec<f64>
    where
        F: FnMut(&[f64]) -> f64,
    {
        self.iter_rows().map(g).collect()
    }

    /// Row-major data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable row-major data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Returns `true` if every element is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }
}
