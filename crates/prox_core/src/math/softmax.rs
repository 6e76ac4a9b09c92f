//! Numerically stable exponential reductions.
//!
//! Every routine here subtracts the maximum score before exponentiating, so
//! large positive scores never overflow. Large negative scores may still
//! underflow to zero weight; detecting when that makes a weighting
//! degenerate is the estimator's job, not this module's.
//!
//! All functions use generic type parameter `T: num_traits::Float` for f32/f64 support.

use num_traits::Float;

/// Maximum of a slice, `-inf` for an empty slice.
///
/// NaN entries are skipped by `Float::max`; callers that must see NaN
/// check for it separately.
#[inline]
pub fn max_score<T: Float>(values: &[T]) -> T {
    values.iter().fold(T::neg_infinity(), |m, &v| m.max(v))
}

/// Stable `log(Σ exp(v_i))`.
///
/// # Mathematical Definition
/// ```text
/// lse(v) = m + log(Σ exp(v_i - m)),  m = max_i v_i
/// ```
///
/// Returns `-inf` for an empty slice or when every value is `-inf`, `+inf`
/// when any value is `+inf`, and NaN when any value is NaN.
///
/// # Examples
/// ```
/// use prox_core::math::softmax::log_sum_exp;
///
/// let result = log_sum_exp(&[1000.0_f64, 1000.0]);
/// assert!((result - (1000.0 + 2.0_f64.ln())).abs() < 1e-9);
/// ```
pub fn log_sum_exp<T: Float>(values: &[T]) -> T {
    if values.iter().any(|v| v.is_nan()) {
        return T::nan();
    }
    let m = max_score(values);
    if m.is_infinite() {
        return m;
    }
    let sum = values.iter().fold(T::zero(), |acc, &v| acc + (v - m).exp());
    m + sum.ln()
}

/// Stable `log(mean(exp(v_i)))`.
///
/// # Examples
/// ```
/// use prox_core::math::softmax::log_mean_exp;
///
/// let result = log_mean_exp(&[-3.0_f64, -3.0, -3.0]);
/// assert!((result + 3.0).abs() < 1e-12);
/// ```
pub fn log_mean_exp<T: Float>(values: &[T]) -> T {
    match T::from(values.len()) {
        Some(n) if !values.is_empty() => log_sum_exp(values) - n.ln(),
        _ => T::neg_infinity(),
    }
}

/// Writes `softmax(scores)` into `weights` and returns the normaliser
/// `Σ exp(v_i - m)`.
///
/// The weights are non-negative and sum to one whenever the scores are
/// finite. If every score is `-inf`, or any is NaN or `+inf`, the weights are
/// non-finite; that is the overflow signal the estimator looks for.
///
/// # Panics
///
/// Panics if `scores` and `weights` differ in length.
pub fn softmax_into<T: Float>(scores: &[T], weights: &mut [T]) -> T {
    assert_eq!(
        scores.len(),
        weights.len(),
        "scores and weights must have equal length"
    );

    let m = max_score(scores);
    let mut sum = T::zero();
    for (w, &s) in weights.iter_mut().zip(scores) {
        *w = (s - m).exp();
        sum = sum + *w;
    }
    let inv_sum = T::one() / sum;
    for w in weights.iter_mut() {
        *w = *w * inv_sum;
    }
    sum
}

/// Allocating form of [`softmax_into`].
///
/// # Examples
/// ```
/// use prox_core::math::softmax::softmax;
///
/// let w = softmax(&[0.0_f64, 2.0_f64.ln()]);
/// assert!((w[0] - 1.0 / 3.0).abs() < 1e-12);
/// assert!((w[1] - 2.0 / 3.0).abs() < 1e-12);
/// ```
pub fn softmax<T: Float>(scores: &[T]) -> Vec<T> {
    let mut weights = vec![T::zero(); scores.len()];
    softmax_into(scores, &mut weights);
    weights
}

/// Fraction of scores whose exponential is at or below `tol`.
///
/// Compares in log space (`v <= ln(tol)`), which is equivalent to
/// `exp(v) <= tol` without materialising the exponential. NaN scores count
/// as underflowed. Returns `0` for an empty slice.
pub fn underflow_fraction<T: Float>(scores: &[T], tol: T) -> T {
    if scores.is_empty() {
        return T::zero();
    }
    let log_tol = tol.ln();
    let count = scores.iter().filter(|&&v| !(v > log_tol)).count();
    T::from(count).unwrap_or_else(T::zero) / T::from(scores.len()).unwrap_or_else(T::one)
}
