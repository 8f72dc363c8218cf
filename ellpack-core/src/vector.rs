//! Dense vector primitives used by the matrix algorithms.

use crate::error::{EllpackError, Result};
use num_traits::Float;

/// Computes `sum(y[i] * x[i])` over the first `n` elements.
///
/// # Errors
/// Returns `InvalidDimensions` if either slice holds fewer than `n` elements.
pub fn dot<T: Float>(y: &[T], x: &[T], n: usize) -> Result<T> {
    if y.len() < n || x.len() < n {
        return Err(EllpackError::InvalidDimensions(format!(
            "dot of length {} needs vectors of at least that length (y={}, x={})",
            n,
            y.len(),
            x.len()
        )));
    }
    Ok(y[..n]
        .iter()
        .zip(&x[..n])
        .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
}

/// Euclidean norm of the first `n` elements of `x`.
pub fn norm<T: Float>(x: &[T], n: usize) -> Result<T> {
    Ok(dot(x, x, n)?.sqrt())
}
