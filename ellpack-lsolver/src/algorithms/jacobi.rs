use ellpack_core::{norm, EllpackError, EllpackMatrix};
use log::{debug, info, warn};
use num_traits::Float;
use std::fmt::Debug;
use std::mem;

use super::{Jacobi, SolveAlgorithm, SolveResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JacobiMetadata {
    pub iterations: usize,
    pub residual_norm: f64,
    pub tolerance: f64,
    /// False when `max_iterations` was reached before the tolerance.
    pub converged: bool,
}

impl<T: Float + Debug> SolveAlgorithm<EllpackMatrix<T>> for Jacobi {
    type Value = T;
    type Metadata = JacobiMetadata;

    /// Solves `Ax = b` starting from `x = 0`.
    fn solve(
        &self,
        a: &EllpackMatrix<T>,
        b: &[T],
    ) -> Result<SolveResult<Self::Value, Self::Metadata>, EllpackError> {
        let x0 = vec![T::zero(); a.cols()];
        self.solve_from(a, b, &x0)
    }
}

impl Jacobi {
    /// Solves `Ax = b` starting from the initial guess `x0`.
    ///
    /// Every sweep computes the next iterate entirely from the previous one:
    /// `x_next[i] = (1 - omega) * x[i] + omega * (b[i] - sum_{j != i} a_ij * x[j]) / a_ii`.
    /// Convergence is judged on the residual norm `||b - A x_next||` after each sweep.
    ///
    /// Running out of iterations is not an error: the last iterate is returned with
    /// `metadata.converged == false`. Use [`SolveResult::ensure_converged`] to reject it.
    ///
    /// # Errors
    /// * `InvalidParameter` if `tolerance` or `omega` is out of range.
    /// * `InvalidDimensions` if A is not square or `b`/`x0` do not match it.
    /// * `MissingDiagonal` if a diagonal entry is absent or zero.
    /// * `NumericalBreakdown` if the residual norm stops being finite.
    pub fn solve_from<T: Float + Debug>(
        &self,
        a: &EllpackMatrix<T>,
        b: &[T],
        x0: &[T],
    ) -> Result<SolveResult<T, JacobiMetadata>, EllpackError> {
        self.validate_params()?;
        <Self as SolveAlgorithm<EllpackMatrix<T>>>::validate_inputs(self, a, b)?;
        if x0.len() != a.cols() {
            return Err(EllpackError::InvalidDimensions(format!(
                "Initial guess length ({}) must match matrix columns ({})",
                x0.len(),
                a.cols()
            )));
        }
        let omega = T::from(self.omega).ok_or(EllpackError::InvalidParameter {
            name: "omega",
            value: self.omega,
        })?;

        let n = a.rows();
        let diag = a.diagonal()?;

        let mut x = x0.to_vec();
        let mut x_next = vec![T::zero(); n];
        let mut r = vec![T::zero(); n];

        info!(
            "Jacobi: {}x{} system, tolerance {:e}, max_iterations {}, omega {}",
            n,
            n,
            self.tolerance,
            self.max_iterations,
            self.omega
        );
        let mut residual_norm = compute_residual_norm(a, b, &x, &mut r)?;
        info!("Jacobi initial residual norm: {:e}", residual_norm);
        if !residual_norm.is_finite() {
            warn!("Jacobi initial residual norm is not finite: {}", residual_norm);
            return Err(EllpackError::NumericalBreakdown {
                iteration: 0,
                residual_norm,
            });
        }

        let mut iterations = 0;
        let mut converged = residual_norm < self.tolerance;
        while !converged && iterations < self.max_iterations {
            sweep(a, b, &diag, omega, &x, &mut x_next)?;
            mem::swap(&mut x, &mut x_next);
            iterations += 1;

            residual_norm = compute_residual_norm(a, b, &x, &mut r)?;
            debug!("Iteration {}: residual norm = {:e}", iterations, residual_norm);
            if !residual_norm.is_finite() {
                warn!(
                    "Jacobi diverged at iteration {}: residual norm is {}",
                    iterations, residual_norm
                );
                return Err(EllpackError::NumericalBreakdown {
                    iteration: iterations,
                    residual_norm,
                });
            }
            converged = residual_norm < self.tolerance;
        }

        if converged {
            info!(
                "Jacobi converged in {} iterations (residual norm {:e})",
                iterations, residual_norm
            );
        } else {
            warn!(
                "Jacobi reached maximum iterations ({}) without converging. Residual norm: {:e}",
                self.max_iterations, residual_norm
            );
        }

        Ok(SolveResult {
            x,
            metadata: JacobiMetadata {
                iterations,
                residual_norm,
                tolerance: self.tolerance,
                converged,
            },
        })
    }

    fn validate_params(&self) -> Result<(), EllpackError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(EllpackError::InvalidParameter {
                name: "tolerance",
                value: self.tolerance,
            });
        }
        if !(self.omega.is_finite() && self.omega > 0.0 && self.omega <= 1.0) {
            return Err(EllpackError::InvalidParameter {
                name: "omega",
                value: self.omega,
            });
        }
        Ok(())
    }
}

impl<T: Float> SolveResult<T, JacobiMetadata> {
    /// Turns an unconverged result into `EllpackError::NonConvergence`.
    pub fn ensure_converged(self) -> Result<Self, EllpackError> {
        if self.metadata.converged {
            Ok(self)
        } else {
            Err(EllpackError::NonConvergence {
                iterations: self.metadata.iterations,
                residual_norm: self.metadata.residual_norm,
                tolerance: self.metadata.tolerance,
            })
        }
    }
}

/// One synchronous Jacobi sweep. Reads only `x`, writes only `x_next`.
fn sweep<T: Float + Debug>(
    a: &EllpackMatrix<T>,
    b: &[T],
    diag: &[T],
    omega: T,
    x: &[T],
    x_next: &mut [T],
) -> Result<(), EllpackError> {
    for (i, xi_next) in x_next.iter_mut().enumerate() {
        let off_diagonal = a
            .row_entries(i)?
            .filter(|&(col, _)| col != i)
            .fold(T::zero(), |acc, (col, value)| acc + value * x[col]);
        let update = (b[i] - off_diagonal) / diag[i];
        *xi_next = (T::one() - omega) * x[i] + omega * update;
    }
    Ok(())
}

/// Writes `b - A x` into `r` and returns its norm.
fn compute_residual_norm<T: Float + Debug>(
    a: &EllpackMatrix<T>,
    b: &[T],
    x: &[T],
    r: &mut [T],
) -> Result<f64, EllpackError> {
    a.mvp(x, r)?;
    for (ri, &bi) in r.iter_mut().zip(b) {
        *ri = bi - *ri;
    }
    let n = r.len();
    Ok(norm(r, n)?.to_f64().unwrap_or(f64::NAN))
}
