use ellpack_core::{EllpackError, Matrix};
use num_traits::Float;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq)]
pub struct SolveResult<V: Float, M> {
    pub x: Vec<V>,   // Solution vector
    pub metadata: M, // Metadata about the solve process
}

// --- Algorithm Trait Definition ---
/// Trait representing a specific linear system solving algorithm.
/// Generic over the Matrix type it supports.
pub trait SolveAlgorithm<M: Matrix> {
    /// The numeric type the algorithm operates on (e.g., f32, f64).
    /// Must match the Matrix::Value type.
    type Value: Float + Debug;
    type Metadata: Debug;

    /// Solves the linear system Ax = b for x.
    ///
    /// # Arguments
    ///
    /// * `a` - The coefficient matrix A.
    /// * `b` - The right-hand side vector b.
    ///
    /// # Returns
    ///
    /// A `Result` containing the solution vector x and solve metadata, or an `EllpackError`.
    fn solve(
        &self,
        a: &M,
        b: &[Self::Value],
    ) -> Result<SolveResult<Self::Value, Self::Metadata>, EllpackError>;

    // Helper for input validation, can be called by implementations.
    fn validate_inputs(&self, a: &M, b: &[Self::Value]) -> Result<(), EllpackError> {
        let (rows, cols) = a.dims();
        if !a.is_square() {
            return Err(EllpackError::InvalidDimensions(format!(
                "Matrix A must be square (dims: {}x{})",
                rows, cols
            )));
        }
        if rows != b.len() {
            return Err(EllpackError::InvalidDimensions(format!(
                "Matrix A rows ({}) must match RHS vector b length ({})",
                rows,
                b.len()
            )));
        }
        Ok(())
    }
}

// --- Algorithm Implementations ---

pub mod jacobi; // Weighted Jacobi iteration

pub use jacobi::JacobiMetadata;

// --- Algorithm Struct Definitions ---

/// Weighted Jacobi iteration.
///
/// Also serves as the solver configuration: missing fields fall back to
/// the defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Jacobi {
    /// Stop once the residual norm `||b - Ax||` drops below this value.
    pub tolerance: f64,
    /// Upper bound on the number of sweeps.
    pub max_iterations: usize,
    /// Relaxation weight in (0, 1]; 1.0 is the plain Jacobi update.
    pub omega: f64,
}

impl Default for Jacobi {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 500,
            omega: 1.0,
        }
    }
}

impl Jacobi {
    /// Creates a new instance of the Jacobi algorithm with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new instance of the Jacobi algorithm with specified parameters.
    pub fn with_params(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    pub fn with_omega(mut self, omega: f64) -> Self {
        self.omega = omega;
        self
    }
}
