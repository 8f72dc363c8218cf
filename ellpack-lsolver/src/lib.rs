//! `ellpack-lsolver`: iterative linear equation solvers for ELLPACK sparse matrices.
//!
//! This library solves systems of linear equations of the form Ax = b on the CPU,
//! using matrices assembled with `ellpack-core`.

// Core modules
pub mod algorithms;

// Re-export from ellpack_core
pub use ellpack_core::{dot, norm, EllpackError, EllpackMatrix, Matrix, Triplet};
