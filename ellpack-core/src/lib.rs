//! # ELLPACK Core Library
//!
//! Provides the fixed-width (ELLPACK) sparse matrix store and the vector
//! primitives the linear solvers are built on.

// Declare modules
pub mod ellpack_matrix;
pub mod error;
pub mod traits;
pub mod vector;

// Re-export public types
pub use ellpack_matrix::{EllpackIter, EllpackMatrix, Triplet};
pub use error::{EllpackError, Result};
pub use traits::Matrix;
pub use vector::{dot, norm};
