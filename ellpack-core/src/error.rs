use thiserror::Error;

pub type Result<T> = core::result::Result<T, EllpackError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EllpackError {
    #[error("Row {row} is full ({max_nnz} non-zeros per row)")]
    CapacityExceeded { row: usize, max_nnz: usize },

    #[error("Index out of range: row {row}, col {col:?} for a {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: Option<usize>, // None for row-only operations
        rows: usize,
        cols: usize,
    },

    #[error("Invalid matrix dimensions: {0}")]
    InvalidDimensions(String),

    #[error("Row {row} has no usable diagonal entry")]
    MissingDiagonal { row: usize },

    #[error(
        "Algorithm did not converge after {iterations} iterations (residual norm {residual_norm:e}, tolerance {tolerance:e})"
    )]
    NonConvergence {
        iterations: usize,
        residual_norm: f64,
        tolerance: f64,
    },

    #[error("Numerical breakdown at iteration {iteration}: residual norm is {residual_norm}")]
    NumericalBreakdown {
        iteration: usize,
        residual_norm: f64,
    },

    #[error("Invalid parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}
