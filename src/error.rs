//! Error type of `rustcfd`
use thiserror::Error;

/// Result alias used throughout this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while setting up the grid, assembling the
/// implicit operator or talking to a collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The process grid does not fit the mesh
    #[error("Invalid decomposition: {0}")]
    Decomposition(String),

    /// Inconsistent boundary description
    #[error("Invalid boundary condition: {0}")]
    Boundary(String),

    /// Simulation parameter out of range
    #[error("Invalid parameter: {0}")]
    Parameter(String),

    /// Array length does not match the local problem size
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Expected length
        expected: usize,
        /// Provided length
        actual: usize,
    },

    /// Row is outside of the ownership range of this process
    #[error("Row {row} not owned by this process (range {start}..{end})")]
    RowNotOwned {
        /// Global row
        row: usize,
        /// First owned row
        start: usize,
        /// One past the last owned row
        end: usize,
    },

    /// Insertion needs more nonzeros than were preallocated
    #[error("New nonzero in row {row}, column {col} exceeds preallocated capacity {capacity}")]
    Preallocation {
        /// Global row
        row: usize,
        /// Global column
        col: usize,
        /// Capacity of the block the column belongs to
        capacity: usize,
    },

    /// Column index beyond the global size
    #[error("Column {col} out of range for global size {size}")]
    ColumnOutOfRange {
        /// Global column
        col: usize,
        /// Global matrix size
        size: usize,
    },

    /// Operation needs an assembled matrix
    #[error("Matrix is not assembled")]
    NotAssembled,

    /// Matrix was already assembled, values can no longer be inserted
    #[error("Matrix is already assembled")]
    AlreadyAssembled,

    /// Matrix rows and the flux vector disagree on ownership
    #[error("Ownership mismatch: matrix rows {matrix:?}, flux vector {vector:?}")]
    Ownership {
        /// Row range of the matrix
        matrix: (usize, usize),
        /// Ownership range of the combined flux vector
        vector: (usize, usize),
    },

    /// Collective operation failed
    #[error("Communication failed: {0}")]
    Communication(String),
}

impl Error {
    /// Create a shape mismatch error
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { expected, actual }
    }
}
