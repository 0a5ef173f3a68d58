//! # Distributed sparse matrix
//!
//! The operator assembler only talks to the sparse matrix through
//! [`DistributedMatrix`]. Rows are distributed over the processes in
//! contiguous ranges; each process inserts the rows it owns, the
//! columns may belong to any process.
//!
//! [`AijMatrix`] is a row-distributed store with separately preallocated
//! local and remote column blocks per row.
#![allow(clippy::module_name_repetitions)]
pub mod aij;
pub use aij::AijMatrix;

use crate::error::Result;
use crate::types::GlobalIndex;
use ndarray::Array1;
use std::ops::Range;

/// Life cycle of a row-distributed sparse matrix
///
/// create -> preallocate -> `set_row`* -> assemble -> scale / shift /
/// `diagonal_scale`
pub trait DistributedMatrix<'a>: Sized {
    /// Communicator the matrix lives on
    type Comm;

    /// Square matrix with `local_size` rows on this process; the global
    /// size is the sum over all processes.
    ///
    /// # Errors
    /// Collective failed
    fn create(comm: &'a Self::Comm, local_size: usize) -> Result<Self>;

    /// Reserve `d_nnz[i]` columns inside and `o_nnz[i]` columns outside
    /// of the ownership range for local row `i`.
    ///
    /// # Errors
    /// Lengths differ from the local size
    fn preallocate(&mut self, d_nnz: &[usize], o_nnz: &[usize]) -> Result<()>;

    /// Insert values of one row, overwriting existing entries. `None`
    /// columns are skipped.
    ///
    /// # Errors
    /// Row not owned, column out of range, preallocation exceeded
    fn set_row(&mut self, row: usize, cols: &[GlobalIndex], values: &[f64]) -> Result<()>;

    /// Finish insertion. Collective.
    ///
    /// # Errors
    /// Collective failed
    fn assemble(&mut self) -> Result<()>;

    /// Multiply every entry by `alpha`
    ///
    /// # Errors
    /// Matrix is not assembled
    fn scale(&mut self, alpha: f64) -> Result<()>;

    /// Add `alpha` to the diagonal
    ///
    /// # Errors
    /// Matrix is not assembled, or a missing diagonal entry does not fit
    fn shift(&mut self, alpha: f64) -> Result<()>;

    /// A <- diag(left) * A * diag(right). Both vectors are distributed
    /// like the rows.
    ///
    /// # Errors
    /// Matrix is not assembled, shape mismatch, collective failed
    fn diagonal_scale(&mut self, left: &Array1<f64>, right: &Array1<f64>) -> Result<()>;

    /// Global rows owned by this process
    fn row_range(&self) -> Range<usize>;
}
