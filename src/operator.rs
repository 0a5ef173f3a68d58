//! # Implicit viscous operator
//!
//! Discrete Laplacian of the staggered flux unknowns on a non-uniform
//! Cartesian grid and its conversion into the operator of the implicit
//! sub-step of a fractional step scheme,
//!
//! `A = MHat (I/dt - nu * alpha_implicit * L) RInv`
//!
//! - [`coefficients`]: 3-point non-uniform second difference per axis
//! - [`columns`]: global columns of the stencil of one point
//! - [`count_nonzeros`], [`NnzProfile`]: preallocation sizing
//! - [`assemble_laplacian`], [`to_implicit`], [`generate_a`]: assembly
//! - [`DiagonalScaling`]: the `MHat` and `RInv` diagonals
//!
//! Stencil columns and weights are ordered
//! `[center, x-, x+, y-, y+, z-, z+]`.
pub mod assemble;
pub mod coefficients;
pub mod columns;
pub mod diagonals;
pub mod nnz;
pub use assemble::{assemble_laplacian, generate_a, to_implicit};
pub use coefficients::coefficients;
pub use columns::columns;
pub use diagonals::DiagonalScaling;
pub use nnz::{count_nonzeros, NnzProfile};

/// Number of stencil entries in `N` dimensions
pub const fn stencil_size(ndim: usize) -> usize {
    2 * ndim + 1
}

/// Largest stencil (3D)
pub const MAX_STENCIL: usize = stencil_size(3);
