//! # Distributed structured grid
//!
//! Bookkeeping for a Cartesian grid which is split into rectangular
//! blocks, one per process:
//!
//! - [`Face`]: the `2*N` faces of the domain
//! - [`Patch`]: the block of grid points owned by a process
//! - [`Decomposition`]: process grid, ownership of every staggered
//!   component and of the combined flux vector
//! - [`HaloArray`]: local array plus one layer of ghost points, addressed
//!   by global grid coordinates
//! - [`IndexMapping`]: global unknown index of every local and ghost point
pub mod decomp;
pub mod halo;
pub mod mapping;
pub use decomp::{Decomposition, Patch};
pub use halo::HaloArray;
pub use mapping::IndexMapping;

/// Side of a face along its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Lower end of the axis
    Minus,
    /// Upper end of the axis
    Plus,
}

/// Face of the computational domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Face {
    /// Axis normal to the face
    pub axis: usize,
    /// Lower or upper end
    pub side: Side,
}

impl Face {
    /// -X
    pub const X_MINUS: Face = Face::new(0, Side::Minus);
    /// +X
    pub const X_PLUS: Face = Face::new(0, Side::Plus);
    /// -Y
    pub const Y_MINUS: Face = Face::new(1, Side::Minus);
    /// +Y
    pub const Y_PLUS: Face = Face::new(1, Side::Plus);
    /// -Z
    pub const Z_MINUS: Face = Face::new(2, Side::Minus);
    /// +Z
    pub const Z_PLUS: Face = Face::new(2, Side::Plus);

    /// New face normal to `axis`
    pub const fn new(axis: usize, side: Side) -> Self {
        Self { axis, side }
    }

    /// Position in the order -X, +X, -Y, +Y, -Z, +Z
    pub const fn index(&self) -> usize {
        match self.side {
            Side::Minus => 2 * self.axis,
            Side::Plus => 2 * self.axis + 1,
        }
    }

    /// All faces of an `ndim` dimensional domain, in the order of
    /// [`Face::index`]
    pub fn all(ndim: usize) -> impl Iterator<Item = Face> {
        (0..ndim).flat_map(|axis| [Face::new(axis, Side::Minus), Face::new(axis, Side::Plus)])
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = match self.side {
            Side::Minus => '-',
            Side::Plus => '+',
        };
        let name = ['X', 'Y', 'Z'].get(self.axis).copied().unwrap_or('?');
        write!(f, "{}{}", sign, name)
    }
}

/// Convert grid coordinates to signed coordinates, which can address
/// ghost points
#[allow(clippy::cast_possible_wrap)]
pub fn signed<const N: usize>(point: [usize; N]) -> [isize; N] {
    std::array::from_fn(|axis| point[axis] as isize)
}
