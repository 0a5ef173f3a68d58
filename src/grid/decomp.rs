//! Domain decomposition of a staggered grid
//!
//! The cells are split into blocks along each axis, the processes form a
//! Cartesian process grid (rank = x + y * px + z * px * py). Every
//! velocity component inherits the cell split; a component which sits on
//! the faces normal to a non-periodic axis has one point less than there
//! are cells, which is taken from the last process along that axis.
//!
//! The combined flux vector is numbered rank by rank. Within a rank the
//! component blocks follow each other (u, then v, then w) and each block
//! is ordered with x running fastest.
use super::{Face, Side};
use crate::error::{Error, Result};
use crate::mesh::points_along;
use std::ops::Range;

/// Rectangular block of grid points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch<const N: usize> {
    /// First point along each axis
    pub corner: [usize; N],
    /// Number of points along each axis
    pub size: [usize; N],
}

impl<const N: usize> Patch<N> {
    /// New patch
    pub fn new(corner: [usize; N], size: [usize; N]) -> Self {
        Self { corner, size }
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.size.iter().product()
    }

    /// Patch has no points
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point lies inside the patch
    pub fn contains(&self, point: [usize; N]) -> bool {
        (0..N).all(|a| point[a] >= self.corner[a] && point[a] < self.corner[a] + self.size[a])
    }

    /// Position of `point` in the x-fastest ordering of the patch
    pub fn linear(&self, point: [usize; N]) -> usize {
        debug_assert!(self.contains(point), "{:?} outside of {:?}", point, self);
        let mut idx = 0;
        for a in (0..N).rev() {
            idx = idx * self.size[a] + (point[a] - self.corner[a]);
        }
        idx
    }

    /// Inverse of [`Patch::linear`]
    pub fn point(&self, mut linear: usize) -> [usize; N] {
        let mut point = [0; N];
        for a in 0..N {
            point[a] = self.corner[a] + linear % self.size[a];
            linear /= self.size[a];
        }
        point
    }

    /// Iterate over all points, x fastest
    pub fn points(&self) -> impl Iterator<Item = [usize; N]> {
        let patch = *self;
        (0..self.len()).map(move |l| patch.point(l))
    }

    /// Layer of points at `index` along `axis`
    pub fn layer(&self, axis: usize, index: usize) -> Self {
        let mut layer = *self;
        layer.corner[axis] = index;
        layer.size[axis] = 1;
        layer
    }
}

/// Process grid and ownership of the staggered components
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition<const N: usize> {
    rank: usize,
    procs: [usize; N],
    coords: [usize; N],
    periodic: [bool; N],
    /// Global number of points, per component and axis
    extents: [[usize; N]; N],
    /// Ownership bounds per component and axis (`procs[axis] + 1` entries)
    bounds: [[Vec<usize>; N]; N],
    /// First row of every rank in the combined vector, plus the total
    offsets: Vec<usize>,
}

impl<const N: usize> Decomposition<N> {
    /// Split a grid of `cells` cells across a `procs` process grid and
    /// return the view of `rank`.
    ///
    /// # Errors
    /// - process grid does not contain `rank`
    /// - a process would own no point of some component
    ///
    /// # Example
    ///```
    /// use rustcfd::grid::Decomposition;
    /// let dcp = Decomposition::new([8, 6], [false, false], [2, 1], 1).unwrap();
    /// // u has 7 points along x, the last process gets 3 of them
    /// assert_eq!(dcp.patch(0).corner, [4, 0]);
    /// assert_eq!(dcp.patch(0).size, [3, 6]);
    /// assert_eq!(dcp.q_range(), 44..82);
    ///```
    pub fn new(
        cells: [usize; N],
        periodic: [bool; N],
        procs: [usize; N],
        rank: usize,
    ) -> Result<Self> {
        let nprocs: usize = procs.iter().product();
        if procs.iter().any(|&p| p == 0) || rank >= nprocs {
            return Err(Error::Decomposition(format!(
                "Rank {} not part of process grid {:?}",
                rank, procs
            )));
        }
        for a in 0..N {
            if cells[a] < procs[a] {
                return Err(Error::Decomposition(format!(
                    "{} processes along axis {}, but only {} cells",
                    procs[a], a, cells[a]
                )));
            }
        }

        let extents: [[usize; N]; N] = std::array::from_fn(|c| {
            std::array::from_fn(|a| points_along(cells[a], periodic[a], c, a))
        });
        let bounds: [[Vec<usize>; N]; N] = std::array::from_fn(|c| {
            std::array::from_fn(|a| {
                let mut b = split(cells[a], procs[a]);
                b[procs[a]] = extents[c][a];
                b
            })
        });
        for (c, bc) in bounds.iter().enumerate() {
            for (a, b) in bc.iter().enumerate() {
                if b.windows(2).any(|w| w[1] <= w[0]) {
                    return Err(Error::Decomposition(format!(
                        "Component {} has no points on some process along axis {}",
                        c, a
                    )));
                }
            }
        }

        let mut dcp = Self {
            rank,
            procs,
            coords: rank_coords(rank, procs),
            periodic,
            extents,
            bounds,
            offsets: Vec::new(),
        };
        let mut offsets = vec![0; nprocs + 1];
        for r in 0..nprocs {
            let q = rank_coords(r, procs);
            offsets[r + 1] = offsets[r] + (0..N).map(|c| dcp.patch_of(c, q).len()).sum::<usize>();
        }
        dcp.offsets = offsets;
        Ok(dcp)
    }

    /// Whole grid on a single process
    ///
    /// # Errors
    /// Grid is too small to hold every component
    pub fn serial(cells: [usize; N], periodic: [bool; N]) -> Result<Self> {
        Self::new(cells, periodic, [1; N], 0)
    }

    /// Rank of this process
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Total number of processes
    pub fn nprocs(&self) -> usize {
        self.procs.iter().product()
    }

    /// Processes along each axis
    pub fn procs(&self) -> [usize; N] {
        self.procs
    }

    /// Position of this rank in the process grid
    pub fn coords(&self) -> [usize; N] {
        self.coords
    }

    /// Periodicity along each axis
    pub fn periodic(&self) -> [bool; N] {
        self.periodic
    }

    /// Global number of points of `component` along each axis
    pub fn extent(&self, component: usize) -> [usize; N] {
        self.extents[component]
    }

    /// Points of `component` owned by this process
    pub fn patch(&self, component: usize) -> Patch<N> {
        self.patch_of(component, self.coords)
    }

    /// Points of `component` owned by the process at `coords`
    pub fn patch_of(&self, component: usize, coords: [usize; N]) -> Patch<N> {
        let b = &self.bounds[component];
        Patch::new(
            std::array::from_fn(|a| b[a][coords[a]]),
            std::array::from_fn(|a| b[a][coords[a] + 1] - b[a][coords[a]]),
        )
    }

    /// This process holds the points of `component` adjacent to `face`
    pub fn owns_face(&self, component: usize, face: Face) -> bool {
        let patch = self.patch(component);
        let a = face.axis;
        match face.side {
            Side::Minus => patch.corner[a] == 0,
            Side::Plus => patch.corner[a] + patch.size[a] == self.extents[component][a],
        }
    }

    /// Number of rows of the combined flux vector owned by this process
    pub fn local_size(&self) -> usize {
        self.offsets[self.rank + 1] - self.offsets[self.rank]
    }

    /// Size of the combined flux vector
    pub fn global_size(&self) -> usize {
        self.offsets[self.nprocs()]
    }

    /// Ownership range `[qStart, qEnd)` of the combined flux vector
    pub fn q_range(&self) -> Range<usize> {
        self.offsets[self.rank]..self.offsets[self.rank + 1]
    }

    /// Rows owned by every rank
    pub fn local_sizes(&self) -> Vec<usize> {
        self.offsets.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Global row of `point` of `component`. The point must lie inside
    /// the global extent.
    pub fn global_index(&self, component: usize, point: [usize; N]) -> usize {
        let owner: [usize; N] = std::array::from_fn(|a| {
            self.bounds[component][a].partition_point(|&b| b <= point[a]) - 1
        });
        let rank = rank_of(owner, self.procs);
        let preceding: usize = (0..component).map(|c| self.patch_of(c, owner).len()).sum();
        self.offsets[rank] + preceding + self.patch_of(component, owner).linear(point)
    }
}

/// Split `n` into `p` contiguous chunks, remainder to the first chunks.
/// Returns the `p + 1` bounds.
fn split(n: usize, p: usize) -> Vec<usize> {
    let (base, rem) = (n / p, n % p);
    let mut bounds = vec![0; p + 1];
    for q in 0..p {
        bounds[q + 1] = bounds[q] + base + usize::from(q < rem);
    }
    bounds
}

fn rank_coords<const N: usize>(rank: usize, procs: [usize; N]) -> [usize; N] {
    let mut rest = rank;
    std::array::from_fn(|a| {
        let q = rest % procs[a];
        rest /= procs[a];
        q
    })
}

fn rank_of<const N: usize>(coords: [usize; N], procs: [usize; N]) -> usize {
    (0..N).rev().fold(0, |acc, a| acc * procs[a] + coords[a])
}
