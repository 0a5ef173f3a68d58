//! Preallocation sizing of the distributed operator
use super::{columns, stencil_size, MAX_STENCIL};
use crate::grid::{Decomposition, IndexMapping};
use crate::types::GlobalIndex;
use std::ops::Range;

/// Split the columns of one row into (inside, outside) of the
/// ownership range `range`.
///
/// A `None` column counts as outside, so every row reserves its full
/// stencil.
///
/// # Example
///```
/// use rustcfd::operator::count_nonzeros;
/// let cols = [Some(5), Some(4), Some(9), None, Some(6)];
/// assert_eq!(count_nonzeros(&cols, &(4..8)), (3, 2));
///```
pub fn count_nonzeros(cols: &[GlobalIndex], range: &Range<usize>) -> (usize, usize) {
    let local = cols
        .iter()
        .filter(|c| matches!(c, Some(c) if range.contains(c)))
        .count();
    (local, cols.len() - local)
}

/// Nonzeros per local row, split into the local and the remote block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NnzProfile {
    /// Columns inside the ownership range, per local row
    pub local: Vec<usize>,
    /// Columns outside the ownership range, per local row
    pub remote: Vec<usize>,
    /// Number of rows profiled per component
    pub blocks: Vec<usize>,
}

impl NnzProfile {
    /// Visit all owned points of every component in block order and
    /// count their stencil columns.
    pub fn new<const N: usize>(decomp: &Decomposition<N>, mappings: &[IndexMapping<N>; N]) -> Self {
        let range = decomp.q_range();
        let size = stencil_size(N);
        let mut cols: [GlobalIndex; MAX_STENCIL] = [None; MAX_STENCIL];
        let mut local = Vec::with_capacity(decomp.local_size());
        let mut remote = Vec::with_capacity(decomp.local_size());
        let mut blocks = Vec::with_capacity(N);
        for (c, mapping) in mappings.iter().enumerate() {
            let patch = decomp.patch(c);
            for p in patch.points() {
                columns(mapping, p, &mut cols[..size]);
                let (d, o) = count_nonzeros(&cols[..size], &range);
                local.push(d);
                remote.push(o);
            }
            blocks.push(patch.len());
        }
        Self {
            local,
            remote,
            blocks,
        }
    }

    /// Number of profiled rows
    pub fn len(&self) -> usize {
        self.local.len()
    }

    /// No rows were profiled
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Total reserved nonzeros (local, remote)
    pub fn total(&self) -> (usize, usize) {
        (self.local.iter().sum(), self.remote.iter().sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mappings<const N: usize>(dcp: &Decomposition<N>) -> [IndexMapping<N>; N] {
        std::array::from_fn(|c| IndexMapping::new(dcp, c))
    }

    #[test]
    fn test_rows_reserve_full_stencil() {
        let dcp = Decomposition::serial([4, 5, 3], [false, true, false]).unwrap();
        let profile = NnzProfile::new(&dcp, &mappings(&dcp));
        assert_eq!(profile.len(), dcp.local_size());
        for (d, o) in profile.local.iter().zip(profile.remote.iter()) {
            assert_eq!(d + o, 7);
        }
        // serial run: every remote column is a wall
        assert_eq!(profile.blocks, vec![3 * 5 * 3, 4 * 5 * 3, 4 * 5 * 2]);
    }

    #[test]
    fn test_partition_boundary_is_remote() {
        let cells = [4, 4];
        let dcp = Decomposition::new(cells, [false, false], [2, 1], 0).unwrap();
        let profile = NnzProfile::new(&dcp, &mappings(&dcp));
        assert_eq!(profile.blocks, vec![8, 6]);
        let u = dcp.patch(0);
        // u at (1, 1): x+ neighbour lives on rank 1
        let row = u.linear([1, 1]);
        assert_eq!((profile.local[row], profile.remote[row]), (4, 1));
        // u at (0, 0): two wall neighbours
        let row = u.linear([0, 0]);
        assert_eq!((profile.local[row], profile.remote[row]), (3, 2));
        let (d, o) = profile.total();
        assert_eq!(d + o, 5 * profile.len());
    }
}
