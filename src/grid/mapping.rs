//! Local to global index mapping
//!
//! For every owned point and every ghost point of one component the
//! global row in the combined flux vector. Ghost points inside the
//! domain belong to a neighbouring process; ghost points across a
//! periodic boundary wrap to the opposite side; ghost points on a
//! non-periodic boundary carry no unknown and map to `None`.
use super::{Decomposition, HaloArray};
use crate::types::GlobalIndex;

/// Global index of every local and ghost point of one component
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMapping<const N: usize> {
    component: usize,
    indices: HaloArray<GlobalIndex, N>,
}

impl<const N: usize> IndexMapping<N> {
    /// Build the mapping of `component` for the process of `decomp`
    ///
    /// # Example
    ///```
    /// use rustcfd::grid::{Decomposition, IndexMapping};
    /// let dcp = Decomposition::serial([4, 4], [false, true]).unwrap();
    /// let map = IndexMapping::new(&dcp, 0);
    /// assert_eq!(map.get([0, 0]), Some(0));
    /// assert_eq!(map.get([-1, 0]), None);
    /// // periodic along y: the lower ghost is the last row
    /// assert_eq!(map.get([0, -1]), Some(9));
    ///```
    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn new(decomp: &Decomposition<N>, component: usize) -> Self {
        let extent = decomp.extent(component);
        let periodic = decomp.periodic();
        let mut indices = HaloArray::from_elem(decomp.patch(component), None);
        let points: Vec<[isize; N]> = indices.points().collect();
        for p in points {
            let mut global = [0; N];
            let mut inside = true;
            for a in 0..N {
                let n = extent[a] as isize;
                if (0..n).contains(&p[a]) {
                    global[a] = p[a] as usize;
                } else if periodic[a] {
                    global[a] = p[a].rem_euclid(n) as usize;
                } else {
                    inside = false;
                }
            }
            if inside {
                indices[p] = Some(decomp.global_index(component, global));
            }
        }
        Self { component, indices }
    }

    /// Component this mapping belongs to
    pub fn component(&self) -> usize {
        self.component
    }

    /// Global index of a local or ghost point
    pub fn get(&self, point: [isize; N]) -> GlobalIndex {
        self.indices[point]
    }

    /// Underlying halo array
    pub fn indices(&self) -> &HaloArray<GlobalIndex, N> {
        &self.indices
    }
}
