//! Local array with one layer of ghost points
//!
//! The owned points of a [`Patch`] plus a ghost layer on every face are
//! stored in one contiguous `ndarray`. Points are addressed by their
//! global grid coordinates; the ghost layer is reached with coordinates
//! `corner - 1` and `corner + size`, i.e. `-1` and `n` on the domain
//! boundary.
use super::Patch;
use ndarray::{ArrayD, IxDyn};
use std::ops::{Index, IndexMut};

/// Halo padded array, addressed by signed global coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct HaloArray<T, const N: usize> {
    patch: Patch<N>,
    data: ArrayD<T>,
}

impl<T: Clone, const N: usize> HaloArray<T, N> {
    /// Array over `patch` (plus ghosts), filled with `elem`
    pub fn from_elem(patch: Patch<N>, elem: T) -> Self {
        let shape: Vec<usize> = patch.size.iter().map(|s| s + 2).collect();
        Self {
            patch,
            data: ArrayD::from_elem(IxDyn(&shape), elem),
        }
    }
}

impl<T, const N: usize> HaloArray<T, N> {
    /// Owned points
    pub fn patch(&self) -> &Patch<N> {
        &self.patch
    }

    /// Backing buffer; entry `[0, 0, ..]` is the lower ghost corner
    pub fn as_array(&self) -> &ArrayD<T> {
        &self.data
    }

    /// `point` is an owned or a ghost point of this array
    #[allow(clippy::cast_possible_wrap)]
    pub fn contains(&self, point: [isize; N]) -> bool {
        (0..N).all(|a| {
            let lo = self.patch.corner[a] as isize - 1;
            let hi = (self.patch.corner[a] + self.patch.size[a]) as isize;
            point[a] >= lo && point[a] <= hi
        })
    }

    /// Iterate over all owned and ghost points
    #[allow(clippy::cast_possible_wrap)]
    pub fn points(&self) -> impl Iterator<Item = [isize; N]> {
        let padded = Patch::new([0; N], std::array::from_fn(|a| self.patch.size[a] + 2));
        let corner = self.patch.corner;
        padded
            .points()
            .map(move |p| std::array::from_fn(|a| p[a] as isize + corner[a] as isize - 1))
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn offset(&self, point: [isize; N]) -> [usize; N] {
        debug_assert!(
            self.contains(point),
            "{:?} outside of halo region of {:?}",
            point,
            self.patch
        );
        std::array::from_fn(|a| (point[a] - self.patch.corner[a] as isize + 1) as usize)
    }
}

impl<T, const N: usize> Index<[isize; N]> for HaloArray<T, N> {
    type Output = T;

    fn index(&self, point: [isize; N]) -> &T {
        let idx = self.offset(point);
        &self.data[&idx[..]]
    }
}

impl<T, const N: usize> IndexMut<[isize; N]> for HaloArray<T, N> {
    fn index_mut(&mut self, point: [isize; N]) -> &mut T {
        let idx = self.offset(point);
        &mut self.data[&idx[..]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ghost_addressing() {
        let patch = Patch::new([2, 0], [3, 2]);
        let mut arr = HaloArray::from_elem(patch, 0.);
        assert_eq!(arr.as_array().shape(), &[5, 4]);
        arr[[1, -1]] = 1.;
        arr[[5, 2]] = 2.;
        arr[[3, 0]] = 3.;
        assert_eq!(arr.as_array()[[0, 0]], 1.);
        assert_eq!(arr.as_array()[[4, 3]], 2.);
        assert_eq!(arr.as_array()[[2, 1]], 3.);
        assert!(arr.contains([1, -1]));
        assert!(!arr.contains([0, 0]));
        assert_eq!(arr.points().count(), 20);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_out_of_halo_panics() {
        let arr = HaloArray::from_elem(Patch::new([0, 0], [2, 2]), 0_u8);
        let _ = arr[[3, 0]];
    }
}
