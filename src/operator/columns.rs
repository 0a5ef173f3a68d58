//! Stencil columns of one grid point
use crate::grid::{signed, IndexMapping};
use crate::types::GlobalIndex;

/// Global columns of the stencil at `point`, written to `cols` in the
/// order `[center, x-, x+, y-, y+, z-, z+]`.
///
/// Neighbours on other processes and periodic images are resolved by
/// the mapping; neighbours outside a non-periodic domain are `None`.
///
/// # Panics
/// `cols` is shorter than `2 * N + 1`
pub fn columns<const N: usize>(
    mapping: &IndexMapping<N>,
    point: [usize; N],
    cols: &mut [GlobalIndex],
) {
    let center = signed(point);
    cols[0] = mapping.get(center);
    for a in 0..N {
        let mut p = center;
        p[a] -= 1;
        cols[1 + 2 * a] = mapping.get(p);
        p[a] += 2;
        cols[2 + 2 * a] = mapping.get(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Decomposition;

    #[test]
    fn test_columns_2d() {
        let dcp = Decomposition::serial([4, 4], [false, false]).unwrap();
        let map = IndexMapping::new(&dcp, 0);
        let mut cols = [None; 5];
        // u has 3 x 4 points
        columns(&map, [1, 1], &mut cols);
        assert_eq!(cols, [Some(4), Some(3), Some(5), Some(1), Some(7)]);
        columns(&map, [0, 3], &mut cols);
        assert_eq!(cols, [Some(9), None, Some(10), Some(6), None]);
    }

    #[test]
    fn test_columns_3d_periodic() {
        let dcp = Decomposition::serial([3, 3, 3], [false, false, true]).unwrap();
        let map = IndexMapping::new(&dcp, 2);
        let mut cols = [None; 7];
        // w has 3 x 3 x 3 points, z wraps around
        columns(&map, [1, 1, 0], &mut cols);
        let u_v = 2 * 3 * 3 + 3 * 2 * 3;
        assert_eq!(cols[0], Some(u_v + 4));
        assert_eq!(cols[5], Some(u_v + 4 + 18));
        assert_eq!(cols[6], Some(u_v + 4 + 9));
    }
}
