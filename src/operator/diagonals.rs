//! Diagonal scaling of the implicit operator
//!
//! The Laplacian acts on fluxes. `RInv` converts a flux to a velocity
//! (divides by the face area), `MHat` multiplies by the distance
//! between the two pressure points straddling the flux point, so that
//! `MHat L RInv` becomes a symmetric operator on fluxes.
use crate::grid::Decomposition;
use crate::mesh::CartesianMesh;
use ndarray::Array1;

/// Left (`mhat`) and right (`rinv`) diagonal of the implicit operator,
/// one entry per owned row of the flux vector
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalScaling {
    /// Flux point spacing along the component direction
    pub mhat: Array1<f64>,
    /// Inverse face area
    pub rinv: Array1<f64>,
}

impl DiagonalScaling {
    /// Diagonals for the owned rows of `decomp`, in block order
    pub fn generate<const N: usize>(decomp: &Decomposition<N>, mesh: &CartesianMesh<N>) -> Self {
        let periodic = decomp.periodic();
        let mut mhat = Vec::with_capacity(decomp.local_size());
        let mut rinv = Vec::with_capacity(decomp.local_size());
        for c in 0..N {
            let dx = &mesh.dx[c];
            let n = dx.len();
            for p in decomp.patch(c).points() {
                let i = p[c];
                let next = if periodic[c] { (i + 1) % n } else { i + 1 };
                mhat.push(0.5 * (dx[i] + dx[next]));
                rinv.push(1. / mesh.face_area(c, p));
            }
        }
        Self {
            mhat: Array1::from(mhat),
            rinv: Array1::from(rinv),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(result: f64, expected: f64) {
        let dif = 1e-12;
        if (expected - result).abs() > dif {
            panic!("Large difference of values, got {} expected {}.", result, expected)
        }
    }

    #[test]
    fn test_uniform_diagonals() {
        let mesh = CartesianMesh::uniform([4, 4], [1., 1.]);
        let dcp = Decomposition::serial(mesh.cells(), [false, false]).unwrap();
        let d = DiagonalScaling::generate(&dcp, &mesh);
        assert_eq!(d.mhat.len(), 24);
        for (m, r) in d.mhat.iter().zip(d.rinv.iter()) {
            approx_eq(*m, 0.25);
            approx_eq(*r, 4.);
        }
    }

    #[test]
    fn test_nonuniform_periodic() {
        let dx = [
            Array1::from(vec![1., 2., 3.]),
            Array1::from(vec![0.5, 0.25]),
        ];
        let mesh = CartesianMesh::from_widths(dx).unwrap();
        let dcp = Decomposition::serial(mesh.cells(), [true, false]).unwrap();
        let d = DiagonalScaling::generate(&dcp, &mesh);
        // u: 3 x 2 points, the last one wraps to the first cell
        approx_eq(d.mhat[0], 1.5);
        approx_eq(d.mhat[2], 2.);
        approx_eq(d.rinv[0], 2.);
        approx_eq(d.rinv[3], 4.);
        // v: 3 x 1 points
        approx_eq(d.mhat[6], 0.375);
        approx_eq(d.rinv[8], 1. / 3.);
    }
}
