//! Assembly of the implicit operator
//!
//! Two passes over the owned points: the sizing pass
//! ([`NnzProfile`]) and the fill pass. Both visit the components in
//! block order (u, v, w) and the points of a block x fastest, since the
//! preallocation arrays are positional.
use super::{coefficients, columns, stencil_size, DiagonalScaling, NnzProfile, MAX_STENCIL};
use crate::error::{Error, Result};
use crate::grid::{Decomposition, IndexMapping};
use crate::matrix::DistributedMatrix;
use crate::mesh::StaggeredSpacing;
use crate::navier_stokes::SimulationParameters;
use crate::types::GlobalIndex;

/// Assemble the discrete Laplacian of all flux components.
///
/// # Errors
/// Matrix creation, preallocation or insertion failed, or the matrix
/// rows are distributed differently from the flux vector.
pub fn assemble_laplacian<'a, M, const N: usize>(
    comm: &'a M::Comm,
    decomp: &Decomposition<N>,
    mappings: &[IndexMapping<N>; N],
    spacing: &StaggeredSpacing<N>,
) -> Result<M>
where
    M: DistributedMatrix<'a>,
{
    let range = decomp.q_range();
    let profile = NnzProfile::new(decomp, mappings);
    let (d_nnz, o_nnz) = profile.total();
    log::debug!(
        "Operator rows {}..{}: reserving {} local and {} remote nonzeros",
        range.start,
        range.end,
        d_nnz,
        o_nnz
    );

    let mut mat = M::create(comm, decomp.local_size())?;
    let rows = mat.row_range();
    if rows != range {
        return Err(Error::Ownership {
            matrix: (rows.start, rows.end),
            vector: (range.start, range.end),
        });
    }
    mat.preallocate(&profile.local, &profile.remote)?;

    let size = stencil_size(N);
    let mut cols: [GlobalIndex; MAX_STENCIL] = [None; MAX_STENCIL];
    let mut values = [0_f64; MAX_STENCIL];
    let mut row = range.start;
    for (c, mapping) in mappings.iter().enumerate() {
        let block_start = row;
        for p in decomp.patch(c).points() {
            columns(mapping, p, &mut cols[..size]);
            let (minus, plus) = spacing.around(c, p);
            coefficients(minus, plus, &mut values[..size]);
            debug_assert_eq!(cols[0], Some(row), "Fill pass out of order");
            mat.set_row(row, &cols[..size], &values[..size])?;
            row += 1;
        }
        debug_assert_eq!(
            row - block_start,
            profile.blocks[c],
            "Sizing and fill pass disagree on component {}",
            c
        );
    }
    mat.assemble()?;
    Ok(mat)
}

/// Turn the Laplacian `L` into `MHat (I/dt - nu alpha_implicit L) RInv`
///
/// The order scale, shift, negate, diagonal scale is significant.
///
/// # Errors
/// Matrix is not assembled, or the diagonals do not match its rows
pub fn to_implicit<'a, M>(
    mat: &mut M,
    nu: f64,
    params: &SimulationParameters,
    diagonals: &DiagonalScaling,
) -> Result<()>
where
    M: DistributedMatrix<'a>,
{
    mat.scale(nu * params.alpha_implicit)?;
    mat.shift(-1. / params.dt)?;
    mat.scale(-1.)?;
    mat.diagonal_scale(&diagonals.mhat, &diagonals.rinv)
}

/// Build the implicit operator of the viscous sub-step
///
/// # Errors
/// See [`assemble_laplacian`] and [`to_implicit`]
///
/// # Example
///```
/// use rustcfd::comm::SelfComm;
/// use rustcfd::grid::{Decomposition, IndexMapping};
/// use rustcfd::matrix::AijMatrix;
/// use rustcfd::mesh::{CartesianMesh, StaggeredSpacing};
/// use rustcfd::navier_stokes::SimulationParameters;
/// use rustcfd::operator::{generate_a, DiagonalScaling};
/// let comm = SelfComm;
/// let mesh = CartesianMesh::uniform([4, 4], [1., 1.]);
/// let dcp = Decomposition::serial(mesh.cells(), [false, false]).unwrap();
/// let maps = [IndexMapping::new(&dcp, 0), IndexMapping::new(&dcp, 1)];
/// let spacing = StaggeredSpacing::new(&mesh, [false, false]);
/// let diag = DiagonalScaling::generate(&dcp, &mesh);
/// let params = SimulationParameters::new(0.01, 10, 0, 1.5, 0.5).unwrap();
/// let a: AijMatrix<SelfComm> =
///     generate_a(&comm, &dcp, &maps, &spacing, &diag, 1., &params).unwrap();
/// // interior u point (1, 1): -(0.5 * (-64) - 100)
/// assert!((a.get(4, 4).unwrap() - 132.).abs() < 1e-10);
///```
pub fn generate_a<'a, M, const N: usize>(
    comm: &'a M::Comm,
    decomp: &Decomposition<N>,
    mappings: &[IndexMapping<N>; N],
    spacing: &StaggeredSpacing<N>,
    diagonals: &DiagonalScaling,
    nu: f64,
    params: &SimulationParameters,
) -> Result<M>
where
    M: DistributedMatrix<'a>,
{
    let mut mat: M = assemble_laplacian(comm, decomp, mappings, spacing)?;
    to_implicit(&mut mat, nu, params, diagonals)?;
    Ok(mat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{EmulatedComm, SelfComm};
    use crate::matrix::AijMatrix;
    use crate::mesh::CartesianMesh;
    use ndarray::Array1;
    use std::f64::consts::PI;

    fn approx_eq(result: f64, expected: f64) {
        let dif = 1e-10 * expected.abs().max(1.);
        if (expected - result).abs() > dif {
            panic!("Large difference of values, got {} expected {}.", result, expected)
        }
    }

    struct Setup<const N: usize> {
        mesh: CartesianMesh<N>,
        dcp: Decomposition<N>,
        maps: [IndexMapping<N>; N],
        spacing: StaggeredSpacing<N>,
    }

    impl<const N: usize> Setup<N> {
        fn new(mesh: CartesianMesh<N>, periodic: [bool; N], procs: [usize; N], rank: usize) -> Self {
            let dcp = Decomposition::new(mesh.cells(), periodic, procs, rank).unwrap();
            let maps = std::array::from_fn(|c| IndexMapping::new(&dcp, c));
            let spacing = StaggeredSpacing::new(&mesh, periodic);
            Self {
                mesh,
                dcp,
                maps,
                spacing,
            }
        }
    }

    fn cavity() -> Setup<2> {
        Setup::new(CartesianMesh::uniform([4, 4], [1., 1.]), [false; 2], [1; 2], 0)
    }

    #[test]
    fn test_laplacian_4x4() {
        let s = cavity();
        let comm = SelfComm;
        let l: AijMatrix<SelfComm> =
            assemble_laplacian(&comm, &s.dcp, &s.maps, &s.spacing).unwrap();
        assert_eq!(l.global_size(), 24);
        // interior u row (1, 1) = 4
        approx_eq(l.get(4, 4).unwrap(), -64.);
        approx_eq(l.get(4, 3).unwrap(), 16.);
        approx_eq(l.get(4, 7).unwrap(), 16.);
        // u row (1, 0): half cell towards the wall along y
        approx_eq(l.get(1, 1).unwrap(), -32. - 64.);
        approx_eq(l.get(1, 4).unwrap(), 2. / (0.25 * 0.375));
        // wall columns are dropped
        assert_eq!(l.row(1).unwrap().len(), 4);
    }

    #[test]
    fn test_implicit_diagonal_4x4() {
        let s = cavity();
        let comm = SelfComm;
        let params = SimulationParameters::new(0.01, 1, 0, 1.5, 0.5).unwrap();
        let diag = DiagonalScaling::generate(&s.dcp, &s.mesh);
        let a: AijMatrix<SelfComm> =
            generate_a(&comm, &s.dcp, &s.maps, &s.spacing, &diag, 1., &params).unwrap();
        for c in 0..2 {
            for p in s.dcp.patch(c).points() {
                let row = s.dcp.global_index(c, p);
                // rows not adjacent to a transverse wall
                let t = 1 - c;
                if p[t] > 0 && p[t] < 3 {
                    // MHat * RInv = 1 on this grid
                    approx_eq(a.get(row, row).unwrap(), 132.);
                }
            }
        }
        approx_eq(a.get(4, 3).unwrap(), -8.);
        approx_eq(a.get(1, 1).unwrap(), 148.);
    }

    /// Periodic unit square with smoothly varying cell widths, edges at
    /// `xi + 0.3 sin(2 pi xi) / (2 pi)` for equidistant `xi`
    fn smooth_periodic(n: usize) -> CartesianMesh<2> {
        let edge = |i: usize| {
            let xi = i as f64 / n as f64;
            xi + 0.3 * (2. * PI * xi).sin() / (2. * PI)
        };
        let dx = Array1::from_iter((0..n).map(|i| edge(i + 1) - edge(i)));
        CartesianMesh::from_widths([dx.clone(), dx]).unwrap()
    }

    /// Maximum error of the discrete Laplacian of `sin(2 pi x) cos(2 pi y)`
    /// relative to the maximum of the exact one
    fn laplacian_error(n: usize) -> f64 {
        let s = Setup::new(smooth_periodic(n), [true; 2], [1; 2], 0);
        let comm = SelfComm;
        let l: AijMatrix<SelfComm> =
            assemble_laplacian(&comm, &s.dcp, &s.maps, &s.spacing).unwrap();
        let edges = [s.mesh.edges(0), s.mesh.edges(1)];
        // normal axis on the face, others at the cell centre
        let position = |c: usize, p: [usize; 2]| -> [f64; 2] {
            std::array::from_fn(|a| {
                if a == c {
                    edges[a][p[a] + 1]
                } else {
                    0.5 * (edges[a][p[a]] + edges[a][p[a] + 1])
                }
            })
        };
        let f = |x: [f64; 2]| (2. * PI * x[0]).sin() * (2. * PI * x[1]).cos();

        let mut q = Array1::zeros(s.dcp.local_size());
        for c in 0..2 {
            for p in s.dcp.patch(c).points() {
                q[s.dcp.global_index(c, p)] = f(position(c, p));
            }
        }
        let lq = l.mult(&q).unwrap();
        let (mut err, mut norm) = (0_f64, 0_f64);
        for c in 0..2 {
            for p in s.dcp.patch(c).points() {
                let exact = -8. * PI * PI * f(position(c, p));
                err = err.max((lq[s.dcp.global_index(c, p)] - exact).abs());
                norm = norm.max(exact.abs());
            }
        }
        err / norm
    }

    #[test]
    fn test_laplacian_accuracy_stretched_periodic() {
        let coarse = laplacian_error(16);
        let fine = laplacian_error(32);
        assert!(fine < 2e-2, "Relative error too large: {}", fine);
        // second order under refinement
        assert!(coarse / fine > 3., "Error ratio {} / {}", coarse, fine);
    }

    #[test]
    fn test_rebuild_is_bit_identical() {
        let mesh = CartesianMesh::stretched([5, 4, 3], [1., 2., 1.], [1.2, 0.9, 1.]);
        let s = Setup::new(mesh, [false, false, true], [1; 3], 0);
        let comm = SelfComm;
        let params = SimulationParameters::default();
        let diag = DiagonalScaling::generate(&s.dcp, &s.mesh);
        let build = || -> Vec<(usize, usize, f64)> {
            let a: AijMatrix<SelfComm> =
                generate_a(&comm, &s.dcp, &s.maps, &s.spacing, &diag, 0.01, &params).unwrap();
            a.entries().collect()
        };
        let first = build();
        let second = build();
        assert_eq!(first.len(), second.len());
        for (x, y) in first.iter().zip(second.iter()) {
            assert_eq!((x.0, x.1), (y.0, y.1));
            assert_eq!(x.2.to_bits(), y.2.to_bits());
        }
    }

    #[test]
    fn test_distributed_rows_match_serial() {
        let mesh = CartesianMesh::stretched([6, 5], [1., 1.], [1.1, 1.3]);
        let serial = Setup::new(mesh.clone(), [true, false], [1, 1], 0);
        let comm = SelfComm;
        let full: AijMatrix<SelfComm> =
            assemble_laplacian(&comm, &serial.dcp, &serial.maps, &serial.spacing).unwrap();
        for rank in 0..4 {
            let s = Setup::new(mesh.clone(), [true, false], [2, 2], rank);
            let comm = EmulatedComm::new(rank, s.dcp.local_sizes()).unwrap();
            let part: AijMatrix<EmulatedComm> =
                assemble_laplacian(&comm, &s.dcp, &s.maps, &s.spacing).unwrap();
            assert_eq!(part.row_range(), s.dcp.q_range());
            for c in 0..2 {
                for p in s.dcp.patch(c).points() {
                    let row = s.dcp.global_index(c, p);
                    let srow = serial.dcp.global_index(c, p);
                    let mut vals: Vec<f64> = part.row(row).unwrap().iter().map(|e| e.1).collect();
                    let mut svals: Vec<f64> =
                        full.row(srow).unwrap().iter().map(|e| e.1).collect();
                    vals.sort_by(|a, b| a.partial_cmp(b).unwrap());
                    svals.sort_by(|a, b| a.partial_cmp(b).unwrap());
                    assert_eq!(vals, svals);
                }
            }
        }
    }

    #[test]
    fn test_ownership_mismatch() {
        let s = cavity();
        // communicator places the 24 rows behind another rank
        let comm = EmulatedComm::new(1, vec![4, 24]).unwrap();
        let res: Result<AijMatrix<EmulatedComm>> =
            assemble_laplacian(&comm, &s.dcp, &s.maps, &s.spacing);
        assert_eq!(
            res.err(),
            Some(Error::Ownership {
                matrix: (4, 28),
                vector: (0, 24)
            })
        );
    }
}
