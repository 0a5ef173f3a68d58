//! # Incompressible Navier-Stokes solver
//! Owns the distributed flux fields on a staggered Cartesian grid and
//! the implicit operator of the viscous sub-step.
//!
//! # Example
//! Lid driven cavity on a single process
//! ```
//! use rustcfd::comm::SelfComm;
//! use rustcfd::boundary::FlowDescription;
//! use rustcfd::mesh::CartesianMesh;
//! use rustcfd::navier_stokes::{NavierStokesSolver, SimulationParameters};
//! use rustcfd::{integrate, Integrate};
//!
//! let comm = SelfComm;
//! let mesh = CartesianMesh::uniform([16, 16], [1., 1.]);
//! let flow = FlowDescription::lid_driven_cavity(0.01, 1.).unwrap();
//! let params = SimulationParameters::new(0.01, 5, 0, 1.5, 0.5).unwrap();
//! let mut navier = NavierStokesSolver::new(&comm, mesh, flow, params, [1, 1]).unwrap();
//! navier.initialise();
//! navier.generate_a().unwrap();
//! integrate(&mut navier, 1.).unwrap();
//! assert!(navier.finished());
//! ```
use crate::boundary::{update_boundary_ghosts, FlowDescription};
use crate::comm::Communicator;
use crate::error::{Error, Result};
use crate::grid::{signed, Decomposition, HaloArray, IndexMapping};
use crate::matrix::AijMatrix;
use crate::mesh::{CartesianMesh, StaggeredSpacing};
use crate::navier_stokes::SimulationParameters;
use crate::operator::{generate_a, DiagonalScaling};
use crate::Integrate;

/// Solver for the incompressible Navier-Stokes equations in `N`
/// dimensions, one instance per process
pub struct NavierStokesSolver<'a, C, const N: usize> {
    /// Communicator shared by all processes
    comm: &'a C,
    /// Cell widths
    mesh: CartesianMesh<N>,
    /// Spacings of the staggered flux points
    spacing: StaggeredSpacing<N>,
    /// Viscosity, initial state and boundary conditions
    flow: FlowDescription<N>,
    /// Time stepping parameters
    params: SimulationParameters,
    /// Ownership of the flux points
    decomp: Decomposition<N>,
    /// Global index of the local and ghost flux points, per component
    mappings: [IndexMapping<N>; N],
    /// `MHat` and `RInv`
    diagonals: DiagonalScaling,
    /// Fluxes with ghost layer, per component
    q: [HaloArray<f64, N>; N],
    /// Implicit operator, once generated
    a: Option<AijMatrix<'a, C>>,
    /// Current time step
    time_step: usize,
}

impl<'a, C: Communicator, const N: usize> NavierStokesSolver<'a, C, N> {
    /// Set up the solver of this process. `procs` is the process grid,
    /// its product must match the size of `comm`.
    ///
    /// # Errors
    /// - process grid does not match the communicator or the mesh
    /// - boundary conditions and mesh disagree
    pub fn new(
        comm: &'a C,
        mesh: CartesianMesh<N>,
        flow: FlowDescription<N>,
        params: SimulationParameters,
        procs: [usize; N],
    ) -> Result<Self> {
        let nprocs: usize = procs.iter().product();
        if nprocs != comm.size() {
            return Err(Error::Decomposition(format!(
                "Process grid {:?} needs {} processes, communicator has {}",
                procs,
                nprocs,
                comm.size()
            )));
        }
        let periodic = flow.periodic();
        let decomp = Decomposition::new(mesh.cells(), periodic, procs, comm.rank())?;
        let spacing = StaggeredSpacing::new(&mesh, periodic);
        let mappings = std::array::from_fn(|c| IndexMapping::new(&decomp, c));
        let diagonals = DiagonalScaling::generate(&decomp, &mesh);
        let q = std::array::from_fn(|c| HaloArray::from_elem(decomp.patch(c), 0.));

        if comm.rank() == 0 {
            log::info!(
                "Navier-Stokes solver ({}D): grid {:?}, periodic {:?}, {} unknowns on {} processes",
                N,
                mesh.cells(),
                periodic,
                decomp.global_size(),
                nprocs
            );
            log::info!(
                "Time integration: dt = {}, alpha_explicit = {}, alpha_implicit = {}",
                params.dt,
                params.alpha_explicit,
                params.alpha_implicit
            );
        }

        Ok(Self {
            comm,
            mesh,
            spacing,
            flow,
            params,
            decomp,
            mappings,
            diagonals,
            q,
            a: None,
            time_step: params.start_step,
        })
    }

    /// Set the fluxes to the initial velocity and fill the ghost layer
    pub fn initialise(&mut self) {
        for (c, q_c) in self.q.iter_mut().enumerate() {
            let u0 = self.flow.initial_velocity[c];
            for p in self.decomp.patch(c).points() {
                q_c[signed(p)] = u0 * self.mesh.face_area(c, p);
            }
        }
        self.update_boundary_ghosts();
    }

    /// Build the implicit operator of the viscous sub-step. A previously
    /// generated operator is replaced.
    ///
    /// # Errors
    /// Assembly of the distributed matrix failed
    pub fn generate_a(&mut self) -> Result<()> {
        self.a = None;
        let a: AijMatrix<'a, C> = generate_a(
            self.comm,
            &self.decomp,
            &self.mappings,
            &self.spacing,
            &self.diagonals,
            self.flow.nu,
            &self.params,
        )?;
        log::debug!("Rank {}: operator with {} nonzeros", self.comm.rank(), a.nnz());
        self.a = Some(a);
        Ok(())
    }

    /// Fill the ghost layer of the fluxes according to the boundary
    /// conditions
    pub fn update_boundary_ghosts(&mut self) {
        update_boundary_ghosts(
            &mut self.q,
            &self.decomp,
            &self.flow,
            &self.mesh,
            &self.spacing,
            self.params.dt,
            self.time_step == self.params.start_step,
        );
    }

    /// Advance the time step counter
    pub fn step_time(&mut self) {
        self.time_step += 1;
    }

    /// Last time step reached
    pub fn finished(&self) -> bool {
        self.time_step >= self.params.nt
    }

    /// Current time step
    pub fn time_step(&self) -> usize {
        self.time_step
    }

    /// Implicit operator, if generated
    pub fn operator(&self) -> Option<&AijMatrix<'a, C>> {
        self.a.as_ref()
    }

    /// Fluxes with ghost layer
    pub fn fluxes(&self) -> &[HaloArray<f64, N>; N] {
        &self.q
    }

    /// Mutable fluxes, e.g. to apply the solution of the linear system
    pub fn fluxes_mut(&mut self) -> &mut [HaloArray<f64, N>; N] {
        &mut self.q
    }

    /// Global index mappings
    pub fn mappings(&self) -> &[IndexMapping<N>; N] {
        &self.mappings
    }

    /// Domain decomposition
    pub fn decomp(&self) -> &Decomposition<N> {
        &self.decomp
    }

    /// Diagonal scaling of the operator
    pub fn diagonals(&self) -> &DiagonalScaling {
        &self.diagonals
    }

    /// Flow description
    pub fn flow(&self) -> &FlowDescription<N> {
        &self.flow
    }

    /// Time stepping parameters
    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }
}

impl<'a, C: Communicator, const N: usize> Integrate for NavierStokesSolver<'a, C, N> {
    /// Refresh the boundary ghosts and advance by one time step
    fn update(&mut self) -> Result<()> {
        self.update_boundary_ghosts();
        self.step_time();
        Ok(())
    }

    fn get_time(&self) -> f64 {
        self.time_step as f64 * self.params.dt
    }

    fn get_dt(&self) -> f64 {
        self.params.dt
    }

    fn exit(&mut self) -> bool {
        if self.finished() {
            return true;
        }
        // Break if the fluxes blew up
        self.q.iter().any(|q| q.as_array().iter().any(|v| v.is_nan()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::BoundaryCondition;
    use crate::comm::{EmulatedComm, SelfComm};
    use crate::grid::Face;

    fn approx_eq(result: f64, expected: f64) {
        let dif = 1e-10;
        if (expected - result).abs() > dif {
            panic!("Large difference of values, got {} expected {}.", result, expected)
        }
    }

    fn cavity<'a>(comm: &'a SelfComm, nt: usize) -> NavierStokesSolver<'a, SelfComm, 2> {
        let mesh = CartesianMesh::uniform([4, 4], [1., 1.]);
        let flow = FlowDescription::lid_driven_cavity(1., 1.).unwrap();
        let params = SimulationParameters::new(0.01, nt, 0, 1.5, 0.5).unwrap();
        NavierStokesSolver::new(comm, mesh, flow, params, [1, 1]).unwrap()
    }

    #[test]
    fn test_generate_a() {
        let comm = SelfComm;
        let mut navier = cavity(&comm, 10);
        assert!(navier.operator().is_none());
        navier.generate_a().unwrap();
        let nnz = navier.operator().unwrap().nnz();
        approx_eq(navier.operator().unwrap().get(4, 4).unwrap(), 132.);
        // regenerating replaces the operator
        navier.generate_a().unwrap();
        assert_eq!(navier.operator().unwrap().nnz(), nnz);
    }

    #[test]
    fn test_initialise_fluxes() {
        let comm = SelfComm;
        let mesh = CartesianMesh::uniform([4, 2, 2], [2., 1., 1.]);
        let per = BoundaryCondition::periodic();
        let out = BoundaryCondition::convective(1.);
        let wall = BoundaryCondition::dirichlet(0.);
        let inflow = BoundaryCondition::dirichlet(2.);
        let flow = FlowDescription::new(0.1, [2., 0., 0.], [
            vec![inflow, out, wall, wall, per, per],
            vec![wall, out, wall, wall, per, per],
            vec![wall, out, wall, wall, per, per],
        ])
        .unwrap();
        let params = SimulationParameters::default();
        let mut navier = NavierStokesSolver::new(&comm, mesh, flow, params, [1, 1, 1]).unwrap();
        navier.initialise();
        let q = navier.fluxes();
        // u = 2 through faces of area 0.5 * 0.5
        approx_eq(q[0][[1, 1, 0]], 0.5);
        approx_eq(q[0][[-1, 0, 1]], 0.5);
        // first step: outflow ghost copies the interior flux
        approx_eq(q[0][[3, 1, 1]], 0.5);
        approx_eq(q[1][[0, -1, 0]], 0.);
        assert_eq!(navier.flow().bc(0, Face::X_MINUS).value(), 2.);
    }

    #[test]
    fn test_time_stepping() {
        let comm = SelfComm;
        let mut navier = cavity(&comm, 3);
        navier.initialise();
        // lid ghost of u on +Y is a velocity
        approx_eq(navier.fluxes()[0][[1, 4]], 1.);
        crate::integrate(&mut navier, 10.).unwrap();
        assert!(navier.finished());
        assert_eq!(navier.time_step(), 3);
        approx_eq(navier.get_time(), 0.03);
    }

    #[test]
    fn test_process_grid_mismatch() {
        let comm = EmulatedComm::new(0, vec![12, 12]).unwrap();
        let mesh = CartesianMesh::uniform([4, 4], [1., 1.]);
        let flow = FlowDescription::lid_driven_cavity(1., 1.).unwrap();
        let params = SimulationParameters::default();
        let res = NavierStokesSolver::new(&comm, mesh, flow, params, [1, 1]);
        assert!(matches!(res, Err(Error::Decomposition(_))));
    }
}
