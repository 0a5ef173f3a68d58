//! # `rustcfd`: Implicit viscous operator for staggered-grid Navier-Stokes
//!
//! # Dependencies
//! - cargo >= v1.63
//!
//! The distributed version additionally requires (feature `mpi`):
//!
//! - mpi installation
//! - libclang
//!
//! # Details
//!
//! Incompressible flow solvers of the fractional step type treat the
//! viscous term implicitly. This crate builds the distributed sparse
//! operator of that implicit sub-step for the velocity fluxes on a
//! staggered, non-uniformly spaced Cartesian grid in 2 or 3 dimensions,
//! and fills the ghost layer of the flux fields according to the
//! boundary conditions.
//!
//! - [`mesh`]: cell widths and the spacings of the staggered points
//! - [`grid`]: domain decomposition, halo arrays, global index mapping
//! - [`matrix`]: row-distributed sparse matrix
//! - [`operator`]: stencil weights, preallocation and assembly
//! - [`boundary`]: Dirichlet, Neumann, convective and periodic conditions
//! - [`navier_stokes`]: solver owning the fields and the operator
//!
//! # Example
//! Lid driven cavity ( Run with `cargo run --release --bin rustcfd` )
//! ```
//! use rustcfd::comm::SelfComm;
//! use rustcfd::boundary::FlowDescription;
//! use rustcfd::mesh::CartesianMesh;
//! use rustcfd::navier_stokes::{NavierStokesSolver, SimulationParameters};
//!
//! let comm = SelfComm;
//! let mesh = CartesianMesh::stretched([32, 32], [1., 1.], [1.02, 1.02]);
//! let flow = FlowDescription::lid_driven_cavity(0.01, 1.).unwrap();
//! let params = SimulationParameters::default();
//! let mut navier = NavierStokesSolver::new(&comm, mesh, flow, params, [1, 1]).unwrap();
//! navier.initialise();
//! navier.generate_a().unwrap();
//! let a = navier.operator().unwrap();
//! assert_eq!(a.global_size(), 2 * 31 * 32);
//! ```
//!
//! ## Documentation
//!
//! Download and run:
//!
//! `cargo doc --open`
#![warn(missing_docs)]
#![allow(clippy::unnecessary_cast)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#[macro_use]
extern crate enum_dispatch;
pub mod boundary;
pub mod comm;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod mesh;
pub mod navier_stokes;
pub mod operator;
pub mod types;

const MAX_TIMESTEP: usize = 10_000_000;

/// Integrate trait, step forward in time
pub trait Integrate {
    /// Update solution
    ///
    /// # Errors
    /// The update step failed
    fn update(&mut self) -> error::Result<()>;
    /// Receive current time
    fn get_time(&self) -> f64;
    /// Get timestep
    fn get_dt(&self) -> f64;
    /// Additional break criteria
    fn exit(&mut self) -> bool;
}

/// Integrate pde, that implements the Integrate trait.
///
/// Stop Criteria:
/// 1. Timestep limit
/// 2. Time limit
/// 3. [`Integrate::exit`]
///
/// # Errors
/// An update step failed
pub fn integrate<T: Integrate>(pde: &mut T, max_time: f64) -> error::Result<()> {
    let mut timestep: usize = 0;
    let eps_dt = pde.get_dt() * 1e-4;
    loop {
        // Update
        pde.update()?;
        timestep += 1;

        // Break
        if pde.get_time() + eps_dt >= max_time {
            log::info!("time limit reached: {:?}", pde.get_time());
            break;
        }
        if timestep >= MAX_TIMESTEP {
            log::info!("timestep limit reached: {:?}", timestep);
            break;
        }
        if pde.exit() {
            log::info!("break criteria triggered");
            break;
        }
    }
    Ok(())
}
