//! Run example:
//!
//! cargo run --release --bin rustcfd
//!
//! or distributed
//!
//! cargo mpirun --np 2 --bin rustcfd --release --features mpi
//
use log::LevelFilter;
use rustcfd::boundary::FlowDescription;
use rustcfd::comm::Communicator;
use rustcfd::error::Result;
use rustcfd::matrix::DistributedMatrix;
use rustcfd::mesh::CartesianMesh;
use rustcfd::navier_stokes::{NavierStokesSolver, SimulationParameters};
use rustcfd::{integrate, Integrate};
use simple_logger::SimpleLogger;

/// Lid driven cavity on a mildly stretched mesh
fn cavity<C: Communicator>(comm: &C) -> Result<()> {
    let (nx, ny) = (64, 64);
    let mesh = CartesianMesh::stretched([nx, ny], [1., 1.], [1.01, 1.01]);
    let flow = FlowDescription::lid_driven_cavity(0.01, 1.)?;
    let params = SimulationParameters::new(0.005, 20, 0, 1.5, 0.5)?;
    let mut navier = NavierStokesSolver::new(comm, mesh, flow, params, [comm.size(), 1])?;
    navier.initialise();
    navier.generate_a()?;
    if let Some(a) = navier.operator() {
        let rows = a.row_range();
        log::info!(
            "Rank {}: rows {}..{} of {}, {} nonzeros",
            comm.rank(),
            rows.start,
            rows.end,
            a.global_size(),
            a.nnz()
        );
    }
    integrate(&mut navier, 1.)?;
    log::info!("Finished at time {:4.3}", navier.get_time());
    Ok(())
}

#[cfg(not(feature = "mpi"))]
fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap_or_else(|e| eprintln!("Logger not initialised: {}", e));
    let comm = rustcfd::comm::SelfComm;
    if let Err(e) = cavity(&comm) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "mpi")]
fn main() {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap_or_else(|e| eprintln!("Logger not initialised: {}", e));
    let universe = match mpi::initialize() {
        Some(universe) => universe,
        None => {
            log::error!("MPI was already initialised");
            std::process::exit(1);
        }
    };
    let world = mpi::topology::Communicator::duplicate(&universe.world());
    if let Err(e) = cavity(&world) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
