//! Navier--Stokes solver (implicit viscous part)
pub mod navier;
pub mod params;
pub use navier::NavierStokesSolver;
pub use params::SimulationParameters;
