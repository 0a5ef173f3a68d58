//! # Boundary conditions of the flux fields
//!
//! Every velocity component carries one [`BoundaryCondition`] per domain
//! face, collected in a [`FlowDescription`]. Before a stencil is applied
//! the ghost layer of the halo padded flux arrays is filled by
//! [`update_boundary_ghosts`].
//!
//! What a ghost point stores depends on how the face is oriented
//! relative to the component:
//!
//! - face normal to the component (e.g. u on -X): the ghost point lies
//!   on the face and stores a flux, i.e. velocity times face area
//! - face parallel to the component (e.g. u on -Y): the ghost point lies
//!   on the face between two flux points and stores a velocity
pub mod conditions;
pub mod ghosts;
pub use conditions::{
    BoundaryCondition, Convective, Dirichlet, FlowDescription, GhostContext, GhostRule, Neumann,
    Periodic,
};
pub use ghosts::update_boundary_ghosts;
