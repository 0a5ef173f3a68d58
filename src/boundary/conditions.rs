//! Boundary condition variants and the flow description
use crate::error::{Error, Result};
use crate::grid::{Face, Side};

/// Everything a boundary condition needs to know to produce the new
/// value of one ghost point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostContext {
    /// Current ghost value
    pub ghost: f64,
    /// Value of the nearest interior point
    pub interior: f64,
    /// Factor which converts a prescribed velocity into the stored
    /// quantity (face area on normal faces, else 1)
    pub scale: f64,
    /// Divisor which converts the interior flux into the stored
    /// quantity (1 on normal faces, else the face area)
    pub divisor: f64,
    /// `value * dt / spacing` at the face
    pub beta: f64,
    /// First time step of the run
    pub first_step: bool,
}

/// New ghost value from its context
#[enum_dispatch]
pub trait GhostRule {
    /// `None` leaves the ghost point untouched
    fn ghost(&self, ctx: &GhostContext) -> Option<f64>;
}

/// Prescribed velocity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dirichlet {
    /// Velocity on the face
    pub value: f64,
}

/// Zero gradient; the ghost mirrors the nearest interior point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neumann {
    /// Gradient on the face, [`FlowDescription::new`] rejects anything
    /// but zero
    pub value: f64,
}

/// Outflow, `du/dt + value * du/dn = 0`, explicit Euler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Convective {
    /// Convection speed
    pub value: f64,
}

/// Ghost points are filled by the halo exchange
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Periodic;

impl GhostRule for Dirichlet {
    fn ghost(&self, ctx: &GhostContext) -> Option<f64> {
        Some(self.value * ctx.scale)
    }
}

impl GhostRule for Neumann {
    fn ghost(&self, ctx: &GhostContext) -> Option<f64> {
        Some(ctx.interior / ctx.divisor)
    }
}

impl GhostRule for Convective {
    fn ghost(&self, ctx: &GhostContext) -> Option<f64> {
        let interior = ctx.interior / ctx.divisor;
        if ctx.first_step {
            Some(interior)
        } else {
            Some((1. - ctx.beta) * ctx.ghost + ctx.beta * interior)
        }
    }
}

impl GhostRule for Periodic {
    fn ghost(&self, _ctx: &GhostContext) -> Option<f64> {
        None
    }
}

/// Boundary condition of one component on one face
#[enum_dispatch(GhostRule)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryCondition {
    /// Prescribed velocity
    Dirichlet,
    /// Zero gradient
    Neumann,
    /// Convective outflow
    Convective,
    /// Periodic
    Periodic,
}

impl BoundaryCondition {
    /// Dirichlet condition
    pub fn dirichlet(value: f64) -> Self {
        Dirichlet { value }.into()
    }

    /// Neumann condition
    pub fn neumann(value: f64) -> Self {
        Neumann { value }.into()
    }

    /// Convective outflow condition
    pub fn convective(value: f64) -> Self {
        Convective { value }.into()
    }

    /// Periodic condition
    pub fn periodic() -> Self {
        Periodic.into()
    }

    /// Parameter of the condition (0 for periodic)
    pub fn value(&self) -> f64 {
        match self {
            Self::Dirichlet(bc) => bc.value,
            Self::Neumann(bc) => bc.value,
            Self::Convective(bc) => bc.value,
            Self::Periodic(_) => 0.,
        }
    }

    /// Condition is periodic
    pub fn is_periodic(&self) -> bool {
        matches!(self, Self::Periodic(_))
    }
}

/// Physical description of the flow: viscosity, initial state and
/// boundary conditions
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDescription<const N: usize> {
    /// Kinematic viscosity
    pub nu: f64,
    /// Uniform initial velocity per component
    pub initial_velocity: [f64; N],
    /// Conditions per component, faces in the order -X, +X, -Y, +Y, ..
    bc: [Vec<BoundaryCondition>; N],
}

impl<const N: usize> FlowDescription<N> {
    /// Validate and collect a flow description. `bc[c]` holds the
    /// `2 * N` conditions of component `c` in face order.
    ///
    /// # Errors
    /// - wrong number of conditions
    /// - `nu` not positive
    /// - only one face of an axis, or only some components, periodic
    /// - Neumann condition with a non-zero gradient
    pub fn new(nu: f64, initial_velocity: [f64; N], bc: [Vec<BoundaryCondition>; N]) -> Result<Self> {
        if nu.is_nan() || nu <= 0. {
            return Err(Error::Parameter(format!("Viscosity must be positive, got {}", nu)));
        }
        for (c, bc_c) in bc.iter().enumerate() {
            if bc_c.len() != 2 * N {
                return Err(Error::Boundary(format!(
                    "Component {} has {} conditions, expected {}",
                    c,
                    bc_c.len(),
                    2 * N
                )));
            }
            for (f, bc) in bc_c.iter().enumerate() {
                if let BoundaryCondition::Neumann(Neumann { value }) = bc {
                    if *value != 0. {
                        return Err(Error::Boundary(format!(
                            "Component {} face {}: Neumann gradient {} not supported, only zero",
                            c, f, value
                        )));
                    }
                }
            }
        }
        for axis in 0..N {
            let minus = Face::new(axis, Side::Minus).index();
            let plus = Face::new(axis, Side::Plus).index();
            let periodic = bc[0][minus].is_periodic();
            for (c, bc_c) in bc.iter().enumerate() {
                if bc_c[minus].is_periodic() != periodic || bc_c[plus].is_periodic() != periodic {
                    return Err(Error::Boundary(format!(
                        "Periodicity along axis {} differs between faces or components (component {})",
                        axis, c
                    )));
                }
            }
        }
        Ok(Self {
            nu,
            initial_velocity,
            bc,
        })
    }

    /// Closed box at rest, all walls no-slip except the +Y wall, which
    /// slides with `lid` in x direction
    ///
    /// # Errors
    /// `nu` not positive
    pub fn lid_driven_cavity(nu: f64, lid: f64) -> Result<Self> {
        let bc = std::array::from_fn(|c| {
            let mut bc_c = vec![BoundaryCondition::dirichlet(0.); 2 * N];
            if c == 0 {
                bc_c[Face::Y_PLUS.index()] = BoundaryCondition::dirichlet(lid);
            }
            bc_c
        });
        Self::new(nu, [0.; N], bc)
    }

    /// Condition of `component` on `face`
    pub fn bc(&self, component: usize, face: Face) -> &BoundaryCondition {
        &self.bc[component][face.index()]
    }

    /// Periodicity along each axis
    pub fn periodic(&self) -> [bool; N] {
        std::array::from_fn(|axis| self.bc[0][2 * axis].is_periodic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(first_step: bool) -> GhostContext {
        GhostContext {
            ghost: 1.,
            interior: 4.,
            scale: 0.5,
            divisor: 2.,
            beta: 0.25,
            first_step,
        }
    }

    #[test]
    fn test_rules() {
        assert_eq!(BoundaryCondition::dirichlet(3.).ghost(&ctx(false)), Some(1.5));
        assert_eq!(BoundaryCondition::neumann(0.).ghost(&ctx(false)), Some(2.));
        assert_eq!(BoundaryCondition::periodic().ghost(&ctx(false)), None);
    }

    #[test]
    fn test_convective_first_step() {
        let bc = BoundaryCondition::convective(1.);
        assert_eq!(bc.ghost(&ctx(true)), Some(2.));
        assert_eq!(bc.ghost(&ctx(false)), Some(0.75 * 1. + 0.25 * 2.));
    }

    #[test]
    fn test_flow_validation() {
        let wall = BoundaryCondition::dirichlet(0.);
        let per = BoundaryCondition::periodic();
        let ok = FlowDescription::new(1., [0.; 2], [
            vec![per, per, wall, wall],
            vec![per, per, wall, wall],
        ])
        .unwrap();
        assert_eq!(ok.periodic(), [true, false]);
        assert!(FlowDescription::new(1., [0.; 2], [
            vec![per, wall, wall, wall],
            vec![per, per, wall, wall],
        ])
        .is_err());
        assert!(FlowDescription::new(1., [0.; 2], [
            vec![per, per, wall, wall],
            vec![wall, wall, wall, wall],
        ])
        .is_err());
        assert!(FlowDescription::new(1., [0.; 2], [vec![wall; 4], vec![wall; 3]]).is_err());
        assert!(FlowDescription::new(0., [0.; 2], [vec![wall; 4], vec![wall; 4]]).is_err());
    }

    #[test]
    fn test_neumann_gradient_must_be_zero() {
        let wall = BoundaryCondition::dirichlet(0.);
        let zero = BoundaryCondition::neumann(0.);
        let slope = BoundaryCondition::neumann(0.5);
        assert!(FlowDescription::new(1., [0.; 2], [
            vec![wall, zero, wall, wall],
            vec![wall, zero, wall, wall],
        ])
        .is_ok());
        let res = FlowDescription::new(1., [0.; 2], [
            vec![wall, wall, wall, wall],
            vec![wall, slope, wall, wall],
        ]);
        assert!(matches!(res, Err(Error::Boundary(_))));
    }

    #[test]
    fn test_lid_driven_cavity() {
        let flow = FlowDescription::<3>::lid_driven_cavity(0.01, 1.).unwrap();
        assert_eq!(flow.bc(0, Face::Y_PLUS).value(), 1.);
        assert_eq!(flow.bc(2, Face::Y_PLUS).value(), 0.);
        assert_eq!(flow.periodic(), [false; 3]);
    }
}
