//! Time integration parameters
use crate::error::{Error, Result};

/// Time stepping parameters of the fractional step scheme
///
/// The viscous term is blended between the old and the new time level
/// with `alpha_implicit` (0.5: Crank-Nicolson), the convective term is
/// extrapolated with `alpha_explicit` (1.5: second order Adams-Bashforth).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParameters {
    /// Time step size
    pub dt: f64,
    /// Last time step
    pub nt: usize,
    /// First time step of this run (non-zero on restart)
    pub start_step: usize,
    /// Weight of the newest explicit term
    pub alpha_explicit: f64,
    /// Implicit weight of the viscous term
    pub alpha_implicit: f64,
}

impl SimulationParameters {
    /// Validated parameters
    ///
    /// # Errors
    /// - `dt` not positive and finite
    /// - `start_step` beyond `nt`
    /// - `alpha_implicit` outside of [0, 1], `alpha_explicit` not finite
    pub fn new(
        dt: f64,
        nt: usize,
        start_step: usize,
        alpha_explicit: f64,
        alpha_implicit: f64,
    ) -> Result<Self> {
        if !dt.is_finite() || dt <= 0. {
            return Err(Error::Parameter(format!("dt must be positive, got {}", dt)));
        }
        if start_step > nt {
            return Err(Error::Parameter(format!(
                "Start step {} is beyond the last step {}",
                start_step, nt
            )));
        }
        if !(0. ..=1.).contains(&alpha_implicit) {
            return Err(Error::Parameter(format!(
                "alpha_implicit must lie in [0, 1], got {}",
                alpha_implicit
            )));
        }
        if !alpha_explicit.is_finite() {
            return Err(Error::Parameter(format!(
                "alpha_explicit must be finite, got {}",
                alpha_explicit
            )));
        }
        Ok(Self {
            dt,
            nt,
            start_step,
            alpha_explicit,
            alpha_implicit,
        })
    }
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            dt: 0.01,
            nt: 100,
            start_step: 0,
            alpha_explicit: 1.5,
            alpha_implicit: 0.5,
        }
    }
}
