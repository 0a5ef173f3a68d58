//! Ghost layer update
use super::{FlowDescription, GhostContext, GhostRule};
use crate::grid::{signed, Decomposition, Face, HaloArray, Side};
use crate::mesh::{CartesianMesh, StaggeredSpacing};

/// Fill the ghost points of the flux arrays `q` on all domain faces
/// owned by this process.
///
/// Faces of other processes and periodic faces are left untouched.
/// `first_step` resets convective ghosts to the interior value. All
/// components are advected out of a face with the convection speed of
/// the component normal to it.
#[allow(clippy::too_many_arguments, clippy::cast_possible_wrap)]
pub fn update_boundary_ghosts<const N: usize>(
    q: &mut [HaloArray<f64, N>; N],
    decomp: &Decomposition<N>,
    flow: &FlowDescription<N>,
    mesh: &CartesianMesh<N>,
    spacing: &StaggeredSpacing<N>,
    dt: f64,
    first_step: bool,
) {
    for (c, q_c) in q.iter_mut().enumerate() {
        let extent = decomp.extent(c);
        let patch = decomp.patch(c);
        for face in Face::all(N) {
            let bc = flow.bc(c, face);
            if bc.is_periodic() || !decomp.owns_face(c, face) {
                continue;
            }
            let a = face.axis;
            let (interior, ghost, d) = match face.side {
                Side::Minus => (0, -1, spacing.get(c, a)[0]),
                Side::Plus => (
                    extent[a] - 1,
                    extent[a] as isize,
                    spacing.get(c, a)[extent[a]],
                ),
            };
            // convection speed of the component normal to the face
            let beta = flow.bc(a, face).value() * dt / d;
            log::trace!("Component {} face {}: {:?}, beta = {}", c, face, bc, beta);
            for p in patch.layer(a, interior).points() {
                let area = mesh.face_area(c, p);
                let (scale, divisor) = if a == c { (area, 1.) } else { (1., area) };
                let inner = signed(p);
                let mut outer = inner;
                outer[a] = ghost;
                let ctx = GhostContext {
                    ghost: q_c[outer],
                    interior: q_c[inner],
                    scale,
                    divisor,
                    beta,
                    first_step,
                };
                if let Some(value) = bc.ghost(&ctx) {
                    q_c[outer] = value;
                }
            }
        }
    }
}
