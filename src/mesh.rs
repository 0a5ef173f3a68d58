//! # Cartesian mesh
//!
//! Cell widths of a rectilinear, non-uniformly spaced mesh and the
//! spacings seen by each staggered velocity component.
//!
//! Velocity component *c* lives on the cell faces normal to axis *c*.
//! Along its own axis its points are therefore separated by whole cell
//! widths, along the transverse axes by the distance between two cell
//! centres. The ghost points are located on the domain boundary.
use crate::error::{Error, Result};
use ndarray::Array1;

/// Number of unknowns of component `component` along `axis` for a mesh
/// with `cells` cells along that axis.
///
/// On a non-periodic axis the component normal to it has no unknown on
/// the boundary faces.
pub fn points_along(cells: usize, periodic: bool, component: usize, axis: usize) -> usize {
    if component == axis && !periodic {
        cells - 1
    } else {
        cells
    }
}

/// Rectilinear mesh, defined by the cell widths along each axis
#[derive(Debug, Clone, PartialEq)]
pub struct CartesianMesh<const N: usize> {
    /// Cell widths along each axis
    pub dx: [Array1<f64>; N],
}

impl<const N: usize> CartesianMesh<N> {
    /// Equally spaced mesh with `n` cells along each axis, spanning
    /// `length`.
    ///
    /// # Example
    ///```
    /// use rustcfd::mesh::CartesianMesh;
    /// let mesh = CartesianMesh::uniform([4, 4], [1., 1.]);
    /// assert_eq!(mesh.cells(), [4, 4]);
    /// assert!((mesh.dx[1][2] - 0.25).abs() < 1e-14);
    ///```
    pub fn uniform(n: [usize; N], length: [f64; N]) -> Self {
        let dx = std::array::from_fn(|axis| {
            Array1::from_elem(n[axis], length[axis] / n[axis] as f64)
        });
        Self { dx }
    }

    /// Mesh whose cell widths grow geometrically by `ratio` from cell
    /// to cell along each axis.
    pub fn stretched(n: [usize; N], length: [f64; N], ratio: [f64; N]) -> Self {
        let dx = std::array::from_fn(|axis| {
            let (n, r, l) = (n[axis], ratio[axis], length[axis]);
            let w0 = if (r - 1.).abs() < f64::EPSILON {
                l / n as f64
            } else {
                l * (r - 1.) / (r.powi(n as i32) - 1.)
            };
            Array1::from_iter((0..n).map(|i| w0 * r.powi(i as i32)))
        });
        Self { dx }
    }

    /// Mesh from explicit cell widths
    ///
    /// # Errors
    /// An axis has no cells or a non-positive width
    pub fn from_widths(dx: [Array1<f64>; N]) -> Result<Self> {
        for (axis, d) in dx.iter().enumerate() {
            if d.is_empty() {
                return Err(Error::Parameter(format!("Axis {} has no cells", axis)));
            }
            if d.iter().any(|w| w.is_nan() || *w <= 0.) {
                return Err(Error::Parameter(format!(
                    "Axis {} has non-positive cell widths",
                    axis
                )));
            }
        }
        Ok(Self { dx })
    }

    /// Number of cells along each axis
    pub fn cells(&self) -> [usize; N] {
        std::array::from_fn(|axis| self.dx[axis].len())
    }

    /// Cell edge coordinates along `axis`, starting at zero
    pub fn edges(&self, axis: usize) -> Array1<f64> {
        let mut x = Array1::zeros(self.dx[axis].len() + 1);
        for (i, w) in self.dx[axis].iter().enumerate() {
            x[i + 1] = x[i] + w;
        }
        x
    }

    /// Area of the cell face through which flux component `component`
    /// passes at `point` (the product of the transverse cell widths).
    /// In 2D this is a length.
    pub fn face_area(&self, component: usize, point: [usize; N]) -> f64 {
        (0..N)
            .filter(|&axis| axis != component)
            .map(|axis| self.dx[axis][point[axis]])
            .product()
    }
}

/// Spacings of the staggered velocity points, per component and axis
///
/// `get(c, a)[i]` is the distance between point `i - 1` and point `i` of
/// component `c` along axis `a`, where `-1` and `n` denote the ghost
/// points on the boundary. Each array holds `points_along + 1` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggeredSpacing<const N: usize> {
    d: [[Array1<f64>; N]; N],
}

impl<const N: usize> StaggeredSpacing<N> {
    /// Derive the spacings of all components from the cell widths
    pub fn new(mesh: &CartesianMesh<N>, periodic: [bool; N]) -> Self {
        let d = std::array::from_fn(|component| {
            std::array::from_fn(|axis| {
                Self::along(&mesh.dx[axis], periodic[axis], component == axis)
            })
        });
        Self { d }
    }

    /// Spacing array of `component` along `axis`
    pub fn get(&self, component: usize, axis: usize) -> &Array1<f64> {
        &self.d[component][axis]
    }

    /// Spacings to the minus and plus neighbour of `point` of
    /// `component`, one entry per axis
    pub fn around(&self, component: usize, point: [usize; N]) -> ([f64; N], [f64; N]) {
        let minus = std::array::from_fn(|axis| self.d[component][axis][point[axis]]);
        let plus = std::array::from_fn(|axis| self.d[component][axis][point[axis] + 1]);
        (minus, plus)
    }

    /// `normal`: the component points are located on the faces normal
    /// to this axis, otherwise at the cell centres.
    fn along(dx: &Array1<f64>, periodic: bool, normal: bool) -> Array1<f64> {
        let n = dx.len();
        if normal {
            if periodic {
                // the plus ghost is the image of point 0
                let mut d = Array1::zeros(n + 1);
                d.slice_mut(ndarray::s![..n]).assign(dx);
                d[n] = dx[0];
                d
            } else {
                dx.to_owned()
            }
        } else {
            let mut d = Array1::zeros(n + 1);
            for i in 1..n {
                d[i] = 0.5 * (dx[i - 1] + dx[i]);
            }
            if periodic {
                d[0] = 0.5 * (dx[n - 1] + dx[0]);
                d[n] = d[0];
            } else {
                d[0] = 0.5 * dx[0];
                d[n] = 0.5 * dx[n - 1];
            }
            d
        }
    }
}
