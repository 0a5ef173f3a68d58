//! Types and traits for real numbers
use num_traits::Float;
use std::fmt::Debug;
use std::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

/// Floating point type, used by the generic stencil kernels
pub trait FloatNum: Float + Debug + SubAssign + AddAssign + MulAssign + DivAssign {}

impl<T> FloatNum for T where T: Float + Debug + SubAssign + AddAssign + MulAssign + DivAssign {}

/// Global index of an unknown, `None` marks a point outside of a
/// non-periodic domain
pub type GlobalIndex = Option<usize>;
