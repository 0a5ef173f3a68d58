//! Second derivative weights on a non-uniform grid
use crate::types::FloatNum;

/// Weights of the discrete Laplacian at a point whose neighbours along
/// axis `a` are `minus[a]` and `plus[a]` away.
///
/// Per axis the 3-point central difference
///
/// `f'' = 2/(dm (dm+dp)) f[-] - 2/(dm dp) f[0] + 2/(dp (dm+dp)) f[+]`
///
/// is used, which is exact for quadratic polynomials. The weights are
/// written to `out` in the order `[center, x-, x+, y-, y+, z-, z+]`.
///
/// Spacings must be positive.
///
/// # Panics
/// `out` is shorter than `2 * N + 1`
///
/// # Example
///```
/// use rustcfd::operator::coefficients;
/// let mut w = [0.; 5];
/// coefficients([0.5, 0.5], [0.5, 0.5], &mut w);
/// assert_eq!(w, [-16., 4., 4., 4., 4.]);
///```
pub fn coefficients<A: FloatNum, const N: usize>(minus: [A; N], plus: [A; N], out: &mut [A]) {
    let two = A::one() + A::one();
    out[0] = A::zero();
    for a in 0..N {
        let (dm, dp) = (minus[a], plus[a]);
        debug_assert!(dm > A::zero() && dp > A::zero(), "Degenerate spacing");
        out[0] -= two / (dm * dp);
        out[1 + 2 * a] = two / (dm * (dm + dp));
        out[2 + 2 * a] = two / (dp * (dm + dp));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;

    fn approx_eq(result: f64, expected: f64) {
        let dif = 1e-9 * expected.abs().max(1.);
        if (expected - result).abs() > dif {
            panic!("Large difference of values, got {} expected {}.", result, expected)
        }
    }

    #[test]
    fn test_uniform_spacing() {
        let h = 0.1;
        let mut w = [0.; 7];
        coefficients([h; 3], [h; 3], &mut w);
        approx_eq(w[0], -6. / (h * h));
        for v in &w[1..] {
            approx_eq(*v, 1. / (h * h));
        }
    }

    #[test]
    fn test_uniform_spacing_f32() {
        let mut w = [0_f32; 5];
        coefficients([0.5_f32; 2], [0.5_f32; 2], &mut w);
        assert!((w[0] + 16.).abs() < 1e-5);
        assert!((w[3] - 4.).abs() < 1e-5);
    }

    #[test]
    fn test_quadratic_exactness() {
        // f = x^2 + y^2 + z^2 around the origin, Laplacian is 6
        for _ in 0..20 {
            let d: Array1<f64> = Array1::random(6, Uniform::new(0.01, 1.));
            let minus = [d[0], d[1], d[2]];
            let plus = [d[3], d[4], d[5]];
            let mut w = [0.; 7];
            coefficients(minus, plus, &mut w);
            let mut lap = 0.;
            for a in 0..3 {
                lap += w[1 + 2 * a] * minus[a] * minus[a] + w[2 + 2 * a] * plus[a] * plus[a];
            }
            approx_eq(lap, 6.);
            // constants are annihilated
            approx_eq(w.iter().sum::<f64>(), 0.);
        }
    }
}
