//! Trapezoidal quadrature on a non-uniform grid.
//!
//! The bowtie folding integrals are evaluated on whatever grid the response
//! table provides (often log-spaced), so every routine here takes explicit
//! abscissas rather than a fixed step.

/// `∫ y dx` over the full grid.
///
/// Returns `0.0` for fewer than two points.
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    debug_assert_eq!(x.len(), y.len());
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum()
}

/// Upper-tail integrals: `out[i] = ∫_{x[i]}^{x[n-1]} y dx`.
///
/// The last entry is always `0.0`.
pub fn tail_integrals(x: &[f64], y: &[f64]) -> Vec<f64> {
    debug_assert_eq!(x.len(), y.len());
    let n = x.len();
    let mut out = vec![0.0; n];
    for i in (0..n.saturating_sub(1)).rev() {
        out[i] = out[i + 1] + 0.5 * (x[i + 1] - x[i]) * (y[i] + y[i + 1]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapezoid_is_exact_for_linear_functions() {
        let x = [0.0, 0.5, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        // ∫_0^3 (2x + 1) dx = 9 + 3
        assert!((trapezoid(&x, &y) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn tail_integrals_accumulate_from_the_top() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 1.0, 1.0];
        let tail = tail_integrals(&x, &y);
        assert_eq!(tail, vec![2.0, 1.0, 0.0]);
        assert!((tail[0] - trapezoid(&x, &y)).abs() < 1e-12);
    }

    #[test]
    fn degenerate_grids_integrate_to_zero() {
        assert_eq!(trapezoid(&[1.0], &[5.0]), 0.0);
        assert_eq!(tail_integrals(&[], &[]), Vec::<f64>::new());
    }
}
