// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Spline
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Natural cubic spline second derivatives.
//!
//! The interior second derivatives satisfy the tridiagonal system
//! `h_{i-1} y''_{i-1} + 2 (h_{i-1} + h_i) y''_i + h_i y''_{i+1}
//!  = 6 (Δ_i - Δ_{i-1})` with `Δ_i = (y_{i+1} - y_i) / h_i`, and the end
//! values are zero.

/// Second derivatives of the natural cubic spline through (x, y).
///
/// Requires strictly increasing `x` with at least two points. Two points
/// give zero derivatives (pure linear interpolation).
pub fn calc_spline_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    debug_assert!(n >= 2 && y.len() == n);

    let mut result = vec![0.0; n];
    if n < 3 {
        return result;
    }

    // Forward elimination over interior rows. The system is strictly
    // diagonally dominant, so no pivot vanishes. `upper[i]` holds the
    // eliminated super-diagonal of row i and `result[i]` its right side.
    let mut upper = vec![0.0; n];
    let mut slope_lo = (y[1] - y[0]) / (x[1] - x[0]);
    for i in 1..n - 1 {
        let h_lo = x[i] - x[i - 1];
        let h_hi = x[i + 1] - x[i];
        let slope_hi = (y[i + 1] - y[i]) / h_hi;
        let pivot = 2.0 * (h_lo + h_hi) - h_lo * upper[i - 1];
        upper[i] = h_hi / pivot;
        result[i] = (6.0 * (slope_hi - slope_lo) - h_lo * result[i - 1]) / pivot;
        slope_lo = slope_hi;
    }

    // Back substitution; the natural end condition keeps result[n-1] = 0
    for i in (1..n - 1).rev() {
        result[i] -= upper[i] * result[i + 1];
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_data_has_zero_curvature() {
        let x = [0.0, 1.0, 2.5, 4.0, 7.0];
        let y: Vec<f64> = x.iter().map(|v| 3.0 * v - 1.0).collect();
        for d in calc_spline_derivatives(&x, &y) {
            assert!(d.abs() < 1e-12, "y'' = {d}");
        }
    }

    #[test]
    fn test_natural_end_conditions() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 4.0, 9.0];
        let d = calc_spline_derivatives(&x, &y);
        assert_eq!(d[0], 0.0);
        assert_eq!(d[3], 0.0);
        // Symmetric interior system: 4 d1 + d2 = 12, d1 + 4 d2 = 12
        assert!((d[1] - 2.4).abs() < 1e-12 && (d[2] - 2.4).abs() < 1e-12);
    }
}
