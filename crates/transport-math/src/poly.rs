// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Polynomials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Polynomial evaluation.

/// Evaluate `c[0] + c[1] x + c[2] x² + ...` with Horner's rule.
#[inline]
pub fn poly_eval(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poly_eval() {
        assert_eq!(poly_eval(&[], 3.0), 0.0);
        assert_eq!(poly_eval(&[2.0], 3.0), 2.0);
        // 1 - x + 0.75 x^2 at x = 2
        assert!((poly_eval(&[1.0, -1.0, 0.75], 2.0) - 2.0).abs() < 1e-15);
    }
}
