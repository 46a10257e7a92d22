// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Array Utilities
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Three-vector operations on `Real3`.

use std::f64::consts::PI;
use transport_types::Real3;

/// Relative tolerance for "soft" floating point comparisons.
pub const SOFT_TOLERANCE: f64 = 1e-10;

#[inline]
pub fn dot(a: &Real3, b: &Real3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn norm(v: &Real3) -> f64 {
    dot(v, v).sqrt()
}

#[inline]
pub fn scale(v: &Real3, s: f64) -> Real3 {
    [v[0] * s, v[1] * s, v[2] * s]
}

#[inline]
pub fn add(a: &Real3, b: &Real3) -> Real3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: &Real3, b: &Real3) -> Real3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn neg(v: &Real3) -> Real3 {
    [-v[0], -v[1], -v[2]]
}

/// y <- a * x + y
#[inline]
pub fn axpy(a: f64, x: &Real3, y: &mut Real3) {
    for i in 0..3 {
        y[i] += a * x[i];
    }
}

#[inline]
pub fn cross(a: &Real3, b: &Real3) -> Real3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Scale a nonzero vector to unit length.
#[inline]
pub fn make_unit_vector(v: &Real3) -> Real3 {
    let n = norm(v);
    debug_assert!(n > 0.0, "cannot normalize a zero vector");
    scale(v, 1.0 / n)
}

/// Component of `v` orthogonal to the unit vector `n`.
#[inline]
pub fn make_orthogonal(v: &Real3, n: &Real3) -> Real3 {
    let d = dot(v, n);
    [v[0] - d * n[0], v[1] - d * n[1], v[2] - d * n[2]]
}

/// Unit vector from polar cosine and azimuthal angle.
#[inline]
pub fn from_spherical(costheta: f64, phi: f64) -> Real3 {
    debug_assert!((-1.0..=1.0).contains(&costheta));
    let sintheta = (1.0 - costheta * costheta).max(0.0).sqrt();
    let (sinphi, cosphi) = phi.sin_cos();
    [sintheta * cosphi, sintheta * sinphi, costheta]
}

/// Rotate a vector expressed in the frame whose z axis is `rot` into the
/// lab frame.
pub fn rotate(dir: &Real3, rot: &Real3) -> Real3 {
    debug_assert!(is_soft_unit_vector(rot));

    // Direction cosines of the rotation axis
    let mut sintheta = (1.0 - rot[2] * rot[2]).max(0.0).sqrt();
    let (cosphi, sinphi);
    if sintheta >= 1e-10 {
        cosphi = rot[0] / sintheta;
        sinphi = rot[1] / sintheta;
    } else {
        // Axis is (anti)parallel to z: rotation reduces to a reflection
        cosphi = 1.0;
        sinphi = 0.0;
        sintheta = 0.0;
    }
    let costheta = rot[2];

    [
        costheta * cosphi * dir[0] - sinphi * dir[1] + sintheta * cosphi * dir[2],
        costheta * sinphi * dir[0] + cosphi * dir[1] + sintheta * sinphi * dir[2],
        -sintheta * dir[0] + costheta * dir[2],
    ]
}

/// Sine and cosine of pi * x.
#[inline]
pub fn sincospi(x: f64) -> (f64, f64) {
    (PI * x).sin_cos()
}

#[inline]
pub fn soft_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= SOFT_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

#[inline]
pub fn soft_zero(a: f64) -> bool {
    a.abs() <= SOFT_TOLERANCE
}

#[inline]
pub fn is_soft_unit_vector(v: &Real3) -> bool {
    (norm(v) - 1.0).abs() <= SOFT_TOLERANCE
}

#[inline]
pub fn is_soft_orthogonal(a: &Real3, b: &Real3) -> bool {
    dot(a, b).abs() <= 1e-6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_identity_axis() {
        let d = from_spherical(0.3, 1.1);
        let r = rotate(&d, &[0.0, 0.0, 1.0]);
        for i in 0..3 {
            assert!((r[i] - d[i]).abs() < 1e-14);
        }
    }

    #[test]
    fn test_rotate_preserves_polar_angle() {
        let axis = make_unit_vector(&[1.0, -2.0, 0.5]);
        for &(mu, phi) in &[(0.9, 0.1), (-0.4, 2.0), (0.0, 5.5)] {
            let r = rotate(&from_spherical(mu, phi), &axis);
            assert!(is_soft_unit_vector(&r), "|r| = {}", norm(&r));
            assert!((dot(&r, &axis) - mu).abs() < 1e-12, "cos = {}", dot(&r, &axis));
        }
    }

    #[test]
    fn test_rotate_antiparallel_axis() {
        let r = rotate(&[0.0, 0.0, 1.0], &[0.0, 0.0, -1.0]);
        assert!((r[2] + 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_make_orthogonal() {
        let n = make_unit_vector(&[1.0, 1.0, 0.0]);
        let v = make_orthogonal(&[1.0, 0.0, 0.0], &n);
        assert!(soft_zero(dot(&v, &n)));
    }

    #[test]
    fn test_cross_right_handed() {
        assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }
}
