// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Property-Based Tests (proptest) for transport-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for transport-math using proptest.
//!
//! Covers: grid calculator knots and inversion, spline interpolation
//! bounds, rotation invariants, distribution supports.

use proptest::prelude::*;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use transport_math::array::{dot, from_spherical, is_soft_unit_vector, make_unit_vector, rotate};
use transport_math::distributions::{
    IsotropicDistribution, PoissonDistribution, ReciprocalDistribution, UniformRealDistribution,
};
use transport_math::spline::calc_spline_derivatives;
use transport_math::{GridBuilder, NonuniformGridCalculator, RealPool};

/// Strictly increasing grid from positive increments.
fn increasing(start: f64, steps: &[f64]) -> Vec<f64> {
    let mut out = vec![start];
    for s in steps {
        let last = out[out.len() - 1];
        out.push(last + s);
    }
    out
}

// ── Grid Calculator ──────────────────────────────────────────────────

proptest! {
    /// Evaluating at any tabulated x returns exactly the tabulated y.
    #[test]
    fn grid_exact_at_knots(
        dx in prop::collection::vec(0.01f64..10.0, 1..30),
        y0 in -5.0f64..5.0,
        dy in prop::collection::vec(-3.0f64..3.0, 30),
        spline in any::<bool>(),
    ) {
        let x = increasing(0.0, &dx);
        let y = increasing(y0, &dy[..dx.len()]);
        let mut pool = RealPool::new();
        let mut build = GridBuilder::new(&mut pool);
        let grid = if spline { build.spline(&x, &y) } else { build.linear(&x, &y) }.unwrap();
        let calc = NonuniformGridCalculator::new(&grid, &pool);
        for i in 0..x.len() {
            prop_assert_eq!(calc.evaluate(x[i]), y[i]);
        }
    }

    /// Inverting twice reproduces the original at every knot, and the
    /// inverse maps tabulated y back to tabulated x.
    #[test]
    fn grid_inverse_round_trip(
        dx in prop::collection::vec(0.01f64..10.0, 1..30),
        dy in prop::collection::vec(0.001f64..2.0, 30),
    ) {
        let x = increasing(1.0, &dx);
        let y = increasing(0.0, &dy[..dx.len()]);
        let mut pool = RealPool::new();
        let grid = GridBuilder::new(&mut pool).linear(&x, &y).unwrap();
        let calc = NonuniformGridCalculator::new(&grid, &pool);
        let inv = calc.make_inverse();
        let back = inv.make_inverse();
        for i in 0..x.len() {
            prop_assert_eq!(back.evaluate(x[i]), calc.evaluate(x[i]));
            prop_assert_eq!(inv.evaluate(y[i]), x[i]);
        }
    }

    /// Linear interpolation stays within the bracketing values.
    #[test]
    fn grid_linear_bounded(
        dx in prop::collection::vec(0.01f64..10.0, 1..20),
        dy in prop::collection::vec(-3.0f64..3.0, 20),
        frac in 0.0f64..1.0,
    ) {
        let x = increasing(0.0, &dx);
        let y = increasing(0.0, &dy[..dx.len()]);
        let mut pool = RealPool::new();
        let grid = GridBuilder::new(&mut pool).linear(&x, &y).unwrap();
        let calc = NonuniformGridCalculator::new(&grid, &pool);
        let v = x[0] + frac * (x[x.len() - 1] - x[0]);
        let lo = y.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = y.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let r = calc.evaluate(v);
        prop_assert!(r >= lo - 1e-12 && r <= hi + 1e-12, "{} not in [{}, {}]", r, lo, hi);
    }
}

// ── Spline Derivatives ───────────────────────────────────────────────

proptest! {
    /// Interior second derivatives satisfy the spline continuity equations.
    #[test]
    fn spline_derivatives_satisfy_system(
        steps in prop::collection::vec(0.05f64..2.0, 2..30),
        phase in 0.0f64..3.0,
    ) {
        let x = increasing(0.0, &steps);
        let y: Vec<f64> = x.iter().map(|v| (v + phase).sin()).collect();
        let d = calc_spline_derivatives(&x, &y);
        let n = x.len();
        prop_assert_eq!(d[0], 0.0);
        prop_assert_eq!(d[n - 1], 0.0);
        for i in 1..n - 1 {
            let h_lo = x[i] - x[i - 1];
            let h_hi = x[i + 1] - x[i];
            let lhs = h_lo * d[i - 1] + 2.0 * (h_lo + h_hi) * d[i] + h_hi * d[i + 1];
            let rhs = 6.0 * ((y[i + 1] - y[i]) / h_hi - (y[i] - y[i - 1]) / h_lo);
            prop_assert!((lhs - rhs).abs() < 1e-9 * (1.0 + rhs.abs()), "row {}: {} vs {}", i, lhs, rhs);
        }
    }
}

// ── Rotation and Directions ──────────────────────────────────────────

proptest! {
    /// Rotation into the lab frame keeps unit length and the polar cosine.
    #[test]
    fn rotate_preserves_unit_and_angle(
        mu in -1.0f64..=1.0,
        phi in 0.0f64..6.283,
        ax in -1.0f64..1.0, ay in -1.0f64..1.0, az in -1.0f64..1.0,
    ) {
        prop_assume!(ax * ax + ay * ay + az * az > 1e-4);
        let axis = make_unit_vector(&[ax, ay, az]);
        let r = rotate(&from_spherical(mu, phi), &axis);
        prop_assert!(is_soft_unit_vector(&r));
        prop_assert!((dot(&r, &axis) - mu).abs() < 1e-9);
    }

    /// Isotropic directions are unit vectors for any seed.
    #[test]
    fn isotropic_is_unit(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..16 {
            prop_assert!(is_soft_unit_vector(&IsotropicDistribution.sample(&mut rng)));
        }
    }
}

// ── Distribution Supports ────────────────────────────────────────────

proptest! {
    #[test]
    fn uniform_in_bounds(a in -100.0f64..100.0, w in 0.0f64..50.0, seed in any::<u64>()) {
        let d = UniformRealDistribution::new(a, a + w);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..32 {
            let x = d.sample(&mut rng);
            prop_assert!(x >= a && x <= a + w);
        }
    }

    #[test]
    fn reciprocal_in_bounds(a in 1e-6f64..1.0, ratio in 1.0f64..1e6, seed in any::<u64>()) {
        let b = a * ratio;
        let d = ReciprocalDistribution::new(a, b);
        let mut rng = StdRng::seed_from_u64(seed);
        for _ in 0..32 {
            let x = d.sample(&mut rng);
            prop_assert!(x >= a * (1.0 - 1e-12) && x <= b * (1.0 + 1e-12));
        }
    }

    /// Poisson sampling is reproducible from the same seed.
    #[test]
    fn poisson_reproducible(lambda in 0.0f64..500.0, seed in any::<u64>()) {
        let d = PoissonDistribution::new(lambda);
        let first: Vec<u32> = {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..8).map(|_| d.sample(&mut rng)).collect()
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let second: Vec<u32> = (0..8).map(|_| d.sample(&mut rng)).collect();
        prop_assert_eq!(first, second);
    }
}
