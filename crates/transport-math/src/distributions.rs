// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Random Distributions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Distributions sampled from a canonical uniform generator.
//!
//! Each type implements `rand::distributions::Distribution`, so any
//! `rand::Rng` can drive it. Invalid parameters are contract violations
//! checked with `debug_assert!`.

use crate::array::from_spherical;
use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::StandardNormal;
use std::f64::consts::PI;
use transport_types::Real3;

/// Uniform real number in [0, 1).
#[inline]
pub fn generate_canonical<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen::<f64>()
}

/// Uniform on [a, b).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformRealDistribution {
    a: f64,
    delta: f64,
}

impl UniformRealDistribution {
    pub fn new(a: f64, b: f64) -> Self {
        debug_assert!(a <= b, "invalid uniform bounds [{a}, {b})");
        UniformRealDistribution { a, delta: b - a }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.a + self.delta
    }
}

impl Distribution<f64> for UniformRealDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.a + self.delta * generate_canonical(rng)
    }
}

/// Exponential with rate λ: `x = -ln(ξ)/λ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDistribution {
    neg_inv_lambda: f64,
}

impl ExponentialDistribution {
    pub fn new(lambda: f64) -> Self {
        debug_assert!(lambda > 0.0, "exponential rate must be positive");
        ExponentialDistribution {
            neg_inv_lambda: -1.0 / lambda,
        }
    }
}

impl Distribution<f64> for ExponentialDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        // 1 - ξ lies in (0, 1]
        self.neg_inv_lambda * (-generate_canonical(rng)).ln_1p()
    }
}

/// Power distribution `p(x) ∝ x^n` on [0, 1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerDistribution {
    inv_exp: f64,
}

impl PowerDistribution {
    pub fn new(exponent: f64) -> Self {
        debug_assert!(exponent > -1.0);
        PowerDistribution {
            inv_exp: 1.0 / (exponent + 1.0),
        }
    }
}

impl Distribution<f64> for PowerDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        generate_canonical(rng).powf(self.inv_exp)
    }
}

/// Power law `p(x) ∝ x^p` on [a, b) for p ≠ -1.
///
/// Samples `a^(p+1)` to `b^(p+1)` uniformly and raises to `1/(p+1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerLawDistribution {
    sample_pow: UniformRealDistribution,
    inv_exp: f64,
}

impl PowerLawDistribution {
    pub fn new(exponent: f64, a: f64, b: f64) -> Self {
        debug_assert!(exponent != -1.0, "use ReciprocalDistribution for p = -1");
        debug_assert!(0.0 <= a && a < b);
        let exp1 = exponent + 1.0;
        let (lo, hi) = (a.powf(exp1), b.powf(exp1));
        PowerLawDistribution {
            sample_pow: UniformRealDistribution::new(lo.min(hi), lo.max(hi)),
            inv_exp: 1.0 / exp1,
        }
    }
}

impl Distribution<f64> for PowerLawDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.sample_pow.sample(rng).powf(self.inv_exp)
    }
}

/// Reciprocal `p(x) ∝ 1/x` on [a, b): `x = a (b/a)^ξ`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReciprocalDistribution {
    a: f64,
    log_ratio: f64,
}

impl ReciprocalDistribution {
    pub fn new(a: f64, b: f64) -> Self {
        debug_assert!(0.0 < a && a <= b, "invalid reciprocal bounds [{a}, {b})");
        ReciprocalDistribution {
            a,
            log_ratio: (b / a).ln(),
        }
    }
}

impl Distribution<f64> for ReciprocalDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.a * (self.log_ratio * generate_canonical(rng)).exp()
    }
}

/// True with probability p.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BernoulliDistribution {
    p_true: f64,
}

impl BernoulliDistribution {
    pub fn new(p_true: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&p_true), "invalid probability {p_true}");
        BernoulliDistribution { p_true }
    }

    /// Construct from relative weights of the true and false outcomes.
    pub fn from_weights(w_true: f64, w_false: f64) -> Self {
        debug_assert!(w_true >= 0.0 && w_false >= 0.0 && w_true + w_false > 0.0);
        Self::new(w_true / (w_true + w_false))
    }

    pub fn p(&self) -> f64 {
        self.p_true
    }
}

impl Distribution<bool> for BernoulliDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        generate_canonical(rng) < self.p_true
    }
}

/// Rejection test: samples `true` (reject) with probability `1 - f/fmax`.
///
/// Used as `loop { ...; if !RejectionSampler::new(f, fmax).sample(rng) { break } }`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RejectionSampler {
    f: f64,
    fmax: f64,
}

impl RejectionSampler {
    pub fn new(f: f64, fmax: f64) -> Self {
        debug_assert!(fmax > 0.0);
        debug_assert!(f >= 0.0 && f <= fmax * (1.0 + 1e-10), "f={f} > fmax={fmax}");
        RejectionSampler { f, fmax }
    }

    /// Acceptance probability given directly.
    pub fn with_probability(p_accept: f64) -> Self {
        Self::new(p_accept, 1.0)
    }
}

impl Distribution<bool> for RejectionSampler {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        generate_canonical(rng) * self.fmax > self.f
    }
}

/// Mean above which the Poisson distribution uses a Gaussian approximation.
const POISSON_NORMAL_THRESHOLD: f64 = 64.0;

/// Poisson-distributed count with the given mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonDistribution {
    lambda: f64,
    exp_neg_lambda: f64,
}

impl PoissonDistribution {
    pub fn new(lambda: f64) -> Self {
        debug_assert!(lambda >= 0.0 && lambda.is_finite(), "invalid Poisson mean {lambda}");
        PoissonDistribution {
            lambda,
            exp_neg_lambda: (-lambda).exp(),
        }
    }
}

impl Distribution<u32> for PoissonDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.lambda <= POISSON_NORMAL_THRESHOLD {
            // Multiply uniforms until the product drops below exp(-λ)
            let mut k = 0u32;
            let mut prod = generate_canonical(rng);
            while prod > self.exp_neg_lambda {
                k += 1;
                prod *= generate_canonical(rng);
            }
            k
        } else {
            let z: f64 = rng.sample(StandardNormal);
            (self.lambda + self.lambda.sqrt() * z + 0.5).max(0.0) as u32
        }
    }
}

/// Gaussian with mean and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalDistribution {
    mean: f64,
    stddev: f64,
}

impl NormalDistribution {
    pub fn new(mean: f64, stddev: f64) -> Self {
        debug_assert!(stddev >= 0.0);
        NormalDistribution { mean, stddev }
    }
}

impl Distribution<f64> for NormalDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.mean + self.stddev * z
    }
}

/// Unit vector uniformly distributed on the sphere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IsotropicDistribution;

impl Distribution<Real3> for IsotropicDistribution {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Real3 {
        let costheta = UniformRealDistribution::new(-1.0, 1.0).sample(rng);
        let phi = UniformRealDistribution::new(0.0, 2.0 * PI).sample(rng);
        from_spherical(costheta, phi)
    }
}
