// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Kinematics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shared kinematic helpers for final-state sampling.

use rand::distributions::Distribution;
use rand::Rng;
use std::f64::consts::PI;
use transport_math::array::{axpy, dot, from_spherical, make_unit_vector, rotate, scale, sub};
use transport_math::distributions::{
    generate_canonical, BernoulliDistribution, UniformRealDistribution,
};
use transport_types::Real3;

/// Momentum magnitude (MeV/c) of a particle with kinetic energy and mass.
#[inline]
pub fn calc_momentum(energy: f64, mass: f64) -> f64 {
    (energy * (energy + 2.0 * mass)).sqrt()
}

/// Momentum vector of a particle.
#[inline]
pub fn calc_momentum_vector(energy: f64, mass: f64, dir: &Real3) -> Real3 {
    scale(dir, calc_momentum(energy, mass))
}

/// Direction of the remaining particle after one exits, from momentum
/// conservation: `normalize(p_inc - p_out)`.
#[inline]
pub fn calc_exiting_direction(
    inc_momentum: f64,
    inc_dir: &Real3,
    out_momentum: f64,
    out_dir: &Real3,
) -> Real3 {
    make_unit_vector(&sub(&scale(inc_dir, inc_momentum), &scale(out_dir, out_momentum)))
}

/// Momentum (MeV/c) and total energy (MeV) of a particle or system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourVector {
    pub mom: Real3,
    pub energy: f64,
}

impl FourVector {
    pub fn from_mass_momentum(mass: f64, momentum: f64, dir: &Real3) -> Self {
        FourVector {
            mom: scale(dir, momentum),
            energy: (momentum * momentum + mass * mass).sqrt(),
        }
    }

    /// Velocity of the frame in which this system is at rest.
    pub fn boost_vector(&self) -> Real3 {
        debug_assert!(self.energy > 0.0);
        scale(&self.mom, 1.0 / self.energy)
    }

    /// Boost by velocity `beta`: a system at rest ends up moving with `beta`.
    pub fn boost(&mut self, beta: &Real3) {
        let beta_sq = dot(beta, beta);
        debug_assert!(beta_sq < 1.0);
        if beta_sq == 0.0 {
            return;
        }
        let gamma = 1.0 / (1.0 - beta_sq).sqrt();
        let bp = dot(beta, &self.mom);
        let factor = (gamma - 1.0) * bp / beta_sq + gamma * self.energy;
        axpy(factor, beta, &mut self.mom);
        self.energy = gamma * (self.energy + bp);
    }
}

/// Sample a direction at fixed polar cosine about an incident direction,
/// with uniform azimuth.
#[derive(Debug, Clone, Copy)]
pub struct ExitingDirectionSampler<'a> {
    costheta: f64,
    inc_dir: &'a Real3,
}

impl<'a> ExitingDirectionSampler<'a> {
    pub fn new(costheta: f64, inc_dir: &'a Real3) -> Self {
        debug_assert!((-1.0..=1.0).contains(&costheta), "costheta = {costheta}");
        ExitingDirectionSampler { costheta, inc_dir }
    }
}

impl Distribution<Real3> for ExitingDirectionSampler<'_> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Real3 {
        let phi = UniformRealDistribution::new(0.0, 2.0 * PI).sample(rng);
        rotate(&from_spherical(self.costheta, phi), self.inc_dir)
    }
}

/// Polar angle of leptons from bremsstrahlung and pair production
/// (Tsai/Urban approximation of the Tsai distribution).
#[derive(Debug, Clone, Copy)]
pub struct TsaiUrbanDistribution {
    umax: f64,
}

impl TsaiUrbanDistribution {
    /// Construct with the lepton's kinetic energy and mass.
    pub fn new(energy: f64, mass: f64) -> Self {
        debug_assert!(mass > 0.0);
        TsaiUrbanDistribution {
            umax: 2.0 * (1.0 + energy / mass),
        }
    }
}

impl Distribution<f64> for TsaiUrbanDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let choose_low = BernoulliDistribution::new(0.25);
        let mut u;
        loop {
            let alpha = if choose_low.sample(rng) { 0.625 } else { 1.875 };
            // Product of two canonical values in (0, 1]
            let r = (1.0 - generate_canonical(rng)) * (1.0 - generate_canonical(rng));
            u = -r.ln() / alpha;
            if u <= self.umax {
                break;
            }
        }
        1.0 - 2.0 * (u / self.umax).powi(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use transport_math::array::{dot, is_soft_unit_vector, norm};

    #[test]
    fn test_boost_round_trip() {
        let mut lv = FourVector::from_mass_momentum(939.6, 250.0, &make_unit_vector(&[0.2, -0.4, 0.9]));
        let mass_sq = lv.energy * lv.energy - dot(&lv.mom, &lv.mom);
        let beta = [0.1, 0.3, -0.5];
        let orig = lv;
        lv.boost(&beta);
        assert!(((lv.energy * lv.energy - dot(&lv.mom, &lv.mom)) / mass_sq - 1.0).abs() < 1e-10);
        lv.boost(&scale(&beta, -1.0));
        assert!((lv.energy - orig.energy).abs() < 1e-9 * orig.energy);
        assert!(norm(&sub(&lv.mom, &orig.mom)) < 1e-9 * orig.energy);

        // A system boosted by minus its own velocity is at rest
        let mut rest = orig;
        rest.boost(&scale(&orig.boost_vector(), -1.0));
        assert!(norm(&rest.mom) < 1e-9 * orig.energy);
        assert!((rest.energy - 939.6).abs() < 1e-8);
    }

    #[test]
    fn test_exiting_direction_conserves_momentum() {
        let inc = [0.0, 0.0, 1.0];
        let out = make_unit_vector(&[0.3, 0.1, 0.9]);
        let rest = calc_exiting_direction(5.0, &inc, 2.0, &out);
        assert!(is_soft_unit_vector(&rest));
        // p_rest must be parallel to 5 inc - 2 out
        let diff = sub(&scale(&inc, 5.0), &scale(&out, 2.0));
        assert!((dot(&rest, &diff) - norm(&diff)).abs() < 1e-12);
    }

    #[test]
    fn test_exiting_sampler_fixed_cosine() {
        let inc = make_unit_vector(&[1.0, 1.0, 1.0]);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..50 {
            let d = ExitingDirectionSampler::new(0.25, &inc).sample(&mut rng);
            assert!(is_soft_unit_vector(&d));
            assert!((dot(&d, &inc) - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tsai_urban_forward_peaked() {
        let dist = TsaiUrbanDistribution::new(100.0, 0.51099895);
        let mut rng = StdRng::seed_from_u64(9);
        let n = 2000;
        let mut sum = 0.0;
        for _ in 0..n {
            let c = dist.sample(&mut rng);
            assert!((-1.0..=1.0).contains(&c));
            sum += c;
        }
        assert!(sum / n as f64 > 0.99, "mean cos = {}", sum / n as f64);
    }
}
