// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Bethe-Heitler Pair Production
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Conversion of a photon into an electron-positron pair in the field of
//! a nucleus, with screening and Coulomb corrections.

use std::f64::consts::PI;

use crate::interactor::Interactor;
use crate::kinematics::TsaiUrbanDistribution;
use crate::material::ElementView;
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::array::{from_spherical, rotate};
use transport_math::distributions::{
    generate_canonical, BernoulliDistribution, RejectionSampler, UniformRealDistribution,
};
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportResult};

/// Below this photon energy (MeV) the pair fraction is sampled uniformly
const LOW_ENERGY_LIMIT: f64 = 2.0;
/// Above this photon energy (MeV) the Coulomb correction is applied
const COULOMB_LIMIT: f64 = 50.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetheHeitlerData {
    pub gamma: ParticleId,
    pub electron: ParticleId,
    pub positron: ParticleId,
    pub electron_mass: f64,
}

impl BetheHeitlerData {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        let electron = particles.require("e-")?;
        Ok(BetheHeitlerData {
            gamma: particles.require("gamma")?,
            electron,
            positron: particles.require("e+")?,
            electron_mass: particles.get(electron).mass.value(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0
    }
}

/// Screening function Φ1 minus its asymptotic form.
fn screen_phi1(delta: f64) -> f64 {
    if delta > 1.4 {
        42.038 - 8.29 * (delta + 0.958).ln()
    } else {
        42.184 - delta * (7.444 - 1.623 * delta)
    }
}

fn screen_phi2(delta: f64) -> f64 {
    if delta > 1.4 {
        42.038 - 8.29 * (delta + 0.958).ln()
    } else {
        41.326 - delta * (5.848 - 0.902 * delta)
    }
}

pub struct BetheHeitlerInteractor<'a> {
    shared: &'a BetheHeitlerData,
    inc_energy: f64,
    inc_direction: Real3,
    element: ElementView<'a>,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> BetheHeitlerInteractor<'a> {
    pub fn new(
        shared: &'a BetheHeitlerData,
        particle: &ParticleTrackView<'_>,
        inc_direction: &Real3,
        allocate: &'a StackAllocator<Secondary>,
        element: ElementView<'a>,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert_eq!(particle.particle_id(), shared.gamma);
        debug_assert!(particle.energy().value() > 2.0 * shared.electron_mass);
        BetheHeitlerInteractor {
            shared,
            inc_energy: particle.energy().value(),
            inc_direction: *inc_direction,
            element,
            allocate,
        }
    }

    /// Fraction of the photon energy given to one lepton.
    fn sample_epsilon<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let eps0 = self.shared.electron_mass / self.inc_energy;
        if self.inc_energy < LOW_ENERGY_LIMIT {
            return UniformRealDistribution::new(eps0, 0.5).sample(rng);
        }

        let mut fz = 8.0 * self.element.log_z() / 3.0;
        if self.inc_energy > COULOMB_LIMIT {
            fz += 8.0 * self.element.coulomb_correction();
        }
        let delta_factor = 136.0 * eps0 / self.element.cbrt_z();
        let delta_max = ((42.038 - fz) / 8.29).exp() - 0.958;
        let delta_min = 4.0 * delta_factor;
        let eps1 = 0.5 - 0.5 * (1.0 - delta_min / delta_max).max(0.0).sqrt();
        let eps_min = eps0.max(eps1);
        let eps_range = 0.5 - eps_min;

        let f10 = screen_phi1(delta_min) - fz;
        let f20 = screen_phi2(delta_min) - fz;
        let choose_f1 =
            BernoulliDistribution::from_weights((f10 * eps_range * eps_range).max(0.0), (1.5 * f20).max(0.0));

        loop {
            let (eps, accept) = if choose_f1.sample(rng) {
                let eps = 0.5 - eps_range * generate_canonical(rng).cbrt();
                let delta = delta_factor / (eps * (1.0 - eps));
                (eps, (screen_phi1(delta) - fz) / f10)
            } else {
                let eps = eps_min + eps_range * generate_canonical(rng);
                let delta = delta_factor / (eps * (1.0 - eps));
                (eps, (screen_phi2(delta) - fz) / f20)
            };
            if !RejectionSampler::with_probability(accept.clamp(0.0, 1.0)).sample(rng) {
                return eps;
            }
        }
    }
}

impl<'a> Interactor<'a> for BetheHeitlerInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(pair) = self.allocate.allocate(2) else {
            return Interaction::failed();
        };
        let mass = self.shared.electron_mass;
        let epsilon = self.sample_epsilon(rng);

        // Either lepton may carry the larger share
        let (eps_e, eps_p) = if BernoulliDistribution::new(0.5).sample(rng) {
            (epsilon, 1.0 - epsilon)
        } else {
            (1.0 - epsilon, epsilon)
        };
        let electron_energy = (eps_e * self.inc_energy - mass).max(0.0);
        let positron_energy = (eps_p * self.inc_energy - mass).max(0.0);

        let phi = UniformRealDistribution::new(0.0, 2.0 * PI).sample(rng);
        let cos_e = TsaiUrbanDistribution::new(electron_energy, mass).sample(rng);
        let cos_p = TsaiUrbanDistribution::new(positron_energy, mass).sample(rng);
        let dir_e = rotate(&from_spherical(cos_e, phi), &self.inc_direction);
        let dir_p = rotate(&from_spherical(cos_p, phi + PI), &self.inc_direction);

        pair[0] = Secondary::new(self.shared.electron, MevEnergy::new(electron_energy), dir_e);
        pair[1] = Secondary::new(self.shared.positron, MevEnergy::new(positron_energy), dir_p);

        let mut result = Interaction::from_absorption();
        result.secondaries = pair;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::em::test_support::TestSetup;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use transport_math::array::is_soft_unit_vector;
    use transport_types::ids::ElementId;
    use transport_types::Action;

    fn check_pairs(energy: f64, seed: u64) -> f64 {
        let setup = TestSetup::new();
        let data = BetheHeitlerData::new(&setup.particles).unwrap();
        let lead = setup.materials.element(ElementId::new(2));
        let alloc = StackAllocator::new(256);
        let mut rng = StdRng::seed_from_u64(seed);
        let gamma = setup.particle("gamma", energy);
        let dir = [0.0, 0.0, 1.0];

        let mut mean_frac = 0.0;
        let n = 64;
        for _ in 0..n {
            let result = BetheHeitlerInteractor::new(&data, &gamma, &dir, &alloc, lead).sample(&mut rng);
            assert_eq!(result.action, Action::Absorbed);
            let [e, p] = result.secondaries else {
                panic!("expected a pair");
            };
            assert_eq!(e.particle_id, Some(data.electron));
            assert_eq!(p.particle_id, Some(data.positron));
            assert!(is_soft_unit_vector(&e.direction));
            assert!(is_soft_unit_vector(&p.direction));
            let total = e.energy.value() + p.energy.value() + 2.0 * data.electron_mass;
            assert!((total - energy).abs() < 1e-9 * energy);
            mean_frac += e.energy.value() / (energy - 2.0 * data.electron_mass);
        }
        mean_frac / n as f64
    }

    #[test]
    fn test_low_energy_conversion() {
        let frac = check_pairs(1.5, 1);
        assert!((0.3..0.7).contains(&frac), "frac = {frac}");
    }

    #[test]
    fn test_high_energy_conversion() {
        let frac = check_pairs(1000.0, 2);
        // Symmetric swap keeps the electron share near one half on average
        assert!((0.3..0.7).contains(&frac), "frac = {frac}");
    }

    #[test]
    fn test_screening_functions_continuous() {
        for f in [screen_phi1 as fn(f64) -> f64, screen_phi2] {
            let below = f(1.4 - 1e-9);
            let above = f(1.4 + 1e-9);
            assert!((below - above).abs() < 0.05, "{below} vs {above}");
        }
    }
}
