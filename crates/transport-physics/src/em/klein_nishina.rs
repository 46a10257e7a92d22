// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Klein-Nishina Compton Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Incoherent photon scattering off free electrons.

use crate::interactor::Interactor;
use crate::kinematics::{calc_exiting_direction, ExitingDirectionSampler};
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::distributions::{generate_canonical, BernoulliDistribution, RejectionSampler};
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportResult};

/// Electrons below this energy (MeV) are deposited instead of emitted
const SECONDARY_CUTOFF: f64 = 1e-4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KleinNishinaData {
    pub gamma: ParticleId,
    pub electron: ParticleId,
    pub inv_electron_mass: f64,
}

impl KleinNishinaData {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        let electron = particles.require("e-")?;
        Ok(KleinNishinaData {
            gamma: particles.require("gamma")?,
            electron,
            inv_electron_mass: 1.0 / particles.get(electron).mass.value(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.inv_electron_mass > 0.0 && self.gamma != self.electron
    }
}

/// Sample the scattered photon with the Geant4 ε method.
pub struct KleinNishinaInteractor<'a> {
    shared: &'a KleinNishinaData,
    inc_energy: f64,
    inc_direction: Real3,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> KleinNishinaInteractor<'a> {
    pub fn new(
        shared: &'a KleinNishinaData,
        particle: &ParticleTrackView<'_>,
        inc_direction: &Real3,
        allocate: &'a StackAllocator<Secondary>,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert_eq!(particle.particle_id(), shared.gamma);
        debug_assert!(particle.energy().value() > 0.0);
        KleinNishinaInteractor {
            shared,
            inc_energy: particle.energy().value(),
            inc_direction: *inc_direction,
            allocate,
        }
    }
}

impl<'a> Interactor<'a> for KleinNishinaInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(electron) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };

        let k = self.inc_energy * self.shared.inv_electron_mass;
        let eps0 = 1.0 / (1.0 + 2.0 * k);
        let eps0_sq = eps0 * eps0;
        let log_eps0 = eps0.ln();
        let choose_log = BernoulliDistribution::from_weights(-log_eps0, 0.5 * (1.0 - eps0_sq));

        let (epsilon, one_minus_cos) = loop {
            let (eps, eps_sq) = if choose_log.sample(rng) {
                let eps = (log_eps0 * generate_canonical(rng)).exp();
                (eps, eps * eps)
            } else {
                let eps_sq = eps0_sq + (1.0 - eps0_sq) * generate_canonical(rng);
                (eps_sq.sqrt(), eps_sq)
            };
            let one_minus_cos = (1.0 - eps) / (eps * k);
            let sint2 = one_minus_cos * (2.0 - one_minus_cos);
            let accept = (1.0 - eps * sint2 / (1.0 + eps_sq)).clamp(0.0, 1.0);
            if !RejectionSampler::with_probability(accept).sample(rng) {
                break (eps, one_minus_cos);
            }
        };

        let costheta = (1.0 - one_minus_cos).clamp(-1.0, 1.0);
        let gamma_energy = epsilon * self.inc_energy;
        let gamma_dir = ExitingDirectionSampler::new(costheta, &self.inc_direction).sample(rng);
        let mut result = Interaction::scattered(MevEnergy::new(gamma_energy), gamma_dir);

        let electron_energy = self.inc_energy - gamma_energy;
        if electron_energy > SECONDARY_CUTOFF {
            // Photon momentum equals its energy
            let dir = calc_exiting_direction(self.inc_energy, &self.inc_direction, gamma_energy, &gamma_dir);
            electron[0] = Secondary::new(self.shared.electron, MevEnergy::new(electron_energy), dir);
            result.secondaries = electron;
        } else {
            result.energy_deposition = MevEnergy::new(electron_energy);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::em::test_support::{assert_momentum_conserved, TestSetup};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use transport_math::array::is_soft_unit_vector;
    use transport_types::Action;

    #[test]
    fn test_compton_basic() {
        let setup = TestSetup::new();
        let data = KleinNishinaData::new(&setup.particles).unwrap();
        let alloc = StackAllocator::new(64);
        let mut rng = StdRng::seed_from_u64(100);
        let gamma = setup.particle("gamma", 10.0);
        let dir = [0.0, 0.0, 1.0];

        let mut sum_energy = 0.0;
        for _ in 0..16 {
            let result = KleinNishinaInteractor::new(&data, &gamma, &dir, &alloc).sample(&mut rng);
            assert_eq!(result.action, Action::Scattered);
            assert!(is_soft_unit_vector(&result.direction));
            assert_eq!(result.secondaries.len(), 1);
            let e = &result.secondaries[0];
            assert_eq!(e.particle_id, Some(data.electron));
            assert!(is_soft_unit_vector(&e.direction));
            let total = result.energy.value() + e.energy.value();
            assert!((total - 10.0).abs() < 1e-10, "total = {total}");
            assert_momentum_conserved(&setup, &gamma, &dir, &result);
            sum_energy += result.energy.value();
        }
        // Forward-peaked at 10 MeV: mean scattered energy well above the minimum
        assert!(sum_energy / 16.0 > 10.0 / (1.0 + 2.0 * 10.0 / 0.511));
        assert_eq!(alloc.size(), 16);
    }

    #[test]
    fn test_compton_stack_full() {
        let setup = TestSetup::new();
        let data = KleinNishinaData::new(&setup.particles).unwrap();
        let alloc = StackAllocator::new(0);
        let mut rng = StdRng::seed_from_u64(1);
        let gamma = setup.particle("gamma", 1.0);
        let result =
            KleinNishinaInteractor::new(&data, &gamma, &[0.0, 0.0, 1.0], &alloc).sample(&mut rng);
        assert_eq!(result.action, Action::Failed);
        assert!(result.secondaries.is_empty());
    }

    #[test]
    fn test_compton_reproducible() {
        let setup = TestSetup::new();
        let data = KleinNishinaData::new(&setup.particles).unwrap();
        let gamma = setup.particle("gamma", 0.5);
        let dir = [0.6, 0.0, 0.8];
        let sample = |seed| {
            let alloc = StackAllocator::new(4);
            let mut rng = StdRng::seed_from_u64(seed);
            let r = KleinNishinaInteractor::new(&data, &gamma, &dir, &alloc).sample(&mut rng);
            (r.energy, r.direction, r.secondaries.to_vec())
        };
        assert_eq!(sample(42), sample(42));
    }
}
