// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Positron Annihilation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Two-photon annihilation of positrons in flight and at rest (Heitler).

use crate::interactor::Interactor;
use crate::kinematics::{calc_exiting_direction, calc_momentum, ExitingDirectionSampler};
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::array::neg;
use transport_math::distributions::{IsotropicDistribution, ReciprocalDistribution, RejectionSampler};
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EPlusGGData {
    pub positron: ParticleId,
    pub gamma: ParticleId,
    pub electron_mass: f64,
}

impl EPlusGGData {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        let positron = particles.require("e+")?;
        Ok(EPlusGGData {
            positron,
            gamma: particles.require("gamma")?,
            electron_mass: particles.get(positron).mass.value(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0
    }
}

pub struct EPlusGGInteractor<'a> {
    shared: &'a EPlusGGData,
    inc_energy: f64,
    inc_direction: Real3,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> EPlusGGInteractor<'a> {
    pub fn new(
        shared: &'a EPlusGGData,
        particle: &ParticleTrackView<'_>,
        inc_direction: &Real3,
        allocate: &'a StackAllocator<Secondary>,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert_eq!(particle.particle_id(), shared.positron);
        EPlusGGInteractor {
            shared,
            inc_energy: particle.energy().value(),
            inc_direction: *inc_direction,
            allocate,
        }
    }
}

impl<'a> Interactor<'a> for EPlusGGInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(photons) = self.allocate.allocate(2) else {
            return Interaction::failed();
        };
        let mass = self.shared.electron_mass;
        let gamma = self.shared.gamma;

        if self.inc_energy == 0.0 {
            // At rest: back-to-back photons with isotropic orientation
            let dir = IsotropicDistribution.sample(rng);
            photons[0] = Secondary::new(gamma, MevEnergy::new(mass), dir);
            photons[1] = Secondary::new(gamma, MevEnergy::new(mass), neg(&dir));
        } else {
            let tau = self.inc_energy / mass;
            let tau2 = tau + 2.0;
            let sqgrate = 0.5 * (tau / tau2).sqrt();
            let sqg2m1 = (tau * tau2).sqrt();
            let eps_min = 0.5 - sqgrate;
            let eps_max = 0.5 + sqgrate;
            let sample_eps = ReciprocalDistribution::new(eps_min, eps_max);

            let epsilon = loop {
                let eps = sample_eps.sample(rng);
                let accept = 1.0 - eps + (2.0 * (tau + 1.0) * eps - 1.0) / (eps * tau2 * tau2);
                if !RejectionSampler::with_probability(accept.clamp(0.0, 1.0)).sample(rng) {
                    break eps;
                }
            };

            let costheta = ((epsilon * tau2 - 1.0) / (epsilon * sqg2m1)).clamp(-1.0, 1.0);
            let total = self.inc_energy + 2.0 * mass;
            let e1 = epsilon * total;
            let e2 = total - e1;
            let dir1 = ExitingDirectionSampler::new(costheta, &self.inc_direction).sample(rng);
            let dir2 = calc_exiting_direction(
                calc_momentum(self.inc_energy, mass),
                &self.inc_direction,
                e1,
                &dir1,
            );
            photons[0] = Secondary::new(gamma, MevEnergy::new(e1), dir1);
            photons[1] = Secondary::new(gamma, MevEnergy::new(e2), dir2);
        }

        let mut result = Interaction::from_absorption();
        result.secondaries = photons;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::em::test_support::{assert_momentum_conserved, TestSetup};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use transport_math::array::{dot, is_soft_unit_vector};
    use transport_types::Action;

    #[test]
    fn test_annihilation_at_rest() {
        let setup = TestSetup::new();
        let data = EPlusGGData::new(&setup.particles).unwrap();
        let alloc = StackAllocator::new(8);
        let mut rng = StdRng::seed_from_u64(7);
        let positron = setup.particle("e+", 0.0);
        let result = EPlusGGInteractor::new(&data, &positron, &[0.0, 0.0, 1.0], &alloc).sample(&mut rng);

        assert_eq!(result.action, Action::Absorbed);
        let [g1, g2] = result.secondaries else {
            panic!("expected two photons");
        };
        assert_eq!(g1.energy.value(), data.electron_mass);
        assert_eq!(g2.energy.value(), data.electron_mass);
        assert!((dot(&g1.direction, &g2.direction) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_annihilation_in_flight() {
        let setup = TestSetup::new();
        let data = EPlusGGData::new(&setup.particles).unwrap();
        let alloc = StackAllocator::new(64);
        let mut rng = StdRng::seed_from_u64(12345);
        let positron = setup.particle("e+", 10.0);
        let dir = [0.0, 1.0, 0.0];
        for _ in 0..20 {
            let result = EPlusGGInteractor::new(&data, &positron, &dir, &alloc).sample(&mut rng);
            assert_eq!(result.secondaries.len(), 2);
            let total: f64 = result.secondaries.iter().map(|s| s.energy.value()).sum();
            assert!((total - (10.0 + 2.0 * data.electron_mass)).abs() < 1e-10);
            for s in result.secondaries {
                assert!(is_soft_unit_vector(&s.direction));
                assert!(s.energy.value() > 0.0);
            }
            assert_momentum_conserved(&setup, &positron, &dir, &result);
        }
    }

    #[test]
    fn test_annihilation_needs_two_slots() {
        let setup = TestSetup::new();
        let data = EPlusGGData::new(&setup.particles).unwrap();
        let alloc = StackAllocator::new(1);
        let mut rng = StdRng::seed_from_u64(0);
        let positron = setup.particle("e+", 1.0);
        let result = EPlusGGInteractor::new(&data, &positron, &[1.0, 0.0, 0.0], &alloc).sample(&mut rng);
        assert_eq!(result.action, Action::Failed);
        assert_eq!(alloc.size(), 0);
    }
}
