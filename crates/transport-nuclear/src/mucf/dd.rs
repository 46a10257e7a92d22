// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — DD Muon-Catalyzed Fusion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fusion in a ddμ molecule.

use super::{back_to_back, calc_third_secondary, sample_isotropic_secondary, MucfData};
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_physics::Interactor;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Secondary, StackAllocator};

/// Kinetic energy (MeV) shared by the products of d + d → ³He + n
const NEUTRON_CHANNEL_ENERGY: f64 = 3.3;
/// Kinetic energy (MeV) shared by the products of d + d → t + p
const PROTON_CHANNEL_ENERGY: f64 = 4.03;
/// Fraction of the energy carried by the light nucleon
const NUCLEON_FRACTION: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DDChannel {
    /// ³He + μ + n
    Helium3MuonNeutron,
    /// (³He μ) + n
    MuonicHelium3Neutron,
    /// t + μ + p
    TritiumMuonProton,
}

impl DDChannel {
    pub fn num_secondaries(self) -> usize {
        match self {
            DDChannel::MuonicHelium3Neutron => 2,
            DDChannel::Helium3MuonNeutron | DDChannel::TritiumMuonProton => 3,
        }
    }
}

pub struct DDMucfInteractor<'a> {
    data: &'a MucfData,
    channel: DDChannel,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> DDMucfInteractor<'a> {
    pub fn new(data: &'a MucfData, channel: DDChannel, allocate: &'a StackAllocator<Secondary>) -> Self {
        DDMucfInteractor {
            data,
            channel,
            allocate,
        }
    }
}

impl<'a> Interactor<'a> for DDMucfInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(sec) = self.allocate.allocate(self.channel.num_secondaries()) else {
            return Interaction::failed();
        };
        let ids = &self.data.ids;
        let masses = &self.data.masses;
        let neutron_energy = MevEnergy::new(NUCLEON_FRACTION * NEUTRON_CHANNEL_ENERGY);

        match self.channel {
            DDChannel::Helium3MuonNeutron => {
                sec[0] = sample_isotropic_secondary(ids.neutron, neutron_energy, rng);
                sec[1] = sample_isotropic_secondary(ids.mu_minus, self.data.sample_muon_energy(rng), rng);
                sec[2] = calc_third_secondary(&sec[0], masses.neutron, &sec[1], masses.mu_minus, ids.he3, masses.he3);
            }
            DDChannel::MuonicHelium3Neutron => {
                sec[0] = sample_isotropic_secondary(ids.neutron, neutron_energy, rng);
                let remainder = MevEnergy::new(NEUTRON_CHANNEL_ENERGY) - neutron_energy;
                sec[1] = back_to_back(&sec[0], ids.muonic_he3, remainder);
            }
            DDChannel::TritiumMuonProton => {
                let proton_energy = MevEnergy::new(NUCLEON_FRACTION * PROTON_CHANNEL_ENERGY);
                sec[0] = sample_isotropic_secondary(ids.proton, proton_energy, rng);
                sec[1] = sample_isotropic_secondary(ids.mu_minus, self.data.sample_muon_energy(rng), rng);
                sec[2] = calc_third_secondary(
                    &sec[0],
                    masses.proton,
                    &sec[1],
                    masses.mu_minus,
                    ids.triton,
                    masses.triton,
                );
            }
        }

        let mut result = Interaction::from_absorption();
        result.secondaries = sec;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mucf::tests::test_data;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use transport_math::array::{dot, is_soft_unit_vector};
    use transport_types::Action;

    fn kinetic_sum(result: &Interaction<'_>) -> f64 {
        result.secondaries.iter().map(|s| s.energy.value()).sum()
    }

    #[test]
    fn test_helium3_muon_neutron() {
        let (_, data) = test_data();
        let alloc = StackAllocator::new(12);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..4 {
            let result = DDMucfInteractor::new(&data, DDChannel::Helium3MuonNeutron, &alloc).sample(&mut rng);
            assert_eq!(result.action, Action::Absorbed);
            let sec = result.secondaries;
            assert_eq!(sec.len(), 3);
            assert_eq!(sec[0].particle_id, Some(data.ids.neutron));
            assert_eq!(sec[1].particle_id, Some(data.ids.mu_minus));
            assert_eq!(sec[2].particle_id, Some(data.ids.he3));
            assert!((sec[0].energy.value() - 2.475).abs() < 1e-12);
            assert!(sec.iter().all(|s| is_soft_unit_vector(&s.direction)));
            assert!((kinetic_sum(&result) - 3.3).abs() < 0.3);
        }
        assert_eq!(alloc.size(), 12);
    }

    #[test]
    fn test_muonic_helium3() {
        let (_, data) = test_data();
        let alloc = StackAllocator::new(2);
        let mut rng = StdRng::seed_from_u64(2);
        let result = DDMucfInteractor::new(&data, DDChannel::MuonicHelium3Neutron, &alloc).sample(&mut rng);
        let sec = result.secondaries;
        assert_eq!(sec[1].particle_id, Some(data.ids.muonic_he3));
        assert!((sec[1].energy.value() - 0.825).abs() < 1e-12);
        assert!((dot(&sec[0].direction, &sec[1].direction) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tritium_muon_proton() {
        let (_, data) = test_data();
        let alloc = StackAllocator::new(3);
        let mut rng = StdRng::seed_from_u64(3);
        let result = DDMucfInteractor::new(&data, DDChannel::TritiumMuonProton, &alloc).sample(&mut rng);
        let sec = result.secondaries;
        assert_eq!(sec[0].particle_id, Some(data.ids.proton));
        assert_eq!(sec[2].particle_id, Some(data.ids.triton));
        assert!((kinetic_sum(&result) - 4.03).abs() < 0.3);

        // Out of space
        let result = DDMucfInteractor::new(&data, DDChannel::TritiumMuonProton, &alloc).sample(&mut rng);
        assert_eq!(result.action, Action::Failed);
    }
}
