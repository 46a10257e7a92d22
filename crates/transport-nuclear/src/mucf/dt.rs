// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — DT Muon-Catalyzed Fusion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Fusion in a dtμ molecule: d + t → α + n + 17.6 MeV.

use super::{back_to_back, calc_third_secondary, sample_isotropic_secondary, MucfData};
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_physics::Interactor;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Secondary, StackAllocator};

const TOTAL_ENERGY: f64 = 17.6;
const NEUTRON_ENERGY: f64 = 14.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DTChannel {
    /// α + μ + n
    AlphaMuonNeutron,
    /// (αμ) + n
    MuonicAlphaNeutron,
}

impl DTChannel {
    pub fn num_secondaries(self) -> usize {
        match self {
            DTChannel::AlphaMuonNeutron => 3,
            DTChannel::MuonicAlphaNeutron => 2,
        }
    }
}

pub struct DTMucfInteractor<'a> {
    data: &'a MucfData,
    channel: DTChannel,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> DTMucfInteractor<'a> {
    pub fn new(data: &'a MucfData, channel: DTChannel, allocate: &'a StackAllocator<Secondary>) -> Self {
        DTMucfInteractor {
            data,
            channel,
            allocate,
        }
    }
}

impl<'a> Interactor<'a> for DTMucfInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(sec) = self.allocate.allocate(self.channel.num_secondaries()) else {
            return Interaction::failed();
        };
        let ids = &self.data.ids;
        let masses = &self.data.masses;
        let neutron_energy = MevEnergy::new(NEUTRON_ENERGY);
        sec[0] = sample_isotropic_secondary(ids.neutron, neutron_energy, rng);

        match self.channel {
            DTChannel::AlphaMuonNeutron => {
                sec[1] = sample_isotropic_secondary(ids.mu_minus, self.data.sample_muon_energy(rng), rng);
                sec[2] = calc_third_secondary(
                    &sec[0],
                    masses.neutron,
                    &sec[1],
                    masses.mu_minus,
                    ids.alpha,
                    masses.alpha,
                );
            }
            DTChannel::MuonicAlphaNeutron => {
                sec[1] = back_to_back(&sec[0], ids.muonic_alpha, MevEnergy::new(TOTAL_ENERGY) - neutron_energy);
            }
        }

        let mut result = Interaction::from_absorption();
        result.secondaries = sec;
        result
    }
}
