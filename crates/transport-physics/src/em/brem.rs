// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Bremsstrahlung Final State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Pieces shared by the Seltzer-Berger, relativistic and combined
//! bremsstrahlung models.

use crate::kinematics::{calc_exiting_direction, ExitingDirectionSampler};
use crate::particle::ParticleParams;
use crate::material::MaterialView;
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_types::constants::MIGDAL_CONSTANT;
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, TransportResult};

/// Upper energy limit (MeV) of the Seltzer-Berger tables.
pub const SELTZER_BERGER_UPPER_LIMIT: f64 = 1e3;

/// Particles a bremsstrahlung model applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BremIds {
    pub electron: ParticleId,
    pub positron: ParticleId,
    pub gamma: ParticleId,
}

impl BremIds {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        Ok(BremIds {
            electron: particles.require("e-")?,
            positron: particles.require("e+")?,
            gamma: particles.require("gamma")?,
        })
    }

    pub fn applies_to(&self, particle: ParticleId) -> bool {
        particle == self.electron || particle == self.positron
    }
}

/// Dielectric suppression term k_p² (MeV²) for an incident total energy.
#[inline]
pub fn calc_density_correction(material: &MaterialView<'_>, total_energy: f64) -> f64 {
    material.electron_density() * MIGDAL_CONSTANT * total_energy * total_energy
}

/// Photon and primary final state once the photon energy and polar angle
/// are known.
///
/// The photon direction is sampled about the incident direction, and the
/// primary direction follows from momentum conservation.
pub struct BremFinalStateHelper<'s> {
    pub inc_energy: f64,
    pub inc_direction: Real3,
    pub inc_momentum: f64,
    pub gamma: ParticleId,
    pub gamma_energy: f64,
    pub costheta: f64,
    pub secondary: &'s mut [Secondary],
}

impl<'s> BremFinalStateHelper<'s> {
    pub fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> Interaction<'s> {
        debug_assert_eq!(self.secondary.len(), 1);
        debug_assert!(self.gamma_energy > 0.0 && self.gamma_energy < self.inc_energy);
        let photon_dir = ExitingDirectionSampler::new(self.costheta, &self.inc_direction).sample(rng);
        self.secondary[0] = Secondary::new(self.gamma, MevEnergy::new(self.gamma_energy), photon_dir);

        let primary_dir =
            calc_exiting_direction(self.inc_momentum, &self.inc_direction, self.gamma_energy, &photon_dir);
        let mut result =
            Interaction::scattered(MevEnergy::new(self.inc_energy - self.gamma_energy), primary_dir);
        result.secondaries = self.secondary;
        result
    }
}
