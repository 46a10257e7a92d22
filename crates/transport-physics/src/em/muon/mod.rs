// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Muon Interactions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete energy loss processes of muons.

mod bethe_bloch;
mod brems;

pub use bethe_bloch::{MuBBEnergyDistribution, MuBetheBlochData, MuBetheBlochInteractor};
pub use brems::{MuBremsDiffXsCalculator, MuBremsstrahlungData, MuBremsstrahlungInteractor};

use crate::particle::ParticleParams;
use serde::{Deserialize, Serialize};
use transport_types::ids::ParticleId;
use transport_types::TransportResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuonIds {
    pub mu_minus: ParticleId,
    pub mu_plus: ParticleId,
}

impl MuonIds {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        Ok(MuonIds {
            mu_minus: particles.require("mu-")?,
            mu_plus: particles.require("mu+")?,
        })
    }

    pub fn applies_to(&self, id: ParticleId) -> bool {
        id == self.mu_minus || id == self.mu_plus
    }
}
