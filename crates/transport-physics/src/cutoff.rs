// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Cutoffs
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Secondary production thresholds per material.

use crate::particle::ParticleParams;
use serde::{Deserialize, Serialize};
use transport_types::ids::{MaterialId, ParticleId};
use transport_types::units::MevEnergy;
use transport_types::{TransportError, TransportResult};

/// Production thresholds for one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialCutoffs {
    pub gamma: MevEnergy,
    pub electron: MevEnergy,
    pub positron: MevEnergy,
}

impl Default for MaterialCutoffs {
    fn default() -> Self {
        // 0.7 mm range cut in water
        MaterialCutoffs {
            gamma: MevEnergy::new(2.94e-3),
            electron: MevEnergy::new(0.35),
            positron: MevEnergy::new(0.34),
        }
    }
}

/// Owning per-material cutoff table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffParams {
    gamma: ParticleId,
    electron: ParticleId,
    positron: ParticleId,
    cutoffs: Vec<MaterialCutoffs>,
}

impl CutoffParams {
    pub fn new(particles: &ParticleParams, cutoffs: Vec<MaterialCutoffs>) -> TransportResult<Self> {
        if let Some(bad) = cutoffs.iter().find(|c| {
            c.gamma.value() < 0.0 || c.electron.value() < 0.0 || c.positron.value() < 0.0
        }) {
            return Err(TransportError::invalid("cutoffs", format!("negative cutoff {bad:?}")));
        }
        Ok(CutoffParams {
            gamma: particles.require("gamma")?,
            electron: particles.require("e-")?,
            positron: particles.require("e+")?,
            cutoffs,
        })
    }

    pub fn num_materials(&self) -> usize {
        self.cutoffs.len()
    }

    pub fn is_positron(&self, particle: ParticleId) -> bool {
        particle == self.positron
    }

    pub fn get(&self, material: MaterialId) -> CutoffView<'_> {
        CutoffView {
            params: self,
            cutoffs: &self.cutoffs[material.get()],
        }
    }
}

/// Cutoffs for the current material.
#[derive(Debug, Clone, Copy)]
pub struct CutoffView<'a> {
    params: &'a CutoffParams,
    cutoffs: &'a MaterialCutoffs,
}

impl<'a> CutoffView<'a> {
    /// Production threshold for a particle; zero for species without one.
    pub fn energy(&self, particle: ParticleId) -> MevEnergy {
        if particle == self.params.gamma {
            self.cutoffs.gamma
        } else if particle == self.params.electron {
            self.cutoffs.electron
        } else if particle == self.params.positron {
            self.cutoffs.positron
        } else {
            MevEnergy::zero()
        }
    }

    /// Whether a secondary of this species and energy should be killed
    /// and deposited locally.
    pub fn apply(&self, particle: ParticleId, energy: MevEnergy) -> bool {
        energy < self.energy(particle)
    }

    pub fn is_positron(&self, particle: ParticleId) -> bool {
        self.params.is_positron(particle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_lookup() {
        let particles = ParticleParams::standard().unwrap();
        let cuts = CutoffParams::new(&particles, vec![MaterialCutoffs::default()]).unwrap();
        let view = cuts.get(MaterialId::new(0));
        let e = particles.find("e-").unwrap();
        let mu = particles.find("mu-").unwrap();
        assert_eq!(view.energy(e), MevEnergy::new(0.35));
        assert_eq!(view.energy(mu), MevEnergy::zero());
        assert!(view.apply(e, MevEnergy::new(0.1)));
        assert!(!view.apply(mu, MevEnergy::new(0.0)));
    }
}
