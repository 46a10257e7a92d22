// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Interaction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Result record returned by every interactor.

use crate::ids::ParticleId;
use crate::units::MevEnergy;
use crate::Real3;
use serde::{Deserialize, Serialize};

/// Outcome of a sampled interaction for the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Primary survives with new direction and/or energy
    Scattered,
    /// Primary is destroyed; all outgoing energy is in secondaries
    Absorbed,
    /// Primary is untouched (e.g. sampling skipped)
    Unchanged,
    /// Secondary storage was exhausted; retry on a later pass
    Failed,
}

/// Newly created particle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Secondary {
    /// Species; `None` marks an unused slot
    pub particle_id: Option<ParticleId>,
    /// Kinetic energy
    pub energy: MevEnergy,
    /// Unit direction
    pub direction: Real3,
}

impl Secondary {
    pub fn new(particle_id: ParticleId, energy: MevEnergy, direction: Real3) -> Self {
        Secondary {
            particle_id: Some(particle_id),
            energy,
            direction,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.particle_id.is_some()
    }
}

/// Change in state of a particle during a discrete interaction.
///
/// The secondaries borrow from the step's `StackAllocator`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interaction<'a> {
    pub action: Action,
    /// Post-interaction kinetic energy of the primary
    pub energy: MevEnergy,
    /// Post-interaction direction of the primary
    pub direction: Real3,
    /// Post-interaction polarization (optical photons only)
    pub polarization: Option<Real3>,
    pub secondaries: &'a [Secondary],
    /// Energy deposited locally
    pub energy_deposition: MevEnergy,
}

impl<'a> Interaction<'a> {
    /// Primary continues with the given state.
    pub fn scattered(energy: MevEnergy, direction: Real3) -> Self {
        Interaction {
            action: Action::Scattered,
            energy,
            direction,
            polarization: None,
            secondaries: &[],
            energy_deposition: MevEnergy::zero(),
        }
    }

    /// Primary is killed.
    pub fn from_absorption() -> Self {
        Interaction {
            action: Action::Absorbed,
            energy: MevEnergy::zero(),
            direction: [0.0, 0.0, 0.0],
            polarization: None,
            secondaries: &[],
            energy_deposition: MevEnergy::zero(),
        }
    }

    /// Nothing happened.
    pub fn from_unchanged(energy: MevEnergy, direction: Real3) -> Self {
        Interaction {
            action: Action::Unchanged,
            ..Self::scattered(energy, direction)
        }
    }

    /// Secondary allocation failed.
    pub fn failed() -> Self {
        Interaction {
            action: Action::Failed,
            ..Self::from_absorption()
        }
    }

    pub fn changed(&self) -> bool {
        !matches!(self.action, Action::Unchanged | Action::Failed)
    }
}
