// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Multiple Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Condensed-history multiple Coulomb scattering with the Urban model.
//!
//! The along-step sequence is: limit the true step ([`UrbanMscStepLimit`]),
//! convert it to a geometric step ([`MscStepToGeo`]), let the geometry
//! move the track, then sample the end-of-step deflection and lateral
//! displacement ([`UrbanMscScatter`]).

mod data;
mod helper;
mod scatter;
mod step_limit;

pub use data::{
    MscXsTable, UrbanMscData, UrbanMscMaterialData, UrbanMscParMatData, UrbanMscParameters,
    UrbanMscXsInput, UrbanParMatType,
};
pub use helper::{MscStepToGeo, UrbanMscHelper};
pub use scatter::{UrbanLargeAngleDistribution, UrbanMscScatter, UrbanPositronCorrector};
pub use step_limit::UrbanMscStepLimit;

use serde::{Deserialize, Serialize};
use transport_types::units::MevEnergy;
use transport_types::Real3;

/// Continuous energy loss tables of the current particle and material.
///
/// Implemented by the physics state in the stepping loop; tests use simple
/// analytic stopping powers.
pub trait EnergyLossTables {
    /// CSDA range (cm) at the current track energy
    fn range(&self) -> f64;
    /// Stopping power dE/dx (MeV/cm) at an energy
    fn energy_loss(&self, energy: MevEnergy) -> f64;
    /// Energy corresponding to a residual range
    fn inverse_range(&self, range: f64) -> MevEnergy;
}

/// Persistent per-track step limit state, reset on entering a volume.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MscRange {
    /// Initial range or mean free path (cm)
    pub range_init: f64,
    pub range_factor: f64,
    /// Minimum step (cm)
    pub limit_min: f64,
}

impl MscRange {
    pub fn is_set(&self) -> bool {
        self.range_init > 0.0
    }
}

/// True and geometric path lengths of one MSC step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MscStep {
    pub is_displaced: bool,
    pub true_path: f64,
    pub geom_path: f64,
    /// Slope of the scaled mean free path (1/cm), or the small-step marker
    pub alpha: f64,
    /// Minimum step from the step limiter (cm); zero if not limited
    pub limit_min: f64,
}

impl MscStep {
    /// `alpha` value for steps where the mean free path is constant.
    pub const SMALL_STEP_ALPHA: f64 = -1.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MscAction {
    /// Deflected without lateral displacement
    Scattered,
    /// Deflected and laterally displaced
    Displaced,
    Unchanged,
}

/// Change of direction and position at the end of an MSC step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MscInteraction {
    pub direction: Real3,
    pub displacement: Real3,
    pub action: MscAction,
}
