// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Optical Photon Generation Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Data passed from charged-particle steps to the optical photon
//! generators.
//!
//! An offload turns one step of a charged track into a
//! [`GeneratorDistribution`]; a generator later samples the individual
//! [`OpticalPhoton`]s from it.

use serde::{Deserialize, Serialize};
use transport_types::constants::C_LIGHT;
use transport_types::ids::{OpticalMaterialId, TrackId};
use transport_types::units::{ElementaryCharge, LightSpeed, MevEnergy};
use transport_types::Real3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Cherenkov,
    Scintillation,
}

/// Speed, position and time at one end of a step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepPoint {
    pub speed: LightSpeed,
    pub pos: Real3,
    /// Global time (s)
    pub time: f64,
}

/// Charged-track state saved before the step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffloadPreStep {
    pub point: StepPoint,
    pub material: OpticalMaterialId,
    /// Track that emits the photons
    pub primary: TrackId,
}

/// Everything needed to sample the photons of one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorDistribution {
    pub kind: GeneratorKind,
    pub num_photons: u32,
    pub charge: ElementaryCharge,
    pub step_length: f64,
    pub material: OpticalMaterialId,
    /// Fraction of the deposited energy lost along the step rather than
    /// at its end point
    pub continuous_edep_fraction: f64,
    pub pre: StepPoint,
    pub post: StepPoint,
    pub primary: TrackId,
}

impl GeneratorDistribution {
    pub fn is_valid(&self) -> bool {
        self.num_photons > 0 && self.step_length > 0.0 && (0.0..=1.0).contains(&self.continuous_edep_fraction)
    }

    /// Time (s) to reach fraction `u` of the step, with the speed varying
    /// linearly along it.
    pub fn time_at(&self, u: f64) -> f64 {
        let delta_speed = self.post.speed.value() - self.pre.speed.value();
        self.pre.time + u * self.step_length / ((self.pre.speed.value() + 0.5 * u * delta_speed) * C_LIGHT)
    }
}

/// Initial state of a new optical photon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalPhoton {
    pub energy: MevEnergy,
    pub position: Real3,
    pub direction: Real3,
    pub polarization: Real3,
    /// Global time (s)
    pub time: f64,
    pub primary: TrackId,
}
