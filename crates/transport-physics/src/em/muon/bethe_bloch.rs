// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Muon Bethe-Bloch Ionization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Delta-ray production by muons, with the radiative correction to the
//! Bethe-Bloch cross section at high transfer.

use super::MuonIds;
use crate::cutoff::CutoffView;
use crate::interactor::Interactor;
use crate::kinematics::{calc_exiting_direction, calc_momentum, ExitingDirectionSampler};
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use transport_math::distributions::{generate_canonical, RejectionSampler};
use transport_types::constants::ALPHA_FINE_STRUCTURE;
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportResult};

/// Above this delta-ray energy (MeV) the radiative correction applies
const RADIATIVE_LIMIT: f64 = 0.1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuBetheBlochData {
    pub ids: MuonIds,
    pub electron: ParticleId,
    pub electron_mass: f64,
}

impl MuBetheBlochData {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        let electron = particles.require("e-")?;
        Ok(MuBetheBlochData {
            ids: MuonIds::new(particles)?,
            electron,
            electron_mass: particles.get(electron).mass.value(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0
    }
}

/// Delta-ray kinetic energy between the production cut and the
/// kinematic maximum.
#[derive(Debug, Clone, Copy)]
pub struct MuBBEnergyDistribution {
    min_sec: f64,
    max_sec: f64,
    inc_mass: f64,
    electron_mass: f64,
    total_energy: f64,
    beta_sq: f64,
    rad_max: f64,
}

impl MuBBEnergyDistribution {
    pub fn new(particle: &ParticleTrackView<'_>, cutoff: f64, electron_mass: f64) -> Self {
        let inc_mass = particle.mass().value();
        let total_energy = particle.total_energy().value();
        let max_sec = calc_max_secondary_energy(particle, electron_mass);
        let alpha_prime = ALPHA_FINE_STRUCTURE / (2.0 * PI);
        let rad_max = if max_sec > RADIATIVE_LIMIT {
            let a0 = (2.0 * total_energy / inc_mass).ln();
            1.0 + alpha_prime * a0 * a0
        } else {
            1.0
        };
        MuBBEnergyDistribution {
            min_sec: cutoff.min(max_sec),
            max_sec,
            inc_mass,
            electron_mass,
            total_energy,
            beta_sq: particle.beta_sq(),
            rad_max,
        }
    }

    pub fn min_secondary_energy(&self) -> f64 {
        self.min_sec
    }

    pub fn max_secondary_energy(&self) -> f64 {
        self.max_sec
    }
}

impl Distribution<f64> for MuBBEnergyDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let alpha_prime = ALPHA_FINE_STRUCTURE / (2.0 * PI);
        let (emin, emax) = (self.min_sec, self.max_sec);
        let etot_sq = self.total_energy * self.total_energy;
        loop {
            // 1/T² spectrum
            let u = generate_canonical(rng);
            let energy = emin * emax / (emin * (1.0 - u) + emax * u);
            let mut f = 1.0 - self.beta_sq * energy / emax + 0.5 * energy * energy / etot_sq;
            if energy > RADIATIVE_LIMIT {
                let a1 = (1.0 + 2.0 * energy / self.electron_mass).ln();
                let a3 = (4.0 * self.total_energy * (self.total_energy - energy)
                    / (self.inc_mass * self.inc_mass))
                    .ln();
                f *= 1.0 + alpha_prime * a1 * (a3 - a1);
            }
            if !RejectionSampler::new(f.clamp(0.0, self.rad_max), self.rad_max).sample(rng) {
                return energy;
            }
        }
    }
}

/// Maximum energy transfer to a free electron.
fn calc_max_secondary_energy(particle: &ParticleTrackView<'_>, electron_mass: f64) -> f64 {
    let mass_ratio = electron_mass / particle.mass().value();
    let gamma = particle.lorentz_factor();
    let beta_gamma_sq = particle.beta_sq() * gamma * gamma;
    2.0 * electron_mass * beta_gamma_sq / (1.0 + mass_ratio * (2.0 * gamma + mass_ratio))
}

pub struct MuBetheBlochInteractor<'a> {
    shared: &'a MuBetheBlochData,
    inc_energy: f64,
    inc_momentum: f64,
    total_energy: f64,
    inc_direction: Real3,
    sample_energy: MuBBEnergyDistribution,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> MuBetheBlochInteractor<'a> {
    pub fn new(
        shared: &'a MuBetheBlochData,
        particle: &ParticleTrackView<'_>,
        cutoffs: &CutoffView<'_>,
        inc_direction: &Real3,
        allocate: &'a StackAllocator<Secondary>,
    ) -> Self {
        debug_assert!(shared.ids.applies_to(particle.particle_id()));
        let cutoff = cutoffs.energy(shared.electron).value();
        MuBetheBlochInteractor {
            shared,
            inc_energy: particle.energy().value(),
            inc_momentum: particle.momentum().value(),
            total_energy: particle.total_energy().value(),
            inc_direction: *inc_direction,
            sample_energy: MuBBEnergyDistribution::new(particle, cutoff, shared.electron_mass),
            allocate,
        }
    }
}

impl<'a> Interactor<'a> for MuBetheBlochInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let dist = &self.sample_energy;
        if dist.min_secondary_energy() >= dist.max_secondary_energy() {
            return Interaction::from_unchanged(MevEnergy::new(self.inc_energy), self.inc_direction);
        }
        let Some(electron) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };

        let mass = self.shared.electron_mass;
        let delta_energy = dist.sample(rng);
        let delta_momentum = calc_momentum(delta_energy, mass);
        let costheta =
            (delta_energy * (self.total_energy + mass) / (delta_momentum * self.inc_momentum)).min(1.0);
        let delta_dir = ExitingDirectionSampler::new(costheta, &self.inc_direction).sample(rng);
        electron[0] = Secondary::new(self.shared.electron, MevEnergy::new(delta_energy), delta_dir);

        let dir = calc_exiting_direction(self.inc_momentum, &self.inc_direction, delta_momentum, &delta_dir);
        let mut result = Interaction::scattered(MevEnergy::new(self.inc_energy - delta_energy), dir);
        result.secondaries = electron;
        result
    }
}
