// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Moller-Bhabha Ionization
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Delta-ray production by electrons (Møller) and positrons (Bhabha)
//! above the production cut.

use crate::cutoff::CutoffView;
use crate::interactor::Interactor;
use crate::kinematics::{calc_exiting_direction, calc_momentum, ExitingDirectionSampler};
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::distributions::{generate_canonical, RejectionSampler};
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MollerBhabhaData {
    pub electron: ParticleId,
    pub positron: ParticleId,
    pub electron_mass: f64,
}

impl MollerBhabhaData {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        let electron = particles.require("e-")?;
        Ok(MollerBhabhaData {
            electron,
            positron: particles.require("e+")?,
            electron_mass: particles.get(electron).mass.value(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0 && self.electron != self.positron
    }
}

/// Fraction of the incident kinetic energy carried by the delta ray.
#[derive(Debug, Clone, Copy)]
struct MollerEnergyDistribution {
    xmin: f64,
    xmax: f64,
    gamma: f64,
}

impl Distribution<f64> for MollerEnergyDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (xmin, xmax) = (self.xmin, self.xmax);
        let gg = (2.0 * self.gamma - 1.0) / (self.gamma * self.gamma);
        let z = |x: f64| {
            let y = 1.0 - x;
            1.0 - gg * x + x * x * (1.0 - gg + (1.0 - gg * y) / (y * y))
        };
        let z_max = z(xmax);
        loop {
            let u = generate_canonical(rng);
            let x = xmin * xmax / (xmin * (1.0 - u) + xmax * u);
            if !RejectionSampler::new(z(x).min(z_max), z_max).sample(rng) {
                return x;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BhabhaEnergyDistribution {
    xmin: f64,
    xmax: f64,
    gamma: f64,
}

impl Distribution<f64> for BhabhaEnergyDistribution {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let (xmin, xmax) = (self.xmin, self.xmax);
        let beta_sq = 1.0 - 1.0 / (self.gamma * self.gamma);
        let y = 1.0 / (1.0 + self.gamma);
        let y2 = y * y;
        let y12 = 1.0 - 2.0 * y;
        let b1 = 2.0 - y2;
        let b2 = y12 * (3.0 + y2);
        let b4 = y12 * y12 * y12;
        let b3 = b4 + y12 * y12;
        let z = |x: f64| {
            let x2 = x * x;
            1.0 + (x2 * x2 * b4 - x * x2 * b3 + x2 * b2 - x * b1) * beta_sq
        };
        // Envelope bound evaluated at the low edge
        let z_max = 1.0 + (xmax.powi(4) * b4 - xmin.powi(3) * b3 + xmax * xmax * b2 - xmin * b1) * beta_sq;
        loop {
            let u = generate_canonical(rng);
            let x = xmin * xmax / (xmin * (1.0 - u) + xmax * u);
            if !RejectionSampler::new(z(x).min(z_max), z_max).sample(rng) {
                return x;
            }
        }
    }
}

pub struct MollerBhabhaInteractor<'a> {
    shared: &'a MollerBhabhaData,
    inc_energy: f64,
    inc_momentum: f64,
    inc_direction: Real3,
    electron_cutoff: f64,
    is_electron: bool,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> MollerBhabhaInteractor<'a> {
    pub fn new(
        shared: &'a MollerBhabhaData,
        particle: &ParticleTrackView<'_>,
        cutoffs: &CutoffView<'_>,
        inc_direction: &Real3,
        allocate: &'a StackAllocator<Secondary>,
    ) -> Self {
        debug_assert!(shared.is_valid());
        let pid = particle.particle_id();
        debug_assert!(pid == shared.electron || pid == shared.positron);
        MollerBhabhaInteractor {
            shared,
            inc_energy: particle.energy().value(),
            inc_momentum: particle.momentum().value(),
            inc_direction: *inc_direction,
            electron_cutoff: cutoffs.energy(shared.electron).value(),
            is_electron: pid == shared.electron,
            allocate,
        }
    }

    /// Largest kinetic energy the delta ray can take.
    fn max_secondary_energy(&self) -> f64 {
        if self.is_electron {
            // Identical particles: the faster one is the primary
            0.5 * self.inc_energy
        } else {
            self.inc_energy
        }
    }
}

impl<'a> Interactor<'a> for MollerBhabhaInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let max_sec = self.max_secondary_energy();
        if self.electron_cutoff >= max_sec {
            return Interaction::from_unchanged(MevEnergy::new(self.inc_energy), self.inc_direction);
        }
        let Some(delta) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };

        let mass = self.shared.electron_mass;
        let gamma = 1.0 + self.inc_energy / mass;
        let xmin = self.electron_cutoff / self.inc_energy;
        let xmax = max_sec / self.inc_energy;
        let epsilon = if self.is_electron {
            MollerEnergyDistribution { xmin, xmax, gamma }.sample(rng)
        } else {
            BhabhaEnergyDistribution { xmin, xmax, gamma }.sample(rng)
        };

        let delta_energy = epsilon * self.inc_energy;
        let delta_momentum = calc_momentum(delta_energy, mass);
        let total_energy = self.inc_energy + mass;
        let costheta = (delta_energy * (total_energy + mass) / (delta_momentum * self.inc_momentum)).min(1.0);
        let delta_dir = ExitingDirectionSampler::new(costheta, &self.inc_direction).sample(rng);
        delta[0] = Secondary::new(self.shared.electron, MevEnergy::new(delta_energy), delta_dir);

        let primary_dir =
            calc_exiting_direction(self.inc_momentum, &self.inc_direction, delta_momentum, &delta_dir);
        let mut result = Interaction::scattered(MevEnergy::new(self.inc_energy - delta_energy), primary_dir);
        result.secondaries = delta;
        result
    }
}
