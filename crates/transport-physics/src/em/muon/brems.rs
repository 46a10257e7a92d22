// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Muon Bremsstrahlung
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Muon bremsstrahlung with the Kelner-Kokoulin-Petrukhin differential
//! cross section and the modified MEPhI photon angle.

use super::MuonIds;
use crate::cutoff::CutoffView;
use crate::interactor::Interactor;
use crate::kinematics::{calc_exiting_direction, ExitingDirectionSampler};
use crate::material::ElementView;
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use transport_math::distributions::{generate_canonical, RejectionSampler, ReciprocalDistribution};
use transport_types::constants::{ALPHA_FINE_STRUCTURE, R_ELECTRON};
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportResult};

const SQRT_E: f64 = 1.648_721_270_700_128_1;
/// Screening constants for hydrogen and for the Thomas-Fermi model
const BH: f64 = 202.4;
const BH1: f64 = 446.0;
const BTF: f64 = 183.0;
const BTF1: f64 = 1429.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MuBremsstrahlungData {
    pub ids: MuonIds,
    pub gamma: ParticleId,
    pub electron_mass: f64,
}

impl MuBremsstrahlungData {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        let electron = particles.require("e-")?;
        Ok(MuBremsstrahlungData {
            ids: MuonIds::new(particles)?,
            gamma: particles.require("gamma")?,
            electron_mass: particles.get(electron).mass.value(),
        })
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0
    }
}

/// Differential cross section dσ/dk (cm²/MeV) on one element.
#[derive(Debug, Clone, Copy)]
pub struct MuBremsDiffXsCalculator {
    inc_energy: f64,
    inc_mass: f64,
    electron_mass: f64,
    z: f64,
    inv_cbrt_z: f64,
    /// Nuclear size parameter D_n^(1 - 1/Z)
    dn: f64,
    is_hydrogen: bool,
}

impl MuBremsDiffXsCalculator {
    pub fn new(particle: &ParticleTrackView<'_>, element: &ElementView<'_>, electron_mass: f64) -> Self {
        let iz = element.atomic_number();
        let dn = 1.54 * element.atomic_mass().value().powf(0.27);
        let dn = if iz > 1 { dn / dn.powf(1.0 / iz as f64) } else { dn };
        MuBremsDiffXsCalculator {
            inc_energy: particle.energy().value(),
            inc_mass: particle.mass().value(),
            electron_mass,
            z: iz as f64,
            inv_cbrt_z: 1.0 / element.cbrt_z(),
            dn,
            is_hydrogen: iz == 1,
        }
    }

    pub fn evaluate(&self, gamma_energy: f64) -> f64 {
        if gamma_energy > self.inc_energy {
            return 0.0;
        }
        let mass = self.inc_mass;
        let me = self.electron_mass;
        let rmass = mass / me;
        let total = self.inc_energy + mass;
        let v = gamma_energy / total;
        let delta = 0.5 * mass * mass * v / (total - gamma_energy);
        let rab0 = delta * SQRT_E;
        let (b, b1) = if self.is_hydrogen { (BH, BH1) } else { (BTF, BTF1) };

        // Nucleus contribution
        let rab1 = b * self.inv_cbrt_z;
        let fn_ = ((rab1 / (self.dn * (me + rab0 * rab1))) * (mass + delta * (self.dn * SQRT_E - 2.0)))
            .ln()
            .max(0.0);

        // Atomic electron contribution
        let epmax1 = total / (1.0 + 0.5 * mass * rmass / total);
        let fe = if gamma_energy < epmax1 {
            let rab2 = b1 * self.inv_cbrt_z * self.inv_cbrt_z;
            (rab2 * mass / ((1.0 + delta * rmass / (me * SQRT_E)) * (me + rab2 * rab0)))
                .ln()
                .max(0.0)
        } else {
            0.0
        };

        // Spin-1/2 projectile
        let x = 1.0 - v + 0.75 * v * v;
        let coeff = 16.0 / 3.0 * ALPHA_FINE_STRUCTURE * R_ELECTRON * R_ELECTRON;
        coeff * x * self.z * (fn_ * self.z + fe) / gamma_energy
    }
}

pub struct MuBremsstrahlungInteractor<'a> {
    shared: &'a MuBremsstrahlungData,
    inc_energy: f64,
    inc_mass: f64,
    inc_momentum: f64,
    inc_direction: Real3,
    gamma_cutoff: f64,
    calc_dxs: MuBremsDiffXsCalculator,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> MuBremsstrahlungInteractor<'a> {
    pub fn new(
        shared: &'a MuBremsstrahlungData,
        particle: &ParticleTrackView<'_>,
        inc_direction: &Real3,
        cutoffs: &CutoffView<'_>,
        allocate: &'a StackAllocator<Secondary>,
        element: ElementView<'_>,
    ) -> Self {
        debug_assert!(shared.ids.applies_to(particle.particle_id()));
        MuBremsstrahlungInteractor {
            shared,
            inc_energy: particle.energy().value(),
            inc_mass: particle.mass().value(),
            inc_momentum: particle.momentum().value(),
            inc_direction: *inc_direction,
            gamma_cutoff: cutoffs.energy(shared.gamma).value(),
            calc_dxs: MuBremsDiffXsCalculator::new(particle, &element, shared.electron_mass),
            allocate,
        }
    }

    /// Photon energy, log-uniform with k dσ/dk rejection.
    fn sample_energy<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let kmin = self.gamma_cutoff;
        let func_max = kmin * self.calc_dxs.evaluate(kmin);
        let sample_k = ReciprocalDistribution::new(kmin, self.inc_energy);
        loop {
            let k = sample_k.sample(rng);
            let f = k * self.calc_dxs.evaluate(k);
            if !RejectionSampler::new(f.min(func_max), func_max).sample(rng) {
                return k;
            }
        }
    }

    /// Modified MEPhI polar angle of the photon.
    fn sample_costheta<R: Rng + ?Sized>(&self, gamma_energy: f64, rng: &mut R) -> f64 {
        let gam = 1.0 + self.inc_energy / self.inc_mass;
        let rmax = gam * FRAC_PI_2 * (gam * self.inc_mass / gamma_energy - 1.0).min(1.0);
        let rmax_sq = rmax * rmax;
        let x = generate_canonical(rng) * rmax_sq / (1.0 + rmax_sq);
        let theta = (x / (1.0 - x)).sqrt() / gam;
        theta.cos()
    }
}

impl<'a> Interactor<'a> for MuBremsstrahlungInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        if self.gamma_cutoff >= self.inc_energy {
            return Interaction::from_unchanged(MevEnergy::new(self.inc_energy), self.inc_direction);
        }
        let Some(photon) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };

        let gamma_energy = self.sample_energy(rng);
        let costheta = self.sample_costheta(gamma_energy, rng);
        let gamma_dir = ExitingDirectionSampler::new(costheta, &self.inc_direction).sample(rng);
        photon[0] = Secondary::new(self.shared.gamma, MevEnergy::new(gamma_energy), gamma_dir);

        let dir = calc_exiting_direction(self.inc_momentum, &self.inc_direction, gamma_energy, &gamma_dir);
        let mut result = Interaction::scattered(MevEnergy::new(self.inc_energy - gamma_energy), dir);
        result.secondaries = photon;
        result
    }
}
