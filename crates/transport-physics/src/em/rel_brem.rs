// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Relativistic Bremsstrahlung
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! High-energy electron and positron bremsstrahlung with Tsai's screening
//! functions and optional Landau-Pomeranchuk-Migdal suppression.

use crate::cutoff::CutoffView;
use crate::em::brem::{calc_density_correction, BremFinalStateHelper, BremIds};
use crate::interactor::Interactor;
use crate::kinematics::TsaiUrbanDistribution;
use crate::material::{ElementView, MaterialParams, MaterialView};
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, SQRT_2};
use transport_math::distributions::{ReciprocalDistribution, RejectionSampler};
use transport_math::poly::poly_eval;
use transport_types::constants::{LPM_CONSTANT, MIGDAL_CONSTANT};
use transport_types::ids::{ElementComponentId, ElementId};
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportError, TransportResult};

/// Upper bound (MeV) on the sampled photon energy
const HIGH_ENERGY_LIMIT: f64 = 1e8;

/// Per-element constants of the differential cross section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelBremElementData {
    /// ln(Z)/3 + f_c
    pub fz: f64,
    /// Complete-screening coefficient of (1 - y + 0.75 y²)
    pub factor1: f64,
    /// Complete-screening coefficient of (1 - y)
    pub factor2: f64,
    /// Tsai γ scale (MeV)
    pub gamma_factor: f64,
    /// Tsai ε scale (MeV)
    pub epsilon_factor: f64,
}

impl RelBremElementData {
    fn from_element(element: &ElementView<'_>, electron_mass: f64) -> Self {
        let record = element.record();
        let fc = element.coulomb_correction();
        let inv_z = 1.0 / element.atomic_number() as f64;
        RelBremElementData {
            fz: element.log_z() / 3.0 + fc,
            factor1: (record.lrad - fc) + record.lrad_prime * inv_z,
            factor2: (1.0 + inv_z) / 12.0,
            gamma_factor: 100.0 * electron_mass / element.cbrt_z(),
            epsilon_factor: 100.0 * electron_mass / element.cbrt_z().powi(2),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelBremData {
    pub ids: BremIds,
    pub electron_mass: f64,
    pub enable_lpm: bool,
    /// Include Migdal's dielectric suppression in the LPM variable
    pub dielectric_suppression: bool,
    /// Indexed by element id
    pub elements: Vec<RelBremElementData>,
}

impl RelBremData {
    pub fn new(particles: &ParticleParams, materials: &MaterialParams, enable_lpm: bool) -> TransportResult<Self> {
        let ids = BremIds::new(particles)?;
        let electron_mass = particles.get(ids.electron).mass.value();
        let elements = (0..materials.num_elements())
            .map(|i| RelBremElementData::from_element(&materials.element(ElementId::new(i)), electron_mass))
            .collect();
        let data = RelBremData {
            ids,
            electron_mass,
            enable_lpm,
            dielectric_suppression: true,
            elements,
        };
        if !data.is_valid() {
            return Err(TransportError::invalid("relativistic_brem", "missing or non-physical element data"));
        }
        Ok(data)
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0
            && !self.elements.is_empty()
            && self.elements.iter().all(|e| e.factor1 > 0.0 && e.factor2 > 0.0)
    }
}

/// Tsai's analytic screening functions and their complete-screening
/// differences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsaiScreening {
    pub phi1: f64,
    pub dphi: f64,
    pub psi1: f64,
    pub dpsi: f64,
}

impl TsaiScreening {
    pub fn new(gamma: f64, epsilon: f64) -> Self {
        let gam2 = gamma * gamma;
        let eps2 = epsilon * epsilon;
        TsaiScreening {
            phi1: 16.863 - 2.0 * (1.0 + 0.311877 * gam2).ln()
                + 2.4 * (-0.9 * gamma).exp()
                + 1.6 * (-1.5 * gamma).exp(),
            dphi: 2.0 / (3.0 * (1.0 + 6.5 * gamma + 6.0 * gam2)),
            psi1: 24.34 - 2.0 * (1.0 + 13.111641 * eps2).ln()
                + 2.8 * (-8.0 * epsilon).exp()
                + 1.2 * (-29.2 * epsilon).exp(),
            dpsi: 2.0 / (3.0 * (1.0 + 40.0 * epsilon + 400.0 * eps2)),
        }
    }
}

/// Suppression functions of the LPM effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LpmFunctions {
    pub xi: f64,
    pub g: f64,
    pub phi: f64,
}

/// LPM suppression (Stanev et al., Phys. Rev. D 25, 1982) with Migdal's
/// dielectric correction.
#[derive(Debug, Clone, Copy)]
pub struct LpmCalculator {
    cbrt_z: f64,
    electron_density: f64,
    lpm_energy: f64,
    dielectric_suppression: bool,
    gamma_energy: f64,
}

impl LpmCalculator {
    pub fn new(
        material: &MaterialView<'_>,
        element: &ElementView<'_>,
        dielectric_suppression: bool,
        gamma_energy: f64,
    ) -> Self {
        debug_assert!(gamma_energy > 0.0);
        LpmCalculator {
            cbrt_z: element.cbrt_z(),
            electron_density: material.electron_density(),
            lpm_energy: material.radiation_length() * LPM_CONSTANT,
            dielectric_suppression,
            gamma_energy,
        }
    }

    /// Evaluate at ε = E_total / k.
    pub fn calc(&self, epsilon: f64) -> LpmFunctions {
        let k = self.gamma_energy;
        let s_prime = (self.lpm_energy / (8.0 * epsilon * k * (epsilon - 1.0).abs())).sqrt();
        let s1 = (self.cbrt_z / 184.15).powi(2);

        let mut xi = if s_prime > 1.0 {
            1.0
        } else if s_prime > SQRT_2 * s1 {
            let log_s1 = (SQRT_2 * s1).ln();
            let h = s_prime.ln() / log_s1;
            1.0 + h - 0.08 * (1.0 - h) * h * (2.0 - h) / log_s1
        } else {
            2.0
        };
        let mut s = s_prime / xi.sqrt();

        if self.dielectric_suppression {
            let k_p_sq = self.electron_density * MIGDAL_CONSTANT * (epsilon * k).powi(2);
            s *= 1.0 + k_p_sq / (k * k);
            xi = if s > 1.0 {
                1.0
            } else if s > s1 {
                1.0 + s.ln() / s1.ln()
            } else {
                2.0
            };
        }

        let phi = calc_lpm_phi(s);
        if xi * phi > 1.0 || s > 0.57 {
            xi = 1.0 / phi;
        }
        LpmFunctions {
            xi,
            g: calc_lpm_g(s, phi),
            phi,
        }
    }
}

fn calc_lpm_phi(s: f64) -> f64 {
    if s < 0.01 {
        s * (6.0 - 6.0 * PI * s)
    } else if s < 1.55 {
        let a = poly_eval(&[0.623, 0.796, 0.658], s);
        let b = poly_eval(&[-6.0, -6.0 * (3.0 - PI), 1.0 / a], s);
        1.0 - (s * b).exp()
    } else {
        1.0 - 0.01190476 / s.powi(4)
    }
}

fn calc_lpm_g(s: f64, phi: f64) -> f64 {
    if s < 0.01 {
        -2.0 * phi + 12.0 * s
    } else if s < 0.415827 {
        let a = poly_eval(&[1.0, 3.936, 4.97, -0.05, 7.5], s);
        let psi = 1.0 - (s * (-4.0 - 8.0 * s / a)).exp();
        3.0 * psi - 2.0 * phi
    } else if s < 1.9156 {
        poly_eval(&[-0.160723, 3.755030, -1.798138, 0.672827, -0.120772], s).tanh()
    } else {
        1.0 - 0.0230655 / s.powi(4)
    }
}

/// Differential cross section per atom in photon energy, up to a
/// constant factor.
pub struct RBDiffXsCalculator<'a> {
    elem_data: &'a RelBremElementData,
    material: MaterialView<'a>,
    element: ElementView<'a>,
    total_energy: f64,
    density_correction: f64,
    enable_lpm: bool,
    dielectric_suppression: bool,
}

impl<'a> RBDiffXsCalculator<'a> {
    pub fn new(
        shared: &'a RelBremData,
        particle: &ParticleTrackView<'_>,
        material: MaterialView<'a>,
        elcomp: ElementComponentId,
    ) -> Self {
        let element = material.element_record(elcomp);
        let total_energy = particle.total_energy().value();
        let density_factor = material.electron_density() * MIGDAL_CONSTANT;
        let lpm_threshold = material.radiation_length() * LPM_CONSTANT * density_factor.sqrt();
        RBDiffXsCalculator {
            elem_data: &shared.elements[element.element_id().get()],
            material,
            element,
            total_energy,
            density_correction: calc_density_correction(&material, total_energy),
            enable_lpm: shared.enable_lpm && total_energy > lpm_threshold,
            dielectric_suppression: shared.dielectric_suppression,
        }
    }

    /// Dielectric suppression term (MeV²).
    pub fn density_correction(&self) -> f64 {
        self.density_correction
    }

    /// Bound of the differential cross section, reached as k → 0.
    pub fn maximum_value(&self) -> f64 {
        self.elem_data.factor1 + self.elem_data.factor2
    }

    pub fn lpm_active(&self) -> bool {
        self.enable_lpm
    }

    pub fn evaluate(&self, gamma_energy: f64) -> f64 {
        debug_assert!(gamma_energy > 0.0);
        if self.enable_lpm {
            self.dxsec_per_atom_lpm(gamma_energy)
        } else {
            self.dxsec_per_atom(gamma_energy)
        }
    }

    fn dxsec_per_atom(&self, gamma_energy: f64) -> f64 {
        let y = gamma_energy / self.total_energy;
        let term0 = poly_eval(&[1.0, -1.0, 0.75], y);
        let data = self.elem_data;

        let dxsec = if self.element.atomic_number() < 5 {
            // Dirac-Fock form factors for light elements
            term0 * data.factor1 + (1.0 - y) * data.factor2
        } else {
            let inv_e = y / (self.total_energy - gamma_energy);
            let sf = TsaiScreening::new(data.gamma_factor * inv_e, data.epsilon_factor * inv_e);
            let inv_z = 1.0 / self.element.atomic_number() as f64;
            term0 * ((0.25 * sf.phi1 - data.fz) + (0.25 * sf.psi1 - 2.0 * self.element.log_z() / 3.0) * inv_z)
                + 0.125 * (1.0 - y) * (sf.dphi + sf.dpsi * inv_z)
        };
        dxsec.max(0.0)
    }

    fn dxsec_per_atom_lpm(&self, gamma_energy: f64) -> f64 {
        let epsilon = self.total_energy / gamma_energy;
        let lpm = LpmCalculator::new(&self.material, &self.element, self.dielectric_suppression, gamma_energy)
            .calc(epsilon);
        let y = gamma_energy / self.total_energy;
        let hy_sq = 0.25 * y * y;
        let term = lpm.xi * (hy_sq * lpm.g + (1.0 - y + 2.0 * hy_sq) * lpm.phi);
        (term * self.elem_data.factor1 + (1.0 - y) * self.elem_data.factor2).max(0.0)
    }
}

/// Sample the photon energy by rejection against the differential cross
/// section.
pub struct RBEnergySampler<'a> {
    calc_dxsec: RBDiffXsCalculator<'a>,
    sample_esq: ReciprocalDistribution,
}

impl<'a> RBEnergySampler<'a> {
    pub fn new(
        shared: &'a RelBremData,
        particle: &ParticleTrackView<'_>,
        gamma_cutoff: f64,
        material: MaterialView<'a>,
        elcomp: ElementComponentId,
    ) -> Self {
        let inc_energy = particle.energy().value();
        let calc_dxsec = RBDiffXsCalculator::new(shared, particle, material, elcomp);
        let tmin = gamma_cutoff.min(inc_energy);
        let tmax = inc_energy.min(HIGH_ENERGY_LIMIT);
        let dc = calc_dxsec.density_correction();
        RBEnergySampler {
            sample_esq: ReciprocalDistribution::new(tmin * tmin + dc, tmax * tmax + dc),
            calc_dxsec,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let dc = self.calc_dxsec.density_correction();
        let max = self.calc_dxsec.maximum_value();
        loop {
            let energy = (self.sample_esq.sample(rng) - dc).max(0.0).sqrt();
            if energy <= 0.0 {
                continue;
            }
            let dxsec = self.calc_dxsec.evaluate(energy).min(max);
            if !RejectionSampler::new(dxsec, max).sample(rng) {
                return energy;
            }
        }
    }
}

pub struct RelativisticBremInteractor<'a> {
    shared: &'a RelBremData,
    particle: ParticleTrackView<'a>,
    inc_direction: Real3,
    gamma_cutoff: f64,
    material: MaterialView<'a>,
    elcomp: ElementComponentId,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> RelativisticBremInteractor<'a> {
    pub fn new(
        shared: &'a RelBremData,
        particle: ParticleTrackView<'a>,
        inc_direction: &Real3,
        cutoffs: &CutoffView<'_>,
        allocate: &'a StackAllocator<Secondary>,
        material: MaterialView<'a>,
        elcomp: ElementComponentId,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert!(shared.ids.applies_to(particle.particle_id()));
        let gamma_cutoff = cutoffs.energy(shared.ids.gamma).value();
        debug_assert!(particle.energy().value() > gamma_cutoff);
        RelativisticBremInteractor {
            shared,
            particle,
            inc_direction: *inc_direction,
            gamma_cutoff,
            material,
            elcomp,
            allocate,
        }
    }
}

impl<'a> Interactor<'a> for RelativisticBremInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(photon) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };
        let gamma_energy =
            RBEnergySampler::new(self.shared, &self.particle, self.gamma_cutoff, self.material, self.elcomp)
                .sample(rng);
        let inc_energy = self.particle.energy().value();
        let costheta = TsaiUrbanDistribution::new(inc_energy, self.particle.mass().value()).sample(rng);
        BremFinalStateHelper {
            inc_energy,
            inc_direction: self.inc_direction,
            inc_momentum: self.particle.momentum().value(),
            gamma: self.shared.ids.gamma,
            gamma_energy,
            costheta,
            secondary: photon,
        }
        .sample(rng)
    }
}
