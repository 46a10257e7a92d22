// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Wentzel Coulomb Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Wentzel screened-Rutherford model of elastic Coulomb scattering (the
//! "WentzelVI"/OKVI formulation): shared data, per-track cross section
//! helper, and the angular distribution.

use crate::em::form_factor::{MottElementData, MottRatioCalculator, NuclearFormFactor};
use crate::material::{IsotopeRecord, MaterialParams, MaterialView};
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::distributions::{generate_canonical, BernoulliDistribution};
use transport_types::config::WentzelOptions;
use transport_types::constants::{A0_BOHR, ALPHA_FINE_STRUCTURE, HBAR_C, R_ELECTRON};
use transport_types::ids::{ElementId, MaterialId, ParticleId};
use transport_types::{TransportError, TransportResult};

/// Thomas-Fermi constant C_TF = (3π/4)^(2/3) / 2
const THOMAS_FERMI: f64 = 0.8853413770001135;

/// Squared electron screening momentum (ħ / (2 C_TF a0))² in MeV²
const SCREEN_R_SQ_ELEC: f64 = (HBAR_C / (2.0 * THOMAS_FERMI * A0_BOHR)) * (HBAR_C / (2.0 * THOMAS_FERMI * A0_BOHR));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoulombIds {
    pub electron: ParticleId,
    pub positron: ParticleId,
}

impl CoulombIds {
    pub fn is_lepton(&self, id: ParticleId) -> bool {
        id == self.electron || id == self.positron
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WentzelOkviData {
    pub ids: CoulombIds,
    pub params: WentzelOptions,
    pub electron_mass: f64,
    /// Indexed by element id
    pub mott_coeffs: Vec<MottElementData>,
    /// Mean of fraction / A^(2/3), indexed by material id
    pub inv_mass_cbrt_sq: Vec<f64>,
}

impl WentzelOkviData {
    /// Build from particles and materials.
    ///
    /// Without explicit Mott coefficients every element uses the pure
    /// Rutherford ratio.
    pub fn new(
        particles: &ParticleParams,
        materials: &MaterialParams,
        params: WentzelOptions,
        mott_coeffs: Option<Vec<MottElementData>>,
    ) -> TransportResult<Self> {
        let electron = particles.require("e-")?;
        let mott_coeffs =
            mott_coeffs.unwrap_or_else(|| vec![MottElementData::rutherford(); materials.num_elements()]);
        let inv_mass_cbrt_sq = (0..materials.num_materials())
            .map(|i| materials.material(MaterialId::new(i)).inv_mass_cbrt_sq())
            .collect();
        let data = WentzelOkviData {
            ids: CoulombIds {
                electron,
                positron: particles.require("e+")?,
            },
            params,
            electron_mass: particles.get(electron).mass.value(),
            mott_coeffs,
            inv_mass_cbrt_sq,
        };
        data.validate(materials)?;
        Ok(data)
    }

    fn validate(&self, materials: &MaterialParams) -> TransportResult<()> {
        if self.mott_coeffs.len() != materials.num_elements() {
            return Err(TransportError::invalid(
                "wentzel",
                format!(
                    "{} Mott coefficient sets for {} elements",
                    self.mott_coeffs.len(),
                    materials.num_elements()
                ),
            ));
        }
        if !self.is_valid() {
            return Err(TransportError::invalid("wentzel", format!("invalid options {:?}", self.params)));
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.params.screening_factor > 0.0
            && self.params.a_sq_factor >= 0.0
            && (-1.0..=1.0).contains(&self.params.costheta_limit)
            && self.electron_mass > 0.0
            && !self.mott_coeffs.is_empty()
            && self.mott_coeffs.iter().all(MottElementData::is_valid)
    }
}

/// Per-track quantities of the Wentzel model for one target element.
#[derive(Debug, Clone, Copy)]
pub struct WentzelHelper {
    target_z: u32,
    screening_coefficient: f64,
    kin_factor: f64,
    mott_factor: f64,
    cos_thetamax_elec: f64,
    cos_thetamax_nuc: f64,
}

impl WentzelHelper {
    /// Construct with the electron production cut (MeV).
    pub fn new(
        particle: &ParticleTrackView<'_>,
        material: &MaterialView<'_>,
        target_z: u32,
        data: &WentzelOkviData,
        cutoff: f64,
    ) -> Self {
        debug_assert!(target_z > 0);
        let z = target_z as f64;
        let is_electron = particle.particle_id() == data.ids.electron;
        let helper = WentzelHelper {
            target_z,
            screening_coefficient: calc_screening_coefficient(particle, &data.ids, target_z)
                * data.params.screening_factor,
            kin_factor: calc_kin_factor(particle, target_z, data.electron_mass),
            mott_factor: if is_electron { 1.0 + 2e-4 * z * z } else { 1.0 },
            cos_thetamax_elec: calc_cos_thetamax_electron(particle, &data.ids, cutoff, data.electron_mass),
            cos_thetamax_nuc: calc_cos_thetamax_nuclear(particle, material, data),
        };
        debug_assert!(helper.screening_coefficient > 0.0);
        helper
    }

    pub fn atomic_number(&self) -> u32 {
        self.target_z
    }

    pub fn screening_coefficient(&self) -> f64 {
        self.screening_coefficient
    }

    /// Maximum Mott factor, used to bound the rejection.
    pub fn mott_factor(&self) -> f64 {
        self.mott_factor
    }

    pub fn kin_factor(&self) -> f64 {
        self.kin_factor
    }

    pub fn cos_thetamax_electron(&self) -> f64 {
        self.cos_thetamax_elec
    }

    pub fn cos_thetamax_nuclear(&self) -> f64 {
        self.cos_thetamax_nuc
    }

    /// Cross section (cm²) for scattering off atomic electrons between two
    /// angles.
    pub fn calc_xs_electron(&self, cos_thetamin: f64, cos_thetamax: f64) -> f64 {
        let cos_thetamin = cos_thetamin.max(self.cos_thetamax_elec);
        let cos_thetamax = cos_thetamax.max(self.cos_thetamax_elec);
        if cos_thetamin <= cos_thetamax {
            return 0.0;
        }
        self.calc_xs_factor(cos_thetamin, cos_thetamax)
    }

    /// Cross section (cm²) for scattering off the nucleus.
    pub fn calc_xs_nuclear(&self, cos_thetamin: f64, cos_thetamax: f64) -> f64 {
        self.target_z as f64 * self.calc_xs_factor(cos_thetamin, cos_thetamax)
    }

    fn calc_xs_factor(&self, cos_thetamin: f64, cos_thetamax: f64) -> f64 {
        let sc2 = 2.0 * self.screening_coefficient;
        self.kin_factor * self.mott_factor * (cos_thetamin - cos_thetamax)
            / ((1.0 - cos_thetamin + sc2) * (1.0 - cos_thetamax + sc2))
    }
}

/// Moliere screening coefficient A.
fn calc_screening_coefficient(particle: &ParticleTrackView<'_>, ids: &CoulombIds, target_z: u32) -> f64 {
    let z = target_z as f64;
    let sq_cbrt_z = z.powf(2.0 / 3.0);
    let mut correction = 1.0;
    if target_z > 1 {
        let (factor, z_factor) = if ids.is_lepton(particle.particle_id()) {
            let tau = particle.energy().value() / particle.mass().value();
            ((tau / (tau + sq_cbrt_z)).sqrt(), 1.0)
        } else {
            (particle.charge().value().powi(2), 1.0 + (-z * z * 0.001).exp())
        };
        correction = (z * 1.13)
            .min(1.13 + 3.76 * (z * ALPHA_FINE_STRUCTURE).powi(2) * factor / particle.beta_sq())
            * z_factor;
    }
    correction * sq_cbrt_z * SCREEN_R_SQ_ELEC / particle.momentum_sq().value()
}

/// Rutherford prefactor 2π m_e² r_e² Z q² / (β² p²).
fn calc_kin_factor(particle: &ParticleTrackView<'_>, target_z: u32, electron_mass: f64) -> f64 {
    let two_pi_re_sq = 2.0 * std::f64::consts::PI * R_ELECTRON * R_ELECTRON;
    two_pi_re_sq * target_z as f64 * (electron_mass * particle.charge().value()).powi(2)
        / (particle.beta_sq() * particle.momentum_sq().value())
}

/// Largest angle at which scattering off electrons is elastic, given the
/// delta-ray production cut.
fn calc_cos_thetamax_electron(
    particle: &ParticleTrackView<'_>,
    ids: &CoulombIds,
    cutoff: f64,
    electron_mass: f64,
) -> f64 {
    let inc_energy = particle.energy().value();
    let mass = particle.mass().value();
    if ids.is_lepton(particle.particle_id()) {
        let max_energy = if particle.particle_id() == ids.electron {
            0.5 * inc_energy
        } else {
            inc_energy
        };
        let final_energy = inc_energy - cutoff.min(max_energy);
        if final_energy <= 0.0 {
            return 0.0;
        }
        let inc_ratio = 1.0 + 2.0 * mass / inc_energy;
        let final_ratio = 1.0 + 2.0 * mass / final_energy;
        (inc_ratio / final_ratio).sqrt().clamp(0.0, 1.0)
    } else {
        let mass_ratio = electron_mass / mass;
        let tau = inc_energy / mass;
        let max_energy = 2.0 * electron_mass * tau * (tau + 2.0)
            / (1.0 + 2.0 * mass_ratio * (tau + 1.0) + mass_ratio * mass_ratio);
        (1.0 - cutoff.min(max_energy) * electron_mass / particle.momentum_sq().value()).clamp(-1.0, 1.0)
    }
}

fn calc_cos_thetamax_nuclear(particle: &ParticleTrackView<'_>, material: &MaterialView<'_>, data: &WentzelOkviData) -> f64 {
    let params = &data.params;
    if params.is_combined {
        let inv_mass = data.inv_mass_cbrt_sq[material.material_id().get()];
        params
            .costheta_limit
            .max(1.0 - params.a_sq_factor * inv_mass / particle.momentum_sq().value())
    } else {
        params.costheta_limit
    }
}

/// Scattering cosine of the Wentzel model, including Mott and form
/// factor corrections for the nuclear part.
pub struct WentzelDistribution<'a> {
    helper: &'a WentzelHelper,
    mott: MottRatioCalculator<'a>,
    form_factor: NuclearFormFactor,
    momentum_sq: f64,
    cos_thetamin: f64,
    cos_thetamax: f64,
}

impl<'a> WentzelDistribution<'a> {
    pub fn new(
        data: &'a WentzelOkviData,
        helper: &'a WentzelHelper,
        particle: &ParticleTrackView<'_>,
        target: &IsotopeRecord,
        element: ElementId,
        cos_thetamin: f64,
        cos_thetamax: f64,
    ) -> Self {
        debug_assert!(cos_thetamin > cos_thetamax, "empty angular range");
        let coeffs = &data.mott_coeffs[element.get()];
        let table = if particle.particle_id() == data.ids.positron {
            &coeffs.positron
        } else {
            &coeffs.electron
        };
        WentzelDistribution {
            helper,
            mott: MottRatioCalculator::new(table, particle.beta_sq().sqrt()),
            form_factor: NuclearFormFactor::new(data.params.form_factor, target.mass_number),
            momentum_sq: particle.momentum_sq().value(),
            cos_thetamin,
            cos_thetamax,
        }
    }

    /// Screened Rutherford cosine between two limits.
    fn sample_costheta<R: Rng + ?Sized>(&self, cos_thetamin: f64, cos_thetamax: f64, rng: &mut R) -> f64 {
        let sc2 = 2.0 * self.helper.screening_coefficient();
        let w1 = 1.0 - cos_thetamin + sc2;
        let w2 = 1.0 - cos_thetamax + sc2;
        let xi = generate_canonical(rng);
        (1.0 + sc2 - w1 * w2 / (w1 + xi * (cos_thetamin - cos_thetamax))).clamp(-1.0, 1.0)
    }
}

impl Distribution<f64> for WentzelDistribution<'_> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let elec_xs = self.helper.calc_xs_electron(self.cos_thetamin, self.cos_thetamax);
        let nuc_xs = self.helper.calc_xs_nuclear(self.cos_thetamin, self.cos_thetamax);

        if BernoulliDistribution::from_weights(elec_xs, nuc_xs).sample(rng) {
            let cos_thetamax_elec = self.helper.cos_thetamax_electron();
            let cos_min = self.cos_thetamin.max(cos_thetamax_elec);
            let cos_max = self.cos_thetamax.max(cos_thetamax_elec);
            return self.sample_costheta(cos_min, cos_max, rng);
        }

        let cos_theta = self.sample_costheta(self.cos_thetamin, self.cos_thetamax, rng);
        let q_sq = 2.0 * self.momentum_sq * (1.0 - cos_theta);
        let ff = self.form_factor.evaluate(q_sq);
        let accept = self.mott.evaluate(cos_theta) * ff * ff / self.helper.mott_factor();
        if BernoulliDistribution::new(accept.clamp(0.0, 1.0)).sample(rng) {
            cos_theta
        } else {
            // Rejected nuclear scattering leaves the direction unchanged
            1.0
        }
    }
}
