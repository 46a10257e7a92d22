// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Scintillation
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scintillation photon yield, offload and generation.
//!
//! Each material has a light yield per unit deposited energy and one or
//! more emission components (fast, slow, ...). A component emits either a
//! Gaussian in wavelength or a tabulated energy spectrum, with an
//! exponential decay and an optional rise time.

use crate::generator::{GeneratorDistribution, GeneratorKind, OffloadPreStep, OpticalPhoton, StepPoint};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use transport_math::array::{axpy, from_spherical, make_orthogonal, make_unit_vector, sincospi, sub};
use transport_math::distributions::{
    generate_canonical, BernoulliDistribution, ExponentialDistribution, NormalDistribution, PoissonDistribution,
    RejectionSampler, UniformRealDistribution,
};
use transport_math::{GridBuilder, GridRecord, NonuniformGridCalculator, RealPool, Selector};
use transport_types::constants::H_PLANCK_C;
use transport_types::ids::OpticalMaterialId;
use transport_types::units::{ElementaryCharge, MevEnergy};
use transport_types::{Real3, TransportError, TransportResult};

/// Mean count above which the photon number is sampled from a Gaussian.
const GAUSSIAN_COUNT_THRESHOLD: f64 = 10.0;

/// Tabulated emission spectrum as a cumulative distribution in energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionSpectrum {
    /// Photon energy (MeV)
    pub energy: Vec<f64>,
    /// Unnormalized cumulative distribution
    pub cdf: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScintillationComponentInput {
    /// Relative share of the yield
    pub yield_fraction: f64,
    /// Mean wavelength (cm) of a Gaussian spectrum
    #[serde(default)]
    pub lambda_mean: f64,
    #[serde(default)]
    pub lambda_sigma: f64,
    /// Rise time (s); zero for an instantaneous rise
    #[serde(default)]
    pub rise_time: f64,
    /// Decay time (s)
    pub fall_time: f64,
    /// Tabulated spectrum, used instead of the Gaussian if present
    #[serde(default)]
    pub spectrum: Option<EmissionSpectrum>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScintillationMaterialInput {
    /// Photons per MeV deposited
    pub yield_per_energy: f64,
    /// Broadening of the photon count relative to Poisson statistics
    #[serde(default = "default_resolution_scale")]
    pub resolution_scale: f64,
    pub components: Vec<ScintillationComponentInput>,
}

fn default_resolution_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScintComponentRecord {
    pub yield_fraction: f64,
    pub lambda_mean: f64,
    pub lambda_sigma: f64,
    pub rise_time: f64,
    pub fall_time: f64,
    pub energy_cdf: Option<GridRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScintMaterialRecord {
    pub yield_per_energy: f64,
    pub resolution_scale: f64,
    pub components: Vec<ScintComponentRecord>,
}

/// Scintillation properties indexed by optical material.
#[derive(Debug, Clone)]
pub struct ScintillationParams {
    materials: Vec<ScintMaterialRecord>,
    reals: RealPool,
}

impl ScintillationParams {
    pub fn new(inputs: &[ScintillationMaterialInput]) -> TransportResult<Self> {
        let mut reals = RealPool::new();
        let mut materials = Vec::with_capacity(inputs.len());
        for (m, input) in inputs.iter().enumerate() {
            let invalid = |msg: String| TransportError::invalid("scintillation", format!("material {m}: {msg}"));
            if !(input.yield_per_energy > 0.0) || !(input.resolution_scale >= 0.0) {
                return Err(invalid(format!(
                    "yield {} and resolution scale {} must be positive",
                    input.yield_per_energy, input.resolution_scale
                )));
            }
            if input.components.is_empty() {
                return Err(invalid("no emission components".into()));
            }
            let mut components = Vec::with_capacity(input.components.len());
            for comp in &input.components {
                let has_gauss = comp.lambda_mean > 0.0 && comp.lambda_sigma > 0.0;
                if !(comp.yield_fraction > 0.0) || comp.rise_time < 0.0 || !(comp.fall_time > 0.0) {
                    return Err(invalid(format!("invalid component {comp:?}")));
                }
                let energy_cdf = match &comp.spectrum {
                    Some(spectrum) => Some(build_cdf(&mut reals, spectrum).map_err(|e| invalid(e.to_string()))?),
                    None if has_gauss => None,
                    None => return Err(invalid("component needs a spectrum or a wavelength distribution".into())),
                };
                components.push(ScintComponentRecord {
                    yield_fraction: comp.yield_fraction,
                    lambda_mean: comp.lambda_mean,
                    lambda_sigma: comp.lambda_sigma,
                    rise_time: comp.rise_time,
                    fall_time: comp.fall_time,
                    energy_cdf,
                });
            }
            materials.push(ScintMaterialRecord {
                yield_per_energy: input.yield_per_energy,
                resolution_scale: input.resolution_scale,
                components,
            });
        }
        debug!(num_materials = materials.len(), "built scintillation params");
        Ok(ScintillationParams { materials, reals })
    }

    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn material(&self, id: OpticalMaterialId) -> &ScintMaterialRecord {
        &self.materials[id.get()]
    }
}

/// Normalize a spectrum to a CDF running from 0 to 1.
pub(crate) fn build_cdf(reals: &mut RealPool, spectrum: &EmissionSpectrum) -> TransportResult<GridRecord> {
    let cdf = &spectrum.cdf;
    let total = cdf.last().copied().unwrap_or(0.0);
    if cdf.first().map_or(true, |&c| c != 0.0) || !(total > 0.0) || cdf.windows(2).any(|w| w[1] < w[0]) {
        return Err(TransportError::GridError(
            "emission CDF must start at zero and be non-decreasing to a positive total".into(),
        ));
    }
    let normalized: Vec<f64> = cdf.iter().map(|c| c / total).collect();
    GridBuilder::new(reals).linear(&spectrum.energy, &normalized)
}

/// Photon energy (MeV) of a wavelength (cm).
pub fn wavelength_to_energy(wavelength: f64) -> f64 {
    H_PLANCK_C / wavelength
}

/// Sample the number of scintillation photons from the energy deposited
/// during one step.
#[derive(Debug, Clone, Copy)]
pub struct ScintillationOffload<'a> {
    charge: ElementaryCharge,
    step_length: f64,
    pre_step: &'a OffloadPreStep,
    post_step: StepPoint,
    continuous_edep_fraction: f64,
    mean_num_photons: f64,
    resolution_scale: f64,
}

impl<'a> ScintillationOffload<'a> {
    pub fn new(
        charge: ElementaryCharge,
        step_length: f64,
        pre_step: &'a OffloadPreStep,
        post_step: StepPoint,
        energy_deposition: MevEnergy,
        continuous_edep_fraction: f64,
        params: &ScintillationParams,
    ) -> Self {
        debug_assert!(step_length > 0.0);
        debug_assert!((0.0..=1.0).contains(&continuous_edep_fraction));
        let record = params.material(pre_step.material);
        ScintillationOffload {
            charge,
            step_length,
            pre_step,
            post_step,
            continuous_edep_fraction,
            mean_num_photons: record.yield_per_energy * energy_deposition.value(),
            resolution_scale: record.resolution_scale,
        }
    }

    pub fn mean_num_photons(&self) -> f64 {
        self.mean_num_photons
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<GeneratorDistribution> {
        if self.mean_num_photons <= 0.0 {
            return None;
        }
        let num_photons = if self.mean_num_photons > GAUSSIAN_COUNT_THRESHOLD {
            let sigma = self.resolution_scale * self.mean_num_photons.sqrt();
            let sampled = NormalDistribution::new(self.mean_num_photons, sigma).sample(rng) + 0.5;
            sampled.max(0.0) as u32
        } else {
            PoissonDistribution::new(self.mean_num_photons).sample(rng)
        };
        (num_photons > 0).then(|| GeneratorDistribution {
            kind: GeneratorKind::Scintillation,
            num_photons,
            charge: self.charge,
            step_length: self.step_length,
            material: self.pre_step.material,
            continuous_edep_fraction: self.continuous_edep_fraction,
            pre: self.pre_step.point,
            post: self.post_step,
            primary: self.pre_step.primary,
        })
    }
}

/// Sample scintillation photons from a distribution.
#[derive(Debug, Clone)]
pub struct ScintillationGenerator<'a> {
    dist: &'a GeneratorDistribution,
    record: &'a ScintMaterialRecord,
    reals: &'a RealPool,
    delta_pos: Real3,
}

impl<'a> ScintillationGenerator<'a> {
    pub fn new(params: &'a ScintillationParams, dist: &'a GeneratorDistribution) -> Self {
        debug_assert_eq!(dist.kind, GeneratorKind::Scintillation);
        debug_assert!(dist.is_valid());
        ScintillationGenerator {
            dist,
            record: params.material(dist.material),
            reals: &params.reals,
            delta_pos: sub(&dist.post.pos, &dist.pre.pos),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> OpticalPhoton {
        let components = &self.record.components;
        let index = Selector::with_total(|i| components[i].yield_fraction, components.len()).sample(rng);
        let component = &components[index];

        let energy = match &component.energy_cdf {
            None => {
                let sample_lambda = NormalDistribution::new(component.lambda_mean, component.lambda_sigma);
                // Reject unphysical wavelengths from wide distributions
                let wavelength = loop {
                    let lambda = sample_lambda.sample(rng);
                    if lambda > 0.0 {
                        break lambda;
                    }
                };
                wavelength_to_energy(wavelength)
            }
            Some(grid) => NonuniformGridCalculator::from_inverse(grid, self.reals).evaluate(generate_canonical(rng)),
        };

        let costheta = UniformRealDistribution::new(-1.0, 1.0).sample(rng);
        let phi = UniformRealDistribution::new(0.0, 2.0 * std::f64::consts::PI).sample(rng);
        let direction = from_spherical(costheta, phi);
        let polarization = {
            let sign = if costheta > 0.0 { -1.0 } else { 1.0 };
            let base = from_spherical(sign * (1.0 - costheta * costheta).max(0.0).sqrt(), phi);
            let perp = [-phi.sin(), phi.cos(), 0.0];
            let (sinpsi, cospsi) = sincospi(generate_canonical(rng));
            let pol = [
                cospsi * base[0] + sinpsi * perp[0],
                cospsi * base[1] + sinpsi * perp[1],
                cospsi * base[2] + sinpsi * perp[2],
            ];
            make_unit_vector(&make_orthogonal(&pol, &direction))
        };

        // Split between the step and its end point by deposited energy
        let p = self.dist.continuous_edep_fraction;
        let u = if p == 1.0 || (p != 0.0 && BernoulliDistribution::new(p).sample(rng)) {
            generate_canonical(rng)
        } else {
            1.0
        };
        let mut position = self.dist.pre.pos;
        axpy(u, &self.delta_pos, &mut position);

        let sample_time = ExponentialDistribution::new(1.0 / component.fall_time);
        let emission_delay = if component.rise_time == 0.0 {
            sample_time.sample(rng)
        } else {
            loop {
                let t = sample_time.sample(rng);
                let accept = -(-t / component.rise_time).exp_m1();
                if !RejectionSampler::with_probability(accept).sample(rng) {
                    break t;
                }
            }
        };

        OpticalPhoton {
            energy: MevEnergy::new(energy),
            position,
            direction,
            polarization,
            time: self.dist.time_at(u) + emission_delay,
            primary: self.dist.primary,
        }
    }
}
