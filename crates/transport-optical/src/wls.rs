// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Wavelength Shifting
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Absorption and re-emission of optical photons at longer wavelength.

use crate::generator::OpticalPhoton;
use crate::scintillation::{build_cdf, EmissionSpectrum};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use transport_math::distributions::{
    generate_canonical, ExponentialDistribution, IsotropicDistribution, PoissonDistribution, UniformRealDistribution,
};
use transport_math::{GridRecord, NonuniformGridCalculator, RealPool};
use transport_physics::kinematics::ExitingDirectionSampler;
use transport_types::ids::{OpticalMaterialId, TrackId};
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, TransportError, TransportResult};

/// Emission delay after absorption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WlsTimeProfile {
    /// Fixed delay equal to the time constant
    #[default]
    Delta,
    /// Exponential delay with the time constant as mean
    Exponential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WlsMaterialInput {
    /// Mean number of re-emitted photons per absorbed photon
    pub mean_num_photons: f64,
    /// Emission time constant (s)
    pub time_constant: f64,
    pub spectrum: EmissionSpectrum,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WlsMaterialRecord {
    pub mean_num_photons: f64,
    pub time_constant: f64,
    pub energy_cdf: GridRecord,
}

/// Wavelength shifting properties indexed by optical material.
#[derive(Debug, Clone)]
pub struct WavelengthShiftParams {
    materials: Vec<WlsMaterialRecord>,
    pub time_profile: WlsTimeProfile,
    reals: RealPool,
}

impl WavelengthShiftParams {
    pub fn new(inputs: &[WlsMaterialInput], time_profile: WlsTimeProfile) -> TransportResult<Self> {
        let mut reals = RealPool::new();
        let mut materials = Vec::with_capacity(inputs.len());
        for (m, input) in inputs.iter().enumerate() {
            if !(input.mean_num_photons > 0.0) || !(input.time_constant > 0.0) {
                return Err(TransportError::invalid(
                    "wavelength shift",
                    format!("material {m}: mean photon count and time constant must be positive"),
                ));
            }
            materials.push(WlsMaterialRecord {
                mean_num_photons: input.mean_num_photons,
                time_constant: input.time_constant,
                energy_cdf: build_cdf(&mut reals, &input.spectrum)?,
            });
        }
        debug!(num_materials = materials.len(), ?time_profile, "built wavelength shift params");
        Ok(WavelengthShiftParams {
            materials,
            time_profile,
            reals,
        })
    }

    pub fn material(&self, id: OpticalMaterialId) -> &WlsMaterialRecord {
        &self.materials[id.get()]
    }

    fn energy_cdf(&self, id: OpticalMaterialId) -> NonuniformGridCalculator<'_> {
        NonuniformGridCalculator::new(&self.material(id).energy_cdf, &self.reals)
    }
}

/// Photons to be emitted after one absorption.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WlsDistribution {
    pub num_photons: u32,
    /// Energy of the absorbed photon
    pub energy: MevEnergy,
    pub time: f64,
    pub position: Real3,
    pub material: OpticalMaterialId,
    pub primary: TrackId,
}

/// Absorb an optical photon and sample how many photons it re-emits.
#[derive(Debug, Clone, Copy)]
pub struct WavelengthShiftInteractor<'a> {
    params: &'a WavelengthShiftParams,
    material: OpticalMaterialId,
    energy: MevEnergy,
    position: Real3,
    time: f64,
    primary: TrackId,
}

impl<'a> WavelengthShiftInteractor<'a> {
    pub fn new(
        params: &'a WavelengthShiftParams,
        material: OpticalMaterialId,
        energy: MevEnergy,
        position: Real3,
        time: f64,
        primary: TrackId,
    ) -> Self {
        WavelengthShiftInteractor {
            params,
            material,
            energy,
            position,
            time,
            primary,
        }
    }

    /// The absorbed photon's result plus the re-emission, if any.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (Interaction<'static>, Option<WlsDistribution>) {
        let record = self.params.material(self.material);
        let num_photons = PoissonDistribution::new(record.mean_num_photons).sample(rng);
        // Photons below the emission spectrum cannot be shifted down
        let emits = num_photons > 0 && self.energy.value() > self.params.energy_cdf(self.material).front();
        let dist = emits.then(|| WlsDistribution {
            num_photons,
            energy: self.energy,
            time: self.time,
            position: self.position,
            material: self.material,
            primary: self.primary,
        });
        (Interaction::from_absorption(), dist)
    }
}

/// Sample re-emitted photons below the absorbed photon's energy.
#[derive(Debug, Clone, Copy)]
pub struct WavelengthShiftGenerator<'a> {
    dist: &'a WlsDistribution,
    calc_cdf: NonuniformGridCalculator<'a>,
    time_constant: f64,
    time_profile: WlsTimeProfile,
}

impl<'a> WavelengthShiftGenerator<'a> {
    pub fn new(params: &'a WavelengthShiftParams, dist: &'a WlsDistribution) -> Self {
        let calc_cdf = params.energy_cdf(dist.material);
        debug_assert!(dist.num_photons > 0);
        debug_assert!(dist.energy.value() > calc_cdf.front());
        WavelengthShiftGenerator {
            dist,
            calc_cdf,
            time_constant: params.material(dist.material).time_constant,
            time_profile: params.time_profile,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> OpticalPhoton {
        let calc_energy = self.calc_cdf.make_inverse();
        let max_energy = self.dist.energy.value();
        let mut energy = calc_energy.evaluate(generate_canonical(rng));
        if energy >= max_energy {
            // Resample within the part of the spectrum below the incident energy
            let cdf_max = self.calc_cdf.evaluate(max_energy);
            energy = calc_energy.evaluate(UniformRealDistribution::new(0.0, cdf_max).sample(rng));
        }
        debug_assert!(energy < max_energy || energy == self.calc_cdf.front());

        let direction: Real3 = IsotropicDistribution.sample(rng);
        let polarization = ExitingDirectionSampler::new(0.0, &direction).sample(rng);
        let delay = match self.time_profile {
            WlsTimeProfile::Delta => self.time_constant,
            WlsTimeProfile::Exponential => ExponentialDistribution::new(1.0 / self.time_constant).sample(rng),
        };

        OpticalPhoton {
            energy: MevEnergy::new(energy),
            position: self.dist.position,
            direction,
            polarization,
            time: self.dist.time + delay,
            primary: self.dist.primary,
        }
    }
}
