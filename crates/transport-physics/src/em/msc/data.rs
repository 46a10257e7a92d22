// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Urban MSC Data
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Setup-time data for the Urban multiple scattering model.

use crate::em::wentzel::CoulombIds;
use crate::material::{MaterialParams, MaterialView};
use crate::particle::ParticleParams;
use serde::{Deserialize, Serialize};
use tracing::debug;
use transport_math::grid::{GridBuilder, GridRecord, RealPool};
use transport_math::poly::poly_eval;
use transport_types::config::MscOptions;
use transport_types::ids::{MaterialId, ParticleId};
use transport_types::units::MevEnergy;
use transport_types::{TransportError, TransportResult};

/// Fixed and configurable Urban model parameters. Lengths are in cm.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrbanMscParameters {
    pub tau_small: f64,
    pub tau_big: f64,
    pub tau_limit: f64,
    pub safety_tol: f64,
    pub geom_limit: f64,
    pub lambda_limit: f64,
    pub range_factor: f64,
    pub safety_factor: f64,
    pub displaced: bool,
    pub safety_plus: bool,
    pub low_energy_limit: MevEnergy,
    pub high_energy_limit: MevEnergy,
}

impl UrbanMscParameters {
    /// Mean free path is treated as constant below this fraction of the range
    pub const SMALL_RANGE_FRAC: f64 = 0.05;
    /// Steps shorter than this are not scattered (0.01 nm)
    pub const MIN_STEP: f64 = 1e-9;
    /// Minimum true path when the step limiter did not run
    pub const MIN_STEP_FALLBACK: f64 = 10.0 * Self::MIN_STEP;
    /// Below this step the true path equals the geometric path (1 nm)
    pub const MIN_STEP_TRANSFORM: f64 = 1e-7;
    /// No scattering below this end-of-step energy (1 eV)
    pub const MIN_ENDPOINT_ENERGY: f64 = 1e-6;
    /// Energy below which the minimum step is scaled down
    pub const MIN_SCALING_ENERGY: f64 = 5e-3;

    pub fn new(options: &MscOptions) -> Self {
        UrbanMscParameters {
            tau_small: 1e-16,
            tau_big: 8.0,
            tau_limit: 1e-6,
            safety_tol: 0.01,
            geom_limit: 5e-9,
            lambda_limit: options.lambda_limit,
            range_factor: options.range_factor,
            safety_factor: options.safety_factor,
            displaced: options.displaced,
            safety_plus: options.safety_plus,
            low_energy_limit: MevEnergy::zero(),
            high_energy_limit: MevEnergy::zero(),
        }
    }
}

/// Material coefficients for the step limit and angular width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UrbanMscMaterialData {
    pub stepmin_coeff: [f64; 2],
    pub theta_coeff: [f64; 2],
    pub tail_coeff: [f64; 3],
    pub tail_corr: f64,
}

impl UrbanMscMaterialData {
    /// Fits from the Geant4 Urban model as a function of Z_eff.
    pub fn new(material: &MaterialView<'_>) -> Self {
        let zeff = material.zeff();
        let z16 = zeff.powf(1.0 / 6.0);
        let fz = poly_eval(&[0.990395, -0.168386, 0.093286], z16);
        let z13 = z16 * z16;
        UrbanMscMaterialData {
            stepmin_coeff: [1e3 * 27.725 / (1.0 + 0.203 * zeff), 1e3 * 6.152 / (1.0 + 0.111 * zeff)],
            theta_coeff: [fz * (1.0 - 8.7780e-2 / zeff), fz * (4.0780e-2 + 1.7315e-4 * zeff)],
            tail_coeff: [
                poly_eval(&[2.3785, -4.1981e-1, 6.3100e-2], z13),
                poly_eval(&[4.7526e-1, 1.7694, -3.3885e-1], z13),
                poly_eval(&[2.3683e-1, -1.8111, 3.2774e-1], z13),
            ],
            tail_corr: poly_eval(&[1.7888e-2, 1.9659e-2, -2.6664e-3], z13),
        }
    }
}

/// Particle category of the particle- and material-dependent data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrbanParMatType {
    Electron = 0,
    Positron = 1,
    MuHad = 2,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UrbanMscParMatData {
    /// a Z^b
    pub scaled_zeff: f64,
    /// Maximum distance over range heuristic
    pub d_over_r: f64,
}

impl UrbanMscParMatData {
    pub fn new(kind: UrbanParMatType, zeff: f64) -> Self {
        let (a, b) = match kind {
            UrbanParMatType::Positron => (0.70, 0.5),
            _ => (0.87, 2.0 / 3.0),
        };
        let d_over_r = match kind {
            UrbanParMatType::MuHad => 1.15 - 9.76e-4 * zeff,
            _ => 9.6280e-1 - 8.4848e-2 * zeff.sqrt() + 4.3769e-3 * zeff,
        };
        UrbanMscParMatData {
            scaled_zeff: a * zeff.powf(b),
            d_over_r,
        }
    }
}

/// Transport cross section table of one particle in one material.
///
/// `scaled_xs` is E²/λ₁ in MeV²/cm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MscXsTable {
    pub energy: Vec<f64>,
    pub scaled_xs: Vec<f64>,
}

/// Imported transport cross sections, indexed by material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrbanMscXsInput {
    pub electron: Vec<MscXsTable>,
    pub positron: Vec<MscXsTable>,
    /// Shared by muons and hadrons; empty when only e± are tracked
    #[serde(default)]
    pub muhad: Vec<MscXsTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrbanMscData {
    pub ids: CoulombIds,
    pub electron_mass: f64,
    pub params: UrbanMscParameters,
    /// Indexed by material
    pub material_data: Vec<UrbanMscMaterialData>,
    num_par_mat: usize,
    /// [material][category]
    par_mat_data: Vec<UrbanMscParMatData>,
    /// [material][category]
    xs: Vec<GridRecord>,
    reals: RealPool,
    /// Particles other than e± that this model applies to
    muhad: Vec<ParticleId>,
}

impl UrbanMscData {
    pub fn new(
        particles: &ParticleParams,
        materials: &MaterialParams,
        options: &MscOptions,
        input: &UrbanMscXsInput,
    ) -> TransportResult<Self> {
        let electron = particles.require("e-")?;
        let ids = CoulombIds {
            electron,
            positron: particles.require("e+")?,
        };
        let num_mat = materials.num_materials();
        let has_muhad = !input.muhad.is_empty();
        let mut categories = vec![
            (UrbanParMatType::Electron, &input.electron),
            (UrbanParMatType::Positron, &input.positron),
        ];
        if has_muhad {
            categories.push((UrbanParMatType::MuHad, &input.muhad));
        }
        for (kind, tables) in &categories {
            if tables.len() != num_mat {
                return Err(TransportError::invalid(
                    "urban_msc",
                    format!("{kind:?} has {} xs tables for {num_mat} materials", tables.len()),
                ));
            }
        }

        let mut reals = RealPool::new();
        let mut material_data = Vec::with_capacity(num_mat);
        let mut par_mat_data = Vec::with_capacity(num_mat * categories.len());
        let mut xs = Vec::with_capacity(num_mat * categories.len());
        let mut energy_bounds = (0.0_f64, f64::INFINITY);
        for mat in 0..num_mat {
            let material = materials.material(MaterialId::new(mat));
            material_data.push(UrbanMscMaterialData::new(&material));
            for (kind, tables) in &categories {
                let table = &tables[mat];
                if table.scaled_xs.iter().any(|&v| !(v > 0.0 && v.is_finite())) {
                    return Err(TransportError::invalid(
                        "urban_msc",
                        format!("non-positive {kind:?} cross section in material '{}'", material.name()),
                    ));
                }
                xs.push(GridBuilder::new(&mut reals).linear(&table.energy, &table.scaled_xs)?);
                par_mat_data.push(UrbanMscParMatData::new(*kind, material.zeff()));
                if let (Some(&lo), Some(&hi)) = (table.energy.first(), table.energy.last()) {
                    energy_bounds = (energy_bounds.0.max(lo), energy_bounds.1.min(hi));
                }
            }
        }

        let mut params = UrbanMscParameters::new(options);
        params.low_energy_limit = MevEnergy::new(energy_bounds.0);
        params.high_energy_limit = MevEnergy::new(energy_bounds.1);

        let muhad = if has_muhad {
            ["mu-", "mu+", "proton"]
                .iter()
                .filter_map(|name| particles.find(name))
                .collect()
        } else {
            Vec::new()
        };

        let data = UrbanMscData {
            ids,
            electron_mass: particles.get(electron).mass.value(),
            params,
            material_data,
            num_par_mat: categories.len(),
            par_mat_data,
            xs,
            reals,
            muhad,
        };
        debug!(
            num_materials = num_mat,
            num_categories = data.num_par_mat,
            low = energy_bounds.0,
            high = energy_bounds.1,
            "built Urban MSC data"
        );
        if !data.is_valid() {
            return Err(TransportError::invalid("urban_msc", "inconsistent model data"));
        }
        Ok(data)
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0
            && !self.material_data.is_empty()
            && self.num_par_mat >= 2
            && self.par_mat_data.len() == self.material_data.len() * self.num_par_mat
            && self.xs.len() == self.par_mat_data.len()
            && self.xs.iter().all(|g| g.is_valid_in(&self.reals))
            && self.material_data.iter().all(|m| m.theta_coeff[0] > 0.0 && m.theta_coeff[1] > 0.0)
            && self.par_mat_data.iter().all(|p| p.scaled_zeff > 0.0 && p.d_over_r > 0.0)
    }

    /// Whether MSC applies to a particle.
    pub fn applies_to(&self, particle: ParticleId) -> bool {
        self.category(particle).is_some()
    }

    fn category(&self, particle: ParticleId) -> Option<UrbanParMatType> {
        if particle == self.ids.electron {
            Some(UrbanParMatType::Electron)
        } else if particle == self.ids.positron {
            Some(UrbanParMatType::Positron)
        } else if self.muhad.contains(&particle) {
            Some(UrbanParMatType::MuHad)
        } else {
            None
        }
    }

    fn index(&self, particle: ParticleId, material: MaterialId) -> usize {
        let cat = self.category(particle);
        debug_assert!(cat.is_some(), "MSC does not apply to particle {particle:?}");
        material.get() * self.num_par_mat + cat.map_or(0, |c| c as usize)
    }

    pub fn par_mat(&self, particle: ParticleId, material: MaterialId) -> &UrbanMscParMatData {
        &self.par_mat_data[self.index(particle, material)]
    }

    pub fn xs(&self, particle: ParticleId, material: MaterialId) -> (&GridRecord, &RealPool) {
        (&self.xs[self.index(particle, material)], &self.reals)
    }
}
