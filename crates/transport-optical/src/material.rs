// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Optical Materials
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Refractive index tables of optical materials.

use serde::{Deserialize, Serialize};
use tracing::debug;
use transport_math::{GridBuilder, GridRecord, NonuniformGridCalculator, RealPool};
use transport_types::ids::{MaterialId, OpticalMaterialId};
use transport_types::{TransportError, TransportResult};

/// Optical properties attached to one core material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpticalMaterialInput {
    pub material: MaterialId,
    /// Photon energy grid (MeV)
    pub energy: Vec<f64>,
    /// Refractive index on the energy grid
    pub refractive_index: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct OpticalMaterialParams {
    reals: RealPool,
    refractive_index: Vec<GridRecord>,
    /// Indexed by core material id
    optical_ids: Vec<Option<OpticalMaterialId>>,
}

impl OpticalMaterialParams {
    /// Build from inputs; optical material ids follow the input order.
    ///
    /// The refractive index must be at least one and non-decreasing in
    /// energy (normal dispersion).
    pub fn new(inputs: &[OpticalMaterialInput], num_core_materials: usize) -> TransportResult<Self> {
        if inputs.is_empty() {
            return Err(TransportError::invalid("optical material", "no optical materials"));
        }
        let mut reals = RealPool::new();
        let mut refractive_index = Vec::with_capacity(inputs.len());
        let mut optical_ids = vec![None; num_core_materials];
        for (i, input) in inputs.iter().enumerate() {
            let slot = optical_ids.get_mut(input.material.get()).ok_or_else(|| {
                TransportError::invalid("optical material", format!("unknown core material {}", input.material))
            })?;
            if slot.is_some() {
                return Err(TransportError::invalid(
                    "optical material",
                    format!("material {} has two optical definitions", input.material),
                ));
            }
            *slot = Some(OpticalMaterialId::new(i));

            let rindex = &input.refractive_index;
            if rindex.iter().any(|&n| !(n >= 1.0)) {
                return Err(TransportError::invalid(
                    "optical material",
                    format!("refractive index below one in material {}", input.material),
                ));
            }
            if rindex.windows(2).any(|w| w[1] < w[0]) {
                return Err(TransportError::invalid(
                    "optical material",
                    format!("refractive index decreases with energy in material {}", input.material),
                ));
            }
            refractive_index.push(GridBuilder::new(&mut reals).linear(&input.energy, rindex)?);
        }
        debug!(num_optical_materials = inputs.len(), "built optical materials");
        Ok(OpticalMaterialParams {
            reals,
            refractive_index,
            optical_ids,
        })
    }

    pub fn num_materials(&self) -> usize {
        self.refractive_index.len()
    }

    /// Optical material of a core material, if it has one.
    pub fn optical_material(&self, material: MaterialId) -> Option<OpticalMaterialId> {
        self.optical_ids.get(material.get()).copied().flatten()
    }

    pub fn get(&self, id: OpticalMaterialId) -> OpticalMaterialView<'_> {
        debug_assert!(id.get() < self.num_materials());
        OpticalMaterialView {
            id,
            calc: NonuniformGridCalculator::new(&self.refractive_index[id.get()], &self.reals),
        }
    }
}

/// Refractive index of one optical material.
#[derive(Debug, Clone, Copy)]
pub struct OpticalMaterialView<'a> {
    id: OpticalMaterialId,
    calc: NonuniformGridCalculator<'a>,
}

impl<'a> OpticalMaterialView<'a> {
    pub fn material_id(&self) -> OpticalMaterialId {
        self.id
    }

    /// Refractive index at a photon energy (MeV).
    pub fn refractive_index(&self, energy: f64) -> f64 {
        self.calc.evaluate(energy)
    }

    pub fn energy_grid(&self) -> &'a [f64] {
        self.calc.grid()
    }

    pub fn refractive_index_grid(&self) -> &'a [f64] {
        self.calc.values()
    }

    pub fn min_energy(&self) -> f64 {
        self.calc.front()
    }

    pub fn max_energy(&self) -> f64 {
        self.calc.back()
    }

    pub fn max_refractive_index(&self) -> f64 {
        self.calc.get(self.calc.len() - 1)
    }

    /// Lowest energy where the refractive index reaches `index`.
    ///
    /// Clamped to the ends of the grid.
    pub fn energy_at_index(&self, index: f64) -> f64 {
        let energy = self.calc.grid();
        let rindex = self.calc.values();
        let i = rindex.partition_point(|&n| n < index);
        if i == 0 {
            return energy[0];
        }
        if i == rindex.len() {
            return energy[energy.len() - 1];
        }
        let frac = (index - rindex[i - 1]) / (rindex[i] - rindex[i - 1]);
        energy[i - 1] + frac * (energy[i] - energy[i - 1])
    }
}
