// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Seltzer-Berger Bremsstrahlung
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Electron and positron bremsstrahlung below 1 GeV, sampled from the
//! tabulated scaled differential cross sections of Seltzer and Berger.
//!
//! Each element table is indexed by log incident kinetic energy (x) and
//! reduced photon energy κ = k/E (y), and stores χ(E, κ) = (β²/Z²) k dσ/dk.
//! Only the shape matters: sampled values are divided by a bounding
//! maximum during rejection.

use crate::cutoff::CutoffView;
use crate::em::brem::{calc_density_correction, BremFinalStateHelper, BremIds};
use crate::interactor::Interactor;
use crate::kinematics::TsaiUrbanDistribution;
use crate::material::{ElementView, MaterialView};
use crate::particle::{ParticleParams, ParticleTrackView};
use ndarray::{Array2, Axis};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use transport_math::distributions::{ReciprocalDistribution, RejectionSampler};
use transport_math::grid::find_bin;
use transport_types::constants::ALPHA_FINE_STRUCTURE;
use transport_types::ids::ElementComponentId;
use transport_types::{
    Interaction, Real3, Secondary, StackAllocator, TransportError, TransportResult,
};

#[derive(Deserialize)]
struct SBTableInput {
    log_energy: Vec<f64>,
    reduced_energy: Vec<f64>,
    xs: Array2<f64>,
}

/// Scaled differential cross section table for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SBTableInput")]
pub struct SBElementTable {
    log_energy: Vec<f64>,
    reduced_energy: Vec<f64>,
    xs: Array2<f64>,
    /// Column of the largest cross section in each row
    argmax: Vec<usize>,
}

impl TryFrom<SBTableInput> for SBElementTable {
    type Error = TransportError;

    fn try_from(input: SBTableInput) -> TransportResult<Self> {
        SBElementTable::new(input.log_energy, input.reduced_energy, input.xs)
    }
}

fn is_strictly_increasing(v: &[f64]) -> bool {
    v.len() >= 2 && v.windows(2).all(|w| w[1] > w[0])
}

impl SBElementTable {
    pub fn new(log_energy: Vec<f64>, reduced_energy: Vec<f64>, xs: Array2<f64>) -> TransportResult<Self> {
        if !is_strictly_increasing(&log_energy) || !is_strictly_increasing(&reduced_energy) {
            return Err(TransportError::invalid(
                "seltzer_berger",
                "energy grids must have at least two strictly increasing points",
            ));
        }
        if xs.dim() != (log_energy.len(), reduced_energy.len()) {
            return Err(TransportError::invalid(
                "seltzer_berger",
                format!(
                    "table shape {:?} does not match grids ({}, {})",
                    xs.dim(),
                    log_energy.len(),
                    reduced_energy.len()
                ),
            ));
        }
        if xs.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(TransportError::invalid(
                "seltzer_berger",
                "cross sections must be finite and nonnegative",
            ));
        }

        let argmax: Vec<usize> = xs
            .axis_iter(Axis(0))
            .map(|row| {
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
                    .0
            })
            .collect();
        if argmax.iter().enumerate().any(|(ix, &iy)| xs[[ix, iy]] <= 0.0) {
            return Err(TransportError::invalid("seltzer_berger", "table row is identically zero"));
        }

        Ok(SBElementTable {
            log_energy,
            reduced_energy,
            xs,
            argmax,
        })
    }

    /// Kinetic energy range (MeV) covered by the table.
    pub fn energy_bounds(&self) -> (f64, f64) {
        let n = self.log_energy.len();
        (self.log_energy[0].exp(), self.log_energy[n - 1].exp())
    }

    /// Fix the incident energy, giving a one-dimensional calculator in κ.
    pub fn subgrid(&self, inc_energy: f64) -> SBSubgrid<'_> {
        let log_e = inc_energy.ln();
        debug_assert!(
            log_e >= self.log_energy[0] && log_e < self.log_energy[self.log_energy.len() - 1],
            "incident energy {inc_energy} outside table"
        );
        let ix = find_bin(&self.log_energy, log_e);
        let frac = (log_e - self.log_energy[ix]) / (self.log_energy[ix + 1] - self.log_energy[ix]);
        SBSubgrid { table: self, ix, frac }
    }
}

/// Bilinear interpolation at a fixed incident energy.
#[derive(Debug, Clone, Copy)]
pub struct SBSubgrid<'a> {
    table: &'a SBElementTable,
    ix: usize,
    frac: f64,
}

impl SBSubgrid<'_> {
    fn row_value(&self, ix: usize, iy: usize) -> f64 {
        self.table.xs[[ix, iy]]
    }

    fn at_column(&self, iy: usize) -> f64 {
        (1.0 - self.frac) * self.row_value(self.ix, iy) + self.frac * self.row_value(self.ix + 1, iy)
    }

    /// Scaled cross section at reduced photon energy κ.
    pub fn evaluate(&self, kappa: f64) -> f64 {
        let y = &self.table.reduced_energy;
        let n = y.len();
        if kappa <= y[0] {
            return self.at_column(0);
        }
        if kappa >= y[n - 1] {
            return self.at_column(n - 1);
        }
        let iy = find_bin(y, kappa);
        let t = (kappa - y[iy]) / (y[iy + 1] - y[iy]);
        (1.0 - t) * self.at_column(iy) + t * self.at_column(iy + 1)
    }

    /// Upper bound of `evaluate` over κ.
    ///
    /// Interpolates the row maxima, which bounds the interpolated row by
    /// the triangle inequality.
    pub fn max_xs(&self) -> f64 {
        let argmax = &self.table.argmax;
        (1.0 - self.frac) * self.row_value(self.ix, argmax[self.ix])
            + self.frac * self.row_value(self.ix + 1, argmax[self.ix + 1])
    }
}

/// Ratio of positron to electron bremsstrahlung cross sections
/// (Kim, Pratt, Seltzer and Berger, Phys. Rev. A 33, 1986).
///
/// Equals one at the production cut and falls to zero as the photon takes
/// all of the positron's energy.
#[derive(Debug, Clone, Copy)]
pub struct SBPositronXsCorrector {
    positron_mass: f64,
    alpha_z: f64,
    inc_energy: f64,
    cutoff_invbeta: f64,
}

impl SBPositronXsCorrector {
    pub fn new(positron_mass: f64, element: &ElementView<'_>, min_gamma_energy: f64, inc_energy: f64) -> Self {
        debug_assert!(inc_energy > min_gamma_energy);
        let mut corrector = SBPositronXsCorrector {
            positron_mass,
            alpha_z: 2.0 * PI * ALPHA_FINE_STRUCTURE * element.atomic_number() as f64,
            inc_energy,
            cutoff_invbeta: 0.0,
        };
        corrector.cutoff_invbeta = corrector.calc_invbeta(min_gamma_energy);
        corrector
    }

    /// Inverse speed of the positron after emitting the photon.
    fn calc_invbeta(&self, gamma_energy: f64) -> f64 {
        let energy = self.inc_energy - gamma_energy;
        (energy + self.positron_mass) / (energy * (energy + 2.0 * self.positron_mass)).sqrt()
    }

    pub fn scale(&self, gamma_energy: f64) -> f64 {
        debug_assert!(gamma_energy > 0.0 && gamma_energy < self.inc_energy);
        let delta = self.cutoff_invbeta - self.calc_invbeta(gamma_energy);
        // Round-off can give slightly positive deltas near the cut
        (self.alpha_z * delta.min(0.0)).exp()
    }
}

/// Sample the photon energy from the scaled table.
///
/// Photon energies are drawn from dk/k modified by the dielectric
/// suppression term and accepted with probability χ(κ)/χ_max.
pub struct SBEnergySampler<'a> {
    subgrid: SBSubgrid<'a>,
    inc_energy: f64,
    density_correction: f64,
    sample_esq: ReciprocalDistribution,
    positron: Option<SBPositronXsCorrector>,
}

impl<'a> SBEnergySampler<'a> {
    pub fn new(
        table: &'a SBElementTable,
        particle: &ParticleTrackView<'_>,
        gamma_cutoff: f64,
        material: &MaterialView<'_>,
        element: &ElementView<'_>,
        is_electron: bool,
    ) -> Self {
        let inc_energy = particle.energy().value();
        let mass = particle.mass().value();
        debug_assert!(gamma_cutoff > 0.0 && gamma_cutoff < inc_energy);
        let density_correction = calc_density_correction(material, inc_energy + mass);
        SBEnergySampler {
            subgrid: table.subgrid(inc_energy),
            inc_energy,
            density_correction,
            sample_esq: ReciprocalDistribution::new(
                gamma_cutoff * gamma_cutoff + density_correction,
                inc_energy * inc_energy + density_correction,
            ),
            positron: (!is_electron)
                .then(|| SBPositronXsCorrector::new(mass, element, gamma_cutoff, inc_energy)),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let max_xs = self.subgrid.max_xs();
        loop {
            let esq = self.sample_esq.sample(rng) - self.density_correction;
            let energy = esq.max(0.0).sqrt();
            if energy <= 0.0 || energy >= self.inc_energy {
                continue;
            }
            let mut xs = self.subgrid.evaluate(energy / self.inc_energy);
            if let Some(corrector) = &self.positron {
                xs *= corrector.scale(energy);
            }
            if !RejectionSampler::new(xs.min(max_xs), max_xs).sample(rng) {
                return energy;
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeltzerBergerData {
    pub ids: BremIds,
    pub electron_mass: f64,
    /// Tables indexed by element id
    pub tables: Vec<SBElementTable>,
}

impl SeltzerBergerData {
    pub fn new(particles: &ParticleParams, tables: Vec<SBElementTable>) -> TransportResult<Self> {
        let ids = BremIds::new(particles)?;
        let data = SeltzerBergerData {
            electron_mass: particles.get(ids.electron).mass.value(),
            ids,
            tables,
        };
        data.validate()?;
        tracing::debug!("Constructed Seltzer-Berger data for {} elements", data.tables.len());
        Ok(data)
    }

    pub fn is_valid(&self) -> bool {
        self.electron_mass > 0.0 && !self.tables.is_empty()
    }

    pub fn validate(&self) -> TransportResult<()> {
        if self.tables.is_empty() {
            return Err(TransportError::invalid("seltzer_berger", "no element tables"));
        }
        if self.electron_mass <= 0.0 {
            return Err(TransportError::invalid("seltzer_berger", "electron mass must be positive"));
        }
        Ok(())
    }
}

pub struct SeltzerBergerInteractor<'a> {
    shared: &'a SeltzerBergerData,
    particle: ParticleTrackView<'a>,
    inc_direction: Real3,
    gamma_cutoff: f64,
    material: MaterialView<'a>,
    elcomp: ElementComponentId,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> SeltzerBergerInteractor<'a> {
    pub fn new(
        shared: &'a SeltzerBergerData,
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
        SeltzerBergerInteractor {
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

impl<'a> Interactor<'a> for SeltzerBergerInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(photon) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };
        let element = self.material.element_record(self.elcomp);
        let table = &self.shared.tables[element.element_id().get()];
        let is_electron = self.particle.particle_id() == self.shared.ids.electron;
        let gamma_energy =
            SBEnergySampler::new(table, &self.particle, self.gamma_cutoff, &self.material, &element, is_electron)
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
