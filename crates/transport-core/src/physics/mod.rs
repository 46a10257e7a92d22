// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Physics Params
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shared physics tables for the stepping loop.
//!
//! Macroscopic cross sections and stopping powers are supplied as
//! tabulated input per particle and material; the CSDA range is
//! integrated from the stopping power at setup. Every grid lives in one
//! [`RealPool`] owned by [`PhysicsParams`].

mod state;
mod step;

pub use state::{EnergyLossView, PhysicsState, PhysicsTrackView};
pub use step::{calc_mean_energy_loss, calc_physics_step_limit, range_to_step, select_discrete_process};

use serde::{Deserialize, Serialize};
use tracing::debug;
use transport_math::grid::{GridBuilder, GridRecord, RealPool};
use transport_nuclear::mucf::{DDChannel, DTChannel, MuonEnergyCdf};
use transport_nuclear::{MucfData, NeutronElasticData};
use transport_physics::em::bethe_heitler::BetheHeitlerData;
use transport_physics::em::combined_brem::CombinedBremData;
use transport_physics::em::eplusgg::EPlusGGData;
use transport_physics::em::form_factor::MottElementData;
use transport_physics::em::klein_nishina::KleinNishinaData;
use transport_physics::em::livermore_pe::{LivermoreElement, LivermorePEData};
use transport_physics::em::moller_bhabha::MollerBhabhaData;
use transport_physics::em::msc::{UrbanMscData, UrbanMscXsInput};
use transport_physics::em::muon::{MuBetheBlochData, MuBremsstrahlungData};
use transport_physics::em::rayleigh::{RayleighData, RayleighElementParams};
use transport_physics::em::rel_brem::RelBremData;
use transport_physics::em::seltzer_berger::{SBElementTable, SeltzerBergerData};
use transport_physics::em::wentzel::WentzelOkviData;
use transport_physics::{MaterialParams, ParticleParams};
use transport_types::config::TransportConfig;
use transport_types::ids::{ModelId, ParticleId};
use transport_types::{TransportError, TransportResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    KleinNishina,
    BetheHeitler,
    #[serde(rename = "eplusgg")]
    EPlusGG,
    MollerBhabha,
    SeltzerBerger,
    RelativisticBrem,
    CombinedBrem,
    CoulombScattering,
    MuBetheBloch,
    MuBremsstrahlung,
    LivermorePE,
    Rayleigh,
    NeutronElastic,
}

/// One discrete process of one particle species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInput {
    pub particle: String,
    pub model: ModelKind,
    /// Energy grid (MeV)
    pub energy: Vec<f64>,
    /// Macroscopic cross section (1/cm) on the energy grid, per material
    pub macro_xs: Vec<Vec<f64>>,
}

/// Restricted stopping power of a charged species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyLossInput {
    pub particle: String,
    /// Energy grid (MeV)
    pub energy: Vec<f64>,
    /// dE/dx (MeV/cm) on the energy grid, per material
    pub dedx: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MucfChannel {
    Dd(DDChannel),
    Dt(DTChannel),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MucfChannelInput {
    pub channel: MucfChannel,
    /// Relative probability for a stopped μ⁻
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysicsOptions {
    /// Below this range (cm) a step may consume the whole range
    #[serde(default = "default_min_range")]
    pub min_range: f64,
    /// Fraction of the range a step may consume above `min_range`
    #[serde(default = "default_max_step_over_range")]
    pub max_step_over_range: f64,
    /// Relative step below which energy loss is linear in dE/dx
    #[serde(default = "default_linear_loss_limit")]
    pub linear_loss_limit: f64,
}

fn default_min_range() -> f64 {
    0.1
}
fn default_max_step_over_range() -> f64 {
    0.2
}
fn default_linear_loss_limit() -> f64 {
    0.01
}

impl Default for PhysicsOptions {
    fn default() -> Self {
        PhysicsOptions {
            min_range: default_min_range(),
            max_step_over_range: default_max_step_over_range(),
            linear_loss_limit: default_linear_loss_limit(),
        }
    }
}

/// Everything needed to build [`PhysicsParams`], loadable from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhysicsInput {
    pub processes: Vec<ProcessInput>,
    #[serde(default)]
    pub energy_loss: Vec<EnergyLossInput>,
    /// Urban MSC transport cross sections; no MSC if absent
    #[serde(default)]
    pub msc: Option<UrbanMscXsInput>,
    /// Seltzer-Berger tables indexed by element
    #[serde(default)]
    pub seltzer_berger: Vec<SBElementTable>,
    /// Mott coefficients per element; Rutherford if absent
    #[serde(default)]
    pub mott: Option<Vec<MottElementData>>,
    /// Photoelectric subshell data indexed by element
    #[serde(default)]
    pub livermore_pe: Vec<LivermoreElement>,
    /// Form factor fits indexed by element
    #[serde(default)]
    pub rayleigh: Vec<RayleighElementParams>,
    /// Fusion channels for stopped negative muons
    #[serde(default)]
    pub mucf: Vec<MucfChannelInput>,
    #[serde(default)]
    pub muon_energy_cdf: Option<MuonEnergyCdf>,
    #[serde(default)]
    pub options: PhysicsOptions,
}

/// Model data, selected per process by a closed enum.
#[derive(Debug, Clone)]
pub enum ModelData {
    KleinNishina(KleinNishinaData),
    BetheHeitler(BetheHeitlerData),
    EPlusGG(EPlusGGData),
    MollerBhabha(MollerBhabhaData),
    SeltzerBerger(SeltzerBergerData),
    RelativisticBrem(RelBremData),
    CombinedBrem(Box<CombinedBremData>),
    CoulombScattering(WentzelOkviData),
    MuBetheBloch(MuBetheBlochData),
    MuBremsstrahlung(MuBremsstrahlungData),
    LivermorePE(LivermorePEData),
    Rayleigh(RayleighData),
    NeutronElastic(NeutronElasticData),
}

impl ModelData {
    fn build(
        kind: ModelKind,
        particles: &ParticleParams,
        materials: &MaterialParams,
        input: &PhysicsInput,
        config: &TransportConfig,
    ) -> TransportResult<Self> {
        let sb_data = || -> TransportResult<SeltzerBergerData> {
            if input.seltzer_berger.len() != materials.num_elements() {
                return Err(TransportError::invalid(
                    "physics",
                    format!(
                        "{:?} needs one Seltzer-Berger table per element ({} given, {} elements)",
                        kind,
                        input.seltzer_berger.len(),
                        materials.num_elements()
                    ),
                ));
            }
            SeltzerBergerData::new(particles, input.seltzer_berger.clone())
        };
        let per_element = |what: &str, given: usize| -> TransportResult<()> {
            if given == materials.num_elements() {
                return Ok(());
            }
            Err(TransportError::invalid(
                "physics",
                format!(
                    "{:?} needs {} per element ({} given, {} elements)",
                    kind,
                    what,
                    given,
                    materials.num_elements()
                ),
            ))
        };
        Ok(match kind {
            ModelKind::KleinNishina => ModelData::KleinNishina(KleinNishinaData::new(particles)?),
            ModelKind::BetheHeitler => ModelData::BetheHeitler(BetheHeitlerData::new(particles)?),
            ModelKind::EPlusGG => ModelData::EPlusGG(EPlusGGData::new(particles)?),
            ModelKind::MollerBhabha => ModelData::MollerBhabha(MollerBhabhaData::new(particles)?),
            ModelKind::SeltzerBerger => ModelData::SeltzerBerger(sb_data()?),
            ModelKind::RelativisticBrem => {
                ModelData::RelativisticBrem(RelBremData::new(particles, materials, config.enable_lpm)?)
            }
            ModelKind::CombinedBrem => ModelData::CombinedBrem(Box::new(CombinedBremData::new(
                sb_data()?,
                RelBremData::new(particles, materials, config.enable_lpm)?,
            )?)),
            ModelKind::CoulombScattering => ModelData::CoulombScattering(WentzelOkviData::new(
                particles,
                materials,
                config.wentzel.clone(),
                input.mott.clone(),
            )?),
            ModelKind::MuBetheBloch => ModelData::MuBetheBloch(MuBetheBlochData::new(particles)?),
            ModelKind::MuBremsstrahlung => ModelData::MuBremsstrahlung(MuBremsstrahlungData::new(particles)?),
            ModelKind::LivermorePE => {
                per_element("subshell data", input.livermore_pe.len())?;
                ModelData::LivermorePE(LivermorePEData::new(particles, input.livermore_pe.clone())?)
            }
            ModelKind::Rayleigh => {
                per_element("form factor parameters", input.rayleigh.len())?;
                ModelData::Rayleigh(RayleighData::new(particles, input.rayleigh.clone())?)
            }
            ModelKind::NeutronElastic => ModelData::NeutronElastic(NeutronElasticData::new(particles)?),
        })
    }

    pub fn kind(&self) -> ModelKind {
        match self {
            ModelData::KleinNishina(_) => ModelKind::KleinNishina,
            ModelData::BetheHeitler(_) => ModelKind::BetheHeitler,
            ModelData::EPlusGG(_) => ModelKind::EPlusGG,
            ModelData::MollerBhabha(_) => ModelKind::MollerBhabha,
            ModelData::SeltzerBerger(_) => ModelKind::SeltzerBerger,
            ModelData::RelativisticBrem(_) => ModelKind::RelativisticBrem,
            ModelData::CombinedBrem(_) => ModelKind::CombinedBrem,
            ModelData::CoulombScattering(_) => ModelKind::CoulombScattering,
            ModelData::MuBetheBloch(_) => ModelKind::MuBetheBloch,
            ModelData::MuBremsstrahlung(_) => ModelKind::MuBremsstrahlung,
            ModelData::LivermorePE(_) => ModelKind::LivermorePE,
            ModelData::Rayleigh(_) => ModelKind::Rayleigh,
            ModelData::NeutronElastic(_) => ModelKind::NeutronElastic,
        }
    }

    /// Whether the model samples a target element within the material.
    pub fn needs_element(&self) -> bool {
        matches!(
            self,
            ModelData::BetheHeitler(_)
                | ModelData::SeltzerBerger(_)
                | ModelData::RelativisticBrem(_)
                | ModelData::CombinedBrem(_)
                | ModelData::CoulombScattering(_)
                | ModelData::MuBremsstrahlung(_)
                | ModelData::LivermorePE(_)
                | ModelData::Rayleigh(_)
                | ModelData::NeutronElastic(_)
        )
    }

    pub fn applies_to(&self, particle: ParticleId) -> bool {
        match self {
            ModelData::KleinNishina(d) => particle == d.gamma,
            ModelData::BetheHeitler(d) => particle == d.gamma,
            ModelData::EPlusGG(d) => particle == d.positron,
            ModelData::MollerBhabha(d) => particle == d.electron || particle == d.positron,
            ModelData::SeltzerBerger(d) => d.ids.applies_to(particle),
            ModelData::RelativisticBrem(d) => d.ids.applies_to(particle),
            ModelData::CombinedBrem(d) => d.sb.ids.applies_to(particle),
            ModelData::CoulombScattering(d) => d.ids.is_lepton(particle),
            ModelData::MuBetheBloch(d) => d.ids.applies_to(particle),
            ModelData::MuBremsstrahlung(d) => d.ids.applies_to(particle),
            ModelData::LivermorePE(d) => particle == d.gamma,
            ModelData::Rayleigh(d) => particle == d.gamma,
            ModelData::NeutronElastic(d) => particle == d.neutron,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessRecord {
    pub particle: ParticleId,
    pub model: ModelId,
    /// Macroscopic cross section grid per material
    pub xs: Vec<GridRecord>,
}

#[derive(Debug, Clone)]
pub struct EnergyLossRecord {
    /// Stopping power grid per material
    pub dedx: Vec<GridRecord>,
    /// Energy to CSDA range grid per material
    pub range: Vec<GridRecord>,
}

#[derive(Debug, Clone)]
pub struct MucfParams {
    pub data: MucfData,
    pub channels: Vec<MucfChannelInput>,
    pub total_weight: f64,
}

#[derive(Debug, Clone)]
pub struct PhysicsParams {
    pub models: Vec<ModelData>,
    pub processes: Vec<ProcessRecord>,
    /// Process indices for each particle species
    process_ids: Vec<Vec<usize>>,
    /// Indexed by particle id
    energy_loss: Vec<Option<EnergyLossRecord>>,
    pub msc: Option<UrbanMscData>,
    pub mucf: Option<MucfParams>,
    /// Annihilation model used for positrons at rest
    pub annihilation: Option<ModelId>,
    pub options: PhysicsOptions,
    pub reals: RealPool,
    max_processes: usize,
}

impl PhysicsParams {
    pub fn new(
        particles: &ParticleParams,
        materials: &MaterialParams,
        config: &TransportConfig,
        input: &PhysicsInput,
    ) -> TransportResult<Self> {
        let num_materials = materials.num_materials();
        let mut reals = RealPool::new();
        let mut models: Vec<ModelData> = Vec::new();
        let mut processes = Vec::with_capacity(input.processes.len());
        let mut process_ids = vec![Vec::new(); particles.len()];

        for proc in &input.processes {
            let particle = particles.require(&proc.particle)?;
            let model = match models.iter().position(|m| m.kind() == proc.model) {
                Some(i) => ModelId::new(i),
                None => {
                    models.push(ModelData::build(proc.model, particles, materials, input, config)?);
                    ModelId::new(models.len() - 1)
                }
            };
            if !models[model.get()].applies_to(particle) {
                return Err(TransportError::invalid(
                    "physics",
                    format!("model {:?} does not apply to {}", proc.model, proc.particle),
                ));
            }
            let xs = build_material_grids(&mut reals, &proc.energy, &proc.macro_xs, num_materials, "macro_xs")?;
            process_ids[particle.get()].push(processes.len());
            processes.push(ProcessRecord { particle, model, xs });
        }

        let mut energy_loss = vec![None; particles.len()];
        for eloss in &input.energy_loss {
            let particle = particles.require(&eloss.particle)?;
            if eloss.dedx.iter().flatten().any(|&v| v <= 0.0) {
                return Err(TransportError::invalid(
                    "physics",
                    format!("stopping power of {} must be positive", eloss.particle),
                ));
            }
            let dedx = build_material_grids(&mut reals, &eloss.energy, &eloss.dedx, num_materials, "dedx")?;
            let range = eloss
                .dedx
                .iter()
                .map(|row| {
                    let range = integrate_range(&eloss.energy, row);
                    GridBuilder::new(&mut reals).linear(&eloss.energy, &range)
                })
                .collect::<TransportResult<Vec<_>>>()?;
            energy_loss[particle.get()] = Some(EnergyLossRecord { dedx, range });
        }

        let msc = input
            .msc
            .as_ref()
            .map(|xs| UrbanMscData::new(particles, materials, &config.msc, xs))
            .transpose()?;

        let mucf = if input.mucf.is_empty() {
            None
        } else {
            let cdf = input.muon_energy_cdf.clone().unwrap_or_default();
            Some(MucfParams {
                data: MucfData::new(particles, &cdf)?,
                channels: input.mucf.clone(),
                total_weight: input.mucf.iter().map(|c| c.weight).sum(),
            })
        };

        let annihilation = models
            .iter()
            .position(|m| m.kind() == ModelKind::EPlusGG)
            .map(ModelId::new);
        let max_processes = process_ids.iter().map(Vec::len).max().unwrap_or(0);

        let params = PhysicsParams {
            models,
            processes,
            process_ids,
            energy_loss,
            msc,
            mucf,
            annihilation,
            options: input.options.clone(),
            reals,
            max_processes,
        };
        params.validate()?;
        debug!(
            num_models = params.models.len(),
            num_processes = params.processes.len(),
            msc = params.msc.is_some(),
            mucf = params.mucf.is_some(),
            "built physics params"
        );
        Ok(params)
    }

    pub fn is_valid(&self) -> bool {
        let options = &self.options;
        options.min_range > 0.0
            && options.max_step_over_range > 0.0
            && options.max_step_over_range <= 1.0
            && options.linear_loss_limit > 0.0
            && options.linear_loss_limit < 1.0
            && self
                .processes
                .iter()
                .all(|p| p.model.get() < self.models.len() && p.xs.iter().all(|g| g.is_valid_in(&self.reals)))
            && self.mucf.as_ref().map_or(true, |m| {
                m.total_weight > 0.0 && m.channels.iter().all(|c| c.weight >= 0.0)
            })
    }

    pub fn validate(&self) -> TransportResult<()> {
        if !self.is_valid() {
            return Err(TransportError::invalid(
                "physics",
                format!("inconsistent physics tables or options {:?}", self.options),
            ));
        }
        Ok(())
    }

    pub fn processes_for(&self, particle: ParticleId) -> &[usize] {
        self.process_ids.get(particle.get()).map_or(&[], Vec::as_slice)
    }

    pub fn energy_loss(&self, particle: ParticleId) -> Option<&EnergyLossRecord> {
        self.energy_loss.get(particle.get()).and_then(Option::as_ref)
    }

    pub fn model(&self, id: ModelId) -> &ModelData {
        &self.models[id.get()]
    }

    /// Whether a stopped particle of this species has an at-rest process.
    pub fn has_at_rest(&self, particle: ParticleId) -> bool {
        let annihilates = self
            .annihilation
            .map_or(false, |id| self.model(id).applies_to(particle));
        let fuses = self
            .mucf
            .as_ref()
            .map_or(false, |mucf| mucf.data.ids.mu_minus == particle);
        annihilates || fuses
    }

    /// Largest number of processes of any particle.
    pub fn max_processes(&self) -> usize {
        self.max_processes
    }
}

fn build_material_grids(
    reals: &mut RealPool,
    energy: &[f64],
    values: &[Vec<f64>],
    num_materials: usize,
    what: &str,
) -> TransportResult<Vec<GridRecord>> {
    if values.len() != num_materials {
        return Err(TransportError::invalid(
            "physics",
            format!("{what} has {} materials, expected {num_materials}", values.len()),
        ));
    }
    if values.iter().flatten().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(TransportError::invalid("physics", format!("{what} must be finite and >= 0")));
    }
    values
        .iter()
        .map(|row| GridBuilder::new(reals).linear(energy, row))
        .collect()
}

/// CSDA range by trapezoid integration of 1/(dE/dx).
///
/// Below the first grid point the stopping power is taken as constant,
/// so the first range value is `E₀ / (dE/dx)₀`.
fn integrate_range(energy: &[f64], dedx: &[f64]) -> Vec<f64> {
    let mut range = Vec::with_capacity(energy.len());
    let mut total = energy[0] / dedx[0];
    range.push(total);
    for i in 1..energy.len() {
        total += 0.5 * (1.0 / dedx[i] + 1.0 / dedx[i - 1]) * (energy[i] - energy[i - 1]);
        range.push(total);
    }
    range
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use transport_physics::material::{ElementInput, IsotopeRecord, MatElementComponent, MaterialInput};
    use transport_types::ids::ElementId;
    use transport_types::units::{AmuMass, MevMass};

    /// Water and lead with flat cross sections.
    pub(crate) fn test_materials() -> MaterialParams {
        let elements = [
            ElementInput {
                atomic_number: 1,
                atomic_mass: AmuMass::new(1.008),
                isotopes: vec![IsotopeRecord {
                    mass_number: 1,
                    nuclear_mass: MevMass::new(938.272),
                    abundance: 1.0,
                }],
            },
            ElementInput {
                atomic_number: 8,
                atomic_mass: AmuMass::new(15.999),
                isotopes: vec![IsotopeRecord {
                    mass_number: 16,
                    nuclear_mass: MevMass::new(14895.1),
                    abundance: 1.0,
                }],
            },
            ElementInput {
                atomic_number: 82,
                atomic_mass: AmuMass::new(207.2),
                isotopes: vec![IsotopeRecord {
                    mass_number: 208,
                    nuclear_mass: MevMass::new(193687.0),
                    abundance: 1.0,
                }],
            },
        ];
        let materials = [
            MaterialInput {
                name: "water".to_string(),
                density: 1.0,
                components: vec![
                    MatElementComponent {
                        element: ElementId::new(0),
                        fraction: 2.0 / 3.0,
                    },
                    MatElementComponent {
                        element: ElementId::new(1),
                        fraction: 1.0 / 3.0,
                    },
                ],
            },
            MaterialInput {
                name: "lead".to_string(),
                density: 11.35,
                components: vec![MatElementComponent {
                    element: ElementId::new(2),
                    fraction: 1.0,
                }],
            },
        ];
        MaterialParams::new(&elements, &materials).unwrap()
    }

    pub(crate) fn flat(particle: &str, model: ModelKind, xs: f64) -> ProcessInput {
        ProcessInput {
            particle: particle.to_string(),
            model,
            energy: vec![1e-3, 1e5],
            macro_xs: vec![vec![xs, xs], vec![10.0 * xs, 10.0 * xs]],
        }
    }

    /// Single K-like shell at `binding` MeV, fitted as σ ∝ 1/E³.
    fn one_shell(binding: f64) -> LivermoreElement {
        use transport_physics::em::livermore_pe::LivermoreSubshell;
        LivermoreElement {
            thresh_lo: binding.max(1e-3),
            thresh_hi: 1.0,
            shells: vec![LivermoreSubshell {
                binding_energy: binding,
                energy: vec![1e-4, 1.0],
                xs: vec![1.0, 1.0],
                param: [[0.0, 0.0, 1.0, 0.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0, 0.0, 0.0]],
            }],
        }
    }

    /// Photoelectric absorption and coherent scattering on top of [`test_input`].
    pub(crate) fn low_energy_photon_input() -> PhysicsInput {
        let mut input = test_input();
        input.processes.push(flat("gamma", ModelKind::LivermorePE, 0.2));
        input.processes.push(flat("gamma", ModelKind::Rayleigh, 0.1));
        // H, O and Pb K shells
        input.livermore_pe = vec![one_shell(13.6e-6), one_shell(5.4e-4), one_shell(0.088)];
        input.rayleigh = vec![
            RayleighElementParams {
                a: [1.0, 0.5, 0.1],
                b: [3e-17, 1e-17, 2e-18],
                n: [2.0, 1.5, 1.2],
            };
            3
        ];
        input
    }

    /// Photon, electron and positron physics without tabulated brems.
    pub(crate) fn test_input() -> PhysicsInput {
        let energy: Vec<f64> = vec![1e-3, 1e-2, 1e-1, 1.0, 10.0, 100.0, 1e3, 1e4, 1e5];
        let dedx = |scale: f64| -> Vec<f64> { energy.iter().map(|e| scale * (2.0 + 0.5 / e.sqrt())).collect() };
        PhysicsInput {
            processes: vec![
                flat("gamma", ModelKind::KleinNishina, 0.05),
                flat("gamma", ModelKind::BetheHeitler, 0.02),
                flat("e-", ModelKind::MollerBhabha, 0.1),
                flat("e+", ModelKind::MollerBhabha, 0.1),
                flat("e+", ModelKind::EPlusGG, 0.05),
                flat("mu-", ModelKind::MuBetheBloch, 0.01),
            ],
            energy_loss: ["e-", "e+", "mu-"]
                .iter()
                .map(|p| EnergyLossInput {
                    particle: p.to_string(),
                    energy: energy.clone(),
                    dedx: vec![dedx(1.0), dedx(11.0)],
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_build() {
        let particles = ParticleParams::standard().unwrap();
        let materials = test_materials();
        let params =
            PhysicsParams::new(&particles, &materials, &TransportConfig::default(), &test_input()).unwrap();
        assert_eq!(params.models.len(), 5);
        assert_eq!(params.processes.len(), 6);
        assert_eq!(params.max_processes(), 2);
        let gamma = particles.require("gamma").unwrap();
        assert_eq!(params.processes_for(gamma), &[0, 1]);
        assert!(params.energy_loss(gamma).is_none());
        assert!(params.energy_loss(particles.require("e-").unwrap()).is_some());
        assert_eq!(params.annihilation, Some(ModelId::new(3)));
        assert!(params.msc.is_none() && params.mucf.is_none());
    }

    #[test]
    fn test_model_mismatch() {
        let particles = ParticleParams::standard().unwrap();
        let input = PhysicsInput {
            processes: vec![flat("e-", ModelKind::KleinNishina, 1.0)],
            ..Default::default()
        };
        let err = PhysicsParams::new(&particles, &test_materials(), &TransportConfig::default(), &input);
        assert!(matches!(err, Err(TransportError::InvalidParams { .. })));
    }

    #[test]
    fn test_wrong_material_count() {
        let particles = ParticleParams::standard().unwrap();
        let mut proc = flat("gamma", ModelKind::KleinNishina, 1.0);
        proc.macro_xs.pop();
        let input = PhysicsInput {
            processes: vec![proc],
            ..Default::default()
        };
        assert!(PhysicsParams::new(&particles, &test_materials(), &TransportConfig::default(), &input).is_err());
    }

    #[test]
    fn test_brems_without_tables() {
        let particles = ParticleParams::standard().unwrap();
        let input = PhysicsInput {
            processes: vec![flat("e-", ModelKind::SeltzerBerger, 1.0)],
            ..Default::default()
        };
        assert!(PhysicsParams::new(&particles, &test_materials(), &TransportConfig::default(), &input).is_err());
    }

    #[test]
    fn test_photon_models_need_element_tables() {
        let particles = ParticleParams::standard().unwrap();
        let materials = test_materials();
        let config = TransportConfig::default();
        let input = low_energy_photon_input();
        let params = PhysicsParams::new(&particles, &materials, &config, &input).unwrap();
        let gamma = particles.require("gamma").unwrap();
        assert_eq!(params.processes_for(gamma).len(), 4);
        let kinds: Vec<ModelKind> = params.models.iter().map(ModelData::kind).collect();
        assert!(kinds.contains(&ModelKind::LivermorePE) && kinds.contains(&ModelKind::Rayleigh));

        let mut missing = input.clone();
        missing.livermore_pe.pop();
        assert!(PhysicsParams::new(&particles, &materials, &config, &missing).is_err());
        let mut missing = input;
        missing.rayleigh.clear();
        assert!(PhysicsParams::new(&particles, &materials, &config, &missing).is_err());
    }

    #[test]
    fn test_neutron_elastic_from_json() {
        let json = r#"{"processes": [{"particle": "neutron", "model": "neutron_elastic",
                                      "energy": [0.001, 10.0], "macro_xs": [[0.1, 0.1], [0.2, 0.2]]}]}"#;
        let input: PhysicsInput = serde_json::from_str(json).unwrap();
        let particles = ParticleParams::standard().unwrap();
        let params = PhysicsParams::new(&particles, &test_materials(), &TransportConfig::default(), &input).unwrap();
        let neutron = particles.require("neutron").unwrap();
        assert_eq!(params.processes_for(neutron).len(), 1);
        assert!(params.processes_for(particles.require("gamma").unwrap()).is_empty());
        assert!(params.models[0].needs_element());
        assert!(!params.models[0].applies_to(particles.require("proton").unwrap()));
    }

    #[test]
    fn test_integrate_range() {
        let range = integrate_range(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]);
        assert_eq!(range, vec![0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_input_from_json() {
        let json = r#"{
            "processes": [{"particle": "e+", "model": "eplusgg", "energy": [0.001, 10.0],
                           "macro_xs": [[1.0, 1.0], [2.0, 2.0]]}],
            "mucf": [{"channel": {"dt": "AlphaMuonNeutron"}, "weight": 0.99}],
            "options": {"min_range": 0.05}
        }"#;
        let input: PhysicsInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.processes[0].model, ModelKind::EPlusGG);
        assert_eq!(input.mucf[0].channel, MucfChannel::Dt(DTChannel::AlphaMuonNeutron));
        assert_eq!(input.options.min_range, 0.05);
        assert_eq!(input.options.linear_loss_limit, 0.01);

        let particles = ParticleParams::standard().unwrap();
        let params = PhysicsParams::new(&particles, &test_materials(), &TransportConfig::default(), &input).unwrap();
        assert!(params.mucf.is_some());
    }
}
