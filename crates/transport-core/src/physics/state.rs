// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Physics Track State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-slot physics scratch data and the view that combines it with the
//! shared tables.

use super::{EnergyLossRecord, ModelData, PhysicsParams};
use transport_math::grid::{GridRecord, NonuniformGridCalculator, RealPool};
use transport_physics::em::msc::{EnergyLossTables, MscRange, MscStep, UrbanMscData};
use transport_types::ids::{MaterialId, ParticleId};
use transport_types::units::MevEnergy;

#[derive(Debug, Clone, Default)]
pub struct PhysicsState {
    /// Mean free paths left before the next discrete interaction; zero if unset
    pub interaction_mfp: f64,
    /// Total macroscopic cross section (1/cm) at the start of the step
    pub macro_xs: f64,
    /// Macroscopic cross section of each process of the current particle
    pub per_process_xs: Vec<f64>,
    pub msc_range: MscRange,
    /// Step conversion from this step's along-step, if MSC applied
    pub msc_step: Option<MscStep>,
    /// Process to rerun after the secondary stack ran out
    pub retry_process: Option<usize>,
    /// Local energy deposition (MeV) in the current step
    pub energy_deposition: f64,
}

impl PhysicsState {
    pub fn new(max_processes: usize) -> Self {
        PhysicsState {
            per_process_xs: vec![0.0; max_processes],
            ..Default::default()
        }
    }

    /// Clear persistent state for a new track.
    pub fn reset(&mut self) {
        self.interaction_mfp = 0.0;
        self.macro_xs = 0.0;
        self.per_process_xs.iter_mut().for_each(|xs| *xs = 0.0);
        self.msc_range = MscRange::default();
        self.msc_step = None;
        self.retry_process = None;
        self.energy_deposition = 0.0;
    }
}

pub struct PhysicsTrackView<'a> {
    params: &'a PhysicsParams,
    state: &'a mut PhysicsState,
    particle: ParticleId,
    material: MaterialId,
}

impl<'a> PhysicsTrackView<'a> {
    pub fn new(
        params: &'a PhysicsParams,
        state: &'a mut PhysicsState,
        particle: ParticleId,
        material: MaterialId,
    ) -> Self {
        PhysicsTrackView {
            params,
            state,
            particle,
            material,
        }
    }

    pub fn params(&self) -> &'a PhysicsParams {
        self.params
    }

    pub fn particle_id(&self) -> ParticleId {
        self.particle
    }

    pub fn material_id(&self) -> MaterialId {
        self.material
    }

    /// Global indices of the current particle's processes.
    pub fn processes(&self) -> &'a [usize] {
        self.params.processes_for(self.particle)
    }

    pub fn process_model(&self, process: usize) -> &'a ModelData {
        self.params.model(self.params.processes[process].model)
    }

    pub fn calc_macro_xs(&self, process: usize, energy: MevEnergy) -> f64 {
        let grid = &self.params.processes[process].xs[self.material.get()];
        NonuniformGridCalculator::new(grid, &self.params.reals).evaluate(energy.value())
    }

    /// Recompute and store the per-process and total cross sections.
    pub fn update_macro_xs(&mut self, energy: MevEnergy) -> f64 {
        let processes = self.processes();
        let mut total = 0.0;
        for (i, &process) in processes.iter().enumerate() {
            let xs = self.calc_macro_xs(process, energy);
            self.state.per_process_xs[i] = xs;
            total += xs;
        }
        self.state.macro_xs = total;
        total
    }

    pub fn macro_xs(&self) -> f64 {
        self.state.macro_xs
    }

    /// Cross section of the i'th process of the current particle.
    pub fn per_process_xs(&self, i: usize) -> f64 {
        self.state.per_process_xs[i]
    }

    pub fn has_interaction_mfp(&self) -> bool {
        self.state.interaction_mfp > 0.0
    }

    pub fn interaction_mfp(&self) -> f64 {
        self.state.interaction_mfp
    }

    pub fn set_interaction_mfp(&mut self, mfp: f64) {
        debug_assert!(mfp >= 0.0);
        self.state.interaction_mfp = mfp;
    }

    pub fn reset_interaction_mfp(&mut self) {
        self.state.interaction_mfp = 0.0;
    }

    pub fn energy_loss(&self, energy: MevEnergy) -> Option<EnergyLossView<'a>> {
        self.params
            .energy_loss(self.particle)
            .map(|record| EnergyLossView::new(&self.params.reals, record, self.material, energy))
    }

    /// Urban MSC data if it applies to the current particle.
    pub fn msc(&self) -> Option<&'a UrbanMscData> {
        self.params.msc.as_ref().filter(|msc| msc.applies_to(self.particle))
    }

    pub fn msc_range_mut(&mut self) -> &mut MscRange {
        &mut self.state.msc_range
    }

    pub fn msc_step(&self) -> Option<MscStep> {
        self.state.msc_step
    }

    pub fn set_msc_step(&mut self, step: Option<MscStep>) {
        self.state.msc_step = step;
    }

    pub fn retry_process(&self) -> Option<usize> {
        self.state.retry_process
    }

    pub fn set_retry_process(&mut self, process: Option<usize>) {
        self.state.retry_process = process;
    }

    pub fn deposit_energy(&mut self, energy: MevEnergy) {
        debug_assert!(energy.value() >= 0.0);
        self.state.energy_deposition += energy.value();
    }

    pub fn energy_deposition(&self) -> f64 {
        self.state.energy_deposition
    }
}

/// Stopping power and CSDA range of one particle in one material.
///
/// Below the first tabulated energy the stopping power is constant, so
/// range and energy are proportional there.
#[derive(Debug, Clone, Copy)]
pub struct EnergyLossView<'a> {
    reals: &'a RealPool,
    dedx: &'a GridRecord,
    range_grid: &'a GridRecord,
    range: f64,
}

impl<'a> EnergyLossView<'a> {
    pub fn new(reals: &'a RealPool, record: &'a EnergyLossRecord, material: MaterialId, energy: MevEnergy) -> Self {
        let mut view = EnergyLossView {
            reals,
            dedx: &record.dedx[material.get()],
            range_grid: &record.range[material.get()],
            range: 0.0,
        };
        view.range = view.calc_range(energy);
        view
    }

    pub fn calc_range(&self, energy: MevEnergy) -> f64 {
        let calc = NonuniformGridCalculator::new(self.range_grid, self.reals);
        let e0 = calc.grid()[0];
        if energy.value() < e0 {
            return calc.get(0) * energy.value() / e0;
        }
        calc.evaluate(energy.value())
    }
}

impl EnergyLossTables for EnergyLossView<'_> {
    fn range(&self) -> f64 {
        self.range
    }

    fn energy_loss(&self, energy: MevEnergy) -> f64 {
        NonuniformGridCalculator::new(self.dedx, self.reals).evaluate(energy.value())
    }

    fn inverse_range(&self, range: f64) -> MevEnergy {
        let calc = NonuniformGridCalculator::new(self.range_grid, self.reals);
        let range0 = calc.get(0);
        if range < range0 {
            return MevEnergy::new(calc.grid()[0] * range / range0);
        }
        MevEnergy::new(NonuniformGridCalculator::from_inverse(self.range_grid, self.reals).evaluate(range))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{test_input, test_materials};
    use super::*;
    use transport_physics::ParticleParams;
    use transport_types::config::TransportConfig;

    #[test]
    fn test_macro_xs() {
        let particles = ParticleParams::standard().unwrap();
        let params = PhysicsParams::new(&particles, &test_materials(), &TransportConfig::default(), &test_input())
            .unwrap();
        let gamma = particles.require("gamma").unwrap();
        let mut state = PhysicsState::new(params.max_processes());
        let mut phys = PhysicsTrackView::new(&params, &mut state, gamma, MaterialId::new(1));
        let total = phys.update_macro_xs(MevEnergy::new(1.0));
        assert!((total - 0.7).abs() < 1e-12);
        assert!((phys.per_process_xs(0) - 0.5).abs() < 1e-12);
        assert!(phys.energy_loss(MevEnergy::new(1.0)).is_none());
        assert!(phys.msc().is_none());
        assert!(!phys.has_interaction_mfp());
    }

    #[test]
    fn test_range_inversion() {
        let particles = ParticleParams::standard().unwrap();
        let params = PhysicsParams::new(&particles, &test_materials(), &TransportConfig::default(), &test_input())
            .unwrap();
        let electron = particles.require("e-").unwrap();
        let mut state = PhysicsState::new(params.max_processes());
        let phys = PhysicsTrackView::new(&params, &mut state, electron, MaterialId::new(0));
        for energy in [1e-4, 1e-3, 0.05, 2.0, 300.0] {
            let eloss = phys.energy_loss(MevEnergy::new(energy)).unwrap();
            let range = eloss.range();
            assert!(range > 0.0);
            let back = eloss.inverse_range(range).value();
            assert!((back - energy).abs() < 1e-9 * energy.max(1.0), "{energy} -> {range} -> {back}");
        }
        // Range stays proportional to energy below the table
        let e0 = 1e-3;
        let at_e0 = eloss_at(&phys, e0).range();
        let half = eloss_at(&phys, 0.5 * e0);
        assert!((half.range() - 0.5 * at_e0).abs() < 1e-12 * at_e0);
        assert!(half.range() < at_e0);
        let back = half.inverse_range(0.25 * at_e0).value();
        assert!((back - 0.25 * e0).abs() < 1e-12 * e0);

        // Lead stops faster
        let lead = PhysicsTrackView::new(&params, &mut state, electron, MaterialId::new(1));
        let water_range = phys_range(&params, electron, 0, 1.0);
        assert!(lead.energy_loss(MevEnergy::new(1.0)).unwrap().range() < water_range);
    }

    fn eloss_at<'a>(phys: &'a PhysicsTrackView<'_>, energy: f64) -> EnergyLossView<'a> {
        phys.energy_loss(MevEnergy::new(energy)).unwrap()
    }

    fn phys_range(params: &PhysicsParams, particle: ParticleId, material: usize, energy: f64) -> f64 {
        let record = params.energy_loss(particle).unwrap();
        EnergyLossView::new(&params.reals, record, MaterialId::new(material), MevEnergy::new(energy)).range()
    }
}
