// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Urban MSC Helper
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use super::{EnergyLossTables, MscStep, UrbanMscData, UrbanMscParMatData, UrbanMscParameters};
use crate::particle::ParticleTrackView;
use transport_math::grid::NonuniformGridCalculator;
use transport_types::ids::MaterialId;
use transport_types::units::MevEnergy;

/// Mean free path and end-of-step energy for one track.
pub struct UrbanMscHelper<'a, L> {
    shared: &'a UrbanMscData,
    particle: ParticleTrackView<'a>,
    material: MaterialId,
    loss: &'a L,
    lambda: f64,
}

impl<'a, L: EnergyLossTables> UrbanMscHelper<'a, L> {
    pub fn new(
        shared: &'a UrbanMscData,
        particle: ParticleTrackView<'a>,
        material: MaterialId,
        loss: &'a L,
    ) -> Self {
        let mut helper = UrbanMscHelper {
            shared,
            particle,
            material,
            loss,
            lambda: 0.0,
        };
        helper.lambda = helper.calc_msc_mfp(particle.energy());
        helper
    }

    /// Transport mean free path λ₁ (cm) at the start of the step.
    pub fn msc_mfp(&self) -> f64 {
        self.lambda
    }

    /// Transport mean free path at an arbitrary energy.
    pub fn calc_msc_mfp(&self, energy: MevEnergy) -> f64 {
        debug_assert!(energy.value() > 0.0);
        let (grid, reals) = self.shared.xs(self.particle.particle_id(), self.material);
        let scaled = NonuniformGridCalculator::new(grid, reals).evaluate(energy.value());
        let xs = scaled / (energy.value() * energy.value());
        debug_assert!(xs > 0.0);
        1.0 / xs
    }

    pub fn calc_inverse_range(&self, range: f64) -> MevEnergy {
        self.loss.inverse_range(range)
    }

    pub fn range(&self) -> f64 {
        self.loss.range()
    }

    pub fn scaled_zeff(&self) -> f64 {
        self.pmdata().scaled_zeff
    }

    /// Maximum distance a track can travel before stopping.
    pub fn max_step(&self) -> f64 {
        self.loss.range() * self.pmdata().d_over_r
    }

    /// Kinetic energy after a true path length, assuming continuous loss.
    pub fn calc_end_energy(&self, step: f64) -> MevEnergy {
        let range = self.loss.range();
        debug_assert!(step <= range);
        if step <= range * UrbanMscParameters::SMALL_RANGE_FRAC {
            let energy = self.particle.energy();
            energy - MevEnergy::new(step * self.loss.energy_loss(energy))
        } else {
            self.calc_inverse_range(range - step)
        }
    }

    pub fn pmdata(&self) -> &'a UrbanMscParMatData {
        self.shared.par_mat(self.particle.particle_id(), self.material)
    }

    pub fn particle(&self) -> &ParticleTrackView<'a> {
        &self.particle
    }

    pub fn material_id(&self) -> MaterialId {
        self.material
    }
}

/// Convert a true path length to the mean geometric (straight line) path.
pub struct MscStepToGeo<'h, 'a, L> {
    helper: &'h UrbanMscHelper<'a, L>,
    energy: f64,
    lambda: f64,
    range: f64,
    electron_mass: f64,
}

impl<'h, 'a, L: EnergyLossTables> MscStepToGeo<'h, 'a, L> {
    pub fn new(helper: &'h UrbanMscHelper<'a, L>) -> Self {
        let energy = helper.particle().energy().value();
        debug_assert!(energy > 0.0);
        MscStepToGeo {
            energy,
            lambda: helper.msc_mfp(),
            range: helper.range(),
            electron_mass: helper.shared.electron_mass,
            helper,
        }
    }

    /// Return the geometric step and the scaled mean free path slope.
    pub fn convert(&self, true_path: f64) -> (f64, f64) {
        debug_assert!(true_path >= 0.0 && true_path <= self.range);
        let mut alpha = MscStep::SMALL_STEP_ALPHA;
        let step = if true_path < UrbanMscParameters::MIN_STEP_TRANSFORM {
            true_path
        } else if true_path < self.range * UrbanMscParameters::SMALL_RANGE_FRAC {
            -self.lambda * (-true_path / self.lambda).exp_m1()
        } else {
            let mfp_slope = if self.energy < self.electron_mass || true_path == self.range {
                alpha = 1.0 / self.range;
                (1.0 - alpha * true_path).max(0.0)
            } else {
                let end_energy = self.helper.calc_inverse_range(self.range - true_path);
                let lambda1 = self.helper.calc_msc_mfp(end_energy);
                alpha = (self.lambda - lambda1) / (self.lambda * true_path);
                lambda1 / self.lambda
            };
            let w = 1.0 + 1.0 / (alpha * self.lambda);
            (1.0 - mfp_slope.powf(w)) / (alpha * w)
        };
        (step.min(true_path), alpha)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::em::msc::test_support::{synthetic_xs_input, ConstantLoss};
    use crate::em::test_support::TestSetup;
    use transport_types::config::MscOptions;

    fn data(setup: &TestSetup) -> UrbanMscData {
        UrbanMscData::new(
            &setup.particles,
            &setup.materials,
            &MscOptions::default(),
            &synthetic_xs_input(3, 1.0),
        )
        .unwrap()
    }

    #[test]
    fn test_mfp_and_end_energy() {
        let setup = TestSetup::new();
        let data = data(&setup);
        let particle = setup.particle("e-", 2.0);
        let loss = ConstantLoss { dedx: 2.0, energy: 2.0 };
        let helper = UrbanMscHelper::new(&data, particle, MaterialId::new(2), &loss);
        // λ₁ = E² cm with the synthetic table
        assert!((helper.msc_mfp() - 4.0).abs() < 1e-12);
        assert!((helper.calc_msc_mfp(MevEnergy::new(0.5)) - 0.25).abs() < 1e-12);
        assert!((helper.range() - 1.0).abs() < 1e-12);
        // Short step: linear loss; long step: inverse range
        assert!((helper.calc_end_energy(0.01).value() - 1.98).abs() < 1e-12);
        assert!((helper.calc_end_energy(0.5).value() - 1.0).abs() < 1e-12);
        assert!(helper.max_step() < helper.range());
    }

    #[test]
    fn test_step_to_geo() {
        let setup = TestSetup::new();
        let data = data(&setup);
        let particle = setup.particle("e-", 2.0);
        let loss = ConstantLoss { dedx: 2.0, energy: 2.0 };
        let helper = UrbanMscHelper::new(&data, particle, MaterialId::new(2), &loss);
        let to_geo = MscStepToGeo::new(&helper);

        let (tiny, alpha) = to_geo.convert(1e-8);
        assert_eq!(tiny, 1e-8);
        assert_eq!(alpha, MscStep::SMALL_STEP_ALPHA);

        let (geo, _) = to_geo.convert(0.01);
        assert!(geo < 0.01 && geo > 0.0099);

        for t in [0.1, 0.5, 0.9, 1.0] {
            let (geo, alpha) = to_geo.convert(t);
            assert!(geo > 0.0 && geo <= t, "t = {t}, geo = {geo}");
            assert!(alpha > 0.0);
        }
    }
}
