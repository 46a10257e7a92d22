// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Coulomb Single Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete elastic scattering of charged leptons (and heavier charged
//! particles) off a single atom using the Wentzel distribution.

use crate::cutoff::CutoffView;
use crate::em::wentzel::{WentzelDistribution, WentzelHelper, WentzelOkviData};
use crate::interactor::Interactor;
use crate::kinematics::ExitingDirectionSampler;
use crate::material::{ElementView, IsotopeRecord, MaterialView};
use crate::particle::ParticleTrackView;
use rand::distributions::Distribution;
use rand::Rng;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3};

pub struct CoulombScatteringInteractor<'a> {
    shared: &'a WentzelOkviData,
    helper: WentzelHelper,
    particle: ParticleTrackView<'a>,
    inc_direction: Real3,
    element: ElementView<'a>,
    target: &'a IsotopeRecord,
    cos_thetamin: f64,
    cos_thetamax: f64,
}

impl<'a> CoulombScatteringInteractor<'a> {
    pub fn new(
        shared: &'a WentzelOkviData,
        particle: ParticleTrackView<'a>,
        inc_direction: &Real3,
        material: &MaterialView<'_>,
        element: ElementView<'a>,
        target: &'a IsotopeRecord,
        cutoffs: &CutoffView<'_>,
    ) -> Self {
        debug_assert!(shared.is_valid());
        let cutoff = cutoffs.energy(shared.ids.electron).value();
        let helper = WentzelHelper::new(&particle, material, element.atomic_number(), shared, cutoff);
        // Combined with MSC, only angles beyond the MSC range are sampled here
        let cos_thetamin = if shared.params.is_combined {
            helper.cos_thetamax_nuclear()
        } else {
            1.0
        };
        CoulombScatteringInteractor {
            shared,
            helper,
            particle,
            inc_direction: *inc_direction,
            element,
            target,
            cos_thetamin,
            cos_thetamax: shared.params.costheta_limit,
        }
    }

    /// Kinetic energy transferred to the recoiling nucleus.
    fn calc_recoil_energy(&self, cos_theta: f64) -> f64 {
        let one_minus_cos = 1.0 - cos_theta;
        let inc_energy = self.particle.energy().value();
        let mass = self.particle.mass().value();
        self.particle.momentum_sq().value() * one_minus_cos
            / (self.target.nuclear_mass.value() + (mass + inc_energy) * one_minus_cos)
    }
}

impl<'a> Interactor<'a> for CoulombScatteringInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let inc_energy = self.particle.energy();
        if self.cos_thetamin <= self.cos_thetamax {
            return Interaction::from_unchanged(inc_energy, self.inc_direction);
        }

        let cos_theta = WentzelDistribution::new(
            self.shared,
            &self.helper,
            &self.particle,
            self.target,
            self.element.element_id(),
            self.cos_thetamin,
            self.cos_thetamax,
        )
        .sample(rng);

        let direction = ExitingDirectionSampler::new(cos_theta, &self.inc_direction).sample(rng);
        let recoil = self.calc_recoil_energy(cos_theta);
        let mut result = Interaction::scattered(inc_energy - MevEnergy::new(recoil), direction);
        result.energy_deposition = MevEnergy::new(recoil);
        result
    }
}
