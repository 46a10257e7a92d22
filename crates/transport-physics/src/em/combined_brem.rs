// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Combined Bremsstrahlung
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Single bremsstrahlung model over the full energy range: Seltzer-Berger
//! tables below 1 GeV, the relativistic model above.

use crate::cutoff::CutoffView;
use crate::em::brem::{BremFinalStateHelper, SELTZER_BERGER_UPPER_LIMIT};
use crate::em::rel_brem::{RBEnergySampler, RelBremData};
use crate::em::seltzer_berger::{SBEnergySampler, SeltzerBergerData};
use crate::interactor::Interactor;
use crate::kinematics::TsaiUrbanDistribution;
use crate::material::MaterialView;
use crate::particle::ParticleTrackView;
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_types::ids::ElementComponentId;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportError, TransportResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedBremData {
    pub sb: SeltzerBergerData,
    pub rb: RelBremData,
}

impl CombinedBremData {
    pub fn new(sb: SeltzerBergerData, rb: RelBremData) -> TransportResult<Self> {
        if sb.ids != rb.ids {
            return Err(TransportError::invalid(
                "combined_brem",
                "Seltzer-Berger and relativistic data disagree on particle ids",
            ));
        }
        Ok(CombinedBremData { sb, rb })
    }

    pub fn is_valid(&self) -> bool {
        self.sb.is_valid() && self.rb.is_valid()
    }
}

pub struct CombinedBremInteractor<'a> {
    shared: &'a CombinedBremData,
    particle: ParticleTrackView<'a>,
    inc_direction: Real3,
    gamma_cutoff: f64,
    material: MaterialView<'a>,
    elcomp: ElementComponentId,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> CombinedBremInteractor<'a> {
    pub fn new(
        shared: &'a CombinedBremData,
        particle: ParticleTrackView<'a>,
        inc_direction: &Real3,
        cutoffs: &CutoffView<'_>,
        allocate: &'a StackAllocator<Secondary>,
        material: MaterialView<'a>,
        elcomp: ElementComponentId,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert!(shared.rb.ids.applies_to(particle.particle_id()));
        let gamma_cutoff = cutoffs.energy(shared.rb.ids.gamma).value();
        debug_assert!(gamma_cutoff > 0.0 && particle.energy().value() > gamma_cutoff);
        CombinedBremInteractor {
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

impl<'a> Interactor<'a> for CombinedBremInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(photon) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };

        let inc_energy = self.particle.energy().value();
        let gamma_energy = if inc_energy >= SELTZER_BERGER_UPPER_LIMIT {
            RBEnergySampler::new(&self.shared.rb, &self.particle, self.gamma_cutoff, self.material, self.elcomp)
                .sample(rng)
        } else {
            let element = self.material.element_record(self.elcomp);
            let table = &self.shared.sb.tables[element.element_id().get()];
            let is_electron = self.particle.particle_id() == self.shared.rb.ids.electron;
            SBEnergySampler::new(table, &self.particle, self.gamma_cutoff, &self.material, &element, is_electron)
                .sample(rng)
        };

        let costheta = TsaiUrbanDistribution::new(inc_energy, self.particle.mass().value()).sample(rng);
        BremFinalStateHelper {
            inc_energy,
            inc_direction: self.inc_direction,
            inc_momentum: self.particle.momentum().value(),
            gamma: self.shared.rb.ids.gamma,
            gamma_energy,
            costheta,
            secondary: photon,
        }
        .sample(rng)
    }
}
