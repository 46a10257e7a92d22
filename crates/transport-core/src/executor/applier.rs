// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Interaction Applier
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::geometry::GeoTrackView;
use crate::track::CoreTrackView;
use transport_types::units::MevEnergy;
use transport_types::{Action, Interaction, TrackStatus};

/// Apply the outcome of a discrete or at-rest interaction to a track.
///
/// A failed interaction leaves the track untouched; for a discrete
/// process it marks the process for a zero-length retry on the next step.
#[derive(Debug, Clone, Copy)]
pub struct InteractionApplier {
    /// Process to retry when secondary allocation fails
    process: Option<usize>,
}

impl InteractionApplier {
    pub fn new(process: Option<usize>) -> Self {
        InteractionApplier { process }
    }

    pub fn apply(&self, track: &mut CoreTrackView<'_>, result: &Interaction<'_>) {
        match result.action {
            Action::Failed => {
                if let Some(process) = self.process {
                    track.physics().set_retry_process(Some(process));
                }
                return;
            }
            Action::Unchanged => {
                track.physics().set_retry_process(None);
                return;
            }
            Action::Scattered | Action::Absorbed => {}
        }

        let params = track.params();
        let material = track.material_id().unwrap_or_default();
        let cutoffs = params.cutoffs.get(material);
        let mut views = track.views();
        views.physics.set_retry_process(None);
        views.sim.increment_num_interactions();

        if result.action == Action::Absorbed {
            views.particle.energy = MevEnergy::zero();
            views.sim.set_status(TrackStatus::Killed);
        } else {
            views.particle.energy = result.energy;
            views.geo.set_dir(result.direction);
        }

        let mut deposition = result.energy_deposition;
        for secondary in result.secondaries {
            let Some(pid) = secondary.particle_id else {
                continue;
            };
            if cutoffs.apply(pid, secondary.energy) {
                deposition += secondary.energy;
                if cutoffs.is_positron(pid) {
                    deposition += MevEnergy::new(2.0 * params.particles.get(pid).mass.value());
                }
            } else {
                views.secondaries.push(*secondary);
            }
        }
        views.physics.deposit_energy(deposition);
    }
}
