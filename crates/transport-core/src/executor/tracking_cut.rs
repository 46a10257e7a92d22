// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Tracking Cut Executor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use super::TrackExecutor;
use crate::track::CoreTrackView;
use transport_types::units::MevEnergy;
use transport_types::TrackStatus;

/// Deposit the remaining energy of a track and end it.
///
/// A positron's annihilation energy is deposited along with its kinetic
/// energy. Errored tracks keep their status so the host can report them.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrackingCutExecutor;

impl TrackExecutor for TrackingCutExecutor {
    fn execute(&self, track: &mut CoreTrackView<'_>) {
        let status = track.status();
        debug_assert!(matches!(status, TrackStatus::Alive | TrackStatus::Errored));
        let params = track.params();
        let particle = track.particle();

        let mut deposition = particle.energy();
        if params.cutoffs.is_positron(particle.particle_id()) {
            deposition += MevEnergy::new(2.0 * particle.mass().value());
        }
        track.deposit_energy(deposition);
        track.set_energy(MevEnergy::zero());
        if status == TrackStatus::Alive {
            track.sim().set_status(TrackStatus::Killed);
        }
    }
}
