// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Boundary Executor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use super::TrackExecutor;
use crate::geometry::GeoTrackView;
use crate::track::{CoreTrackView, ErrorReason};
use transport_types::TrackStatus;

/// Move a track that stopped on a volume boundary into the next volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryExecutor;

impl TrackExecutor for BoundaryExecutor {
    fn execute(&self, track: &mut CoreTrackView<'_>) {
        debug_assert_eq!(track.status(), TrackStatus::Alive);
        debug_assert!(track.geometry().is_on_boundary());
        debug_assert_eq!(track.sim().post_step_action(), Some(track.boundary_action()));

        let (failed, outside) = {
            let mut geo = track.geometry();
            geo.cross_boundary();
            (geo.failed(), geo.is_outside())
        };
        if failed {
            track.apply_errored(ErrorReason::NavigationFailure);
            return;
        }
        if outside {
            track.sim().set_status(TrackStatus::Killed);
            return;
        }

        let volume = track.geometry().volume_id();
        match track.params().volume_materials.material_id_for(volume) {
            Some(material) => track.set_material(material),
            None => {
                track.apply_errored(ErrorReason::UnmappedMaterial(volume));
                return;
            }
        }
        debug_assert!(track.geometry().is_on_boundary());
    }
}
