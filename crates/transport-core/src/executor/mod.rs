// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Executors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-slot kernels run for every track in a step, and the dispatch that
//! chains them: pre-step, along-step, then the selected post-step action.

mod along_step;
mod applier;
mod boundary;
mod discrete;
mod pre_step;
mod tracking_cut;

pub use along_step::{calc_true_path, AlongStepExecutor};
pub use applier::InteractionApplier;
pub use boundary::BoundaryExecutor;
pub use discrete::{sample_model, AtRestExecutor, DiscreteExecutor};
pub use pre_step::PreStepExecutor;
pub use tracking_cut::TrackingCutExecutor;

use crate::track::CoreTrackView;
use transport_types::TrackStatus;

/// Kernel applied to a single track slot.
pub trait TrackExecutor {
    fn execute(&self, track: &mut CoreTrackView<'_>);
}

/// Run the post-step action chosen for this step.
///
/// A track that errors during its post-step action is cut in the same
/// step so its energy is still deposited.
pub fn execute_post_step(track: &mut CoreTrackView<'_>) {
    let Some(action) = track.sim().post_step_action() else {
        return;
    };
    let actions = track.params().actions;
    match track.status() {
        TrackStatus::Alive => {}
        TrackStatus::Errored => {
            if action == actions.tracking_cut {
                TrackingCutExecutor.execute(track);
            }
            return;
        }
        _ => return,
    }

    if action == actions.boundary {
        BoundaryExecutor.execute(track);
    } else if action == actions.discrete {
        DiscreteExecutor.execute(track);
    } else if action == actions.at_rest {
        AtRestExecutor.execute(track);
    } else if action == actions.tracking_cut {
        TrackingCutExecutor.execute(track);
    }

    if track.status() == TrackStatus::Errored {
        TrackingCutExecutor.execute(track);
    }
}

/// Advance one track slot by a full step.
pub fn execute_step(track: &mut CoreTrackView<'_>) {
    match track.status() {
        TrackStatus::Alive => {
            PreStepExecutor.execute(track);
            if track.status() == TrackStatus::Alive {
                AlongStepExecutor.execute(track);
            }
            execute_post_step(track);
        }
        TrackStatus::Errored => execute_post_step(track),
        _ => {}
    }
}
