// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Pre-Step Executor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use super::TrackExecutor;
use crate::action::CoreActions;
use crate::physics::calc_physics_step_limit;
use crate::track::{CoreTrackView, ErrorReason};
use transport_types::{StepLimit, TrackStatus};

/// Count the step and choose the physics step limit.
///
/// Stopped particles get a zero-length step routed to their at-rest
/// process, or to the tracking cut if they have none.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreStepExecutor;

impl TrackExecutor for PreStepExecutor {
    fn execute(&self, track: &mut CoreTrackView<'_>) {
        if track.status() != TrackStatus::Alive {
            return;
        }
        let params = track.params();
        let actions: CoreActions = params.actions;

        let num_steps = {
            let mut sim = track.sim();
            sim.increment_num_steps();
            sim.num_steps()
        };
        if num_steps > params.config.max_steps {
            track.apply_errored(ErrorReason::StepLimitExceeded);
            return;
        }

        let particle = track.particle();
        if particle.is_stopped() {
            let action = if params.physics.has_at_rest(particle.particle_id()) {
                actions.at_rest
            } else {
                actions.tracking_cut
            };
            let mut sim = track.sim();
            sim.reset_step_limit(StepLimit {
                step: 0.0,
                action: Some(action),
            });
            sim.set_along_step_action(None);
            return;
        }

        let mut views = track.views();
        let limit = calc_physics_step_limit(particle.energy(), &mut views.physics, &actions, &mut *views.rng);
        views.sim.reset_step_limit(limit);
        views.sim.set_along_step_action(Some(actions.along_step));
    }
}
