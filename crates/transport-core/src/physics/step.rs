// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Physics Step Utilities
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Helpers for the physics part of a step: the step limit, continuous
//! energy loss and discrete process selection.

use super::{PhysicsOptions, PhysicsTrackView};
use crate::action::CoreActions;
use rand::distributions::Distribution;
use rand::Rng;
use transport_math::distributions::ExponentialDistribution;
use transport_math::Selector;
use transport_physics::em::msc::EnergyLossTables;
use transport_types::units::MevEnergy;
use transport_types::StepLimit;

/// Step taken when nothing limits the track (cm).
pub const PROPAGATION_LIMIT: f64 = 1e10;

/// Largest step allowed by continuous energy loss.
///
/// Ranges below `min_range` may be consumed in one step; above it the
/// step approaches `max_step_over_range` of the range smoothly.
pub fn range_to_step(range: f64, options: &PhysicsOptions) -> f64 {
    debug_assert!(range >= 0.0);
    let rho = options.min_range;
    if range < rho {
        return range;
    }
    let alpha = options.max_step_over_range;
    alpha * range + rho * (1.0 - alpha) * (2.0 - rho / range)
}

/// Sample the distance to the next discrete interaction if needed and
/// combine it with the energy loss limit.
pub fn calc_physics_step_limit<R: Rng + ?Sized>(
    energy: MevEnergy,
    physics: &mut PhysicsTrackView<'_>,
    actions: &CoreActions,
    rng: &mut R,
) -> StepLimit {
    if physics.retry_process().is_some() {
        return StepLimit {
            step: 0.0,
            action: Some(actions.discrete),
        };
    }

    let total_xs = physics.update_macro_xs(energy);
    let mut limit = StepLimit {
        step: PROPAGATION_LIMIT,
        action: Some(actions.propagation_limit),
    };
    if total_xs > 0.0 {
        if !physics.has_interaction_mfp() {
            physics.set_interaction_mfp(ExponentialDistribution::new(1.0).sample(rng));
        }
        let step = physics.interaction_mfp() / total_xs;
        if step < limit.step {
            limit = StepLimit {
                step,
                action: Some(actions.discrete),
            };
        }
    }

    if let Some(eloss) = physics.energy_loss(energy) {
        let step = range_to_step(eloss.range(), &physics.params().options);
        if step < limit.step {
            limit = StepLimit {
                step,
                action: Some(actions.eloss_range),
            };
        }
    }
    limit
}

/// Mean energy lost over a step, capped at the kinetic energy.
pub fn calc_mean_energy_loss<L: EnergyLossTables>(
    eloss: &L,
    energy: MevEnergy,
    step: f64,
    options: &PhysicsOptions,
) -> MevEnergy {
    debug_assert!(step >= 0.0);
    let range = eloss.range();
    if step >= range {
        return energy;
    }
    let loss = if step < options.linear_loss_limit * range {
        MevEnergy::new(step * eloss.energy_loss(energy))
    } else {
        energy - eloss.inverse_range(range - step)
    };
    MevEnergy::new(loss.value().clamp(0.0, energy.value()))
}

/// Pick the process that interacts, weighted by cross section.
///
/// Returns the global process index.
pub fn select_discrete_process<R: Rng + ?Sized>(physics: &PhysicsTrackView<'_>, rng: &mut R) -> usize {
    let processes = physics.processes();
    debug_assert!(physics.macro_xs() > 0.0);
    let select = Selector::new(|i| physics.per_process_xs(i), processes.len(), physics.macro_xs());
    processes[select.sample(rng)]
}
