// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Along-Step Executor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Continuous part of a step: multiple scattering, geometric propagation,
//! and mean energy loss.

use super::TrackExecutor;
use crate::geometry::GeoTrackView;
use crate::physics::calc_mean_energy_loss;
use crate::track::{CoreTrackView, ErrorReason};
use transport_math::array::{add, norm, scale};
use transport_physics::em::msc::{
    MscAction, MscStep, MscStepToGeo, UrbanMscHelper, UrbanMscParameters, UrbanMscScatter, UrbanMscStepLimit,
};
use transport_types::constants::C_LIGHT;
use transport_types::units::MevEnergy;
use transport_types::{StepLimit, TrackStatus};

/// Convert a geometric path back to the true path of an MSC step.
///
/// The result lies between the geometric path and the original true path.
pub fn calc_true_path(msc_step: &MscStep, lambda: f64, geom_path: f64) -> f64 {
    debug_assert!(geom_path <= msc_step.geom_path);
    if geom_path < UrbanMscParameters::MIN_STEP_TRANSFORM {
        return geom_path;
    }
    let true_path = if msc_step.alpha == MscStep::SMALL_STEP_ALPHA {
        if geom_path >= lambda {
            msc_step.true_path
        } else {
            -lambda * (-geom_path / lambda).ln_1p()
        }
    } else {
        let w = 1.0 + 1.0 / (msc_step.alpha * lambda);
        let x = msc_step.alpha * w * geom_path;
        if x >= 1.0 {
            msc_step.true_path
        } else {
            (1.0 - (1.0 - x).powf(1.0 / w)) / msc_step.alpha
        }
    };
    true_path.clamp(geom_path, msc_step.true_path)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AlongStepExecutor;

impl TrackExecutor for AlongStepExecutor {
    fn execute(&self, track: &mut CoreTrackView<'_>) {
        debug_assert_eq!(track.status(), TrackStatus::Alive);
        if track.sim().along_step_action().is_none() {
            return;
        }
        let params = track.params();
        let actions = params.actions;
        let particle = track.particle();
        let material = track.material();
        let energy = particle.energy();
        let limit = track.sim().step_limit();
        debug_assert!(limit.is_valid());

        let mut views = track.views();
        if limit.step <= 0.0 {
            views.sim.set_step_length(0.0);
            return;
        }

        let eloss = views.physics.energy_loss(energy);
        let msc = views.physics.msc().filter(|msc| {
            let p = &msc.params;
            eloss.is_some() && energy > p.low_energy_limit && energy < p.high_energy_limit
        });
        let on_boundary = views.geo.is_on_boundary();
        let safety = if on_boundary { 0.0 } else { views.geo.find_safety() };

        // Shorten the true step for MSC and convert it to a straight line
        let mut true_step = limit.step;
        let mut msc_state = None;
        if let (Some(msc), Some(eloss)) = (msc, eloss.as_ref()) {
            let helper = UrbanMscHelper::new(msc, particle, material.material_id(), eloss);
            true_step = true_step.min(helper.range());
            let mut limit_min = 0.0;
            if true_step > UrbanMscParameters::MIN_STEP && safety < true_step {
                let limiter = UrbanMscStepLimit::new(
                    msc,
                    &helper,
                    views.physics.msc_range_mut(),
                    on_boundary,
                    safety,
                    true_step,
                );
                let sampled = limiter.sample(&mut *views.rng);
                limit_min = views.physics.msc_range_mut().limit_min;
                if sampled < true_step {
                    true_step = sampled;
                    views.sim.force_step_limit(StepLimit {
                        step: true_step,
                        action: Some(actions.msc_range),
                    });
                }
            }
            let (geom_path, alpha) = MscStepToGeo::new(&helper).convert(true_step);
            let msc_step = MscStep {
                is_displaced: msc.params.displaced && limit_min > 0.0 && safety > 0.0,
                true_path: true_step,
                geom_path,
                alpha,
                limit_min,
            };
            msc_state = Some((helper.msc_mfp(), msc_step));
        }

        // Move along the straight line, stopping at a boundary
        let geom_step = msc_state.map_or(true_step, |(_, step)| step.geom_path);
        if geom_step > 0.0 {
            let propagation = views.geo.find_next_step(geom_step);
            if propagation.boundary {
                views.geo.move_to_boundary();
                true_step = match msc_state.as_mut() {
                    Some((lambda, step)) => {
                        let true_path = calc_true_path(step, *lambda, propagation.distance);
                        step.geom_path = propagation.distance;
                        step.true_path = true_path;
                        step.is_displaced = false;
                        true_path
                    }
                    None => propagation.distance,
                };
                views.sim.force_step_limit(StepLimit {
                    step: true_step,
                    action: Some(actions.boundary),
                });
            } else {
                views.geo.move_internal(propagation.distance);
            }
        }

        // Deflect and displace
        if let (Some(msc), Some(eloss), Some((_, msc_step))) = (msc, eloss.as_ref(), msc_state) {
            if msc_step.geom_path > 0.0 && !views.geo.failed() {
                let helper = UrbanMscHelper::new(msc, particle, material.material_id(), eloss);
                let inc_direction = views.geo.dir();
                let scatter = UrbanMscScatter::new(msc, &helper, &material, &inc_direction, safety, &msc_step);
                let result = scatter.sample(&mut *views.rng);
                if result.action != MscAction::Unchanged {
                    views.geo.set_dir(result.direction);
                }
                if result.action == MscAction::Displaced {
                    let max_displacement = (1.0 - msc.params.safety_tol) * views.geo.find_safety();
                    let length = norm(&result.displacement);
                    if max_displacement > msc.params.geom_limit && length > 0.0 {
                        let displacement = scale(&result.displacement, length.min(max_displacement) / length);
                        let pos = views.geo.pos();
                        views.geo.move_to_position(add(&pos, &displacement));
                    }
                }
            }
            views.physics.set_msc_step(Some(msc_step));
        } else {
            views.physics.set_msc_step(None);
        }
        views.sim.set_step_length(true_step);

        let speed = particle.speed().value();
        if speed > 0.0 {
            views.sim.add_time(true_step / (speed * C_LIGHT));
        }

        if views.physics.has_interaction_mfp() && views.sim.post_step_action() != Some(actions.discrete) {
            let remaining = views.physics.interaction_mfp() - true_step * views.physics.macro_xs();
            // Keep the sampled distance alive until the interaction happens
            views.physics.set_interaction_mfp(remaining.max(f64::MIN_POSITIVE));
        }

        // Continuous energy loss and the tracking cut
        if let Some(eloss) = eloss.as_ref() {
            let options = &params.physics.options;
            let mut loss = calc_mean_energy_loss(eloss, energy, true_step, options);
            let mut remaining = energy - loss;
            if remaining.value() > 0.0 && remaining.value() < params.config.tracking_cut {
                loss = energy;
                remaining = MevEnergy::zero();
            }
            views.physics.deposit_energy(loss);
            views.particle.energy = remaining;
        }

        if views.particle.energy.value() <= 0.0 {
            views.particle.energy = MevEnergy::zero();
            let action = if params.physics.has_at_rest(particle.particle_id()) {
                actions.at_rest
            } else {
                actions.tracking_cut
            };
            views.sim.force_step_limit(StepLimit {
                step: true_step,
                action: Some(action),
            });
        }

        let failed = views.geo.failed();
        drop(views);
        if failed {
            track.apply_errored(ErrorReason::NavigationFailure);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_true_path_small_alpha() {
        let step = MscStep {
            is_displaced: false,
            true_path: 0.1,
            geom_path: 0.09,
            alpha: MscStep::SMALL_STEP_ALPHA,
            limit_min: 0.0,
        };
        let lambda = 1.0;
        let t = calc_true_path(&step, lambda, 0.05);
        assert!((t + (1.0f64 - 0.05).ln()).abs() < 1e-12);
        assert!((0.05..=0.1).contains(&t));
        assert_eq!(calc_true_path(&step, lambda, 1e-9), 1e-9);
    }

    #[test]
    fn test_true_path_inverts_conversion() {
        let (lambda, alpha, true_path) = (0.5f64, 0.4f64, 0.2f64);
        let w = 1.0 + 1.0 / (alpha * lambda);
        let geom = (1.0 - (1.0 - alpha * true_path).powf(w)) / (alpha * w);
        let step = MscStep {
            is_displaced: false,
            true_path,
            geom_path: geom,
            alpha,
            limit_min: 0.0,
        };
        assert!((calc_true_path(&step, lambda, geom) - true_path).abs() < 1e-10);
        assert!(calc_true_path(&step, lambda, 0.5 * geom) < true_path);
    }
}
