// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Urban MSC Step Limit
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Safety-based limit on the true path length of a charged track.

use super::{EnergyLossTables, MscRange, UrbanMscData, UrbanMscHelper, UrbanMscParameters};
use rand::distributions::Distribution;
use rand::Rng;
use transport_math::distributions::NormalDistribution;
use transport_math::poly::poly_eval;

/// Particles heavier than this (MeV) keep the range as the initial limit
const HEAVY_MASS: f64 = 1.0;
/// Minimum range (cm) for the "safety plus" extra limit
const MIN_RANGE: f64 = 1e-3;
const MAX_STEP_OVER_RANGE: f64 = 0.35;

pub struct UrbanMscStepLimit {
    max_step: f64,
    limit_min: f64,
    limit: f64,
}

impl UrbanMscStepLimit {
    /// Update the persistent `msc_range` if needed and prepare the limit.
    ///
    /// `phys_step` is the step already limited by discrete interactions
    /// and energy loss.
    pub fn new<L: EnergyLossTables>(
        shared: &UrbanMscData,
        helper: &UrbanMscHelper<'_, L>,
        msc_range: &mut MscRange,
        on_boundary: bool,
        safety: f64,
        phys_step: f64,
    ) -> Self {
        let params = &shared.params;
        let range = helper.range();
        debug_assert!(safety >= 0.0);
        debug_assert!(phys_step > UrbanMscParameters::MIN_STEP && phys_step <= range);

        if !msc_range.is_set() || on_boundary {
            let mut new_range = MscRange {
                range_init: range,
                range_factor: params.range_factor,
                limit_min: 0.0,
            };
            if helper.particle().mass().value() < HEAVY_MASS {
                let mfp = helper.msc_mfp();
                if !params.safety_plus && mfp > range {
                    new_range.range_init = mfp;
                }
                if mfp > params.lambda_limit {
                    let c = if params.safety_plus { 0.84 } else { 0.75 };
                    new_range.range_factor *= c + (1.0 - c) * mfp / params.lambda_limit;
                }
            }
            new_range.limit_min = calc_limit_min(shared, helper);
            *msc_range = new_range;
        }

        let limit_min = msc_range.limit_min;
        let mut limit = range;
        if safety < range {
            limit = (msc_range.range_factor * msc_range.range_init).max(params.safety_factor * safety);
        }
        limit = limit.max(limit_min);

        let mut max_step = phys_step;
        if params.safety_plus && range > MIN_RANGE {
            let limit_step = MAX_STEP_OVER_RANGE * range
                + MIN_RANGE * (1.0 - MAX_STEP_OVER_RANGE) * (2.0 - MIN_RANGE / range);
            max_step = max_step.min(limit_step);
        }

        UrbanMscStepLimit {
            max_step,
            limit_min,
            limit,
        }
    }

    /// Sample the true step length, smeared around the limit.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max_step <= self.limit {
            return self.max_step;
        }
        if self.limit == self.limit_min {
            return self.limit_min;
        }
        let sampled = NormalDistribution::new(self.limit, 0.1 * (self.limit - self.limit_min)).sample(rng);
        sampled.clamp(self.limit_min, self.max_step)
    }
}

/// Minimum step from the material fit, scaled down at low energy.
fn calc_limit_min<L: EnergyLossTables>(shared: &UrbanMscData, helper: &UrbanMscHelper<'_, L>) -> f64 {
    let msc = &shared.material_data[helper.material_id().get()];
    let energy = helper.particle().energy().value();
    let min_mfp = poly_eval(&[2.0, msc.stepmin_coeff[0], msc.stepmin_coeff[1]], energy);
    let mut xm = helper.msc_mfp() / min_mfp * helper.scaled_zeff();
    if energy < UrbanMscParameters::MIN_SCALING_ENERGY {
        xm *= 0.5 + 0.5 * energy / UrbanMscParameters::MIN_SCALING_ENERGY;
    }
    xm.max(UrbanMscParameters::MIN_STEP)
}
