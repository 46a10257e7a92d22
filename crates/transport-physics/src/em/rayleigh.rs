// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Livermore Rayleigh Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Coherent photon scattering off bound atomic electrons.
//!
//! The squared atomic form factor is fitted per element by three terms
//! `aᵢ / (1 + bᵢ q²)^nᵢ` in the momentum transfer `q`. Sampling picks a
//! term by its integrated weight, inverts that term's cumulative
//! distribution in `x = bᵢ q²`, and accepts the angle with the Thomson
//! factor `(1 + cos² θ) / 2`. The photon energy is unchanged.

use crate::interactor::Interactor;
use crate::kinematics::ExitingDirectionSampler;
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::distributions::generate_canonical;
use transport_math::Selector;
use transport_types::constants::H_PLANCK_C;
use transport_types::ids::{ElementId, ParticleId};
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, TransportError, TransportResult};

/// Below this argument the power laws are replaced by their series
const FIT_SLICE: f64 = 0.02;

/// Form factor fit coefficients of one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayleighElementParams {
    /// Relative amplitudes
    pub a: [f64; 3],
    /// Momentum-transfer scales (cm²)
    pub b: [f64; 3],
    /// Power-law exponents
    pub n: [f64; 3],
}

impl RayleighElementParams {
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self.a[i] >= 0.0 && self.b[i] > 0.0 && self.n[i] > 0.0) && self.a.iter().sum::<f64>() > 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RayleighData {
    pub gamma: ParticleId,
    /// Indexed by element
    pub params: Vec<RayleighElementParams>,
}

impl RayleighData {
    pub fn new(particles: &ParticleParams, params: Vec<RayleighElementParams>) -> TransportResult<Self> {
        if let Some(i) = params.iter().position(|p| !p.is_valid()) {
            return Err(TransportError::invalid(
                "rayleigh",
                format!("element {i} needs positive scales and exponents"),
            ));
        }
        Ok(RayleighData {
            gamma: particles.require("gamma")?,
            params,
        })
    }

    pub fn is_valid(&self) -> bool {
        !self.params.is_empty()
    }
}

pub struct RayleighInteractor<'a> {
    params: &'a RayleighElementParams,
    inc_energy: MevEnergy,
    inc_direction: Real3,
}

impl<'a> RayleighInteractor<'a> {
    pub fn new(
        shared: &'a RayleighData,
        particle: &ParticleTrackView<'_>,
        inc_direction: &Real3,
        element: ElementId,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert_eq!(particle.particle_id(), shared.gamma);
        RayleighInteractor {
            params: &shared.params[element.get()],
            inc_energy: particle.energy(),
            inc_direction: *inc_direction,
        }
    }
}

/// `1 - (1 + x)^-n`, the unnormalized CDF of one fit term.
fn term_weight(x: f64, n: f64) -> f64 {
    if x > FIT_SLICE {
        1.0 - (1.0 + x).powf(-n)
    } else {
        n * x * (1.0 - 0.5 * (n + 1.0) * x * (1.0 - (n + 2.0) * x / 3.0))
    }
}

/// Inverse of [`term_weight`]: the `x` at which the CDF reaches `y`.
fn invert_term_weight(y: f64, n: f64) -> f64 {
    let ninv = 1.0 / n;
    if y < FIT_SLICE {
        y * ninv * (1.0 + 0.5 * (ninv + 1.0) * y * (1.0 + (ninv + 2.0) * y / 3.0))
    } else {
        (1.0 - y).powf(-ninv) - 1.0
    }
}

impl<'a> Interactor<'a> for RayleighInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let p = self.params;
        // Squared wave number (1/cm²); q² ranges over [0, 2k²(1 - cos θ)]
        let k_sq = (self.inc_energy.value() / H_PLANCK_C).powi(2);
        let weight: [f64; 3] = std::array::from_fn(|i| term_weight(2.0 * k_sq * p.b[i], p.n[i]));
        let prob: [f64; 3] = std::array::from_fn(|i| weight[i] * p.a[i] / (p.b[i] * p.n[i]));
        let select_term = Selector::with_total(|i| prob[i], 3);

        let costheta = loop {
            let i = select_term.sample(rng);
            let x = invert_term_weight(weight[i] * generate_canonical(rng), p.n[i]);
            let cost = 1.0 - x / (p.b[i] * k_sq);
            let accept = 2.0 * generate_canonical(rng) <= 1.0 + cost * cost;
            if accept && cost >= -1.0 {
                break cost.min(1.0);
            }
        };

        let direction = ExitingDirectionSampler::new(costheta, &self.inc_direction).sample(rng);
        Interaction::scattered(self.inc_energy, direction)
    }
}
