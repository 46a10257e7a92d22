// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Livermore Photoelectric Effect
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Photoelectric absorption with subshell selection.
//!
//! Below an element's `thresh_lo` the subshell cross sections are
//! tabulated as σ·E³; above it they come from cumulative fits
//! `σ(E) = a₁/E + a₂/E² + ... + a₆/E⁶`, one coefficient set below
//! `thresh_hi` and one above. The photoelectron leaves with the photon
//! energy minus the shell binding energy, in a direction sampled from the
//! Sauter-Gavrila distribution. Without atomic relaxation the binding
//! energy is deposited locally.

use crate::interactor::Interactor;
use crate::kinematics::ExitingDirectionSampler;
use crate::particle::{ParticleParams, ParticleTrackView};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::distributions::generate_canonical;
use transport_math::poly::poly_eval;
use transport_math::NonuniformGridCalculator;
use transport_types::ids::{ElementId, ParticleId};
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, Secondary, StackAllocator, TransportError, TransportResult};

/// Below this photon energy (MeV) the angular distribution is evaluated at it
const MIN_ANGULAR_ENERGY: f64 = 1e-6;
/// Above this photon energy (MeV) the electron follows the photon
const MAX_ANGULAR_ENERGY: f64 = 100.0;

/// One electron subshell of an element.
///
/// Binding energies are not ordered across shells but never exceed the
/// element's `thresh_lo`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivermoreSubshell {
    /// MeV
    pub binding_energy: f64,
    /// Energy grid (MeV) of the tabulated cross section
    pub energy: Vec<f64>,
    /// Tabulated σ·E³ (barn MeV³)
    pub xs: Vec<f64>,
    /// Cumulative fit coefficients (barn) below and above `thresh_hi`
    pub param: [[f64; 6]; 2],
}

impl LivermoreSubshell {
    pub fn is_valid(&self) -> bool {
        self.binding_energy > 0.0
            && self.energy.len() >= 2
            && self.energy.len() == self.xs.len()
            && self.energy.windows(2).all(|w| w[0] < w[1])
            && self.xs.iter().all(|&v| v >= 0.0)
    }

    fn tabulated_xs(&self, energy: f64) -> f64 {
        NonuniformGridCalculator::from_slices(&self.energy, &self.xs).evaluate(energy)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LivermoreElement {
    /// Tabulated subshell cross sections below this energy (MeV)
    pub thresh_lo: f64,
    /// Upper fit coefficients at and above this energy (MeV)
    pub thresh_hi: f64,
    pub shells: Vec<LivermoreSubshell>,
}

impl LivermoreElement {
    pub fn is_valid(&self) -> bool {
        !self.shells.is_empty()
            && self.thresh_lo > 0.0
            && self.thresh_lo <= self.thresh_hi
            && self
                .shells
                .iter()
                .all(|s| s.is_valid() && s.binding_energy <= self.thresh_lo)
    }

    /// Partial cross section (barn) of each shell, zero for closed shells.
    fn tabulated_shell_xs(&self, energy: f64) -> impl Iterator<Item = f64> + '_ {
        let inv_cube = 1.0 / (energy * energy * energy);
        self.shells.iter().map(move |s| {
            if energy < s.binding_energy {
                0.0
            } else {
                s.tabulated_xs(energy) * inv_cube
            }
        })
    }

    /// Cumulative fitted cross section (barn) through shell `index`.
    fn fitted_cumulative_xs(&self, index: usize, energy: f64) -> f64 {
        let pidx = usize::from(energy >= self.thresh_hi);
        let inv_energy = 1.0 / energy;
        inv_energy * poly_eval(&self.shells[index].param[pidx], inv_energy)
    }

    /// Total photoelectric cross section (barn) at `energy` (MeV).
    pub fn micro_xs(&self, energy: f64) -> f64 {
        if energy < self.thresh_lo {
            self.tabulated_shell_xs(energy).sum()
        } else {
            self.fitted_cumulative_xs(self.shells.len() - 1, energy).max(0.0)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivermorePEData {
    pub gamma: ParticleId,
    pub electron: ParticleId,
    pub inv_electron_mass: f64,
    /// Indexed by element
    pub elements: Vec<LivermoreElement>,
}

impl LivermorePEData {
    pub fn new(particles: &ParticleParams, elements: Vec<LivermoreElement>) -> TransportResult<Self> {
        if let Some(i) = elements.iter().position(|el| !el.is_valid()) {
            return Err(TransportError::invalid(
                "livermore_pe",
                format!("element {i} has inconsistent thresholds or subshell tables"),
            ));
        }
        let electron = particles.require("e-")?;
        Ok(LivermorePEData {
            gamma: particles.require("gamma")?,
            electron,
            inv_electron_mass: 1.0 / particles.get(electron).mass.value(),
            elements,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.inv_electron_mass > 0.0 && !self.elements.is_empty() && self.gamma != self.electron
    }

    pub fn element(&self, id: ElementId) -> &LivermoreElement {
        &self.elements[id.get()]
    }
}

pub struct LivermorePEInteractor<'a> {
    shared: &'a LivermorePEData,
    element: &'a LivermoreElement,
    inc_energy: f64,
    inc_direction: Real3,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> LivermorePEInteractor<'a> {
    pub fn new(
        shared: &'a LivermorePEData,
        particle: &ParticleTrackView<'_>,
        inc_direction: &Real3,
        allocate: &'a StackAllocator<Secondary>,
        element: ElementId,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert_eq!(particle.particle_id(), shared.gamma);
        debug_assert!(particle.energy().value() > 0.0);
        LivermorePEInteractor {
            shared,
            element: shared.element(element),
            inc_energy: particle.energy().value(),
            inc_direction: *inc_direction,
            allocate,
        }
    }

    /// Index of the ionized shell, or `None` if every shell is closed.
    fn sample_subshell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let el = self.element;
        let energy = self.inc_energy;
        let cutoff = generate_canonical(rng) * el.micro_xs(energy);
        if energy < el.thresh_lo {
            let mut xs = 0.0;
            let mut last_open = None;
            for (i, shell_xs) in el.tabulated_shell_xs(energy).enumerate() {
                if shell_xs <= 0.0 {
                    continue;
                }
                xs += shell_xs;
                last_open = Some(i);
                if xs > cutoff {
                    return Some(i);
                }
            }
            // Round-off at the end of the walk
            last_open
        } else {
            let last = el.shells.len() - 1;
            let shell = (0..last)
                .find(|&i| el.fitted_cumulative_xs(i, energy) > cutoff)
                .unwrap_or(last);
            Some(shell)
        }
    }

    /// Sample the photoelectron direction (Penelope 2014, eqs. 2.8-2.11).
    fn sample_direction<R: Rng + ?Sized>(&self, rng: &mut R) -> Real3 {
        if self.inc_energy > MAX_ANGULAR_ENERGY {
            return self.inc_direction;
        }
        let tau = self.inc_energy.max(MIN_ANGULAR_ENERGY) * self.shared.inv_electron_mass;
        let gamma = tau + 1.0;
        let beta = (tau * (gamma + 1.0)).sqrt() / gamma;
        let a = (1.0 - beta) / beta;
        let b = 0.5 * beta * gamma * tau * (gamma - 2.0);
        let g_max = 2.0 * (1.0 / a + b);

        // Sample ν = 1 - cos θ
        let nu = loop {
            let u = generate_canonical(rng);
            let nu = 2.0 * a * (2.0 * u + (a + 2.0) * u.sqrt()) / ((a + 2.0) * (a + 2.0) - 4.0 * u);
            let g = (2.0 - nu) * (1.0 / (a + nu) + b);
            if g >= g_max * generate_canonical(rng) {
                break nu;
            }
        };
        ExitingDirectionSampler::new((1.0 - nu).clamp(-1.0, 1.0), &self.inc_direction).sample(rng)
    }
}

impl<'a> Interactor<'a> for LivermorePEInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let Some(electron) = self.allocate.allocate(1) else {
            return Interaction::failed();
        };

        let mut result = Interaction::from_absorption();
        let Some(shell) = self.sample_subshell(rng) else {
            result.energy_deposition = MevEnergy::new(self.inc_energy);
            return result;
        };

        let binding_energy = self.element.shells[shell].binding_energy;
        let electron_energy = self.inc_energy - binding_energy;
        if electron_energy <= 0.0 {
            result.energy_deposition = MevEnergy::new(self.inc_energy);
            return result;
        }
        electron[0] = Secondary::new(
            self.shared.electron,
            MevEnergy::new(electron_energy),
            self.sample_direction(rng),
        );
        result.secondaries = electron;
        result.energy_deposition = MevEnergy::new(binding_energy);
        result
    }
}
