// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Neutron Elastic Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elastic neutron-nucleus scattering.
//!
//! The invariant momentum transfer `Q² = -t` is sampled in the
//! centre-of-mass frame from the diffraction peak `exp(-b Q²)`, truncated
//! at the backscatter limit `4 p*²`. The slope `b = R² / 3` follows the
//! nuclear radius `R = r₀ A^⅓`. The scattered neutron is boosted back to
//! the lab frame and the nuclear recoil energy is deposited locally.

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::array::{from_spherical, make_unit_vector, rotate};
use transport_math::distributions::{generate_canonical, UniformRealDistribution};
use transport_physics::kinematics::FourVector;
use transport_physics::material::IsotopeRecord;
use transport_physics::{Interactor, ParticleParams, ParticleTrackView};
use transport_types::constants::HBAR_C;
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, TransportError, TransportResult};

/// Nuclear radius parameter (cm)
const NUCLEAR_RADIUS_SCALE: f64 = 1.16e-13;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeutronElasticData {
    pub neutron: ParticleId,
    /// MeV
    pub neutron_mass: f64,
}

impl NeutronElasticData {
    pub fn new(particles: &ParticleParams) -> TransportResult<Self> {
        let neutron = particles.require("neutron")?;
        let neutron_mass = particles.get(neutron).mass.value();
        if neutron_mass <= 0.0 {
            return Err(TransportError::invalid("neutron_elastic", "neutron must be massive"));
        }
        Ok(NeutronElasticData { neutron, neutron_mass })
    }

    pub fn is_valid(&self) -> bool {
        self.neutron_mass > 0.0
    }
}

/// Diffraction slope `b` ((MeV/c)⁻²) of a nucleus with `mass_number` nucleons.
pub fn diffraction_slope(mass_number: u32) -> f64 {
    let radius = NUCLEAR_RADIUS_SCALE * f64::from(mass_number).cbrt() / HBAR_C;
    radius * radius / 3.0
}

/// Sample `Q²` from `exp(-b Q²)` on `[0, q_sq_max]`.
#[derive(Debug, Clone, Copy)]
pub struct MomentumTransferSampler {
    slope: f64,
    q_sq_max: f64,
}

impl MomentumTransferSampler {
    pub fn new(slope: f64, q_sq_max: f64) -> Self {
        debug_assert!(slope > 0.0 && q_sq_max >= 0.0);
        MomentumTransferSampler { slope, q_sq_max }
    }
}

impl Distribution<f64> for MomentumTransferSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let tail = (-self.slope * self.q_sq_max).exp_m1();
        let q_sq = -(generate_canonical(rng) * tail).ln_1p() / self.slope;
        q_sq.clamp(0.0, self.q_sq_max)
    }
}

pub struct NeutronElasticInteractor<'a> {
    shared: &'a NeutronElasticData,
    target: &'a IsotopeRecord,
    inc_energy: f64,
    inc_momentum: f64,
    inc_direction: Real3,
}

impl<'a> NeutronElasticInteractor<'a> {
    pub fn new(
        shared: &'a NeutronElasticData,
        particle: &ParticleTrackView<'_>,
        inc_direction: &Real3,
        target: &'a IsotopeRecord,
    ) -> Self {
        debug_assert!(shared.is_valid());
        debug_assert_eq!(particle.particle_id(), shared.neutron);
        debug_assert!(particle.energy().value() > 0.0);
        NeutronElasticInteractor {
            shared,
            target,
            inc_energy: particle.energy().value(),
            inc_momentum: particle.momentum().value(),
            inc_direction: *inc_direction,
        }
    }
}

impl<'a> Interactor<'a> for NeutronElasticInteractor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a> {
        let mass = self.shared.neutron_mass;
        let target_mass = self.target.nuclear_mass.value();
        let total_energy = mass + self.inc_energy;

        // Centre-of-mass momentum p* = p M / √s
        let cm_p = self.inc_momentum
            / (1.0 + (mass / target_mass).powi(2) + 2.0 * total_energy / target_mass).sqrt();
        let cm_p_sq = cm_p * cm_p;
        let slope = diffraction_slope(self.target.mass_number);
        let q_sq = MomentumTransferSampler::new(slope, 4.0 * cm_p_sq).sample(rng);
        let cos_theta = (1.0 - 0.5 * q_sq / cm_p_sq).clamp(-1.0, 1.0);
        let phi = UniformRealDistribution::new(0.0, 2.0 * std::f64::consts::PI).sample(rng);

        // Scatter about +z in the CM frame, then boost along the beam axis
        let mut neutron = FourVector::from_mass_momentum(mass, cm_p, &from_spherical(cos_theta, phi));
        let system = FourVector {
            mom: [0.0, 0.0, self.inc_momentum],
            energy: total_energy + target_mass,
        };
        neutron.boost(&system.boost_vector());

        let direction = rotate(&make_unit_vector(&neutron.mom), &self.inc_direction);
        let energy = (neutron.energy - mass).clamp(0.0, self.inc_energy);
        let mut result = Interaction::scattered(MevEnergy::new(energy), direction);
        // Recoil ions are not tracked
        result.energy_deposition = MevEnergy::new(self.inc_energy - energy);
        result
    }
}
