// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Cherenkov Emission
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cherenkov photon yield, offload and generation.
//!
//! The Frank-Tamm yield per unit length for a particle of charge `z` and
//! speed `β` is
//!
//! ```text
//! dN/dx = (α z² / ħc) ∫ (1 - 1 / (n(E)² β²)) dE
//! ```
//!
//! over the photon energies where `n β > 1`. The integral of `1/n²` is
//! tabulated once per material.

use crate::generator::{GeneratorDistribution, GeneratorKind, OffloadPreStep, OpticalPhoton, StepPoint};
use crate::material::{OpticalMaterialParams, OpticalMaterialView};
use rand::distributions::Distribution;
use rand::Rng;
use std::f64::consts::PI;
use tracing::debug;
use transport_math::array::{axpy, from_spherical, make_unit_vector, rotate, sub};
use transport_math::distributions::{generate_canonical, PoissonDistribution, RejectionSampler, UniformRealDistribution};
use transport_math::{GridBuilder, GridRecord, NonuniformGridCalculator, RealPool};
use transport_physics::ParticleTrackView;
use transport_types::constants::{ALPHA_FINE_STRUCTURE, HBAR_C};
use transport_types::ids::OpticalMaterialId;
use transport_types::units::{ElementaryCharge, LightSpeed, MevEnergy};
use transport_types::{Real3, TransportResult};

/// Cumulative `∫ dE / n(E)²` per optical material.
#[derive(Debug, Clone)]
pub struct CherenkovParams {
    reals: RealPool,
    angle_integral: Vec<GridRecord>,
}

impl CherenkovParams {
    pub fn new(materials: &OpticalMaterialParams) -> TransportResult<Self> {
        let mut reals = RealPool::new();
        let mut angle_integral = Vec::with_capacity(materials.num_materials());
        for i in 0..materials.num_materials() {
            let material = materials.get(OpticalMaterialId::new(i));
            let energy = material.energy_grid();
            let rindex = material.refractive_index_grid();
            let mut integral = vec![0.0; energy.len()];
            for j in 1..energy.len() {
                let mean_inv_sq = 0.5 * (1.0 / (rindex[j - 1] * rindex[j - 1]) + 1.0 / (rindex[j] * rindex[j]));
                integral[j] = integral[j - 1] + (energy[j] - energy[j - 1]) * mean_inv_sq;
            }
            angle_integral.push(GridBuilder::new(&mut reals).linear(energy, &integral)?);
        }
        debug!(num_materials = angle_integral.len(), "built Cherenkov angle integrals");
        Ok(CherenkovParams { reals, angle_integral })
    }

    pub fn is_valid(&self) -> bool {
        !self.angle_integral.is_empty()
    }
}

/// Mean number of Cherenkov photons per unit length (1/cm).
#[derive(Debug, Clone, Copy)]
pub struct CherenkovDndxCalculator<'a> {
    material: OpticalMaterialView<'a>,
    angle_integral: NonuniformGridCalculator<'a>,
    zsq: f64,
}

impl<'a> CherenkovDndxCalculator<'a> {
    pub fn new(material: OpticalMaterialView<'a>, params: &'a CherenkovParams, charge: ElementaryCharge) -> Self {
        let integral = &params.angle_integral[material.material_id().get()];
        CherenkovDndxCalculator {
            material,
            angle_integral: NonuniformGridCalculator::new(integral, &params.reals),
            zsq: charge.value() * charge.value(),
        }
    }

    pub fn calc(&self, beta: LightSpeed) -> f64 {
        let beta = beta.value();
        debug_assert!(beta > 0.0 && beta <= 1.0, "beta = {beta}");
        let inv_beta = 1.0 / beta;
        if inv_beta >= self.material.max_refractive_index() {
            return 0.0;
        }

        let energy_max = self.material.max_energy();
        let integral_max = self.angle_integral.get(self.angle_integral.len() - 1);
        let energy_min = self.material.energy_at_index(inv_beta);
        let integral_min = self.angle_integral.evaluate(energy_min);

        let result = ALPHA_FINE_STRUCTURE / HBAR_C
            * self.zsq
            * ((energy_max - energy_min) - (integral_max - integral_min) * inv_beta * inv_beta);
        result.max(0.0)
    }
}

/// Sample the number of Cherenkov photons emitted during one step.
#[derive(Debug, Clone, Copy)]
pub struct CherenkovOffload<'a> {
    charge: ElementaryCharge,
    step_length: f64,
    pre_step: &'a OffloadPreStep,
    post_step: StepPoint,
    num_photons_per_len: f64,
}

impl<'a> CherenkovOffload<'a> {
    /// Construct with the charge, step length and both step points.
    ///
    /// The yield uses the mean of the pre- and post-step speeds.
    pub fn new(
        charge: ElementaryCharge,
        step_length: f64,
        pre_step: &'a OffloadPreStep,
        post_step: StepPoint,
        material: OpticalMaterialView<'_>,
        params: &CherenkovParams,
    ) -> Self {
        debug_assert!(charge.value() != 0.0);
        debug_assert!(step_length > 0.0);
        let beta = LightSpeed::new(0.5 * (pre_step.point.speed.value() + post_step.speed.value()));
        let num_photons_per_len = CherenkovDndxCalculator::new(material, params, charge).calc(beta);
        CherenkovOffload {
            charge,
            step_length,
            pre_step,
            post_step,
            num_photons_per_len,
        }
    }

    /// Construct from the post-step particle state.
    pub fn from_particle(
        particle: &ParticleTrackView<'_>,
        step_length: f64,
        pre_step: &'a OffloadPreStep,
        post_pos: Real3,
        post_time: f64,
        material: OpticalMaterialView<'_>,
        params: &CherenkovParams,
    ) -> Self {
        let post_step = StepPoint {
            speed: particle.speed(),
            pos: post_pos,
            time: post_time,
        };
        Self::new(particle.charge(), step_length, pre_step, post_step, material, params)
    }

    pub fn num_photons_per_len(&self) -> f64 {
        self.num_photons_per_len
    }

    /// Distribution of the step's photons, or `None` if none are emitted.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<GeneratorDistribution> {
        if self.num_photons_per_len == 0.0 {
            return None;
        }
        let num_photons = PoissonDistribution::new(self.num_photons_per_len * self.step_length).sample(rng);
        (num_photons > 0).then(|| GeneratorDistribution {
            kind: GeneratorKind::Cherenkov,
            num_photons,
            charge: self.charge,
            step_length: self.step_length,
            material: self.pre_step.material,
            continuous_edep_fraction: 1.0,
            pre: self.pre_step.point,
            post: self.post_step,
            primary: self.pre_step.primary,
        })
    }
}

/// Sample Cherenkov photons from a distribution.
///
/// The photon energy is sampled uniformly above the emission threshold
/// and accepted by `sin²θ`; the emission point is sampled along the step
/// by the local yield.
#[derive(Debug, Clone, Copy)]
pub struct CherenkovGenerator<'a> {
    dist: &'a GeneratorDistribution,
    material: OpticalMaterialView<'a>,
    sample_energy: UniformRealDistribution,
    dir: Real3,
    delta_pos: Real3,
    inv_beta: f64,
    sin_max_sq: f64,
    dndx_pre: f64,
    dndx_post: f64,
}

impl<'a> CherenkovGenerator<'a> {
    pub fn new(material: OpticalMaterialView<'a>, params: &'a CherenkovParams, dist: &'a GeneratorDistribution) -> Self {
        debug_assert_eq!(dist.kind, GeneratorKind::Cherenkov);
        debug_assert!(dist.is_valid());
        debug_assert_eq!(material.material_id(), dist.material);

        let calc_dndx = CherenkovDndxCalculator::new(material, params, dist.charge);
        let dndx_pre = calc_dndx.calc(dist.pre.speed);
        let dndx_post = calc_dndx.calc(dist.post.speed);

        let inv_beta = 2.0 / (dist.pre.speed.value() + dist.post.speed.value());
        debug_assert!(inv_beta < material.max_refractive_index(), "no Cherenkov emission at this speed");
        let cos_max = inv_beta / material.max_refractive_index();
        let delta_pos = sub(&dist.post.pos, &dist.pre.pos);

        CherenkovGenerator {
            dist,
            material,
            sample_energy: UniformRealDistribution::new(material.energy_at_index(inv_beta), material.max_energy()),
            dir: make_unit_vector(&delta_pos),
            delta_pos,
            inv_beta,
            sin_max_sq: (1.0 - cos_max) * (1.0 + cos_max),
            dndx_pre,
            dndx_post,
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> OpticalPhoton {
        let (energy, costheta) = loop {
            let energy = self.sample_energy.sample(rng);
            let costheta = (self.inv_beta / self.material.refractive_index(energy)).min(1.0);
            let sin_sq = (1.0 - costheta) * (1.0 + costheta);
            if !RejectionSampler::new(sin_sq, self.sin_max_sq).sample(rng) {
                break (energy, costheta);
            }
        };

        let phi = UniformRealDistribution::new(0.0, 2.0 * PI).sample(rng);
        let sintheta = ((1.0 - costheta) * (1.0 + costheta)).sqrt();
        let (sinphi, cosphi) = phi.sin_cos();
        let direction = rotate(&from_spherical(costheta, phi), &self.dir);
        // In the plane of the track and the photon
        let polarization = rotate(&[costheta * cosphi, costheta * sinphi, -sintheta], &self.dir);

        let dndx_max = self.dndx_pre.max(self.dndx_post);
        let u = loop {
            let u = generate_canonical(rng);
            if dndx_max <= 0.0 {
                break u;
            }
            let dndx = self.dndx_pre + u * (self.dndx_post - self.dndx_pre);
            if !RejectionSampler::new(dndx, dndx_max).sample(rng) {
                break u;
            }
        };
        let mut position = self.dist.pre.pos;
        axpy(u, &self.delta_pos, &mut position);

        OpticalPhoton {
            energy: MevEnergy::new(energy),
            position,
            direction,
            polarization,
            time: self.dist.time_at(u),
            primary: self.dist.primary,
        }
    }
}
