// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Optical Dielectric Surfaces
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Reflection and refraction of optical photons at the interface between
//! two optical materials.
//!
//! The incident polarization is split into transverse-electric (TE) and
//! transverse-magnetic (TM) parts relative to the plane spanned by the
//! direction and the surface normal. The Fresnel amplitudes give the
//! reflection probability; a reflected photon leaves specularly, a
//! refracted one follows Snell's law into a dielectric or is absorbed by
//! a metal. Photon phase is not tracked.

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use transport_math::array::{axpy, cross, dot, is_soft_unit_vector, make_orthogonal, make_unit_vector, norm, soft_zero};
use transport_math::distributions::BernoulliDistribution;
use transport_types::Real3;

/// What lies on the far side of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DielectricInterface {
    #[default]
    Dielectric,
    /// Refracted photons are absorbed
    Metal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceAction {
    Reflected,
    Refracted,
    Absorbed,
    /// Same material on both sides
    Transmitted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceInteraction {
    pub action: SurfaceAction,
    pub direction: Real3,
    pub polarization: Real3,
}

impl SurfaceInteraction {
    pub fn from_absorption() -> Self {
        SurfaceInteraction {
            action: SurfaceAction::Absorbed,
            direction: [0.0; 3],
            polarization: [0.0; 3],
        }
    }

    pub fn from_transmission(direction: Real3, polarization: Real3) -> Self {
        SurfaceInteraction {
            action: SurfaceAction::Transmitted,
            direction,
            polarization,
        }
    }
}

/// Fresnel amplitudes for one photon at one surface.
///
/// The normal points back into the incident material. At normal incidence
/// the plane of incidence is undefined and the photon is taken to be
/// purely TE.
#[derive(Debug, Clone, Copy)]
pub struct FresnelCalculator {
    direction: Real3,
    polarization: Real3,
    normal: Real3,
    relative_index: f64,
    cos_theta: f64,
    /// cos(refracted) / cos(incident); zero under total internal reflection
    cosine_ratio: f64,
    te_axis: Real3,
}

impl FresnelCalculator {
    /// `relative_index` is the post-surface index over the pre-surface one.
    pub fn new(direction: &Real3, polarization: &Real3, normal: &Real3, relative_index: f64) -> Self {
        debug_assert!(is_soft_unit_vector(direction));
        debug_assert!(is_soft_unit_vector(polarization));
        debug_assert!(is_soft_unit_vector(normal));
        debug_assert!(relative_index > 0.0);
        debug_assert!(dot(direction, normal) < 0.0, "photon must enter the surface");

        let cos_theta = (-dot(direction, normal)).min(1.0);
        let sin_refracted = (1.0 - cos_theta * cos_theta).max(0.0).sqrt() / relative_index;
        let cosine_ratio = if sin_refracted >= 1.0 {
            0.0
        } else {
            (1.0 - sin_refracted * sin_refracted).sqrt() / cos_theta
        };

        let in_plane = make_orthogonal(direction, normal);
        let in_plane = if soft_zero(norm(&in_plane)) {
            make_unit_vector(&cross(polarization, normal))
        } else {
            make_unit_vector(&in_plane)
        };
        FresnelCalculator {
            direction: *direction,
            polarization: *polarization,
            normal: *normal,
            relative_index,
            cos_theta,
            cosine_ratio,
            te_axis: cross(normal, &in_plane),
        }
    }

    pub fn is_total_internal_reflection(&self) -> bool {
        self.cosine_ratio == 0.0
    }

    fn tm_axis(&self, direction: &Real3) -> Real3 {
        cross(&self.te_axis, direction)
    }

    fn inc_te(&self) -> f64 {
        dot(&self.polarization, &self.te_axis)
    }

    fn inc_tm(&self) -> f64 {
        dot(&self.polarization, &self.tm_axis(&self.direction))
    }

    /// Fresnel reflection amplitude of the TE component.
    pub fn reflectivity_te(&self) -> f64 {
        -reflectivity_ratio(self.cosine_ratio * self.relative_index)
    }

    /// Fresnel reflection amplitude of the TM component.
    pub fn reflectivity_tm(&self) -> f64 {
        reflectivity_ratio(self.cosine_ratio / self.relative_index)
    }

    fn transmission_te(&self) -> f64 {
        self.reflectivity_te() + 1.0
    }

    fn transmission_tm(&self) -> f64 {
        self.relative_index * (self.reflectivity_tm() + 1.0)
    }

    /// Probability that the photon is reflected.
    pub fn calc_reflectivity(&self) -> f64 {
        let te_sq = self.inc_te().powi(2);
        let tm_sq = self.inc_tm().powi(2);
        let r = (te_sq * self.reflectivity_te().powi(2) + tm_sq * self.reflectivity_tm().powi(2)) / (te_sq + tm_sq);
        r.clamp(0.0, 1.0)
    }

    /// Specular reflection with the reflected TE and TM amplitudes.
    pub fn reflected_interaction(&self) -> SurfaceInteraction {
        let mut direction = self.direction;
        axpy(2.0 * self.cos_theta, &self.normal, &mut direction);
        let direction = make_unit_vector(&direction);
        let mut polarization = [0.0; 3];
        axpy(self.reflectivity_te() * self.inc_te(), &self.te_axis, &mut polarization);
        axpy(self.reflectivity_tm() * self.inc_tm(), &self.tm_axis(&direction), &mut polarization);
        SurfaceInteraction {
            action: SurfaceAction::Reflected,
            direction,
            polarization: make_unit_vector(&polarization),
        }
    }

    /// Snell's law direction with the transmitted TE and TM amplitudes.
    pub fn refracted_interaction(&self) -> SurfaceInteraction {
        debug_assert!(!self.is_total_internal_reflection());
        let mut direction = self.direction;
        axpy(
            self.cos_theta * (1.0 - self.relative_index * self.cosine_ratio),
            &self.normal,
            &mut direction,
        );
        let direction = make_unit_vector(&direction);
        let mut polarization = [0.0; 3];
        axpy(self.transmission_te() * self.inc_te(), &self.te_axis, &mut polarization);
        axpy(self.transmission_tm() * self.inc_tm(), &self.tm_axis(&direction), &mut polarization);
        SurfaceInteraction {
            action: SurfaceAction::Refracted,
            direction,
            polarization: make_unit_vector(&polarization),
        }
    }
}

fn reflectivity_ratio(x: f64) -> f64 {
    (x - 1.0) / (x + 1.0)
}

/// Sample reflection or refraction at a dielectric-dielectric or
/// dielectric-metal interface.
#[derive(Debug, Clone, Copy)]
pub struct DielectricInteractor {
    fresnel: FresnelCalculator,
    interface: DielectricInterface,
}

impl DielectricInteractor {
    pub fn new(
        direction: &Real3,
        polarization: &Real3,
        normal: &Real3,
        pre_index: f64,
        post_index: f64,
        interface: DielectricInterface,
    ) -> Self {
        DielectricInteractor {
            fresnel: FresnelCalculator::new(direction, polarization, normal, post_index / pre_index),
            interface,
        }
    }
}

impl Distribution<SurfaceInteraction> for DielectricInteractor {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SurfaceInteraction {
        if BernoulliDistribution::new(self.fresnel.calc_reflectivity()).sample(rng) {
            return self.fresnel.reflected_interaction();
        }
        match self.interface {
            DielectricInterface::Metal => SurfaceInteraction::from_absorption(),
            DielectricInterface::Dielectric => self.fresnel.refracted_interaction(),
        }
    }
}
