// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Optical Mie Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scattering of optical photons off particles comparable to the
//! wavelength, using a forward and a backward Henyey-Greenstein lobe.

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;
use transport_math::array::{
    from_spherical, is_soft_orthogonal, is_soft_unit_vector, make_orthogonal, make_unit_vector, neg, norm, rotate,
};
use transport_math::distributions::{generate_canonical, BernoulliDistribution, UniformRealDistribution};
use transport_physics::Interactor;
use transport_types::ids::OpticalMaterialId;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3, TransportError, TransportResult};

/// Henyey-Greenstein parameters of one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MieMaterialData {
    /// Probability of scattering into the forward lobe
    pub forward_ratio: f64,
    /// Asymmetry parameter of the forward lobe
    pub forward_g: f64,
    /// Asymmetry parameter of the backward lobe
    pub backward_g: f64,
}

impl MieMaterialData {
    pub fn is_valid(&self) -> bool {
        (0.0..=1.0).contains(&self.forward_ratio)
            && self.forward_g > -1.0
            && self.forward_g < 1.0
            && self.backward_g > -1.0
            && self.backward_g < 1.0
    }
}

/// Mie parameters indexed by optical material.
#[derive(Debug, Clone, PartialEq)]
pub struct MieParams {
    materials: Vec<MieMaterialData>,
}

impl MieParams {
    pub fn new(materials: Vec<MieMaterialData>) -> TransportResult<Self> {
        if let Some((i, m)) = materials.iter().enumerate().find(|(_, m)| !m.is_valid()) {
            return Err(TransportError::invalid("mie", format!("material {i}: invalid parameters {m:?}")));
        }
        debug!(num_materials = materials.len(), "built Mie params");
        Ok(MieParams { materials })
    }

    pub fn get(&self, id: OpticalMaterialId) -> &MieMaterialData {
        &self.materials[id.get()]
    }
}

/// Polar cosine from a Henyey-Greenstein distribution with asymmetry `g`.
fn sample_hg_costheta(g: f64, r: f64) -> f64 {
    let costheta = 2.0 * r * ((1.0 + g) / (1.0 - g + 2.0 * g * r)).powi(2) * (1.0 - g + g * r) - 1.0;
    // Cancellation can push the value slightly above one
    costheta.min(1.0)
}

/// Sample the scattered direction and polarization.
///
/// The polar angle is measured from the incident direction; the backward
/// lobe reverses it.
#[derive(Debug, Clone, Copy)]
pub struct MieInteractor<'a> {
    data: &'a MieMaterialData,
    energy: MevEnergy,
    inc_dir: &'a Real3,
    inc_pol: &'a Real3,
}

impl<'a> MieInteractor<'a> {
    pub fn new(
        params: &'a MieParams,
        material: OpticalMaterialId,
        energy: MevEnergy,
        inc_dir: &'a Real3,
        inc_pol: &'a Real3,
    ) -> Self {
        debug_assert!(is_soft_unit_vector(inc_dir));
        debug_assert!(is_soft_unit_vector(inc_pol));
        debug_assert!(is_soft_orthogonal(inc_dir, inc_pol));
        MieInteractor {
            data: params.get(material),
            energy,
            inc_dir,
            inc_pol,
        }
    }
}

impl Interactor<'static> for MieInteractor<'_> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'static> {
        let sample_forward = BernoulliDistribution::new(self.data.forward_ratio);
        let sample_phi = UniformRealDistribution::new(0.0, 2.0 * PI);
        let (direction, mut polarization) = loop {
            let r = generate_canonical(rng);
            let costheta = if sample_forward.sample(rng) {
                sample_hg_costheta(self.data.forward_g, r)
            } else {
                -sample_hg_costheta(self.data.backward_g, r)
            };
            let direction = rotate(&from_spherical(costheta, sample_phi.sample(rng)), self.inc_dir);
            let projected = make_orthogonal(self.inc_pol, &direction);
            if norm(&projected) > 1e-8 {
                break (direction, make_unit_vector(&projected));
            }
        };
        if BernoulliDistribution::new(0.5).sample(rng) {
            polarization = neg(&polarization);
        }
        debug_assert!(is_soft_orthogonal(&direction, &polarization));

        Interaction {
            polarization: Some(polarization),
            ..Interaction::scattered(self.energy, direction)
        }
    }
}
