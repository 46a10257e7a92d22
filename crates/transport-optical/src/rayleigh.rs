// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Optical Rayleigh Scattering
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elastic scattering of optical photons off particles much smaller than
//! the wavelength.

use rand::distributions::Distribution;
use rand::Rng;
use transport_math::array::{dot, is_soft_orthogonal, is_soft_unit_vector, make_orthogonal, make_unit_vector, neg, norm};
use transport_math::distributions::{BernoulliDistribution, IsotropicDistribution, RejectionSampler};
use transport_physics::Interactor;
use transport_types::units::MevEnergy;
use transport_types::{Interaction, Real3};

/// Projections shorter than this are resampled.
const MIN_PROJECTION: f64 = 1e-8;

/// Sample the scattered direction and polarization.
///
/// The new polarization is the old one projected onto the plane normal to
/// an isotropic new direction, accepted with probability equal to the
/// squared overlap of the two polarizations. Either sign of the projected
/// polarization is equally likely.
#[derive(Debug, Clone, Copy)]
pub struct RayleighInteractor<'a> {
    energy: MevEnergy,
    inc_pol: &'a Real3,
}

impl<'a> RayleighInteractor<'a> {
    pub fn new(energy: MevEnergy, inc_dir: &'a Real3, inc_pol: &'a Real3) -> Self {
        debug_assert!(is_soft_unit_vector(inc_dir));
        debug_assert!(is_soft_unit_vector(inc_pol));
        debug_assert!(is_soft_orthogonal(inc_dir, inc_pol));
        RayleighInteractor { energy, inc_pol }
    }
}

impl Interactor<'static> for RayleighInteractor<'_> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'static> {
        let (direction, mut polarization) = loop {
            let direction: Real3 = IsotropicDistribution.sample(rng);
            let projected = make_orthogonal(self.inc_pol, &direction);
            if norm(&projected) < MIN_PROJECTION {
                continue;
            }
            let polarization = make_unit_vector(&projected);
            let overlap = dot(&polarization, self.inc_pol);
            if !RejectionSampler::with_probability((overlap * overlap).min(1.0)).sample(rng) {
                break (direction, polarization);
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
