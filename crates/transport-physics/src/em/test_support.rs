// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — EM Test Support
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::cutoff::{CutoffParams, MaterialCutoffs};
use crate::kinematics::calc_momentum_vector;
use crate::material::tests::test_materials;
use crate::material::MaterialParams;
use crate::particle::{ParticleParams, ParticleTrackView};
use transport_math::array::{add, norm, sub};
use transport_types::units::MevEnergy;
use transport_types::{Action, Interaction, Real3};

/// Standard particles, the test materials, and default cutoffs.
pub(crate) struct TestSetup {
    pub particles: ParticleParams,
    pub materials: MaterialParams,
    pub cutoffs: CutoffParams,
}

impl TestSetup {
    pub fn new() -> Self {
        let particles = ParticleParams::standard().unwrap();
        let materials = test_materials();
        let cutoffs = CutoffParams::new(
            &particles,
            vec![MaterialCutoffs::default(); materials.num_materials()],
        )
        .unwrap();
        TestSetup {
            particles,
            materials,
            cutoffs,
        }
    }

    pub fn particle(&self, name: &str, energy: f64) -> ParticleTrackView<'_> {
        let id = self.particles.find(name).unwrap();
        ParticleTrackView::new(&self.particles, id, MevEnergy::new(energy))
    }

    fn mass(&self, id: transport_types::ids::ParticleId) -> f64 {
        self.particles.get(id).mass.value()
    }
}

/// Check that outgoing momentum (primary plus secondaries) matches the
/// incident momentum to a relative tolerance.
pub(crate) fn assert_momentum_conserved(
    setup: &TestSetup,
    primary: &ParticleTrackView<'_>,
    inc_dir: &Real3,
    result: &Interaction<'_>,
) {
    let mass = primary.mass().value();
    let inc = calc_momentum_vector(primary.energy().value(), mass, inc_dir);
    let mut out = [0.0; 3];
    if result.action != Action::Absorbed {
        out = calc_momentum_vector(result.energy.value(), mass, &result.direction);
    }
    for s in result.secondaries {
        let id = s.particle_id.unwrap();
        out = add(&out, &calc_momentum_vector(s.energy.value(), setup.mass(id), &s.direction));
    }
    let diff = norm(&sub(&inc, &out));
    assert!(
        diff <= 1e-8 * norm(&inc).max(1.0),
        "momentum mismatch {diff}: in={inc:?} out={out:?}"
    );
}
