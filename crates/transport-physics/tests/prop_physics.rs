// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Property-Based Tests (proptest) for transport-physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for transport-physics using proptest.
//!
//! Covers: energy conservation and kinematic bounds of the discrete
//! interactors (photoelectric and coherent scattering included), and the
//! support of the angular distributions.

use proptest::prelude::*;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use transport_math::array::{is_soft_unit_vector, make_unit_vector};
use transport_physics::cutoff::{CutoffParams, MaterialCutoffs};
use transport_physics::em::bethe_heitler::{BetheHeitlerData, BetheHeitlerInteractor};
use transport_physics::em::eplusgg::{EPlusGGData, EPlusGGInteractor};
use transport_physics::em::klein_nishina::{KleinNishinaData, KleinNishinaInteractor};
use transport_physics::em::livermore_pe::{LivermoreElement, LivermorePEData, LivermorePEInteractor, LivermoreSubshell};
use transport_physics::em::moller_bhabha::{MollerBhabhaData, MollerBhabhaInteractor};
use transport_physics::em::msc::UrbanLargeAngleDistribution;
use transport_physics::em::rayleigh::{RayleighData, RayleighElementParams, RayleighInteractor};
use transport_physics::material::{ElementInput, IsotopeRecord, MatElementComponent, MaterialInput};
use transport_physics::{Interactor, MaterialParams, ParticleParams, ParticleTrackView};
use transport_types::ids::{ElementComponentId, ElementId, MaterialId};
use transport_types::units::{AmuMass, MevEnergy, MevMass};
use transport_types::{Action, StackAllocator};

fn lead() -> MaterialParams {
    let elements = [ElementInput {
        atomic_number: 82,
        atomic_mass: AmuMass::new(207.2),
        isotopes: vec![IsotopeRecord {
            mass_number: 208,
            nuclear_mass: MevMass::new(193687.0),
            abundance: 1.0,
        }],
    }];
    let materials = [MaterialInput {
        name: "lead".into(),
        density: 11.35,
        components: vec![MatElementComponent {
            element: ElementId::new(0),
            fraction: 1.0,
        }],
    }];
    MaterialParams::new(&elements, &materials).unwrap()
}

fn direction() -> impl Strategy<Value = [f64; 3]> {
    (-1.0f64..1.0, -1.0f64..1.0, -1.0f64..1.0)
        .prop_filter("nonzero", |(x, y, z)| x * x + y * y + z * z > 1e-3)
        .prop_map(|(x, y, z)| make_unit_vector(&[x, y, z]))
}

/// K, L and M shells with tabulated cross sections below 100 keV.
fn lead_shells() -> LivermoreElement {
    let shell = |binding_energy: f64, scale: f64| LivermoreSubshell {
        binding_energy,
        energy: vec![1e-3, 1e-2, 0.1],
        xs: vec![scale, 2.0 * scale, 3.0 * scale],
        param: [[0.0, 0.0, scale, 0.0, 0.0, 0.0], [0.0, scale, 0.0, 0.0, 0.0, 0.0]],
    };
    let mut element = LivermoreElement {
        thresh_lo: 0.1,
        thresh_hi: 0.5,
        shells: vec![shell(0.088, 4.0), shell(0.015, 2.0), shell(0.0038, 1.0)],
    };
    // Fit coefficients are cumulative over shells
    for i in 1..element.shells.len() {
        let prev = element.shells[i - 1].param;
        for (cur, prev) in element.shells[i].param.iter_mut().zip(prev) {
            for (c, p) in cur.iter_mut().zip(prev) {
                *c += p;
            }
        }
    }
    element
}

// ── Photon interactions ──────────────────────────────────────────────

proptest! {
    /// Compton scattering conserves energy and respects the backscatter
    /// limit.
    #[test]
    fn compton_kinematics(log_e in -2.0f64..4.0, dir in direction(), seed in any::<u64>()) {
        let particles = ParticleParams::standard().unwrap();
        let data = KleinNishinaData::new(&particles).unwrap();
        let energy = 10f64.powf(log_e);
        let gamma = ParticleTrackView::new(&particles, data.gamma, MevEnergy::new(energy));
        let alloc = StackAllocator::new(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = KleinNishinaInteractor::new(&data, &gamma, &dir, &alloc).sample(&mut rng);

        prop_assert_eq!(result.action, Action::Scattered);
        prop_assert!(is_soft_unit_vector(&result.direction));
        let k = energy / 0.51099895;
        prop_assert!(result.energy.value() >= energy / (1.0 + 2.0 * k) * (1.0 - 1e-12));
        prop_assert!(result.energy.value() <= energy);
        let out: f64 = result.energy.value()
            + result.energy_deposition.value()
            + result.secondaries.iter().map(|s| s.energy.value()).sum::<f64>();
        prop_assert!((out - energy).abs() <= 1e-10 * energy);
    }

    /// Pair production puts E - 2 m_e into the lepton pair.
    #[test]
    fn pair_production_energy(log_e in 0.05f64..5.0, dir in direction(), seed in any::<u64>()) {
        let particles = ParticleParams::standard().unwrap();
        let materials = lead();
        let data = BetheHeitlerData::new(&particles).unwrap();
        let energy = 10f64.powf(log_e);
        let gamma = ParticleTrackView::new(&particles, data.gamma, MevEnergy::new(energy));
        let element = materials.material(MaterialId::new(0)).element_record(ElementComponentId::new(0));
        let alloc = StackAllocator::new(2);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = BetheHeitlerInteractor::new(&data, &gamma, &dir, &alloc, element).sample(&mut rng);

        prop_assert_eq!(result.action, Action::Absorbed);
        prop_assert_eq!(result.secondaries.len(), 2);
        let pair: f64 = result.secondaries.iter().map(|s| s.energy.value()).sum();
        prop_assert!((pair - (energy - 2.0 * data.electron_mass)).abs() <= 1e-10 * energy);
        for s in result.secondaries {
            prop_assert!(s.energy.value() >= 0.0);
            prop_assert!(is_soft_unit_vector(&s.direction));
        }
    }

    /// The photoelectron and the local deposit share the photon energy,
    /// and the deposit is one of the binding energies.
    #[test]
    fn photoelectric_energy(log_e in -2.5f64..2.5, dir in direction(), seed in any::<u64>()) {
        let particles = ParticleParams::standard().unwrap();
        let element = lead_shells();
        let bindings: Vec<f64> = element.shells.iter().map(|s| s.binding_energy).collect();
        let data = LivermorePEData::new(&particles, vec![element]).unwrap();
        let energy = 10f64.powf(log_e);
        let gamma = ParticleTrackView::new(&particles, data.gamma, MevEnergy::new(energy));
        let alloc = StackAllocator::new(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = LivermorePEInteractor::new(&data, &gamma, &dir, &alloc, ElementId::new(0)).sample(&mut rng);

        prop_assert_eq!(result.action, Action::Absorbed);
        let deposit = result.energy_deposition.value();
        let out: f64 = deposit + result.secondaries.iter().map(|s| s.energy.value()).sum::<f64>();
        prop_assert!((out - energy).abs() <= 1e-12 * energy.max(1.0));
        if let Some(electron) = result.secondaries.first() {
            prop_assert!(bindings.contains(&deposit));
            prop_assert!(electron.energy.value() > 0.0);
            prop_assert!(is_soft_unit_vector(&electron.direction));
        } else {
            prop_assert!(bindings.iter().all(|&b| b >= energy));
        }
    }

    /// Coherent scattering changes only the direction.
    #[test]
    fn rayleigh_keeps_energy(log_e in -5.0f64..1.0, dir in direction(), seed in any::<u64>()) {
        let particles = ParticleParams::standard().unwrap();
        let params = RayleighElementParams { a: [50.0, 25.0, 5.0], b: [2e-16, 5e-17, 1e-17], n: [2.0, 1.6, 1.2] };
        let data = RayleighData::new(&particles, vec![params]).unwrap();
        let energy = 10f64.powf(log_e);
        let gamma = ParticleTrackView::new(&particles, data.gamma, MevEnergy::new(energy));
        let mut rng = StdRng::seed_from_u64(seed);
        let result = RayleighInteractor::new(&data, &gamma, &dir, ElementId::new(0)).sample(&mut rng);

        prop_assert_eq!(result.action, Action::Scattered);
        prop_assert_eq!(result.energy.value(), energy);
        prop_assert!(result.secondaries.is_empty());
        prop_assert!(is_soft_unit_vector(&result.direction));
    }

    /// Two-photon annihilation carries the full positron energy plus
    /// both rest masses.
    #[test]
    fn annihilation_energy(log_e in -3.0f64..3.0, at_rest in any::<bool>(), dir in direction(), seed in any::<u64>()) {
        let particles = ParticleParams::standard().unwrap();
        let data = EPlusGGData::new(&particles).unwrap();
        let energy = if at_rest { 0.0 } else { 10f64.powf(log_e) };
        let positron = ParticleTrackView::new(&particles, data.positron, MevEnergy::new(energy));
        let alloc = StackAllocator::new(2);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = EPlusGGInteractor::new(&data, &positron, &dir, &alloc).sample(&mut rng);

        prop_assert_eq!(result.action, Action::Absorbed);
        let total: f64 = result.secondaries.iter().map(|s| s.energy.value()).sum();
        prop_assert!((total - (energy + 2.0 * data.electron_mass)).abs() <= 1e-10 * (energy + 1.0));
    }
}

// ── Charged particle interactions ────────────────────────────────────

proptest! {
    /// Delta rays lie between the production cut and the kinematic limit.
    #[test]
    fn delta_ray_bounds(log_e in 0.0f64..4.0, positron in any::<bool>(), seed in any::<u64>()) {
        let particles = ParticleParams::standard().unwrap();
        let cutoffs = CutoffParams::new(&particles, vec![MaterialCutoffs::default()]).unwrap();
        let cutoff = cutoffs.get(MaterialId::new(0));
        let data = MollerBhabhaData::new(&particles).unwrap();
        let energy = 10f64.powf(log_e);
        let id = if positron { data.positron } else { data.electron };
        let primary = ParticleTrackView::new(&particles, id, MevEnergy::new(energy));
        let alloc = StackAllocator::new(1);
        let mut rng = StdRng::seed_from_u64(seed);
        let dir = [0.0, 0.0, 1.0];
        let result = MollerBhabhaInteractor::new(&data, &primary, &cutoff, &dir, &alloc).sample(&mut rng);

        let cut = cutoff.energy(data.electron).value();
        let max = if positron { energy } else { 0.5 * energy };
        if cut >= max {
            prop_assert_eq!(result.action, Action::Unchanged);
        } else {
            let delta = result.secondaries[0].energy.value();
            prop_assert!(delta >= cut * (1.0 - 1e-12) && delta <= max * (1.0 + 1e-12));
            prop_assert!((result.energy.value() + delta - energy).abs() <= 1e-10 * energy);
        }
    }

    /// The large-angle MSC distribution stays on [-1, 1].
    #[test]
    fn msc_large_angle_support(tau in 1e-4f64..8.0, seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = UrbanLargeAngleDistribution::new(tau);
        for _ in 0..32 {
            let c = dist.sample(&mut rng);
            prop_assert!((-1.0..=1.0).contains(&c));
        }
    }
}
