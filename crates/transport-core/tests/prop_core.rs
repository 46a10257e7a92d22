// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Property-Based Tests (proptest) for transport-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for transport-core using proptest.
//!
//! Covers: batch-size independence of complete runs, energy bookkeeping
//! for absorbed and escaping showers, and secondary stack exhaustion.

use proptest::prelude::*;
use transport_core::geometry::{SlabGeometry, VolumeMaterialMap};
use transport_core::physics::{EnergyLossInput, ModelKind, PhysicsInput, PhysicsParams, ProcessInput};
use transport_core::track::ErrorReason;
use transport_core::{CoreParams, Primary, RunSummary, Stepper};
use transport_physics::cutoff::{CutoffParams, MaterialCutoffs};
use transport_physics::em::msc::{MscXsTable, UrbanMscXsInput};
use transport_physics::material::{ElementInput, IsotopeRecord, MatElementComponent, MaterialInput};
use transport_physics::{MaterialParams, ParticleParams};
use transport_types::config::TransportConfig;
use transport_types::ids::{ElementId, EventId, MaterialId};
use transport_types::units::{AmuMass, MevEnergy, MevMass};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn element(z: u32, mass: f64, a: u32, nuclear_mass: f64) -> ElementInput {
    ElementInput {
        atomic_number: z,
        atomic_mass: AmuMass::new(mass),
        isotopes: vec![IsotopeRecord {
            mass_number: a,
            nuclear_mass: MevMass::new(nuclear_mass),
            abundance: 1.0,
        }],
    }
}

/// Water and lead.
fn materials() -> MaterialParams {
    let elements = [
        element(1, 1.008, 1, 938.272),
        element(8, 15.999, 16, 14895.1),
        element(82, 207.2, 208, 193687.0),
    ];
    let component = |id: usize, fraction: f64| MatElementComponent {
        element: ElementId::new(id),
        fraction,
    };
    let materials = [
        MaterialInput {
            name: "water".into(),
            density: 1.0,
            components: vec![component(0, 2.0 / 3.0), component(1, 1.0 / 3.0)],
        },
        MaterialInput {
            name: "lead".into(),
            density: 11.35,
            components: vec![component(2, 1.0)],
        },
    ];
    MaterialParams::new(&elements, &materials).unwrap()
}

/// Flat cross section, ten times larger in lead.
fn process(particle: &str, model: ModelKind, xs: f64) -> ProcessInput {
    ProcessInput {
        particle: particle.into(),
        model,
        energy: vec![1e-3, 1e5],
        macro_xs: vec![vec![xs, xs], vec![10.0 * xs, 10.0 * xs]],
    }
}

fn energy_loss() -> Vec<EnergyLossInput> {
    let energy: Vec<f64> = vec![1e-3, 1e-2, 1e-1, 1.0, 10.0, 100.0, 1e3, 1e4, 1e5];
    let dedx = |scale: f64| -> Vec<f64> { energy.iter().map(|e| scale * (2.0 + 0.5 / e.sqrt())).collect() };
    ["e-", "e+"]
        .iter()
        .map(|p| EnergyLossInput {
            particle: p.to_string(),
            energy: energy.clone(),
            dedx: vec![dedx(1.0), dedx(11.0)],
        })
        .collect()
}

fn msc_xs() -> UrbanMscXsInput {
    let table = |scale: f64| MscXsTable {
        energy: vec![1e-4, 1e-2, 1.0, 1e2, 1e4],
        scaled_xs: vec![scale; 5],
    };
    UrbanMscXsInput {
        electron: vec![table(1.0), table(10.0)],
        positron: vec![table(1.0), table(10.0)],
        muhad: Vec::new(),
    }
}

/// Electromagnetic shower physics with multiple scattering.
fn shower_input() -> PhysicsInput {
    PhysicsInput {
        processes: vec![
            process("gamma", ModelKind::KleinNishina, 0.05),
            process("gamma", ModelKind::BetheHeitler, 0.03),
            process("e-", ModelKind::MollerBhabha, 0.1),
            process("e+", ModelKind::MollerBhabha, 0.1),
            process("e+", ModelKind::EPlusGG, 0.05),
        ],
        energy_loss: energy_loss(),
        msc: Some(msc_xs()),
        ..Default::default()
    }
}

/// Water on 0..1 cm, lead on 1..2 cm.
fn build(config: TransportConfig, input: &PhysicsInput) -> CoreParams {
    let particles = ParticleParams::standard().unwrap();
    let materials = materials();
    let physics = PhysicsParams::new(&particles, &materials, &config, input).unwrap();
    let cutoffs = CutoffParams::new(&particles, vec![MaterialCutoffs::default(); 2]).unwrap();
    CoreParams::new(
        config,
        particles,
        materials,
        cutoffs,
        SlabGeometry::new(vec![0.0, 1.0, 2.0]).unwrap(),
        VolumeMaterialMap::new(vec![Some(MaterialId::new(0)), Some(MaterialId::new(1))]),
        physics,
    )
    .unwrap()
}

fn beam(params: &CoreParams, particle: &str, energy: f64, pos: [f64; 3], n: usize) -> Vec<Primary> {
    let particle_id = params.particles.require(particle).unwrap();
    (0..n)
        .map(|i| Primary {
            particle_id,
            energy: MevEnergy::new(energy),
            pos,
            dir: [0.0, 0.0, 1.0],
            event_id: EventId(i as u64),
            time: 0.0,
        })
        .collect()
}

fn run(config: TransportConfig, input: &PhysicsInput, particle: &str, energy: f64, pos: [f64; 3], n: usize) -> RunSummary {
    let params = build(config, input);
    let sources = beam(&params, particle, energy, pos, n);
    Stepper::new(params).run(&sources)
}

// ── Reproducibility ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    /// The same primaries give the same tracks and deposition for any
    /// number of slots.
    #[test]
    fn prop_batch_size_independent(seed in any::<u64>(), energy in 1.0f64..20.0, n in 1usize..6, slots in 2usize..9) {
        init_logging();
        let input = shower_input();
        let config = |num_track_slots| TransportConfig { seed, num_track_slots, ..Default::default() };
        let narrow = run(config(1), &input, "gamma", energy, [0.0, 0.0, 0.5], n);
        let wide = run(config(slots), &input, "gamma", energy, [0.0, 0.0, 0.5], n);
        prop_assert_eq!(narrow.num_tracks, wide.num_tracks);
        prop_assert_eq!(narrow.num_errored, 0);
        let scale = narrow.energy_deposition.max(1.0);
        prop_assert!((narrow.energy_deposition - wide.energy_deposition).abs() < 1e-9 * scale);
    }

    /// A nearly full secondary stack defers interactions without changing
    /// their outcome, so results still match across slot counts.
    #[test]
    fn prop_batch_size_independent_small_stack(seed in any::<u64>(), n in 1usize..6, slots in 2usize..9) {
        init_logging();
        let input = shower_input();
        let config = |num_track_slots| TransportConfig {
            seed,
            num_track_slots,
            secondary_capacity: 2,
            ..Default::default()
        };
        let narrow = run(config(1), &input, "gamma", 10.0, [0.0, 0.0, 0.5], n);
        let wide = run(config(slots), &input, "gamma", 10.0, [0.0, 0.0, 0.5], n);
        prop_assert_eq!(narrow.num_tracks, wide.num_tracks);
        prop_assert_eq!(narrow.num_errored, 0);
        prop_assert_eq!(wide.num_errored, 0);
        let scale = narrow.energy_deposition.max(1.0);
        prop_assert!((narrow.energy_deposition - wide.energy_deposition).abs() < 1e-9 * scale);
    }

    /// Escaping particles can only lower the deposited energy.
    #[test]
    fn prop_deposition_bounded(seed in any::<u64>(), energy in 0.5f64..50.0, n in 1usize..6) {
        let config = TransportConfig { seed, num_track_slots: 4, ..Default::default() };
        let summary = run(config, &shower_input(), "gamma", energy, [0.0, 0.0, 0.5], n);
        prop_assert_eq!(summary.num_errored, 0);
        prop_assert!(summary.energy_deposition >= 0.0);
        prop_assert!(summary.energy_deposition <= energy * n as f64 * (1.0 + 1e-9));
    }

    /// Low-energy electrons deep in lead stop and deposit everything.
    #[test]
    fn prop_electrons_absorbed(seed in any::<u64>(), energy in 0.05f64..2.0, n in 1usize..5) {
        let config = TransportConfig { seed, num_track_slots: 3, ..Default::default() };
        let summary = run(config, &shower_input(), "e-", energy, [0.0, 0.0, 1.5], n);
        let total = energy * n as f64;
        prop_assert_eq!(summary.num_errored, 0);
        prop_assert!((summary.energy_deposition - total).abs() < 1e-9 * total);
    }
}

// ── Secondary stack exhaustion ───────────────────────────────────────

#[test]
fn test_full_stack_defers_interactions() {
    init_logging();
    let input = PhysicsInput {
        processes: vec![process("gamma", ModelKind::KleinNishina, 5.0), process("e-", ModelKind::MollerBhabha, 0.1)],
        energy_loss: energy_loss(),
        ..Default::default()
    };
    let config = TransportConfig {
        num_track_slots: 8,
        secondary_capacity: 1,
        ..Default::default()
    };
    let summary = run(config, &input, "gamma", 5.0, [0.0, 0.0, 1.5], 8);
    assert_eq!(summary.num_errored, 0);
    assert!(summary.num_tracks > 8);
    assert!(summary.energy_deposition <= 40.0 * (1.0 + 1e-9));
}

#[test]
fn test_small_stack_matches_serial_run() {
    init_logging();
    let input = shower_input();
    for seed in 0..20u64 {
        let config = |num_track_slots| TransportConfig {
            seed,
            num_track_slots,
            secondary_capacity: 2,
            ..Default::default()
        };
        let narrow = run(config(1), &input, "gamma", 10.0, [0.0, 0.0, 0.5], 4);
        let wide = run(config(8), &input, "gamma", 10.0, [0.0, 0.0, 0.5], 4);
        assert_eq!(narrow.num_tracks, wide.num_tracks, "seed {seed}");
        let scale = narrow.energy_deposition.max(1.0);
        assert!(
            (narrow.energy_deposition - wide.energy_deposition).abs() < 1e-9 * scale,
            "seed {seed}: {} vs {}",
            narrow.energy_deposition,
            wide.energy_deposition
        );
    }
}

#[test]
fn test_pair_production_never_fits() {
    init_logging();
    let input = PhysicsInput {
        processes: vec![process("gamma", ModelKind::BetheHeitler, 50.0)],
        ..Default::default()
    };
    let config = TransportConfig {
        secondary_capacity: 1,
        max_steps: 20,
        ..Default::default()
    };
    let params = build(config, &input);
    let sources = beam(&params, "gamma", 10.0, [0.0, 0.0, 1.5], 1);
    let mut stepper = Stepper::new(params);
    let summary = stepper.run(&sources);
    assert_eq!(summary.num_errored, 1);
    assert_eq!(stepper.diagnostics()[0].reason, ErrorReason::StepLimitExceeded);
    assert!((summary.energy_deposition - 10.0).abs() < 1e-12);
}
