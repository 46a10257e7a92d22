// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Transport Benchmarks
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use transport_core::geometry::{SlabGeometry, VolumeMaterialMap};
use transport_core::physics::{EnergyLossInput, ModelKind, PhysicsInput, PhysicsParams, ProcessInput};
use transport_core::{CoreParams, Primary, Stepper};
use transport_physics::cutoff::{CutoffParams, MaterialCutoffs};
use transport_physics::material::{ElementInput, IsotopeRecord, MatElementComponent, MaterialInput};
use transport_physics::{MaterialParams, ParticleParams};
use transport_types::config::TransportConfig;
use transport_types::ids::{ElementId, EventId, MaterialId};
use transport_types::units::{AmuMass, MevEnergy, MevMass};

fn lead_slab(num_track_slots: usize) -> CoreParams {
    let particles = ParticleParams::standard().unwrap();
    let elements = [ElementInput {
        atomic_number: 82,
        atomic_mass: AmuMass::new(207.2),
        isotopes: vec![IsotopeRecord {
            mass_number: 208,
            nuclear_mass: MevMass::new(193687.0),
            abundance: 1.0,
        }],
    }];
    let materials = MaterialParams::new(
        &elements,
        &[MaterialInput {
            name: "lead".into(),
            density: 11.35,
            components: vec![MatElementComponent {
                element: ElementId::new(0),
                fraction: 1.0,
            }],
        }],
    )
    .unwrap();

    let grid: Vec<f64> = vec![1e-3, 1e-2, 1e-1, 1.0, 10.0, 100.0, 1e3];
    let process = |particle: &str, model, xs: f64| ProcessInput {
        particle: particle.into(),
        model,
        energy: vec![1e-3, 1e3],
        macro_xs: vec![vec![xs, xs]],
    };
    let input = PhysicsInput {
        processes: vec![
            process("gamma", ModelKind::KleinNishina, 0.5),
            process("gamma", ModelKind::BetheHeitler, 0.3),
            process("e-", ModelKind::MollerBhabha, 1.0),
            process("e+", ModelKind::MollerBhabha, 1.0),
            process("e+", ModelKind::EPlusGG, 0.5),
        ],
        energy_loss: ["e-", "e+"]
            .iter()
            .map(|p| EnergyLossInput {
                particle: p.to_string(),
                energy: grid.clone(),
                dedx: vec![grid.iter().map(|e| 12.0 + 4.0 / e.sqrt()).collect()],
            })
            .collect(),
        ..Default::default()
    };
    let config = TransportConfig {
        num_track_slots,
        ..Default::default()
    };
    let physics = PhysicsParams::new(&particles, &materials, &config, &input).unwrap();
    let cutoffs = CutoffParams::new(&particles, vec![MaterialCutoffs::default()]).unwrap();
    CoreParams::new(
        config,
        particles,
        materials,
        cutoffs,
        SlabGeometry::new(vec![0.0, 10.0]).unwrap(),
        VolumeMaterialMap::new(vec![Some(MaterialId::new(0))]),
        physics,
    )
    .unwrap()
}

fn bench_shower(c: &mut Criterion) {
    let mut group = c.benchmark_group("gamma_shower_10mev_x256");
    group.sample_size(10);
    for num_slots in [16usize, 256] {
        let params = lead_slab(num_slots);
        let gamma = params.particles.require("gamma").unwrap();
        let primaries: Vec<Primary> = (0..256)
            .map(|i| Primary {
                particle_id: gamma,
                energy: MevEnergy::new(10.0),
                pos: [0.0, 0.0, 0.5],
                dir: [0.0, 0.0, 1.0],
                event_id: EventId(i),
                time: 0.0,
            })
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(num_slots), &primaries, |b, primaries| {
            b.iter(|| {
                let mut stepper = Stepper::new(params.clone());
                black_box(stepper.run(primaries).energy_deposition)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_shower);
criterion_main!(benches);
