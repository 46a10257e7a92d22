// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Property-Based Tests (proptest) for transport-optical
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for transport-optical using proptest.
//!
//! Covers: photon direction and polarization invariants for every
//! interactor and generator, Fresnel surface kinematics, monotonic Cherenkov yields, and wavelength
//! shifting always lowering the photon energy.

use proptest::prelude::*;
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use transport_math::array::{dot, from_spherical, is_soft_orthogonal, is_soft_unit_vector, make_orthogonal, make_unit_vector};
use transport_optical::scintillation::{EmissionSpectrum, ScintillationComponentInput};
use transport_optical::wls::WlsMaterialInput;
use transport_optical::SurfaceAction;
use transport_optical::{
    CherenkovDndxCalculator, CherenkovGenerator, CherenkovOffload, CherenkovParams, DielectricInteractor,
    DielectricInterface, FresnelCalculator, MieInteractor, MieMaterialData,
    MieParams, OffloadPreStep, OpticalMaterialInput, OpticalMaterialParams, OpticalPhoton, RayleighInteractor,
    ScintillationGenerator, ScintillationMaterialInput, ScintillationOffload, ScintillationParams, StepPoint,
    WavelengthShiftGenerator, WavelengthShiftInteractor, WavelengthShiftParams, WlsTimeProfile,
};
use transport_physics::Interactor;
use transport_types::constants::ELECTRON_VOLT;
use transport_types::ids::{MaterialId, OpticalMaterialId, TrackId};
use transport_types::units::{ElementaryCharge, LightSpeed, MevEnergy};
use transport_types::Action;

fn water() -> OpticalMaterialParams {
    OpticalMaterialParams::new(
        &[OpticalMaterialInput {
            material: MaterialId::new(0),
            energy: vec![1.5, 2.0, 3.0, 4.0].iter().map(|e| e * ELECTRON_VOLT).collect(),
            refractive_index: vec![1.32, 1.33, 1.34, 1.36],
        }],
        1,
    )
    .unwrap()
}

fn spectrum() -> EmissionSpectrum {
    EmissionSpectrum {
        energy: vec![2.0, 2.5, 3.0].iter().map(|e| e * ELECTRON_VOLT).collect(),
        cdf: vec![0.0, 3.0, 4.0],
    }
}

/// Unit direction and an orthogonal unit polarization from angles.
fn dir_and_pol(cost: f64, phi: f64, psi: f64) -> ([f64; 3], [f64; 3]) {
    let dir = from_spherical(cost, phi);
    let trial = from_spherical(psi.cos(), psi);
    let mut pol = make_orthogonal(&trial, &dir);
    if dot(&pol, &pol) < 1e-6 {
        pol = make_orthogonal(&[1.0, 0.0, 0.0], &dir);
        if dot(&pol, &pol) < 1e-6 {
            pol = make_orthogonal(&[0.0, 1.0, 0.0], &dir);
        }
    }
    (dir, make_unit_vector(&pol))
}

fn pre_step(beta: f64) -> OffloadPreStep {
    OffloadPreStep {
        point: StepPoint {
            speed: LightSpeed::new(beta),
            pos: [0.0, 0.0, 0.0],
            time: 0.0,
        },
        material: OpticalMaterialId::new(0),
        primary: TrackId(3),
    }
}

fn assert_photon(photon: &OpticalPhoton) {
    assert!(is_soft_unit_vector(&photon.direction));
    assert!(is_soft_unit_vector(&photon.polarization));
    assert!(is_soft_orthogonal(&photon.direction, &photon.polarization));
    assert!(photon.energy.value() > 0.0);
    assert!(photon.time >= 0.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_rayleigh_keeps_polarization_transverse(
        cost in -1.0f64..1.0, phi in 0.0f64..6.28, psi in 0.0f64..6.28, seed in 0u64..1000,
    ) {
        let (dir, pol) = dir_and_pol(cost, phi, psi);
        let mut rng = StdRng::seed_from_u64(seed);
        let energy = MevEnergy::new(3.0 * ELECTRON_VOLT);
        let result = RayleighInteractor::new(energy, &dir, &pol).sample(&mut rng);
        prop_assert_eq!(result.action, Action::Scattered);
        prop_assert_eq!(result.energy, energy);
        let new_pol = result.polarization.unwrap();
        prop_assert!(is_soft_unit_vector(&result.direction));
        prop_assert!(is_soft_orthogonal(&result.direction, &new_pol));
    }

    #[test]
    fn prop_mie_keeps_polarization_transverse(
        cost in -1.0f64..1.0, phi in 0.0f64..6.28, psi in 0.0f64..6.28,
        forward_ratio in 0.0f64..=1.0, g in -0.95f64..0.95, seed in 0u64..1000,
    ) {
        let (dir, pol) = dir_and_pol(cost, phi, psi);
        let params = MieParams::new(vec![MieMaterialData {
            forward_ratio,
            forward_g: g.abs(),
            backward_g: 0.5 * g.abs(),
        }])
        .unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let energy = MevEnergy::new(2.0 * ELECTRON_VOLT);
        let result = MieInteractor::new(&params, OpticalMaterialId::new(0), energy, &dir, &pol).sample(&mut rng);
        let new_pol = result.polarization.unwrap();
        prop_assert!(is_soft_unit_vector(&result.direction));
        prop_assert!(is_soft_orthogonal(&result.direction, &new_pol));
    }

    #[test]
    fn prop_cherenkov_dndx_monotonic(beta_lo in 0.5f64..1.0, delta in 0.0f64..0.5, charge in 1.0f64..3.0) {
        let materials = water();
        let params = CherenkovParams::new(&materials).unwrap();
        let calc = CherenkovDndxCalculator::new(materials.get(OpticalMaterialId::new(0)), &params, ElementaryCharge::new(charge));
        let beta_hi = (beta_lo + delta).min(1.0);
        let lo = calc.calc(LightSpeed::new(beta_lo));
        let hi = calc.calc(LightSpeed::new(beta_hi));
        prop_assert!(lo >= 0.0);
        prop_assert!(hi >= lo - 1e-9 * hi.abs());
    }

    #[test]
    fn prop_cherenkov_photons_on_cone(beta in 0.8f64..0.999, seed in 0u64..1000) {
        let materials = water();
        let params = CherenkovParams::new(&materials).unwrap();
        let material = materials.get(OpticalMaterialId::new(0));
        let pre = pre_step(beta);
        let post = StepPoint {
            speed: LightSpeed::new(beta),
            pos: [0.0, 0.0, 0.5],
            time: 0.5 / (beta * transport_types::constants::C_LIGHT),
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let offload = CherenkovOffload::new(ElementaryCharge::new(-1.0), 0.5, &pre, post, material, &params);
        if let Some(dist) = offload.sample(&mut rng) {
            prop_assert!(dist.is_valid());
            let generator = CherenkovGenerator::new(material, &params, &dist);
            for _ in 0..dist.num_photons.min(20) {
                let photon = generator.sample(&mut rng);
                assert_photon(&photon);
                let cos_theta = photon.direction[2];
                let n = material.refractive_index(photon.energy.value());
                prop_assert!((cos_theta - 1.0 / (n * beta)).abs() < 1e-6);
                prop_assert!(photon.position[2] >= 0.0 && photon.position[2] <= 0.5 + 1e-12);
                prop_assert!(photon.time <= post.time + 1e-18);
            }
        }
    }

    #[test]
    fn prop_scintillation_photons_valid(edep in 1e-3f64..1.0, frac in 0.0f64..=1.0, seed in 0u64..1000) {
        let params = ScintillationParams::new(&[ScintillationMaterialInput {
            yield_per_energy: 200.0,
            resolution_scale: 1.0,
            components: vec![
                ScintillationComponentInput {
                    yield_fraction: 0.7,
                    lambda_mean: 420e-7,
                    lambda_sigma: 20e-7,
                    rise_time: 1e-9,
                    fall_time: 5e-9,
                    spectrum: None,
                },
                ScintillationComponentInput {
                    yield_fraction: 0.3,
                    lambda_mean: 0.0,
                    lambda_sigma: 0.0,
                    rise_time: 0.0,
                    fall_time: 50e-9,
                    spectrum: Some(spectrum()),
                },
            ],
        }])
        .unwrap();
        let pre = pre_step(0.3);
        let post = StepPoint {
            speed: LightSpeed::new(0.2),
            pos: [0.0, 0.0, 0.1],
            time: 1e-12,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let offload = ScintillationOffload::new(
            ElementaryCharge::new(-1.0), 0.1, &pre, post, MevEnergy::new(edep), frac, &params,
        );
        if let Some(dist) = offload.sample(&mut rng) {
            let generator = ScintillationGenerator::new(&params, &dist);
            for _ in 0..dist.num_photons.min(20) {
                let photon = generator.sample(&mut rng);
                assert_photon(&photon);
                prop_assert!(photon.position[2] >= 0.0 && photon.position[2] <= 0.1 + 1e-12);
                prop_assert_eq!(photon.primary, TrackId(3));
            }
        }
    }

    #[test]
    fn prop_wls_lowers_energy(energy_ev in 2.0f64..5.0, seed in 0u64..1000) {
        let params = WavelengthShiftParams::new(
            &[WlsMaterialInput {
                mean_num_photons: 2.0,
                time_constant: 1e-9,
                spectrum: spectrum(),
            }],
            WlsTimeProfile::Exponential,
        )
        .unwrap();
        let energy = MevEnergy::new(energy_ev * ELECTRON_VOLT);
        let mut rng = StdRng::seed_from_u64(seed);
        let (interaction, dist) = WavelengthShiftInteractor::new(
            &params, OpticalMaterialId::new(0), energy, [0.0, 0.0, 1.0], 2e-9, TrackId(3),
        )
        .sample(&mut rng);
        prop_assert_eq!(interaction.action, Action::Absorbed);
        if let Some(dist) = dist {
            let generator = WavelengthShiftGenerator::new(&params, &dist);
            for _ in 0..dist.num_photons {
                let photon = generator.sample(&mut rng);
                assert_photon(&photon);
                prop_assert!(photon.energy.value() <= energy.value());
                prop_assert!(photon.time >= 2e-9);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Reflection mirrors the normal component, refraction conserves
    /// n sin θ, and both leave a transverse unit polarization.
    #[test]
    fn prop_fresnel_surface_kinematics(
        cost in 0.02f64..1.0, phi in 0.0f64..6.28, psi in 0.0f64..6.28,
        n_pre in 1.0f64..2.0, n_post in 1.0f64..2.0, seed in 0u64..1000,
    ) {
        let (dir, pol) = dir_and_pol(cost, phi, psi);
        let normal = [0.0, 0.0, -1.0];
        let calc = FresnelCalculator::new(&dir, &pol, &normal, n_post / n_pre);
        let r = calc.calc_reflectivity();
        prop_assert!((0.0..=1.0).contains(&r));

        let out = DielectricInteractor::new(&dir, &pol, &normal, n_pre, n_post, DielectricInterface::Dielectric)
            .sample(&mut StdRng::seed_from_u64(seed));
        prop_assert!(is_soft_unit_vector(&out.direction));
        prop_assert!(is_soft_unit_vector(&out.polarization));
        prop_assert!(is_soft_orthogonal(&out.direction, &out.polarization));
        let sin_in = (1.0 - dir[2] * dir[2]).max(0.0).sqrt();
        let sin_out = (1.0 - out.direction[2] * out.direction[2]).max(0.0).sqrt();
        match out.action {
            SurfaceAction::Reflected => {
                prop_assert!((out.direction[2] + dir[2]).abs() < 1e-9);
            }
            SurfaceAction::Refracted => {
                prop_assert!(!calc.is_total_internal_reflection());
                prop_assert!(out.direction[2] > 0.0);
                prop_assert!((n_pre * sin_in - n_post * sin_out).abs() < 1e-9);
            }
            other => prop_assert!(false, "unexpected {:?}", other),
        }
    }
}
