// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Property-Based Tests (proptest) for transport-nuclear
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property tests for muon-catalyzed fusion final states and elastic
//! neutron scattering.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use transport_math::array::is_soft_unit_vector;
use transport_nuclear::mucf::{DDChannel, DTChannel, MuonEnergyCdf};
use transport_nuclear::{DDMucfInteractor, DTMucfInteractor, MucfData, NeutronElasticData, NeutronElasticInteractor};
use transport_physics::material::IsotopeRecord;
use transport_physics::{Interactor, ParticleParams, ParticleTrackView};
use transport_types::units::{MevEnergy, MevMass};
use transport_types::{Action, StackAllocator};

fn data() -> MucfData {
    let particles = ParticleParams::standard().unwrap();
    MucfData::new(&particles, &MuonEnergyCdf::default()).unwrap()
}

fn dd_channel() -> impl Strategy<Value = DDChannel> {
    prop_oneof![
        Just(DDChannel::Helium3MuonNeutron),
        Just(DDChannel::MuonicHelium3Neutron),
        Just(DDChannel::TritiumMuonProton),
    ]
}

fn dt_channel() -> impl Strategy<Value = DTChannel> {
    prop_oneof![Just(DTChannel::AlphaMuonNeutron), Just(DTChannel::MuonicAlphaNeutron)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn dd_products_are_physical(channel in dd_channel(), seed in any::<u64>()) {
        let data = data();
        let alloc = StackAllocator::new(3);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = DDMucfInteractor::new(&data, channel, &alloc).sample(&mut rng);
        prop_assert_eq!(result.action, Action::Absorbed);
        prop_assert_eq!(result.secondaries.len(), channel.num_secondaries());
        for s in result.secondaries {
            prop_assert!(s.particle_id.is_some());
            prop_assert!(s.energy.value() >= 0.0);
            prop_assert!(is_soft_unit_vector(&s.direction));
        }
        let total: f64 = result.secondaries.iter().map(|s| s.energy.value()).sum();
        prop_assert!(total > 3.0 && total < 4.4, "total = {}", total);
    }

    #[test]
    fn dt_neutron_carries_fixed_energy(channel in dt_channel(), seed in any::<u64>()) {
        let data = data();
        let alloc = StackAllocator::new(3);
        let mut rng = StdRng::seed_from_u64(seed);
        let result = DTMucfInteractor::new(&data, channel, &alloc).sample(&mut rng);
        let neutron = result.secondaries[0];
        prop_assert_eq!(neutron.particle_id, Some(data.ids.neutron));
        prop_assert!((neutron.energy.value() - 14.1).abs() < 1e-12);
        let total: f64 = result.secondaries.iter().map(|s| s.energy.value()).sum();
        prop_assert!((total - 17.6).abs() < 0.5, "total = {}", total);
    }

    #[test]
    fn neutron_elastic_conserves_energy(
        log_e in -4.0f64..2.5,
        mass_number in 1u32..240,
        seed in any::<u64>(),
    ) {
        let particles = ParticleParams::standard().unwrap();
        let data = NeutronElasticData::new(&particles).unwrap();
        let energy = 10f64.powf(log_e);
        let target = IsotopeRecord {
            mass_number,
            nuclear_mass: MevMass::new(931.494 * f64::from(mass_number)),
            abundance: 1.0,
        };
        let neutron = ParticleTrackView::new(&particles, data.neutron, MevEnergy::new(energy));
        let mut rng = StdRng::seed_from_u64(seed);
        let result = NeutronElasticInteractor::new(&data, &neutron, &[0.0, 0.0, 1.0], &target).sample(&mut rng);
        prop_assert_eq!(result.action, Action::Scattered);
        prop_assert!(is_soft_unit_vector(&result.direction));
        prop_assert!(result.energy.value() <= energy);
        prop_assert!(result.energy_deposition.value() >= 0.0);
        let total = result.energy.value() + result.energy_deposition.value();
        prop_assert!((total - energy).abs() <= 1e-12 * energy.max(1.0));
    }
}
