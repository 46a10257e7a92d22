// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Discrete Executors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete interactions: in-flight processes selected by cross section,
//! and at-rest processes for stopped positrons and negative muons.

use super::{InteractionApplier, TrackExecutor};
use crate::geometry::GeoTrackView;
use crate::physics::{select_discrete_process, ModelData, MucfChannel};
use crate::track::CoreTrackView;
use rand::distributions::Distribution;
use rand::Rng;
use transport_math::Selector;
use transport_nuclear::{DDMucfInteractor, DTMucfInteractor, NeutronElasticInteractor};
use transport_physics::cutoff::CutoffView;
use transport_physics::em::bethe_heitler::BetheHeitlerInteractor;
use transport_physics::em::combined_brem::CombinedBremInteractor;
use transport_physics::em::coulomb::CoulombScatteringInteractor;
use transport_physics::em::eplusgg::EPlusGGInteractor;
use transport_physics::em::klein_nishina::KleinNishinaInteractor;
use transport_physics::em::livermore_pe::LivermorePEInteractor;
use transport_physics::em::moller_bhabha::MollerBhabhaInteractor;
use transport_physics::em::muon::{MuBetheBlochInteractor, MuBremsstrahlungInteractor};
use transport_physics::em::rayleigh::RayleighInteractor;
use transport_physics::em::rel_brem::RelativisticBremInteractor;
use transport_physics::em::seltzer_berger::SeltzerBergerInteractor;
use transport_physics::material::{ElementSelector, IsotopeSelector};
use transport_physics::{ElementView, Interactor, MaterialView, ParticleTrackView};
use transport_types::{Action, Interaction, Real3, Secondary, StackAllocator, TrackStatus};

/// Weight for picking the target element of a material.
///
/// Proportional to the number of electrons plus nuclear charge squared,
/// the leading dependence of the radiative and Coulomb cross sections.
fn element_weight(element: ElementView<'_>) -> f64 {
    let z = element.atomic_number() as f64;
    z * (z + 1.0)
}

/// Sample one discrete interaction of the given model.
///
/// Energies at which a model is kinematically closed give an unchanged
/// result rather than violating the interactor's preconditions.
pub fn sample_model<'a, R: Rng + ?Sized>(
    model: &'a ModelData,
    particle: ParticleTrackView<'a>,
    direction: &Real3,
    material: MaterialView<'a>,
    cutoffs: &CutoffView<'_>,
    allocate: &'a StackAllocator<Secondary>,
    rng: &mut R,
) -> Interaction<'a> {
    let energy = particle.energy();
    let unchanged = Interaction::from_unchanged(energy, *direction);
    let select_element = |rng: &mut R| {
        let comp = ElementSelector::new(material, element_weight).sample(rng);
        (comp, material.element_record(comp))
    };

    match model {
        ModelData::KleinNishina(data) => {
            if energy.value() <= 0.0 {
                return unchanged;
            }
            KleinNishinaInteractor::new(data, &particle, direction, allocate).sample(rng)
        }
        ModelData::BetheHeitler(data) => {
            if energy.value() <= 2.0 * data.electron_mass {
                return unchanged;
            }
            let (_, element) = select_element(rng);
            BetheHeitlerInteractor::new(data, &particle, direction, allocate, element).sample(rng)
        }
        ModelData::EPlusGG(data) => EPlusGGInteractor::new(data, &particle, direction, allocate).sample(rng),
        ModelData::MollerBhabha(data) => {
            MollerBhabhaInteractor::new(data, &particle, cutoffs, direction, allocate).sample(rng)
        }
        ModelData::SeltzerBerger(data) => {
            if energy.value() <= cutoffs.energy(data.ids.gamma).value() {
                return unchanged;
            }
            let (comp, _) = select_element(rng);
            SeltzerBergerInteractor::new(data, particle, direction, cutoffs, allocate, material, comp).sample(rng)
        }
        ModelData::RelativisticBrem(data) => {
            if energy.value() <= cutoffs.energy(data.ids.gamma).value() {
                return unchanged;
            }
            let (comp, _) = select_element(rng);
            RelativisticBremInteractor::new(data, particle, direction, cutoffs, allocate, material, comp).sample(rng)
        }
        ModelData::CombinedBrem(data) => {
            let cutoff = cutoffs.energy(data.rb.ids.gamma).value();
            if cutoff <= 0.0 || energy.value() <= cutoff {
                return unchanged;
            }
            let (comp, _) = select_element(rng);
            CombinedBremInteractor::new(data, particle, direction, cutoffs, allocate, material, comp).sample(rng)
        }
        ModelData::CoulombScattering(data) => {
            if energy.value() <= 0.0 {
                return unchanged;
            }
            let (_, element) = select_element(rng);
            let isotope = IsotopeSelector::new(element).sample(rng);
            CoulombScatteringInteractor::new(
                data,
                particle,
                direction,
                &material,
                element,
                element.isotope(isotope),
                cutoffs,
            )
            .sample(rng)
        }
        ModelData::MuBetheBloch(data) => {
            MuBetheBlochInteractor::new(data, &particle, cutoffs, direction, allocate).sample(rng)
        }
        ModelData::MuBremsstrahlung(data) => {
            let (_, element) = select_element(rng);
            MuBremsstrahlungInteractor::new(data, &particle, direction, cutoffs, allocate, element).sample(rng)
        }
        ModelData::LivermorePE(data) => {
            if energy.value() <= 0.0 {
                return unchanged;
            }
            let micro_xs = |el: ElementView<'_>| data.element(el.element_id()).micro_xs(energy.value());
            if material.elements().iter().all(|c| data.element(c.element).micro_xs(energy.value()) <= 0.0) {
                // Every shell of every element is closed: absorb locally
                let mut absorbed = Interaction::from_absorption();
                absorbed.energy_deposition = energy;
                return absorbed;
            }
            let comp = ElementSelector::new(material, micro_xs).sample(rng);
            let element = material.element_id(comp);
            LivermorePEInteractor::new(data, &particle, direction, allocate, element).sample(rng)
        }
        ModelData::Rayleigh(data) => {
            if energy.value() <= 0.0 {
                return unchanged;
            }
            // Coherent scattering scales with the squared nuclear charge
            let comp = ElementSelector::new(material, |el: ElementView<'_>| {
                let z = el.atomic_number() as f64;
                z * z
            })
            .sample(rng);
            RayleighInteractor::new(data, &particle, direction, material.element_id(comp)).sample(rng)
        }
        ModelData::NeutronElastic(data) => {
            if energy.value() <= 0.0 {
                return unchanged;
            }
            // Geometric nuclear cross section
            let comp = ElementSelector::new(material, |el: ElementView<'_>| el.atomic_mass().value().powf(2.0 / 3.0))
                .sample(rng);
            let element = material.element_record(comp);
            let isotope = IsotopeSelector::new(element).sample(rng);
            NeutronElasticInteractor::new(data, &particle, direction, element.isotope(isotope)).sample(rng)
        }
    }
}

/// Sample the discrete process that limited the step.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscreteExecutor;

impl TrackExecutor for DiscreteExecutor {
    fn execute(&self, track: &mut CoreTrackView<'_>) {
        debug_assert_eq!(track.status(), TrackStatus::Alive);
        let params = track.params();
        let allocate = track.allocator();
        let particle = track.particle();
        let material = track.material();
        let cutoffs = params.cutoffs.get(material.material_id());
        let direction = track.geometry().dir();

        let process = {
            let mut views = track.views();
            let process = match views.physics.retry_process() {
                Some(process) => process,
                None => select_discrete_process(&views.physics, &mut *views.rng),
            };
            views.physics.reset_interaction_mfp();
            process
        };
        let model = params.physics.model(params.physics.processes[process].model);
        // A failed allocation rewinds the stream so the retry draws the
        // same numbers however full the shared stack was
        let replay = track.rng().clone();
        let result = sample_model(model, particle, &direction, material, &cutoffs, allocate, track.rng());
        if result.action == Action::Failed {
            *track.rng() = replay;
        }
        InteractionApplier::new(Some(process)).apply(track, &result);
    }
}

/// Annihilate a stopped positron or let a stopped negative muon fuse.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtRestExecutor;

impl TrackExecutor for AtRestExecutor {
    fn execute(&self, track: &mut CoreTrackView<'_>) {
        debug_assert_eq!(track.status(), TrackStatus::Alive);
        debug_assert!(track.particle().is_stopped());
        let params = track.params();
        let allocate = track.allocator();
        let particle = track.particle();
        let direction = track.geometry().dir();
        let physics = &params.physics;
        let pid = particle.particle_id();

        let annihilation = physics
            .annihilation
            .map(|id| physics.model(id))
            .filter(|model| model.applies_to(pid));
        let replay = track.rng().clone();
        let result = if let Some(ModelData::EPlusGG(data)) = annihilation {
            EPlusGGInteractor::new(data, &particle, &direction, allocate).sample(track.rng())
        } else if let Some(mucf) = physics.mucf.as_ref().filter(|m| m.data.ids.mu_minus == pid) {
            let rng = track.rng();
            let select = Selector::new(|i| mucf.channels[i].weight, mucf.channels.len(), mucf.total_weight);
            match mucf.channels[select.sample(rng)].channel {
                MucfChannel::Dd(channel) => DDMucfInteractor::new(&mucf.data, channel, allocate).sample(rng),
                MucfChannel::Dt(channel) => DTMucfInteractor::new(&mucf.data, channel, allocate).sample(rng),
            }
        } else {
            debug_assert!(false, "no at-rest process for particle {pid}");
            return;
        };
        if result.action == Action::Failed {
            *track.rng() = replay;
        }
        InteractionApplier::new(None).apply(track, &result);
    }
}
