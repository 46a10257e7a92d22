// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Optical Track View
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-slot optical photon state and its composite view.
//!
//! Optical photons share the geometry and the status state machine of
//! charged tracks but carry a polarization instead of physics state.
//! Crossing into a different optical material goes through the Fresnel
//! surface model.

use crate::generator::OpticalPhoton;
use crate::material::{OpticalMaterialParams, OpticalMaterialView};
use crate::surface::{DielectricInteractor, DielectricInterface, SurfaceAction};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use transport_core::geometry::{GeoTrackView, SlabGeoState, SlabGeometry, SlabTrackView, VolumeMaterialMap};
use transport_core::sim::{SimInit, SimState, SimTrackView};
use transport_core::track::ErrorReason;
use transport_math::array::is_soft_orthogonal;
use transport_types::constants::C_LIGHT;
use transport_types::ids::{EventId, OpticalMaterialId, TrackId, VolumeId};
use transport_types::units::MevEnergy;
use transport_types::{Action, Interaction, Real3, TrackStatus, TransportError, TransportResult};

/// Shared data for optical tracking.
#[derive(Debug, Clone)]
pub struct OpticalParams {
    pub geometry: SlabGeometry,
    pub volume_materials: VolumeMaterialMap,
    pub materials: OpticalMaterialParams,
    /// Surface type between any two different optical materials
    pub interface: DielectricInterface,
}

impl OpticalParams {
    pub fn new(
        geometry: SlabGeometry,
        volume_materials: VolumeMaterialMap,
        materials: OpticalMaterialParams,
    ) -> TransportResult<Self> {
        if volume_materials.len() != geometry.num_volumes() {
            return Err(TransportError::invalid(
                "optical",
                format!(
                    "{} volume materials for {} volumes",
                    volume_materials.len(),
                    geometry.num_volumes()
                ),
            ));
        }
        Ok(OpticalParams {
            geometry,
            volume_materials,
            materials,
            interface: DielectricInterface::default(),
        })
    }

    pub fn with_interface(mut self, interface: DielectricInterface) -> Self {
        self.interface = interface;
        self
    }

    /// Optical material filling a volume, if any.
    pub fn optical_material_for(&self, volume: VolumeId) -> Option<OpticalMaterialId> {
        self.volume_materials
            .material_id_for(volume)
            .and_then(|m| self.materials.optical_material(m))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalTrackInitializer {
    pub photon: OpticalPhoton,
    pub track_id: TrackId,
    pub event_id: EventId,
    pub rng_seed: u64,
}

#[derive(Debug, Clone)]
pub struct OpticalTrackState {
    pub sim: SimState,
    pub geo: SlabGeoState,
    pub material: Option<OpticalMaterialId>,
    pub energy: MevEnergy,
    pub polarization: Real3,
    pub rng: StdRng,
    pub diagnostic: Option<ErrorReason>,
}

impl Default for OpticalTrackState {
    fn default() -> Self {
        OpticalTrackState {
            sim: SimState::default(),
            geo: SlabGeoState::default(),
            material: None,
            energy: MevEnergy::zero(),
            polarization: [0.0; 3],
            rng: StdRng::seed_from_u64(0),
            diagnostic: None,
        }
    }
}

pub struct OpticalTrackView<'a> {
    params: &'a OpticalParams,
    state: &'a mut OpticalTrackState,
}

impl<'a> OpticalTrackView<'a> {
    pub fn new(params: &'a OpticalParams, state: &'a mut OpticalTrackState) -> Self {
        OpticalTrackView { params, state }
    }

    pub fn sim(&mut self) -> SimTrackView<'_> {
        SimTrackView::new(&mut self.state.sim)
    }

    pub fn status(&self) -> TrackStatus {
        self.state.sim.status
    }

    pub fn geometry(&mut self) -> SlabTrackView<'_> {
        SlabTrackView::new(&self.params.geometry, &mut self.state.geo)
    }

    pub fn energy(&self) -> MevEnergy {
        self.state.energy
    }

    pub fn polarization(&self) -> Real3 {
        self.state.polarization
    }

    pub fn material_id(&self) -> Option<OpticalMaterialId> {
        self.state.material
    }

    pub fn material(&self) -> Option<OpticalMaterialView<'a>> {
        self.state.material.map(|id| self.params.materials.get(id))
    }

    /// Phase speed (cm/s) in the current material.
    pub fn speed(&self) -> f64 {
        let n = self
            .material()
            .map_or(1.0, |m| m.refractive_index(self.state.energy.value()));
        C_LIGHT / n
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.state.rng
    }

    /// The failure that ended this track, if any.
    pub fn diagnostic(&self) -> Option<ErrorReason> {
        self.state.diagnostic
    }

    pub fn apply_errored(&mut self, reason: ErrorReason) {
        self.state.diagnostic = Some(reason);
        let mut sim = self.sim();
        sim.set_status(TrackStatus::Errored);
        sim.set_along_step_action(None);
    }

    /// Start a photon in this slot.
    pub fn initialize(&mut self, init: &OpticalTrackInitializer) {
        let photon = &init.photon;
        debug_assert!(is_soft_orthogonal(&photon.direction, &photon.polarization));
        self.sim().initialize(&SimInit {
            track_id: init.track_id,
            parent_id: Some(photon.primary),
            event_id: init.event_id,
            time: photon.time,
        });
        self.state.energy = photon.energy;
        self.state.polarization = photon.polarization;
        self.state.rng = StdRng::seed_from_u64(init.rng_seed);
        self.state.diagnostic = None;
        self.state.material = None;

        let (failed, outside) = {
            let mut geo = self.geometry();
            geo.initialize(photon.position, photon.direction);
            (geo.failed(), geo.is_outside())
        };
        if failed {
            self.apply_errored(ErrorReason::NavigationFailure);
            return;
        }
        if outside {
            self.apply_errored(ErrorReason::OutsideWorld);
            return;
        }
        if !self.enter_volume() {
            return;
        }
        self.sim().set_status(TrackStatus::Alive);
    }

    /// Look up the optical material of the current volume.
    fn enter_volume(&mut self) -> bool {
        let volume = self.geometry().volume_id();
        match self.params.optical_material_for(volume) {
            Some(material) => {
                self.state.material = Some(material);
                true
            }
            None => {
                self.apply_errored(ErrorReason::UnmappedMaterial(volume));
                false
            }
        }
    }

    /// Move up to `distance` along the current direction, stopping at a
    /// boundary. Returns the distance travelled.
    pub fn propagate(&mut self, distance: f64) -> f64 {
        debug_assert_eq!(self.status(), TrackStatus::Alive);
        let speed = self.speed();
        let (step, failed) = {
            let mut geo = self.geometry();
            let propagation = geo.find_next_step(distance);
            if propagation.boundary {
                geo.move_to_boundary();
            } else {
                geo.move_internal(propagation.distance);
            }
            (propagation.distance, geo.failed())
        };
        if failed {
            self.apply_errored(ErrorReason::NavigationFailure);
            return step;
        }
        let mut sim = self.sim();
        sim.set_step_length(step);
        sim.add_time(step / speed);
        step
    }

    /// Cross the boundary the photon sits on.
    ///
    /// Between two different optical materials the photon may instead be
    /// reflected back into its volume or absorbed by a metal surface.
    pub fn cross_boundary(&mut self) {
        let pre_geo = self.state.geo.clone();
        let pre_material = self.state.material;
        let (failed, outside) = {
            let mut geo = self.geometry();
            debug_assert!(geo.is_on_boundary());
            geo.cross_boundary();
            (geo.failed(), geo.is_outside())
        };
        if failed {
            self.apply_errored(ErrorReason::NavigationFailure);
        } else if outside {
            self.state.material = None;
            self.sim().set_status(TrackStatus::Killed);
        } else if self.enter_volume() {
            if let (Some(pre), Some(post)) = (pre_material, self.state.material) {
                if pre != post {
                    self.interact_with_surface(pre, post, pre_geo);
                }
            }
        }
    }

    /// Sample the Fresnel surface between `pre` and `post` after the
    /// geometry has already moved into `post`.
    fn interact_with_surface(&mut self, pre: OpticalMaterialId, post: OpticalMaterialId, pre_geo: SlabGeoState) {
        let energy = self.state.energy.value();
        let pre_index = self.params.materials.get(pre).refractive_index(energy);
        let post_index = self.params.materials.get(post).refractive_index(energy);
        let dir = self.geometry().dir();
        // Slab planes are normal to z; the normal faces the incident side
        let normal = [0.0, 0.0, -dir[2].signum()];
        let result = DielectricInteractor::new(
            &dir,
            &self.state.polarization,
            &normal,
            pre_index,
            post_index,
            self.params.interface,
        )
        .sample(&mut self.state.rng);

        match result.action {
            SurfaceAction::Reflected => {
                self.state.geo = pre_geo;
                self.state.material = Some(pre);
                self.geometry().set_dir(result.direction);
                self.state.polarization = result.polarization;
            }
            SurfaceAction::Refracted => {
                self.geometry().set_dir(result.direction);
                self.state.polarization = result.polarization;
            }
            SurfaceAction::Absorbed => {
                self.state.energy = MevEnergy::zero();
                self.sim().set_status(TrackStatus::Killed);
            }
            SurfaceAction::Transmitted => {}
        }
    }

    /// Update the photon from a discrete interaction.
    pub fn apply_interaction(&mut self, interaction: &Interaction<'_>) {
        match interaction.action {
            Action::Absorbed => {
                self.state.energy = MevEnergy::zero();
                self.sim().set_status(TrackStatus::Killed);
            }
            Action::Unchanged | Action::Failed => {}
            Action::Scattered => {
                self.state.energy = interaction.energy;
                self.geometry().set_dir(interaction.direction);
                if let Some(pol) = interaction.polarization {
                    debug_assert!(is_soft_orthogonal(&interaction.direction, &pol));
                    self.state.polarization = pol;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::tests::{glass_input, water_input};
    use crate::rayleigh::RayleighInteractor;
    use transport_math::array::dot;
    use transport_physics::Interactor;
    use transport_types::constants::ELECTRON_VOLT;
    use transport_types::ids::MaterialId;

    /// Glass from 0 to 2 cm, a non-optical material from 2 to 3 cm.
    fn params() -> OpticalParams {
        OpticalParams::new(
            SlabGeometry::new(vec![0.0, 1.0, 2.0, 3.0]).unwrap(),
            VolumeMaterialMap::new(vec![
                Some(MaterialId::new(0)),
                Some(MaterialId::new(0)),
                Some(MaterialId::new(1)),
            ]),
            OpticalMaterialParams::new(&[glass_input(0)], 2).unwrap(),
        )
        .unwrap()
    }

    fn photon(z: f64, dir: Real3) -> OpticalTrackInitializer {
        OpticalTrackInitializer {
            photon: OpticalPhoton {
                energy: MevEnergy::new(3.0 * ELECTRON_VOLT),
                position: [0.0, 0.0, z],
                direction: dir,
                polarization: [1.0, 0.0, 0.0],
                time: 0.0,
                primary: TrackId(5),
            },
            track_id: TrackId(0),
            event_id: EventId(0),
            rng_seed: 1,
        }
    }

    #[test]
    fn test_initialize() {
        let params = params();
        let mut state = OpticalTrackState::default();
        let mut track = OpticalTrackView::new(&params, &mut state);
        track.initialize(&photon(0.5, [0.0, 0.0, 1.0]));
        assert_eq!(track.status(), TrackStatus::Alive);
        assert_eq!(track.material_id(), Some(OpticalMaterialId::new(0)));
        assert!((track.speed() - C_LIGHT / 1.5).abs() < 1e-6 * C_LIGHT);
        assert_eq!(track.sim().parent_id(), Some(TrackId(5)));

        let mut state = OpticalTrackState::default();
        let mut track = OpticalTrackView::new(&params, &mut state);
        track.initialize(&photon(2.5, [0.0, 0.0, 1.0]));
        assert_eq!(track.status(), TrackStatus::Errored);
        assert_eq!(track.diagnostic(), Some(ErrorReason::UnmappedMaterial(VolumeId::new(2))));

        let mut state = OpticalTrackState::default();
        let mut track = OpticalTrackView::new(&params, &mut state);
        track.initialize(&photon(-0.5, [0.0, 0.0, 1.0]));
        assert_eq!(track.diagnostic(), Some(ErrorReason::OutsideWorld));
    }

    #[test]
    fn test_propagate_and_cross() {
        let params = params();
        let mut state = OpticalTrackState::default();
        let mut track = OpticalTrackView::new(&params, &mut state);
        track.initialize(&photon(0.5, [0.0, 0.0, 1.0]));

        assert!((track.propagate(0.25) - 0.25).abs() < 1e-12);
        assert!((track.sim().time() - 0.25 * 1.5 / C_LIGHT).abs() < 1e-20);
        assert!((track.propagate(10.0) - 0.25).abs() < 1e-12);
        assert!(track.geometry().is_on_boundary());
        track.cross_boundary();
        assert_eq!(track.status(), TrackStatus::Alive);
        assert_eq!(track.geometry().volume_id(), VolumeId::new(1));

        track.propagate(10.0);
        track.cross_boundary();
        assert_eq!(track.status(), TrackStatus::Errored);
        assert_eq!(track.diagnostic(), Some(ErrorReason::UnmappedMaterial(VolumeId::new(2))));

        // Leaving the world kills the photon
        let mut state = OpticalTrackState::default();
        let mut track = OpticalTrackView::new(&params, &mut state);
        track.initialize(&photon(0.5, [0.0, 0.0, -1.0]));
        track.propagate(10.0);
        track.cross_boundary();
        assert_eq!(track.status(), TrackStatus::Killed);
        assert!(track.diagnostic().is_none());
    }

    /// Glass from 0 to 1 cm, water from 1 to 2 cm.
    fn glass_water(interface: DielectricInterface) -> OpticalParams {
        OpticalParams::new(
            SlabGeometry::new(vec![0.0, 1.0, 2.0]).unwrap(),
            VolumeMaterialMap::new(vec![Some(MaterialId::new(0)), Some(MaterialId::new(1))]),
            OpticalMaterialParams::new(&[glass_input(0), water_input(1)], 2).unwrap(),
        )
        .unwrap()
        .with_interface(interface)
    }

    #[test]
    fn test_total_internal_reflection_at_boundary() {
        let params = glass_water(DielectricInterface::Dielectric);
        // sin θ = 0.954 exceeds the critical 1.34 / 1.5
        let dir = [(1.0 - 0.09_f64).sqrt(), 0.0, 0.3];
        let mut init = photon(0.5, dir);
        init.photon.polarization = [0.0, 1.0, 0.0];
        let mut state = OpticalTrackState::default();
        let mut track = OpticalTrackView::new(&params, &mut state);
        track.initialize(&init);
        track.propagate(10.0);
        track.cross_boundary();

        assert_eq!(track.status(), TrackStatus::Alive);
        assert_eq!(track.geometry().volume_id(), VolumeId::new(0));
        assert_eq!(track.material_id(), Some(OpticalMaterialId::new(0)));
        let reflected = track.geometry().dir();
        assert!((reflected[2] + 0.3).abs() < 1e-12);
        assert!(dot(&reflected, &track.polarization()).abs() < 1e-9);

        // The reflected photon crosses the glass back to the lower world edge
        assert!((track.propagate(10.0) - 1.0 / 0.3).abs() < 1e-9);
        track.cross_boundary();
        assert_eq!(track.status(), TrackStatus::Killed);
    }

    #[test]
    fn test_refraction_into_water() {
        let params = glass_water(DielectricInterface::Dielectric);
        let dir = [0.6, 0.0, 0.8];
        let mut init = photon(0.5, dir);
        init.photon.polarization = [0.0, 1.0, 0.0];
        let mut refracted = 0;
        for seed in 0..50 {
            init.rng_seed = seed;
            let mut state = OpticalTrackState::default();
            let mut track = OpticalTrackView::new(&params, &mut state);
            track.initialize(&init);
            track.propagate(10.0);
            track.cross_boundary();
            assert_eq!(track.status(), TrackStatus::Alive);
            let out = track.geometry().dir();
            if out[2] > 0.0 {
                refracted += 1;
                assert_eq!(track.material_id(), Some(OpticalMaterialId::new(1)));
                // n sin θ is conserved
                let n_water = params.materials.get(OpticalMaterialId::new(1)).refractive_index(track.energy().value());
                assert!((1.5 * 0.6 - n_water * out[0]).abs() < 1e-9);
            } else {
                assert_eq!(track.material_id(), Some(OpticalMaterialId::new(0)));
            }
        }
        // Reflectivity is below one percent at this angle
        assert!(refracted >= 45);
    }

    #[test]
    fn test_metal_surface_absorbs() {
        let params = glass_water(DielectricInterface::Metal);
        let mut killed = 0;
        for seed in 0..20 {
            let mut init = photon(0.5, [0.0, 0.0, 1.0]);
            init.rng_seed = seed;
            let mut state = OpticalTrackState::default();
            let mut track = OpticalTrackView::new(&params, &mut state);
            track.initialize(&init);
            track.propagate(10.0);
            track.cross_boundary();
            if track.status() == TrackStatus::Killed {
                killed += 1;
                assert_eq!(track.energy(), MevEnergy::zero());
            } else {
                assert_eq!(track.geometry().volume_id(), VolumeId::new(0));
                assert!(track.geometry().dir()[2] < 0.0);
            }
        }
        assert!(killed >= 18);
    }

    #[test]
    fn test_apply_interactions() {
        let params = params();
        let mut state = OpticalTrackState::default();
        let mut track = OpticalTrackView::new(&params, &mut state);
        track.initialize(&photon(0.5, [0.0, 0.0, 1.0]));

        let dir = track.geometry().dir();
        let pol = track.polarization();
        let result = RayleighInteractor::new(track.energy(), &dir, &pol).sample(track.rng());
        track.apply_interaction(&result);
        assert_eq!(track.status(), TrackStatus::Alive);
        let new_dir = track.geometry().dir();
        assert!(dot(&new_dir, &track.polarization()).abs() < 1e-9);
        assert_eq!(track.polarization(), result.polarization.unwrap());

        track.apply_interaction(&Interaction::from_absorption());
        assert_eq!(track.status(), TrackStatus::Killed);
        assert_eq!(track.energy(), MevEnergy::zero());
    }
}
