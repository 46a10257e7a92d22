// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Core Track View
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shared core params, per-slot track state, and the composite view that
//! stitches them together for one slot.

use crate::action::CoreActions;
use crate::geometry::{GeoTrackView, SlabGeoState, SlabGeometry, SlabTrackView, VolumeMaterialMap};
use crate::physics::{PhysicsParams, PhysicsState, PhysicsTrackView};
use crate::sim::{SimInit, SimState, SimTrackView};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use transport_physics::cutoff::CutoffParams;
use transport_physics::{MaterialParams, MaterialView, ParticleParams, ParticleTrackView};
use transport_types::config::TransportConfig;
use transport_types::ids::{ActionId, MaterialId, ParticleId, TrackId, TrackSlotId, VolumeId};
use transport_types::units::MevEnergy;
use transport_types::{Real3, Secondary, StackAllocator, StepLimit, TrackStatus, TransportError, TransportResult};

/// Immutable data shared by every track slot.
#[derive(Debug, Clone)]
pub struct CoreParams {
    pub config: TransportConfig,
    pub particles: ParticleParams,
    pub materials: MaterialParams,
    pub cutoffs: CutoffParams,
    pub geometry: SlabGeometry,
    pub volume_materials: VolumeMaterialMap,
    pub physics: PhysicsParams,
    pub actions: CoreActions,
}

impl CoreParams {
    pub fn new(
        config: TransportConfig,
        particles: ParticleParams,
        materials: MaterialParams,
        cutoffs: CutoffParams,
        geometry: SlabGeometry,
        volume_materials: VolumeMaterialMap,
        physics: PhysicsParams,
    ) -> TransportResult<Self> {
        config.validate()?;
        if volume_materials.len() != geometry.num_volumes() {
            return Err(TransportError::invalid(
                "core",
                format!(
                    "{} volume materials for {} volumes",
                    volume_materials.len(),
                    geometry.num_volumes()
                ),
            ));
        }
        if cutoffs.num_materials() != materials.num_materials() {
            return Err(TransportError::invalid("core", "cutoffs must cover every material"));
        }
        let bad_material = (0..geometry.num_volumes())
            .filter_map(|v| volume_materials.material_id_for(VolumeId::new(v)))
            .find(|m| m.get() >= materials.num_materials());
        if let Some(m) = bad_material {
            return Err(TransportError::invalid("core", format!("volume maps to unknown material {m}")));
        }
        Ok(CoreParams {
            config,
            particles,
            materials,
            cutoffs,
            geometry,
            volume_materials,
            physics,
            actions: CoreActions::new(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParticleState {
    pub particle_id: ParticleId,
    pub energy: MevEnergy,
}

/// Why a track ended in the errored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    OutsideWorld,
    NavigationFailure,
    UnmappedMaterial(VolumeId),
    StepLimitExceeded,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorReason::OutsideWorld => write!(f, "started outside the world"),
            ErrorReason::NavigationFailure => write!(f, "navigation failed"),
            ErrorReason::UnmappedMaterial(v) => write!(f, "no material for volume {v}"),
            ErrorReason::StepLimitExceeded => write!(f, "exceeded the maximum step count"),
        }
    }
}

/// Failure record kept on the slot until the host reports it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorDiagnostic {
    pub track_id: TrackId,
    pub slot: TrackSlotId,
    pub reason: ErrorReason,
    pub pos: Real3,
    pub energy: MevEnergy,
}

/// Where a new track's geometry state comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoInit {
    /// Locate the position from scratch
    Locate { pos: Real3, dir: Real3 },
    /// Parent's state when the track was created, with a new direction
    FromParent { state: SlabGeoState, dir: Real3 },
}

/// Everything needed to start a track in an empty slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackInitializer {
    pub sim: SimInit,
    pub particle: ParticleState,
    pub geo: GeoInit,
    /// Seed of the track's random stream
    pub rng_seed: u64,
}

/// All mutable state of one track slot.
#[derive(Debug, Clone)]
pub struct TrackSlot {
    pub sim: SimState,
    pub particle: ParticleState,
    pub geo: SlabGeoState,
    pub material: Option<MaterialId>,
    pub physics: PhysicsState,
    pub rng: StdRng,
    pub rng_seed: u64,
    /// Secondaries that survived production cuts this step
    pub secondaries: Vec<Secondary>,
    pub diagnostic: Option<ErrorDiagnostic>,
}

impl TrackSlot {
    pub fn new(params: &CoreParams) -> Self {
        TrackSlot {
            sim: SimState::default(),
            particle: ParticleState::default(),
            geo: SlabGeoState::default(),
            material: None,
            physics: PhysicsState::new(params.physics.max_processes()),
            rng: StdRng::seed_from_u64(0),
            rng_seed: 0,
            secondaries: Vec::new(),
            diagnostic: None,
        }
    }
}

/// Fixed-size array of track slots.
#[derive(Debug, Clone)]
pub struct CoreState {
    pub slots: Vec<TrackSlot>,
}

impl CoreState {
    pub fn new(params: &CoreParams, num_slots: usize) -> Self {
        CoreState {
            slots: (0..num_slots).map(|_| TrackSlot::new(params)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn count_status(&self, status: TrackStatus) -> usize {
        self.slots.iter().filter(|s| s.sim.status == status).count()
    }
}

/// Disjoint mutable views of one slot, for executors needing several.
pub struct TrackViews<'t> {
    pub sim: SimTrackView<'t>,
    pub geo: SlabTrackView<'t>,
    pub physics: PhysicsTrackView<'t>,
    pub particle: &'t mut ParticleState,
    pub rng: &'t mut StdRng,
    pub secondaries: &'t mut Vec<Secondary>,
}

/// Composite view over one track slot.
pub struct CoreTrackView<'a> {
    params: &'a CoreParams,
    slot_id: TrackSlotId,
    slot: &'a mut TrackSlot,
    allocate: &'a StackAllocator<Secondary>,
}

impl<'a> CoreTrackView<'a> {
    pub fn new(
        params: &'a CoreParams,
        slot_id: TrackSlotId,
        slot: &'a mut TrackSlot,
        allocate: &'a StackAllocator<Secondary>,
    ) -> Self {
        CoreTrackView {
            params,
            slot_id,
            slot,
            allocate,
        }
    }

    pub fn params(&self) -> &'a CoreParams {
        self.params
    }

    pub fn slot_id(&self) -> TrackSlotId {
        self.slot_id
    }

    pub fn allocator(&self) -> &'a StackAllocator<Secondary> {
        self.allocate
    }

    pub fn sim(&mut self) -> SimTrackView<'_> {
        SimTrackView::new(&mut self.slot.sim)
    }

    pub fn status(&self) -> TrackStatus {
        self.slot.sim.status
    }

    pub fn geometry(&mut self) -> SlabTrackView<'_> {
        SlabTrackView::new(&self.params.geometry, &mut self.slot.geo)
    }

    pub fn particle(&self) -> ParticleTrackView<'a> {
        ParticleTrackView::new(
            &self.params.particles,
            self.slot.particle.particle_id,
            self.slot.particle.energy,
        )
    }

    pub fn material_id(&self) -> Option<MaterialId> {
        self.slot.material
    }

    pub fn material(&self) -> MaterialView<'a> {
        debug_assert!(self.slot.material.is_some());
        self.params.materials.material(self.slot.material.unwrap_or_default())
    }

    pub fn physics(&mut self) -> PhysicsTrackView<'_> {
        debug_assert!(self.slot.material.is_some());
        PhysicsTrackView::new(
            &self.params.physics,
            &mut self.slot.physics,
            self.slot.particle.particle_id,
            self.slot.material.unwrap_or_default(),
        )
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.slot.rng
    }

    pub fn rng_seed(&self) -> u64 {
        self.slot.rng_seed
    }

    /// Borrow the sub-views simultaneously.
    pub fn views(&mut self) -> TrackViews<'_> {
        debug_assert!(self.slot.material.is_some());
        let slot = &mut *self.slot;
        TrackViews {
            sim: SimTrackView::new(&mut slot.sim),
            geo: SlabTrackView::new(&self.params.geometry, &mut slot.geo),
            physics: PhysicsTrackView::new(
                &self.params.physics,
                &mut slot.physics,
                slot.particle.particle_id,
                slot.material.unwrap_or_default(),
            ),
            particle: &mut slot.particle,
            rng: &mut slot.rng,
            secondaries: &mut slot.secondaries,
        }
    }

    pub fn set_energy(&mut self, energy: MevEnergy) {
        debug_assert!(energy.value() >= 0.0);
        self.slot.particle.energy = energy;
    }

    /// Deposit energy locally, also for tracks without a material.
    pub fn deposit_energy(&mut self, energy: MevEnergy) {
        debug_assert!(energy.value() >= 0.0);
        self.slot.physics.energy_deposition += energy.value();
    }

    pub fn set_material(&mut self, material: MaterialId) {
        self.slot.material = Some(material);
    }

    pub fn boundary_action(&self) -> ActionId {
        self.params.actions.boundary
    }

    pub fn propagation_limit_action(&self) -> ActionId {
        self.params.actions.propagation_limit
    }

    pub fn tracking_cut_action(&self) -> ActionId {
        self.params.actions.tracking_cut
    }

    /// Flag a track-fatal failure and route the track to the tracking cut.
    ///
    /// Must be called before the post-step action runs so the remaining
    /// energy is still deposited.
    pub fn apply_errored(&mut self, reason: ErrorReason) {
        let tracking_cut = self.tracking_cut_action();
        self.slot.diagnostic = Some(ErrorDiagnostic {
            track_id: self.slot.sim.track_id,
            slot: self.slot_id,
            reason,
            pos: self.geometry().pos(),
            energy: self.slot.particle.energy,
        });
        let mut sim = self.sim();
        sim.set_status(TrackStatus::Errored);
        sim.set_along_step_action(None);
        sim.force_step_limit(StepLimit {
            step: 0.0,
            action: Some(tracking_cut),
        });
    }

    /// Start a new track in this slot.
    ///
    /// Each stage short-circuits on failure, leaving the track errored.
    pub fn initialize(&mut self, init: &TrackInitializer) {
        debug_assert_eq!(self.status(), TrackStatus::Inactive);
        self.sim().initialize(&init.sim);
        self.slot.particle = init.particle;
        self.slot.rng_seed = init.rng_seed;
        self.slot.rng = StdRng::seed_from_u64(init.rng_seed);
        self.slot.secondaries.clear();
        self.slot.diagnostic = None;
        self.slot.material = None;

        let (failed, outside) = {
            let mut geo = self.geometry();
            match &init.geo {
                GeoInit::Locate { pos, dir } => geo.initialize(*pos, *dir),
                GeoInit::FromParent { state, dir } => {
                    *geo.state_mut() = state.clone();
                    geo.set_dir(*dir);
                }
            }
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
        let volume = self.geometry().volume_id();
        let Some(material) = self.params.volume_materials.material_id_for(volume) else {
            self.apply_errored(ErrorReason::UnmappedMaterial(volume));
            return;
        };
        self.slot.material = Some(material);
        self.slot.physics.reset();
        self.sim().set_status(TrackStatus::Alive);
    }
}

/// Mix two words into a well-distributed seed (splitmix64 finalizer).
pub fn mix_seed(a: u64, b: u64) -> u64 {
    let mut z = a ^ b.wrapping_add(0x9e37_79b9_7f4a_7c15).wrapping_add(a << 6).wrapping_add(a >> 2);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
