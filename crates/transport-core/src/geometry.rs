// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Navigation contract consumed by the executors, plus a reference
//! geometry of infinite slabs stacked along z.
//!
//! Navigation is stateful per track slot: `find_next_step` caches the
//! distance to the next boundary, which `move_to_boundary` then consumes.

use serde::{Deserialize, Serialize};
use transport_math::array::{add, is_soft_unit_vector, scale};
use transport_types::ids::{MaterialId, VolumeId};
use transport_types::{Real3, TransportError, TransportResult};

/// Result of a straight-line search along the current direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagation {
    /// Distance actually allowed (cm)
    pub distance: f64,
    /// Whether the distance ends on a volume boundary
    pub boundary: bool,
}

/// Per-slot navigation state accessor.
///
/// All operations are synchronous and touch only the owning slot.
/// Failures are reported through [`GeoTrackView::failed`] rather than a
/// `Result` so the stepping loop stays branch-light.
pub trait GeoTrackView {
    fn pos(&self) -> Real3;
    fn dir(&self) -> Real3;
    /// Current volume; only meaningful when not outside
    fn volume_id(&self) -> VolumeId;
    fn is_outside(&self) -> bool;
    fn is_on_boundary(&self) -> bool;
    /// Whether the last navigation call failed
    fn failed(&self) -> bool;

    /// Place the track and locate the enclosing volume.
    fn initialize(&mut self, pos: Real3, dir: Real3);
    /// Distance to the next boundary, capped at `max_distance`.
    fn find_next_step(&mut self, max_distance: f64) -> Propagation;
    /// Isotropic distance to the nearest boundary.
    fn find_safety(&mut self) -> f64;
    fn move_to_boundary(&mut self);
    /// Move along the current direction without reaching a boundary.
    fn move_internal(&mut self, distance: f64);
    /// Move to a nearby point in the current volume.
    fn move_to_position(&mut self, pos: Real3);
    fn cross_boundary(&mut self);
    fn set_dir(&mut self, dir: Real3);
}

/// Volumes separated by planes of constant z, unbounded in x and y.
///
/// Volume `i` spans `[planes[i], planes[i + 1]]`; everything below the
/// first plane or above the last is outside the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlabGeometry {
    planes: Vec<f64>,
}

impl SlabGeometry {
    pub fn new(planes: Vec<f64>) -> TransportResult<Self> {
        if planes.len() < 2 {
            return Err(TransportError::invalid("geometry", "need at least two planes"));
        }
        if !planes.windows(2).all(|w| w[0] < w[1]) || planes.iter().any(|z| !z.is_finite()) {
            return Err(TransportError::invalid(
                "geometry",
                format!("planes must be finite and strictly increasing: {planes:?}"),
            ));
        }
        Ok(SlabGeometry { planes })
    }

    pub fn num_volumes(&self) -> usize {
        self.planes.len() - 1
    }

    /// Volume containing `z`; on a plane, the volume the direction enters.
    fn locate(&self, z: f64, dir_z: f64) -> Option<usize> {
        let last = self.planes.len() - 1;
        if z < self.planes[0] || z > self.planes[last] {
            return None;
        }
        match self.planes.binary_search_by(|p| p.total_cmp(&z)) {
            Ok(i) if dir_z >= 0.0 => (i < last).then_some(i),
            Ok(i) => i.checked_sub(1),
            Err(i) => Some(i - 1),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlabGeoState {
    pos: Real3,
    dir: Real3,
    volume: Option<usize>,
    on_boundary: bool,
    failed: bool,
    next_step: f64,
    next_boundary: bool,
}

pub struct SlabTrackView<'a> {
    geometry: &'a SlabGeometry,
    state: &'a mut SlabGeoState,
}

impl<'a> SlabTrackView<'a> {
    pub fn new(geometry: &'a SlabGeometry, state: &'a mut SlabGeoState) -> Self {
        SlabTrackView { geometry, state }
    }

    /// Overwrite the state, e.g. with a copy of a parent's.
    pub fn state_mut(&mut self) -> &mut SlabGeoState {
        self.state
    }

    /// Planes bounding the current volume.
    fn bounds(&self) -> Option<(f64, f64)> {
        self.state
            .volume
            .map(|v| (self.geometry.planes[v], self.geometry.planes[v + 1]))
    }
}

impl GeoTrackView for SlabTrackView<'_> {
    fn pos(&self) -> Real3 {
        self.state.pos
    }

    fn dir(&self) -> Real3 {
        self.state.dir
    }

    fn volume_id(&self) -> VolumeId {
        debug_assert!(!self.is_outside());
        VolumeId::new(self.state.volume.unwrap_or_default())
    }

    fn is_outside(&self) -> bool {
        self.state.volume.is_none()
    }

    fn is_on_boundary(&self) -> bool {
        self.state.on_boundary
    }

    fn failed(&self) -> bool {
        self.state.failed
    }

    fn initialize(&mut self, pos: Real3, dir: Real3) {
        let valid = pos.iter().all(|x| x.is_finite()) && is_soft_unit_vector(&dir);
        *self.state = SlabGeoState {
            pos,
            dir,
            volume: if valid { self.geometry.locate(pos[2], dir[2]) } else { None },
            failed: !valid,
            ..Default::default()
        };
    }

    fn find_next_step(&mut self, max_distance: f64) -> Propagation {
        debug_assert!(max_distance > 0.0);
        let Some((lo, hi)) = self.bounds() else {
            self.state.failed = true;
            return Propagation {
                distance: 0.0,
                boundary: false,
            };
        };
        let (z, uz) = (self.state.pos[2], self.state.dir[2]);
        let to_plane = if uz > 0.0 {
            (hi - z) / uz
        } else if uz < 0.0 {
            (lo - z) / uz
        } else {
            f64::INFINITY
        };
        let result = if to_plane <= max_distance {
            Propagation {
                distance: to_plane.max(0.0),
                boundary: true,
            }
        } else {
            Propagation {
                distance: max_distance,
                boundary: false,
            }
        };
        self.state.next_step = result.distance;
        self.state.next_boundary = result.boundary;
        result
    }

    fn find_safety(&mut self) -> f64 {
        if self.state.on_boundary {
            return 0.0;
        }
        self.bounds()
            .map_or(0.0, |(lo, hi)| (self.state.pos[2] - lo).min(hi - self.state.pos[2]).max(0.0))
    }

    fn move_to_boundary(&mut self) {
        debug_assert!(self.state.next_boundary);
        let mut pos = add(&self.state.pos, &scale(&self.state.dir, self.state.next_step));
        // Snap onto the plane to avoid round-off relocating the track
        if let Some((lo, hi)) = self.bounds() {
            pos[2] = if self.state.dir[2] > 0.0 { hi } else { lo };
        }
        self.state.pos = pos;
        self.state.on_boundary = true;
        self.state.next_step = 0.0;
    }

    fn move_internal(&mut self, distance: f64) {
        debug_assert!(distance >= 0.0);
        debug_assert!(!self.state.next_boundary || distance < self.state.next_step);
        self.state.pos = add(&self.state.pos, &scale(&self.state.dir, distance));
        self.state.on_boundary = false;
        self.state.next_step -= distance;
    }

    fn move_to_position(&mut self, pos: Real3) {
        match self.bounds() {
            Some((lo, hi)) if (lo..=hi).contains(&pos[2]) => {
                self.state.pos = pos;
                self.state.on_boundary = false;
                self.state.next_step = 0.0;
                self.state.next_boundary = false;
            }
            _ => self.state.failed = true,
        }
    }

    fn cross_boundary(&mut self) {
        let Some(volume) = self.state.volume.filter(|_| self.state.on_boundary) else {
            self.state.failed = true;
            return;
        };
        // Side comes from the plane the track sits on, not the direction
        let hi = self.geometry.planes[volume + 1];
        self.state.volume = if self.state.pos[2] == hi {
            Some(volume + 1).filter(|&v| v < self.geometry.num_volumes())
        } else {
            volume.checked_sub(1)
        };
    }

    fn set_dir(&mut self, dir: Real3) {
        debug_assert!(is_soft_unit_vector(&dir));
        self.state.dir = dir;
        self.state.next_step = 0.0;
        self.state.next_boundary = false;
    }
}

/// Material filling each volume; `None` marks an unmapped volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeMaterialMap {
    materials: Vec<Option<MaterialId>>,
}

impl VolumeMaterialMap {
    pub fn new(materials: Vec<Option<MaterialId>>) -> Self {
        VolumeMaterialMap { materials }
    }

    pub fn material_id_for(&self, volume: VolumeId) -> Option<MaterialId> {
        self.materials.get(volume.get()).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slabs() -> SlabGeometry {
        SlabGeometry::new(vec![0.0, 1.0, 3.0]).unwrap()
    }

    #[test]
    fn test_invalid_planes() {
        assert!(SlabGeometry::new(vec![1.0]).is_err());
        assert!(SlabGeometry::new(vec![0.0, 2.0, 1.0]).is_err());
    }

    #[test]
    fn test_locate() {
        let geo = slabs();
        assert_eq!(geo.locate(0.5, 1.0), Some(0));
        assert_eq!(geo.locate(2.0, -1.0), Some(1));
        assert_eq!(geo.locate(1.0, 1.0), Some(1));
        assert_eq!(geo.locate(1.0, -1.0), Some(0));
        assert_eq!(geo.locate(3.0, 1.0), None);
        assert_eq!(geo.locate(0.0, -1.0), None);
        assert_eq!(geo.locate(-0.1, 1.0), None);
    }

    #[test]
    fn test_step_and_cross() {
        let geo = slabs();
        let mut state = SlabGeoState::default();
        let mut view = SlabTrackView::new(&geo, &mut state);
        view.initialize([0.0, 0.0, 0.25], [0.0, 0.0, 1.0]);
        assert!(!view.failed());
        assert_eq!(view.volume_id(), VolumeId::new(0));
        assert!((view.find_safety() - 0.25).abs() < 1e-12);

        let prop = view.find_next_step(10.0);
        assert!(prop.boundary);
        assert!((prop.distance - 0.75).abs() < 1e-12);
        view.move_to_boundary();
        assert!(view.is_on_boundary());
        assert_eq!(view.pos()[2], 1.0);
        view.cross_boundary();
        assert_eq!(view.volume_id(), VolumeId::new(1));

        let prop = view.find_next_step(0.5);
        assert!(!prop.boundary);
        view.move_internal(0.5);
        assert!(!view.is_on_boundary());

        let prop = view.find_next_step(10.0);
        assert!((prop.distance - 1.5).abs() < 1e-12);
        view.move_to_boundary();
        view.cross_boundary();
        assert!(view.is_outside());
    }

    #[test]
    fn test_cross_after_turning_back() {
        let geo = slabs();
        let mut state = SlabGeoState::default();
        let mut view = SlabTrackView::new(&geo, &mut state);
        view.initialize([0.0, 0.0, 0.5], [0.0, 0.0, 1.0]);
        view.find_next_step(10.0);
        view.move_to_boundary();
        view.set_dir([0.0, 0.0, -1.0]);
        view.cross_boundary();
        assert_eq!(view.volume_id(), VolumeId::new(1));
    }

    #[test]
    fn test_oblique_and_parallel() {
        let geo = slabs();
        let mut state = SlabGeoState::default();
        let mut view = SlabTrackView::new(&geo, &mut state);
        let s = 0.5f64.sqrt();
        view.initialize([0.0, 0.0, 0.5], [s, 0.0, -s]);
        let prop = view.find_next_step(10.0);
        assert!((prop.distance - 0.5 / s).abs() < 1e-12);

        view.set_dir([1.0, 0.0, 0.0]);
        let prop = view.find_next_step(7.0);
        assert!(!prop.boundary);
        assert_eq!(prop.distance, 7.0);
    }

    #[test]
    fn test_failures() {
        let geo = slabs();
        let mut state = SlabGeoState::default();
        let mut view = SlabTrackView::new(&geo, &mut state);
        view.initialize([0.0, 0.0, 0.5], [0.0, 0.0, 2.0]);
        assert!(view.failed());

        view.initialize([0.0, 0.0, 0.5], [0.0, 0.0, 1.0]);
        view.cross_boundary();
        assert!(view.failed());

        view.initialize([0.0, 0.0, 0.5], [0.0, 0.0, 1.0]);
        view.move_to_position([0.0, 0.0, 2.0]);
        assert!(view.failed());
    }

    #[test]
    fn test_material_map() {
        let map = VolumeMaterialMap::new(vec![Some(MaterialId::new(2)), None]);
        assert_eq!(map.material_id_for(VolumeId::new(0)), Some(MaterialId::new(2)));
        assert_eq!(map.material_id_for(VolumeId::new(1)), None);
        assert_eq!(map.material_id_for(VolumeId::new(5)), None);
    }
}
