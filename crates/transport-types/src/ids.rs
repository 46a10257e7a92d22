// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Ids
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Opaque index types into the shared parameter arenas.
//!
//! An absent id is expressed as `Option<Id>`, never as a sentinel value.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: usize) -> Self {
                $name(index as u32)
            }

            /// Index into the owning collection.
            #[inline]
            pub const fn get(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(
    /// Index into the particle definitions
    ParticleId
);
opaque_id!(
    /// Index into the material definitions
    MaterialId
);
opaque_id!(
    /// Index into the element definitions
    ElementId
);
opaque_id!(
    /// Index of an element within a single material
    ElementComponentId
);
opaque_id!(
    /// Index of an isotope within a single element
    IsotopeComponentId
);
opaque_id!(
    /// Geometry volume
    VolumeId
);
opaque_id!(
    /// Registered step action (boundary, discrete model, tracking cut...)
    ActionId
);
opaque_id!(
    /// Physics model index within the physics params
    ModelId
);
opaque_id!(
    /// Optical material
    OpticalMaterialId
);
opaque_id!(
    /// Slot in the per-track state arrays
    TrackSlotId
);

/// Logical track identifier, unique within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub u64);

/// Event identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
