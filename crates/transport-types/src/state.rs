// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Track life-cycle status and step limits.

use crate::ids::ActionId;
use serde::{Deserialize, Serialize};

/// Life-cycle state of a track slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackStatus {
    /// Slot is empty and may be reused
    #[default]
    Inactive,
    /// A new track is being assigned
    Initializing,
    /// Normal stepping
    Alive,
    /// Soft end: absorbed, stopped, or left the world
    Killed,
    /// Hard failure: geometry, material, or step-count exhaustion
    Errored,
}

impl TrackStatus {
    /// Alive or in the middle of initialization.
    pub fn is_valid(self) -> bool {
        matches!(self, TrackStatus::Alive | TrackStatus::Initializing)
    }

    /// Killed or errored; the slot becomes inactive on the next pass.
    pub fn is_finished(self) -> bool {
        matches!(self, TrackStatus::Killed | TrackStatus::Errored)
    }
}

/// Proposed step length and the action that limits it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepLimit {
    pub step: f64,
    pub action: Option<ActionId>,
}

impl StepLimit {
    pub fn is_valid(&self) -> bool {
        self.step >= 0.0 && self.action.is_some()
    }
}
