// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Simulation State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-slot bookkeeping: track identity, life cycle, step count, time,
//! and the actions selected for the current step.

use transport_types::ids::{ActionId, EventId, TrackId};
use transport_types::{StepLimit, TrackStatus};

/// Identity and start-of-track values assigned at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimInit {
    pub track_id: TrackId,
    pub parent_id: Option<TrackId>,
    pub event_id: EventId,
    /// Global time (s) at creation
    pub time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimState {
    pub track_id: TrackId,
    pub parent_id: Option<TrackId>,
    pub event_id: EventId,
    pub status: TrackStatus,
    pub num_steps: usize,
    /// Completed discrete and at-rest interactions
    pub num_interactions: u64,
    pub time: f64,
    pub step_length: f64,
    pub step_limit: StepLimit,
    pub along_step_action: Option<ActionId>,
}

pub struct SimTrackView<'a> {
    state: &'a mut SimState,
}

impl<'a> SimTrackView<'a> {
    pub fn new(state: &'a mut SimState) -> Self {
        SimTrackView { state }
    }

    /// Reset bookkeeping for a new track.
    pub fn initialize(&mut self, init: &SimInit) {
        *self.state = SimState {
            track_id: init.track_id,
            parent_id: init.parent_id,
            event_id: init.event_id,
            status: TrackStatus::Initializing,
            time: init.time,
            ..Default::default()
        };
    }

    pub fn track_id(&self) -> TrackId {
        self.state.track_id
    }

    pub fn parent_id(&self) -> Option<TrackId> {
        self.state.parent_id
    }

    pub fn event_id(&self) -> EventId {
        self.state.event_id
    }

    pub fn status(&self) -> TrackStatus {
        self.state.status
    }

    pub fn set_status(&mut self, status: TrackStatus) {
        self.state.status = status;
    }

    pub fn num_steps(&self) -> usize {
        self.state.num_steps
    }

    pub fn increment_num_steps(&mut self) {
        self.state.num_steps += 1;
    }

    pub fn num_interactions(&self) -> u64 {
        self.state.num_interactions
    }

    pub fn increment_num_interactions(&mut self) {
        self.state.num_interactions += 1;
    }

    pub fn time(&self) -> f64 {
        self.state.time
    }

    pub fn add_time(&mut self, delta: f64) {
        debug_assert!(delta >= 0.0);
        self.state.time += delta;
    }

    pub fn step_length(&self) -> f64 {
        self.state.step_length
    }

    pub fn set_step_length(&mut self, length: f64) {
        debug_assert!(length >= 0.0);
        self.state.step_length = length;
    }

    pub fn step_limit(&self) -> StepLimit {
        self.state.step_limit
    }

    pub fn post_step_action(&self) -> Option<ActionId> {
        self.state.step_limit.action
    }

    /// Start a new step with the physics limit.
    pub fn reset_step_limit(&mut self, limit: StepLimit) {
        debug_assert!(limit.is_valid());
        self.state.step_limit = limit;
    }

    /// Replace the limit if the new one is shorter.
    pub fn limit_step(&mut self, limit: StepLimit) -> bool {
        debug_assert!(limit.is_valid());
        if limit.step < self.state.step_limit.step {
            self.state.step_limit = limit;
            return true;
        }
        false
    }

    /// Unconditionally override the limit.
    pub fn force_step_limit(&mut self, limit: StepLimit) {
        self.state.step_limit = limit;
    }

    pub fn along_step_action(&self) -> Option<ActionId> {
        self.state.along_step_action
    }

    pub fn set_along_step_action(&mut self, action: Option<ActionId>) {
        self.state.along_step_action = action;
    }
}
