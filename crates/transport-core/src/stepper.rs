// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Stepper
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Host-side driver that runs steps over a fixed batch of track slots.
//!
//! Each step fills empty slots from the initializer queue, advances every
//! slot in parallel, then gathers deposition, error diagnostics and
//! secondaries sequentially in slot order.

use crate::executor::execute_step;
use crate::sim::SimInit;
use crate::track::{
    mix_seed, CoreParams, CoreState, CoreTrackView, ErrorDiagnostic, GeoInit, ParticleState, TrackInitializer,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, error, info};
use transport_types::ids::{EventId, ParticleId, TrackId, TrackSlotId};
use transport_types::units::MevEnergy;
use transport_types::{Real3, Secondary, StackAllocator, TrackStatus};

/// Source particle of an event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Primary {
    pub particle_id: ParticleId,
    pub energy: MevEnergy,
    pub pos: Real3,
    pub dir: Real3,
    pub event_id: EventId,
    #[serde(default)]
    pub time: f64,
}

/// Counts from one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepSummary {
    pub step: usize,
    /// Tracks started this step
    pub initialized: usize,
    /// Tracks still alive after the step
    pub alive: usize,
    pub killed: usize,
    pub errored: usize,
    /// Secondaries queued this step
    pub secondaries: usize,
    /// Initializers waiting for a slot
    pub queued: usize,
    /// Energy deposited this step (MeV)
    pub energy_deposition: f64,
}

/// Totals over a complete run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunSummary {
    pub num_steps: usize,
    pub num_tracks: usize,
    pub num_errored: usize,
    pub energy_deposition: f64,
}

pub struct Stepper {
    params: CoreParams,
    state: CoreState,
    allocator: StackAllocator<Secondary>,
    queue: VecDeque<TrackInitializer>,
    next_track_id: u64,
    num_primaries: u64,
    num_steps: usize,
    diagnostics: Vec<ErrorDiagnostic>,
}

impl Stepper {
    pub fn new(params: CoreParams) -> Self {
        let state = CoreState::new(&params, params.config.num_track_slots);
        let allocator = StackAllocator::new(params.config.secondary_capacity);
        debug!(
            num_slots = state.len(),
            secondary_capacity = allocator.capacity(),
            "built stepper"
        );
        Stepper {
            params,
            state,
            allocator,
            queue: VecDeque::new(),
            next_track_id: 0,
            num_primaries: 0,
            num_steps: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn params(&self) -> &CoreParams {
        &self.params
    }

    pub fn state(&self) -> &CoreState {
        &self.state
    }

    /// Failures reported so far, in the order they were gathered.
    pub fn diagnostics(&self) -> &[ErrorDiagnostic] {
        &self.diagnostics
    }

    pub fn num_queued(&self) -> usize {
        self.queue.len()
    }

    /// Whether no track is queued or in flight.
    pub fn is_done(&self) -> bool {
        self.queue.is_empty() && self.state.count_status(TrackStatus::Inactive) == self.state.len()
    }

    fn next_track_id(&mut self) -> TrackId {
        let id = TrackId(self.next_track_id);
        self.next_track_id += 1;
        id
    }

    /// Queue primaries for transport.
    ///
    /// The random stream of each primary depends only on the base seed and
    /// the number of primaries inserted before it.
    pub fn insert_primaries(&mut self, primaries: &[Primary]) {
        for primary in primaries {
            let track_id = self.next_track_id();
            let rng_seed = mix_seed(self.params.config.seed, self.num_primaries);
            self.num_primaries += 1;
            self.queue.push_back(TrackInitializer {
                sim: SimInit {
                    track_id,
                    parent_id: None,
                    event_id: primary.event_id,
                    time: primary.time,
                },
                particle: ParticleState {
                    particle_id: primary.particle_id,
                    energy: primary.energy,
                },
                geo: GeoInit::Locate {
                    pos: primary.pos,
                    dir: primary.dir,
                },
                rng_seed,
            });
        }
    }

    /// Start queued tracks in empty slots, lowest slot first.
    fn initialize_tracks(&mut self) -> usize {
        let mut count = 0;
        for (i, slot) in self.state.slots.iter_mut().enumerate() {
            if slot.sim.status != TrackStatus::Inactive {
                continue;
            }
            let Some(init) = self.queue.pop_front() else {
                break;
            };
            CoreTrackView::new(&self.params, TrackSlotId::new(i), slot, &self.allocator).initialize(&init);
            count += 1;
        }
        count
    }

    /// Advance every track by one step.
    pub fn step(&mut self) -> StepSummary {
        let initialized = self.initialize_tracks();

        let params = &self.params;
        let allocator = &self.allocator;
        self.state.slots.par_iter_mut().enumerate().for_each(|(i, slot)| {
            let mut track = CoreTrackView::new(params, TrackSlotId::new(i), slot, allocator);
            execute_step(&mut track);
        });

        let summary = self.gather(initialized);
        debug!(
            step = summary.step,
            initialized = summary.initialized,
            alive = summary.alive,
            killed = summary.killed,
            errored = summary.errored,
            secondaries = summary.secondaries,
            queued = summary.queued,
            "step complete"
        );
        summary
    }

    /// Collect per-slot results and free finished slots.
    fn gather(&mut self, initialized: usize) -> StepSummary {
        let mut summary = StepSummary {
            step: self.num_steps,
            initialized,
            ..Default::default()
        };
        for slot in self.state.slots.iter_mut() {
            summary.energy_deposition += slot.physics.energy_deposition;
            slot.physics.energy_deposition = 0.0;

            if let Some(diagnostic) = slot.diagnostic.take() {
                error!(
                    track = %diagnostic.track_id,
                    slot = %diagnostic.slot,
                    energy = diagnostic.energy.value(),
                    z = diagnostic.pos[2],
                    "track failed: {}",
                    diagnostic.reason
                );
                self.diagnostics.push(diagnostic);
            }

            // Secondary streams derive from the parent's stream and the
            // interaction that produced them, never from the step count
            let parent_seed = mix_seed(slot.rng_seed, slot.sim.num_interactions);
            for (k, secondary) in slot.secondaries.drain(..).enumerate() {
                let Some(particle_id) = secondary.particle_id else {
                    continue;
                };
                let track_id = TrackId(self.next_track_id);
                self.next_track_id += 1;
                self.queue.push_back(TrackInitializer {
                    sim: SimInit {
                        track_id,
                        parent_id: Some(slot.sim.track_id),
                        event_id: slot.sim.event_id,
                        time: slot.sim.time,
                    },
                    particle: ParticleState {
                        particle_id,
                        energy: secondary.energy,
                    },
                    geo: GeoInit::FromParent {
                        state: slot.geo.clone(),
                        dir: secondary.direction,
                    },
                    rng_seed: mix_seed(parent_seed, k as u64),
                });
                summary.secondaries += 1;
            }

            match slot.sim.status {
                TrackStatus::Alive => summary.alive += 1,
                TrackStatus::Killed => {
                    summary.killed += 1;
                    slot.sim.status = TrackStatus::Inactive;
                }
                TrackStatus::Errored => {
                    summary.errored += 1;
                    slot.sim.status = TrackStatus::Inactive;
                }
                TrackStatus::Inactive | TrackStatus::Initializing => {}
            }
        }
        self.allocator.clear();
        summary.queued = self.queue.len();
        self.num_steps += 1;
        summary
    }

    /// Transport the primaries and everything they produce to completion.
    pub fn run(&mut self, primaries: &[Primary]) -> RunSummary {
        self.insert_primaries(primaries);
        let first_track = self.next_track_id - primaries.len() as u64;
        let mut run = RunSummary::default();
        while !self.is_done() {
            let step = self.step();
            run.num_steps += 1;
            run.num_errored += step.errored;
            run.energy_deposition += step.energy_deposition;
        }
        run.num_tracks = (self.next_track_id - first_track) as usize;
        info!(
            num_primaries = primaries.len(),
            num_tracks = run.num_tracks,
            num_steps = run.num_steps,
            num_errored = run.num_errored,
            energy_deposition = run.energy_deposition,
            "transport complete"
        );
        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::tests::test_params;
    use crate::track::ErrorReason;
    use transport_types::ids::VolumeId;

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    }

    fn primaries(params: &CoreParams, particle: &str, energy: f64, z: f64, n: usize) -> Vec<Primary> {
        let particle_id = params.particles.require(particle).unwrap();
        (0..n)
            .map(|i| Primary {
                particle_id,
                energy: MevEnergy::new(energy),
                pos: [0.0, 0.0, z],
                dir: [0.0, 0.0, 1.0],
                event_id: EventId(i as u64),
                time: 0.0,
            })
            .collect()
    }

    #[test]
    fn test_electrons_stop_in_lead() {
        init_logging();
        let params = test_params();
        let sources = primaries(&params, "e-", 1.0, 1.5, 4);
        let mut stepper = Stepper::new(params);
        let run = stepper.run(&sources);
        assert!(stepper.is_done());
        assert_eq!(run.num_errored, 0);
        assert!(run.num_tracks >= 4);
        assert!((run.energy_deposition - 4.0).abs() < 1e-9, "deposited {}", run.energy_deposition);
    }

    #[test]
    fn test_unmapped_primary_is_reported() {
        init_logging();
        let params = test_params();
        let sources = primaries(&params, "gamma", 2.0, 2.5, 1);
        let mut stepper = Stepper::new(params);
        let run = stepper.run(&sources);
        assert_eq!(run.num_errored, 1);
        assert_eq!(run.num_tracks, 1);
        assert_eq!(stepper.diagnostics().len(), 1);
        let diagnostic = stepper.diagnostics()[0];
        assert_eq!(diagnostic.reason, ErrorReason::UnmappedMaterial(VolumeId::new(2)));
        assert_eq!(diagnostic.track_id, TrackId(0));
        assert!((run.energy_deposition - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_outside_primary_finishes_in_one_step() {
        let params = test_params();
        let sources = primaries(&params, "gamma", 1.0, -1.0, 1);
        let mut stepper = Stepper::new(params);
        stepper.insert_primaries(&sources);
        assert_eq!(stepper.num_queued(), 1);
        let summary = stepper.step();
        assert_eq!(summary.initialized, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.alive, 0);
        assert!(stepper.is_done());
    }

    #[test]
    fn test_queue_drains_through_few_slots() {
        let mut params = test_params();
        params.config.num_track_slots = 2;
        let sources = primaries(&params, "e-", 0.5, 1.5, 5);
        let mut stepper = Stepper::new(params);
        stepper.insert_primaries(&sources);
        let first = stepper.step();
        assert_eq!(first.initialized, 2);
        assert!(first.queued >= 3);
        while !stepper.is_done() {
            stepper.step();
        }
        assert_eq!(stepper.state().count_status(TrackStatus::Inactive), 2);
    }

    #[test]
    fn test_batch_size_independent() {
        init_logging();
        let run_with = |num_slots: usize| {
            let mut params = test_params();
            params.config.num_track_slots = num_slots;
            let sources = primaries(&params, "gamma", 10.0, 0.5, 16);
            Stepper::new(params).run(&sources)
        };
        let narrow = run_with(1);
        let wide = run_with(8);
        assert_eq!(narrow.num_tracks, wide.num_tracks);
        assert!(narrow.num_steps >= wide.num_steps);
        let scale = narrow.energy_deposition.abs().max(1.0);
        assert!((narrow.energy_deposition - wide.energy_deposition).abs() < 1e-9 * scale);
    }
}
