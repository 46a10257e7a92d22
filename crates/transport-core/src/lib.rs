// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Track state, composite track views, step executors and the stepper.
//!
//! A step runs the same sequence on every slot: pre-step limits, along-step
//! propagation with continuous loss and MSC, then the post-step action
//! chosen by the shortest limit (boundary, discrete, at-rest or cut).

pub mod action;
pub mod executor;
pub mod geometry;
pub mod physics;
pub mod sim;
pub mod stepper;
pub mod track;

pub use geometry::{SlabGeometry, VolumeMaterialMap};
pub use physics::{PhysicsInput, PhysicsParams};
pub use stepper::{Primary, RunSummary, StepSummary, Stepper};
pub use track::{CoreParams, CoreState, CoreTrackView, ErrorDiagnostic, ErrorReason};
