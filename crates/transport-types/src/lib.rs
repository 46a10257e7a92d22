// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Transport Types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Shared vocabulary of the transport workspace: units, ids, result
//! records, configuration and the secondary stack allocator.

pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod stack;
pub mod state;
pub mod units;

/// Cartesian three-vector (position, direction, momentum, polarization).
pub type Real3 = [f64; 3];

pub use error::{TransportError, TransportResult};
pub use interaction::{Action, Interaction, Secondary};
pub use stack::StackAllocator;
pub use state::{StepLimit, TrackStatus};
