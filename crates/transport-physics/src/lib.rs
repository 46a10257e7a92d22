// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Transport Physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Particle and material data plus the discrete physics interactors.
//!
//! Shared tables follow a two-tier layout: an owning `*Params`/`*Data`
//! struct is built and validated once at setup, and interactors borrow it
//! by reference for a single sampling call.

pub mod cutoff;
pub mod em;
pub mod interactor;
pub mod kinematics;
pub mod material;
pub mod particle;

pub use interactor::Interactor;
pub use material::{ElementView, MaterialParams, MaterialView};
pub use particle::{ParticleParams, ParticleTrackView};
