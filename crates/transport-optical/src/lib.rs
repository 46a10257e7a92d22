// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Optical
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Optical photon physics: generation from charged-particle steps,
//! bulk and surface interactions, and per-slot photon tracking.
//!
//! Charged tracks emit generator distributions ([`CherenkovOffload`],
//! [`ScintillationOffload`]); generators expand them into photons that are
//! tracked through the same slab geometry as the core.

pub mod cherenkov;
pub mod generator;
pub mod material;
pub mod mie;
pub mod rayleigh;
pub mod scintillation;
pub mod surface;
pub mod track;
pub mod wls;

pub use cherenkov::{CherenkovDndxCalculator, CherenkovGenerator, CherenkovOffload, CherenkovParams};
pub use generator::{GeneratorDistribution, GeneratorKind, OffloadPreStep, OpticalPhoton, StepPoint};
pub use material::{OpticalMaterialInput, OpticalMaterialParams, OpticalMaterialView};
pub use mie::{MieInteractor, MieMaterialData, MieParams};
pub use rayleigh::RayleighInteractor;
pub use scintillation::{
    ScintillationGenerator, ScintillationMaterialInput, ScintillationOffload, ScintillationParams,
};
pub use surface::{DielectricInteractor, DielectricInterface, FresnelCalculator, SurfaceAction, SurfaceInteraction};
pub use track::{OpticalParams, OpticalTrackInitializer, OpticalTrackState, OpticalTrackView};
pub use wls::{WavelengthShiftGenerator, WavelengthShiftInteractor, WavelengthShiftParams, WlsTimeProfile};
