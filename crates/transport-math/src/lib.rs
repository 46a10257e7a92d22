// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Mathematical primitives for the SCPN transport core: vector helpers,
//! random distributions, and non-uniform grid interpolation.

pub mod array;
pub mod distributions;
pub mod grid;
pub mod poly;
pub mod selector;
pub mod spline;

pub use grid::{GridBuilder, GridRecord, ItemRange, NonuniformGridCalculator, RealPool};
pub use selector::Selector;
