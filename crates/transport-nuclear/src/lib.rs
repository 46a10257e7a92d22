// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Transport Nuclear
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Nuclear reactions: muon-catalyzed fusion in hydrogen-isotope mixtures
//! and elastic scattering of the neutrons it produces.

pub mod mucf;
pub mod neutron;

pub use mucf::{DDMucfInteractor, DTMucfInteractor, MucfData};
pub use neutron::{NeutronElasticData, NeutronElasticInteractor};
