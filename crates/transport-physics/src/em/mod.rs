// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Electromagnetic Physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Electromagnetic and muon interactors.

pub mod bethe_heitler;
pub mod brem;
pub mod combined_brem;
pub mod coulomb;
pub mod eplusgg;
pub mod form_factor;
pub mod klein_nishina;
pub mod livermore_pe;
pub mod moller_bhabha;
pub mod msc;
pub mod muon;
pub mod rayleigh;
pub mod rel_brem;
pub mod seltzer_berger;
pub mod wentzel;

#[cfg(test)]
pub(crate) mod test_support;
