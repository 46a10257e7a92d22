// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Interactor
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use rand::Rng;
use transport_types::Interaction;

/// Sample the final state of one discrete interaction.
///
/// Implementations are constructed per track and per call. Sampling only
/// touches the RNG stream and the secondary allocator the interactor was
/// built with, so identical inputs and RNG states give identical results.
pub trait Interactor<'a> {
    fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Interaction<'a>;
}
