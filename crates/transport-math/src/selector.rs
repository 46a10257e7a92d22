// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Selector
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Discrete selection proportional to per-index weights.

use crate::distributions::generate_canonical;
use rand::distributions::Distribution;
use rand::Rng;

/// Select an index in `[0, size)` with probability `weight(i) / total`.
///
/// The weight function is evaluated lazily while walking the indices, so
/// no intermediate CDF is stored. Round-off that leaves the walk short of
/// the total returns the last index.
#[derive(Debug, Clone, Copy)]
pub struct Selector<F> {
    weight: F,
    size: usize,
    total: f64,
}

impl<F: Fn(usize) -> f64> Selector<F> {
    pub fn new(weight: F, size: usize, total: f64) -> Self {
        debug_assert!(size > 0, "cannot select from an empty range");
        debug_assert!(total > 0.0, "total weight must be positive");
        Selector {
            weight,
            size,
            total,
        }
    }

    /// Construct, computing the total by summing all weights.
    pub fn with_total(weight: F, size: usize) -> Self {
        let total = (0..size).map(&weight).sum();
        Self::new(weight, size, total)
    }
}

impl<F: Fn(usize) -> f64> Distribution<usize> for Selector<F> {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut accum = -self.total * generate_canonical(rng);
        for i in 0..self.size - 1 {
            accum += (self.weight)(i);
            if accum > 0.0 {
                return i;
            }
        }
        self.size - 1
    }
}
