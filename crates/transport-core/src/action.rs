// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Step Actions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Identifiers of the actions a step can select.

use transport_types::ids::ActionId;

/// Action ids shared by every track; configuration, not track state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreActions {
    pub along_step: ActionId,
    pub boundary: ActionId,
    pub discrete: ActionId,
    /// Step limited by continuous energy loss
    pub eloss_range: ActionId,
    /// Step limited by multiple scattering
    pub msc_range: ActionId,
    /// Particle came to rest with an at-rest process pending
    pub at_rest: ActionId,
    pub tracking_cut: ActionId,
    pub propagation_limit: ActionId,
}

impl CoreActions {
    pub const NUM_ACTIONS: usize = 8;

    pub fn new() -> Self {
        CoreActions {
            along_step: ActionId::new(0),
            boundary: ActionId::new(1),
            discrete: ActionId::new(2),
            eloss_range: ActionId::new(3),
            msc_range: ActionId::new(4),
            at_rest: ActionId::new(5),
            tracking_cut: ActionId::new(6),
            propagation_limit: ActionId::new(7),
        }
    }

    pub fn label(&self, action: ActionId) -> &'static str {
        const LABELS: [&str; CoreActions::NUM_ACTIONS] = [
            "along-step",
            "geo-boundary",
            "physics-discrete",
            "eloss-range",
            "msc-range",
            "physics-at-rest",
            "tracking-cut",
            "geo-propagation-limit",
        ];
        LABELS.get(action.get()).copied().unwrap_or("unknown")
    }
}

impl Default for CoreActions {
    fn default() -> Self {
        Self::new()
    }
}
