// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Particles
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Particle definitions and the per-track particle view.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use transport_types::constants::{
    ALPHA_MASS, DEUTERON_MASS, ELECTRON_MASS, HELION_MASS, MUON_MASS, NEUTRON_MASS, PROTON_MASS,
    TRITON_MASS,
};
use transport_types::ids::ParticleId;
use transport_types::units::{ElementaryCharge, LightSpeed, MevEnergy, MevMass, MevMomentum, MevMomentumSq};
use transport_types::{TransportError, TransportResult};

/// Immutable properties of one particle species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleRecord {
    pub name: String,
    pub pdg: i32,
    pub mass: MevMass,
    pub charge: ElementaryCharge,
    /// Inverse lifetime (1/s); zero for stable particles
    #[serde(default)]
    pub decay_constant: f64,
}

impl ParticleRecord {
    pub fn new(name: &str, pdg: i32, mass: f64, charge: f64) -> Self {
        ParticleRecord {
            name: name.to_string(),
            pdg,
            mass: MevMass::new(mass),
            charge: ElementaryCharge::new(charge),
            decay_constant: 0.0,
        }
    }
}

/// Owning table of particle species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleParams {
    records: Vec<ParticleRecord>,
    #[serde(skip)]
    by_name: HashMap<String, ParticleId>,
}

impl ParticleParams {
    pub fn new(records: Vec<ParticleRecord>) -> TransportResult<Self> {
        let mut by_name = HashMap::new();
        for (i, rec) in records.iter().enumerate() {
            if !(rec.mass.value() >= 0.0) || !rec.charge.value().is_finite() {
                return Err(TransportError::invalid(
                    "particles",
                    format!("'{}' has invalid mass or charge", rec.name),
                ));
            }
            if rec.decay_constant < 0.0 {
                return Err(TransportError::invalid(
                    "particles",
                    format!("'{}' has negative decay constant", rec.name),
                ));
            }
            if by_name.insert(rec.name.clone(), ParticleId::new(i)).is_some() {
                return Err(TransportError::invalid(
                    "particles",
                    format!("duplicate particle name '{}'", rec.name),
                ));
            }
        }
        tracing::debug!("Constructed {} particle definitions", records.len());
        Ok(ParticleParams { records, by_name })
    }

    /// Species used by the electromagnetic, muon and fusion models.
    pub fn standard() -> TransportResult<Self> {
        Self::new(vec![
            ParticleRecord::new("gamma", 22, 0.0, 0.0),
            ParticleRecord::new("e-", 11, ELECTRON_MASS, -1.0),
            ParticleRecord::new("e+", -11, ELECTRON_MASS, 1.0),
            ParticleRecord {
                decay_constant: 1.0 / 2.1969811e-6,
                ..ParticleRecord::new("mu-", 13, MUON_MASS, -1.0)
            },
            ParticleRecord {
                decay_constant: 1.0 / 2.1969811e-6,
                ..ParticleRecord::new("mu+", -13, MUON_MASS, 1.0)
            },
            ParticleRecord::new("proton", 2212, PROTON_MASS, 1.0),
            ParticleRecord::new("neutron", 2112, NEUTRON_MASS, 0.0),
            ParticleRecord::new("deuteron", 1000010020, DEUTERON_MASS, 1.0),
            ParticleRecord::new("triton", 1000010030, TRITON_MASS, 1.0),
            ParticleRecord::new("he3", 1000020030, HELION_MASS, 2.0),
            ParticleRecord::new("alpha", 1000020040, ALPHA_MASS, 2.0),
            ParticleRecord::new("muonic_he3", 0, HELION_MASS + MUON_MASS, 1.0),
            ParticleRecord::new("muonic_alpha", 0, ALPHA_MASS + MUON_MASS, 1.0),
        ])
    }

    pub fn find(&self, name: &str) -> Option<ParticleId> {
        self.by_name.get(name).copied().or_else(|| {
            // Lookup table is skipped during deserialization
            self.records
                .iter()
                .position(|r| r.name == name)
                .map(ParticleId::new)
        })
    }

    /// Find a particle, reporting a setup error if it is missing.
    pub fn require(&self, name: &str) -> TransportResult<ParticleId> {
        self.find(name)
            .ok_or_else(|| TransportError::invalid("particles", format!("missing particle '{name}'")))
    }

    pub fn get(&self, id: ParticleId) -> &ParticleRecord {
        &self.records[id.get()]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Kinematic state of one track: species plus kinetic energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleTrackView<'a> {
    id: ParticleId,
    record: &'a ParticleRecord,
    energy: MevEnergy,
}

impl<'a> ParticleTrackView<'a> {
    pub fn new(params: &'a ParticleParams, id: ParticleId, energy: MevEnergy) -> Self {
        debug_assert!(energy.value() >= 0.0, "negative kinetic energy");
        ParticleTrackView {
            id,
            record: params.get(id),
            energy,
        }
    }

    pub fn particle_id(&self) -> ParticleId {
        self.id
    }

    pub fn record(&self) -> &'a ParticleRecord {
        self.record
    }

    /// Kinetic energy
    pub fn energy(&self) -> MevEnergy {
        self.energy
    }

    pub fn mass(&self) -> MevMass {
        self.record.mass
    }

    pub fn charge(&self) -> ElementaryCharge {
        self.record.charge
    }

    pub fn decay_constant(&self) -> f64 {
        self.record.decay_constant
    }

    pub fn is_stopped(&self) -> bool {
        self.energy.value() == 0.0
    }

    pub fn is_massless(&self) -> bool {
        self.record.mass.value() == 0.0
    }

    pub fn total_energy(&self) -> MevEnergy {
        MevEnergy::new(self.energy.value() + self.record.mass.value())
    }

    pub fn momentum_sq(&self) -> MevMomentumSq {
        let e = self.energy.value();
        MevMomentumSq::new(e * (e + 2.0 * self.record.mass.value()))
    }

    pub fn momentum(&self) -> MevMomentum {
        MevMomentum::new(self.momentum_sq().value().sqrt())
    }

    /// Square of the speed in units of c.
    pub fn beta_sq(&self) -> f64 {
        let total = self.total_energy().value();
        if total == 0.0 {
            return 0.0;
        }
        self.momentum_sq().value() / (total * total)
    }

    pub fn speed(&self) -> LightSpeed {
        if self.is_massless() {
            return LightSpeed::new(1.0);
        }
        LightSpeed::new(self.beta_sq().sqrt())
    }

    /// Lorentz factor.
    pub fn lorentz_factor(&self) -> f64 {
        debug_assert!(!self.is_massless());
        1.0 + self.energy.value() / self.record.mass.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_lookup() {
        let p = ParticleParams::standard().unwrap();
        let e = p.find("e-").unwrap();
        assert_eq!(p.get(e).pdg, 11);
        assert!(p.find("tachyon").is_none());
        assert!(p.require("tachyon").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ParticleParams::new(vec![
            ParticleRecord::new("gamma", 22, 0.0, 0.0),
            ParticleRecord::new("gamma", 22, 0.0, 0.0),
        ]);
        assert!(matches!(err, Err(TransportError::InvalidParams { .. })));
    }

    #[test]
    fn test_electron_kinematics() {
        let p = ParticleParams::standard().unwrap();
        let view = ParticleTrackView::new(&p, p.find("e-").unwrap(), MevEnergy::new(1.0));
        let m = ELECTRON_MASS;
        assert!((view.total_energy().value() - (1.0 + m)).abs() < 1e-14);
        assert!((view.momentum_sq().value() - (1.0 + 2.0 * m)).abs() < 1e-14);
        let beta = view.speed().value();
        assert!((beta - 0.941079).abs() < 1e-5, "beta = {beta}");
    }

    #[test]
    fn test_photon_speed() {
        let p = ParticleParams::standard().unwrap();
        let view = ParticleTrackView::new(&p, p.find("gamma").unwrap(), MevEnergy::new(2.0));
        assert_eq!(view.speed().value(), 1.0);
        assert!((view.momentum().value() - 2.0).abs() < 1e-15);
    }
}
