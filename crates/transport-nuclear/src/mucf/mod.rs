// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Muon-Catalyzed Fusion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Final states of fusion inside muonic molecules.
//!
//! A stopped μ⁻ forms a muonic molecule with two hydrogen nuclei, which
//! fuse. The muon is either released with a few keV or sticks to the
//! charged fusion product. Fusion products are emitted isotropically at
//! rest; with a free muon the charged product balances the momentum of
//! the other two.

mod dd;
mod dt;

pub use dd::{DDChannel, DDMucfInteractor};
pub use dt::{DTChannel, DTMucfInteractor};

use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use transport_math::array::{add, make_unit_vector, neg, norm};
use transport_math::distributions::{generate_canonical, IsotropicDistribution};
use transport_math::grid::{GridBuilder, GridRecord, NonuniformGridCalculator, RealPool};
use transport_physics::kinematics::calc_momentum_vector;
use transport_physics::ParticleParams;
use transport_types::ids::ParticleId;
use transport_types::units::MevEnergy;
use transport_types::{Secondary, TransportError, TransportResult};

/// Tabulated cumulative distribution of the released muon kinetic energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuonEnergyCdf {
    /// Kinetic energy (MeV)
    pub energy: Vec<f64>,
    /// Cumulative probability, from 0 to 1
    pub cdf: Vec<f64>,
}

impl MuonEnergyCdf {
    /// Thermal (Maxwellian) spectrum with temperature `kt` (MeV), cut at
    /// ten times the temperature.
    pub fn thermal(kt: f64, num_points: usize) -> Self {
        debug_assert!(kt > 0.0 && num_points >= 2);
        let emax = 10.0 * kt;
        let energy: Vec<f64> = (0..num_points)
            .map(|i| emax * i as f64 / (num_points - 1) as f64)
            .collect();
        // Trapezoid integral of sqrt(E) exp(-E/kT)
        let pdf: Vec<f64> = energy.iter().map(|e| e.sqrt() * (-e / kt).exp()).collect();
        let mut cdf = vec![0.0; num_points];
        for i in 1..num_points {
            cdf[i] = cdf[i - 1] + 0.5 * (pdf[i] + pdf[i - 1]) * (energy[i] - energy[i - 1]);
        }
        let total = cdf[num_points - 1];
        cdf.iter_mut().for_each(|c| *c /= total);
        MuonEnergyCdf { energy, cdf }
    }
}

impl Default for MuonEnergyCdf {
    fn default() -> Self {
        Self::thermal(2e-3, 64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MucfParticleIds {
    pub mu_minus: ParticleId,
    pub neutron: ParticleId,
    pub proton: ParticleId,
    pub triton: ParticleId,
    pub he3: ParticleId,
    pub alpha: ParticleId,
    pub muonic_he3: ParticleId,
    pub muonic_alpha: ParticleId,
}

/// Rest masses (MeV) of the reaction products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MucfParticleMasses {
    pub mu_minus: f64,
    pub neutron: f64,
    pub proton: f64,
    pub triton: f64,
    pub he3: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MucfData {
    pub ids: MucfParticleIds,
    pub masses: MucfParticleMasses,
    muon_energy_cdf: GridRecord,
    reals: RealPool,
}

impl MucfData {
    pub fn new(particles: &ParticleParams, muon_energy: &MuonEnergyCdf) -> TransportResult<Self> {
        let names = [
            "mu-", "neutron", "proton", "triton", "he3", "alpha", "muonic_he3", "muonic_alpha",
        ];
        let missing: Vec<&str> = names.iter().copied().filter(|n| particles.find(n).is_none()).collect();
        if !missing.is_empty() {
            return Err(TransportError::invalid(
                "mucf",
                format!("missing particles required for muon-catalyzed fusion: {}", missing.join(", ")),
            ));
        }
        let ids = MucfParticleIds {
            mu_minus: particles.require("mu-")?,
            neutron: particles.require("neutron")?,
            proton: particles.require("proton")?,
            triton: particles.require("triton")?,
            he3: particles.require("he3")?,
            alpha: particles.require("alpha")?,
            muonic_he3: particles.require("muonic_he3")?,
            muonic_alpha: particles.require("muonic_alpha")?,
        };
        let mass = |id: ParticleId| particles.get(id).mass.value();
        let masses = MucfParticleMasses {
            mu_minus: mass(ids.mu_minus),
            neutron: mass(ids.neutron),
            proton: mass(ids.proton),
            triton: mass(ids.triton),
            he3: mass(ids.he3),
            alpha: mass(ids.alpha),
        };

        let cdf = &muon_energy.cdf;
        let valid_cdf = cdf.first() == Some(&0.0)
            && cdf.last().map_or(false, |&c| (c - 1.0).abs() < 1e-12)
            && cdf.windows(2).all(|w| w[1] >= w[0]);
        if !valid_cdf {
            return Err(TransportError::invalid("mucf", "muon energy CDF must increase from 0 to 1"));
        }
        let mut reals = RealPool::new();
        let muon_energy_cdf = GridBuilder::new(&mut reals).linear(&muon_energy.energy, cdf)?;
        debug!(num_points = cdf.len(), "built muon-catalyzed fusion data");

        let data = MucfData {
            ids,
            masses,
            muon_energy_cdf,
            reals,
        };
        debug_assert!(data.is_valid());
        Ok(data)
    }

    pub fn is_valid(&self) -> bool {
        let m = &self.masses;
        [m.mu_minus, m.neutron, m.proton, m.triton, m.he3, m.alpha]
            .iter()
            .all(|&mass| mass > 0.0)
            && self.muon_energy_cdf.len() >= 2
    }

    /// Sample the kinetic energy of a released muon.
    pub fn sample_muon_energy<R: Rng + ?Sized>(&self, rng: &mut R) -> MevEnergy {
        let calc = NonuniformGridCalculator::from_inverse(&self.muon_energy_cdf, &self.reals);
        MevEnergy::new(calc.evaluate(generate_canonical(rng)))
    }
}

/// Secondary with a fixed energy emitted isotropically.
pub(crate) fn sample_isotropic_secondary<R: Rng + ?Sized>(
    id: ParticleId,
    energy: MevEnergy,
    rng: &mut R,
) -> Secondary {
    Secondary::new(id, energy, IsotropicDistribution.sample(rng))
}

/// Balance the momenta of two secondaries with a third.
///
/// Only momentum is conserved: the third particle's kinetic energy follows
/// from its momentum, so the total kinetic energy is within a few hundred
/// keV of the reaction Q-value rather than exact.
pub fn calc_third_secondary(
    first: &Secondary,
    first_mass: f64,
    second: &Secondary,
    second_mass: f64,
    third_id: ParticleId,
    third_mass: f64,
) -> Secondary {
    let p1 = calc_momentum_vector(first.energy.value(), first_mass, &first.direction);
    let p2 = calc_momentum_vector(second.energy.value(), second_mass, &second.direction);
    let p3 = neg(&add(&p1, &p2));
    let p3_mag = norm(&p3);
    if p3_mag == 0.0 {
        return Secondary::new(third_id, MevEnergy::zero(), neg(&first.direction));
    }
    let energy = (p3_mag * p3_mag + third_mass * third_mass).sqrt() - third_mass;
    Secondary::new(third_id, MevEnergy::new(energy), make_unit_vector(&p3))
}

/// Two-body breakup at rest: the second particle recoils back to back.
pub(crate) fn back_to_back(first: &Secondary, id: ParticleId, energy: MevEnergy) -> Secondary {
    Secondary::new(id, energy, neg(&first.direction))
}
