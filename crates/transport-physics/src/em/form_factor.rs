// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Nuclear Form Factors and Mott Ratio
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Corrections applied to single Coulomb scattering off a nucleus: the
//! finite nuclear size (form factor) and the Mott-to-Rutherford cross
//! section ratio.

use serde::{Deserialize, Serialize};
use transport_math::poly::poly_eval;
use transport_types::config::NuclearFormFactorType;
use transport_types::constants::{FEMTOMETER, HBAR_C};

/// Nuclear radius parameter (fm) of a nucleus with mass number `a`.
fn nuclear_radius_fm(mass_number: u32) -> f64 {
    if mass_number == 1 {
        // Proton charge radius
        0.85
    } else {
        1.27 * (mass_number as f64).powf(0.27)
    }
}

/// 1 fm / ħc in MeV⁻¹
const FM_PER_HBARC: f64 = FEMTOMETER / HBAR_C;

/// Squared form factor ingredient F(q²) for a momentum transfer q (MeV/c).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NuclearFormFactor {
    /// Point nucleus
    None,
    /// F = 1 / (1 + q²R²/12)²
    Exponential { prefactor: f64 },
    /// F = exp(-q²R²/6)
    Gaussian { prefactor: f64 },
    /// Hard sphere folded with a 2 fm skin
    Flat { radius_fm: f64 },
}

impl NuclearFormFactor {
    pub fn new(kind: NuclearFormFactorType, mass_number: u32) -> Self {
        debug_assert!(mass_number > 0);
        let prefactor = (nuclear_radius_fm(mass_number) * FM_PER_HBARC).powi(2) / 12.0;
        match kind {
            NuclearFormFactorType::None => NuclearFormFactor::None,
            NuclearFormFactorType::Exponential => NuclearFormFactor::Exponential { prefactor },
            NuclearFormFactorType::Gaussian => NuclearFormFactor::Gaussian { prefactor },
            NuclearFormFactorType::Flat => NuclearFormFactor::Flat {
                radius_fm: 1.2 * (mass_number as f64).cbrt(),
            },
        }
    }

    /// Evaluate at squared momentum transfer (MeV²).
    pub fn evaluate(&self, q_sq: f64) -> f64 {
        debug_assert!(q_sq >= 0.0);
        match *self {
            NuclearFormFactor::None => 1.0,
            NuclearFormFactor::Exponential { prefactor } => 1.0 / (1.0 + prefactor * q_sq).powi(2),
            NuclearFormFactor::Gaussian { prefactor } => (-2.0 * prefactor * q_sq).exp(),
            NuclearFormFactor::Flat { radius_fm } => {
                let q = q_sq.sqrt();
                let sphere = |r: f64| {
                    let x = q * r * FM_PER_HBARC;
                    if x < 1e-3 {
                        return 1.0;
                    }
                    3.0 / x.powi(3) * (x.sin() - x * x.cos())
                };
                // Small arguments lose precision; the product never exceeds one
                (sphere(radius_fm) * sphere(2.0)).min(1.0)
            }
        }
    }
}

pub const NUM_MOTT_THETA: usize = 5;
pub const NUM_MOTT_BETA: usize = 6;
/// Expansion coefficients a_ij of the ratio in √(1 - cos θ)^i and
/// (β - β̄)^j
pub type MottCoefficients = [[f64; NUM_MOTT_BETA]; NUM_MOTT_THETA];

/// Expansion point of the β power series
const MOTT_BETA_SHIFT: f64 = 0.7181228;

/// Per-element Mott coefficients (Lijian, Qing and Zhengming, 1995;
/// Boschini et al. 2013) for electrons and positrons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MottElementData {
    pub electron: MottCoefficients,
    pub positron: MottCoefficients,
}

impl MottElementData {
    /// Coefficients for a ratio of exactly one (pure Rutherford).
    pub fn rutherford() -> Self {
        let mut coeffs = [[0.0; NUM_MOTT_BETA]; NUM_MOTT_THETA];
        coeffs[0][0] = 1.0;
        MottElementData {
            electron: coeffs,
            positron: coeffs,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.electron.iter().chain(self.positron.iter()).flatten().all(|c| c.is_finite())
    }
}

/// Ratio of the Mott to the Rutherford cross section at fixed speed.
#[derive(Debug, Clone, Copy)]
pub struct MottRatioCalculator<'a> {
    coeffs: &'a MottCoefficients,
    beta: f64,
}

impl<'a> MottRatioCalculator<'a> {
    pub fn new(coeffs: &'a MottCoefficients, beta: f64) -> Self {
        debug_assert!(beta > 0.0 && beta < 1.0);
        MottRatioCalculator { coeffs, beta }
    }

    pub fn evaluate(&self, cos_theta: f64) -> f64 {
        debug_assert!((-1.0..=1.0).contains(&cos_theta));
        let fcos_t = (1.0 - cos_theta).sqrt();
        let beta0 = self.beta - MOTT_BETA_SHIFT;
        let mut result = 0.0;
        let mut fcos_pow = 1.0;
        for row in self.coeffs {
            result += poly_eval(row, beta0) * fcos_pow;
            fcos_pow *= fcos_t;
        }
        result
    }
}
