// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Physical constants and unit scales.
//!
//! Native units: length in cm, time in s, energy in MeV, mass in MeV/c²,
//! momentum in MeV/c, charge in units of the elementary charge.

/// One millimeter (cm)
pub const MILLIMETER: f64 = 0.1;

/// One micrometer (cm)
pub const MICROMETER: f64 = 1e-4;

/// One nanometer (cm)
pub const NANOMETER: f64 = 1e-7;

/// One femtometer (cm)
pub const FEMTOMETER: f64 = 1e-13;

/// One nanosecond (s)
pub const NANOSECOND: f64 = 1e-9;

/// One electron-volt (MeV)
pub const ELECTRON_VOLT: f64 = 1e-6;

/// Speed of light in vacuum (cm/s)
pub const C_LIGHT: f64 = 2.99792458e10;

/// Fine structure constant
pub const ALPHA_FINE_STRUCTURE: f64 = 7.2973525693e-3;

/// Reduced Planck constant times c (MeV·cm)
pub const HBAR_C: f64 = 197.3269804e-13;

/// Planck constant times c (MeV·cm), for photon wavelength conversion
pub const H_PLANCK_C: f64 = 2.0 * std::f64::consts::PI * HBAR_C;

/// Classical electron radius (cm)
pub const R_ELECTRON: f64 = 2.8179403262e-13;

/// Reduced Compton wavelength of the electron (cm)
pub const LAMBDABAR_ELECTRON: f64 = 3.8615926796e-11;

/// Bohr radius (cm)
pub const A0_BOHR: f64 = 5.29177210903e-9;

/// Avogadro constant (1/mol)
pub const AVOGADRO: f64 = 6.02214076e23;

/// Atomic mass unit (MeV/c²)
pub const ATOMIC_MASS_UNIT: f64 = 931.49410242;

/// Electron rest mass (MeV/c²)
pub const ELECTRON_MASS: f64 = 0.51099895;

/// Muon rest mass (MeV/c²)
pub const MUON_MASS: f64 = 105.6583755;

/// Proton rest mass (MeV/c²)
pub const PROTON_MASS: f64 = 938.27208816;

/// Neutron rest mass (MeV/c²)
pub const NEUTRON_MASS: f64 = 939.56542052;

/// Deuteron rest mass (MeV/c²)
pub const DEUTERON_MASS: f64 = 1875.61294257;

/// Triton rest mass (MeV/c²)
pub const TRITON_MASS: f64 = 2808.92113298;

/// Helion (helium-3 nucleus) rest mass (MeV/c²)
pub const HELION_MASS: f64 = 2808.39160743;

/// Alpha particle rest mass (MeV/c²)
pub const ALPHA_MASS: f64 = 3727.3794066;

/// Migdal constant 4π r_e λ_e² (cm³), scales the dielectric density effect
pub const MIGDAL_CONSTANT: f64 =
    4.0 * std::f64::consts::PI * R_ELECTRON * LAMBDABAR_ELECTRON * LAMBDABAR_ELECTRON;

/// LPM constant α m_e² / (8π ħc) (MeV/cm); times radiation length gives E_LPM
pub const LPM_CONSTANT: f64 = ALPHA_FINE_STRUCTURE * ELECTRON_MASS * ELECTRON_MASS
    / (8.0 * std::f64::consts::PI * HBAR_C);
