// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{TransportError, TransportResult};
use serde::{Deserialize, Serialize};

/// Top-level run configuration.
/// Every field has a default so partial JSON files are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Number of parallel track slots
    #[serde(default = "default_num_track_slots")]
    pub num_track_slots: usize,
    /// Secondary stack capacity per step
    #[serde(default = "default_secondary_capacity")]
    pub secondary_capacity: usize,
    /// Base seed for per-track random streams
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Step count after which a track is flagged as errored
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// Charged tracks below this kinetic energy (MeV) deposit locally
    #[serde(default = "default_tracking_cut")]
    pub tracking_cut: f64,
    /// Apply LPM suppression in relativistic bremsstrahlung
    #[serde(default)]
    pub enable_lpm: bool,
    #[serde(default)]
    pub msc: MscOptions,
    #[serde(default)]
    pub wentzel: WentzelOptions,
}

/// Urban multiple-scattering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MscOptions {
    /// Lower limit on the MSC step (cm) (default: 1 mm)
    #[serde(default = "default_lambda_limit")]
    pub lambda_limit: f64,
    /// Fraction of the range a step may consume (default: 0.04)
    #[serde(default = "default_range_factor")]
    pub range_factor: f64,
    /// Fraction of the safety distance used for limits (default: 0.6)
    #[serde(default = "default_safety_factor")]
    pub safety_factor: f64,
    /// Sample lateral displacement (default: true)
    #[serde(default = "default_true")]
    pub displaced: bool,
    /// Use the "safety plus" step limit variant (default: false)
    #[serde(default)]
    pub safety_plus: bool,
}

/// Nuclear form factor applied to Coulomb scattering off the nucleus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NuclearFormFactorType {
    None,
    #[default]
    Exponential,
    Gaussian,
    /// Uniform-uniform folded (hard sphere with a 2 fm skin)
    Flat,
}

/// Wentzel single Coulomb scattering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WentzelOptions {
    /// Multiplier on the Moliere screening coefficient (default: 1.0)
    #[serde(default = "default_screening_factor")]
    pub screening_factor: f64,
    /// Nuclear angle limit factor (MeV²) (default: 0.5 (ħc/fm)²)
    #[serde(default = "default_a_sq_factor")]
    pub a_sq_factor: f64,
    /// Minimum scattering cosine when combined with MSC (default: -1)
    #[serde(default = "default_costheta_limit")]
    pub costheta_limit: f64,
    /// Whether single scattering is combined with a multiple scattering model
    #[serde(default)]
    pub is_combined: bool,
    #[serde(default)]
    pub form_factor: NuclearFormFactorType,
}

fn default_num_track_slots() -> usize {
    64
}
fn default_secondary_capacity() -> usize {
    512
}
fn default_seed() -> u64 {
    20_260_101
}
fn default_max_steps() -> usize {
    100_000
}
fn default_tracking_cut() -> f64 {
    1e-3
}
fn default_lambda_limit() -> f64 {
    0.1
}
fn default_range_factor() -> f64 {
    0.04
}
fn default_safety_factor() -> f64 {
    0.6
}
fn default_true() -> bool {
    true
}
fn default_screening_factor() -> f64 {
    1.0
}
fn default_a_sq_factor() -> f64 {
    let hbarc_over_fm = crate::constants::HBAR_C / crate::constants::FEMTOMETER;
    0.5 * hbarc_over_fm * hbarc_over_fm
}
fn default_costheta_limit() -> f64 {
    -1.0
}

impl Default for MscOptions {
    fn default() -> Self {
        MscOptions {
            lambda_limit: default_lambda_limit(),
            range_factor: default_range_factor(),
            safety_factor: default_safety_factor(),
            displaced: default_true(),
            safety_plus: false,
        }
    }
}

impl Default for WentzelOptions {
    fn default() -> Self {
        WentzelOptions {
            screening_factor: default_screening_factor(),
            a_sq_factor: default_a_sq_factor(),
            costheta_limit: default_costheta_limit(),
            is_combined: false,
            form_factor: NuclearFormFactorType::default(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig {
            num_track_slots: default_num_track_slots(),
            secondary_capacity: default_secondary_capacity(),
            seed: default_seed(),
            max_steps: default_max_steps(),
            tracking_cut: default_tracking_cut(),
            enable_lpm: false,
            msc: MscOptions::default(),
            wentzel: WentzelOptions::default(),
        }
    }
}

impl TransportConfig {
    /// Load from JSON file and validate.
    pub fn from_file(path: &str) -> TransportResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-physical or unusable settings.
    pub fn validate(&self) -> TransportResult<()> {
        if self.num_track_slots == 0 {
            return Err(TransportError::ConfigError(
                "num_track_slots must be > 0".to_string(),
            ));
        }
        if !self.tracking_cut.is_finite() || self.tracking_cut < 0.0 {
            return Err(TransportError::ConfigError(format!(
                "tracking_cut must be finite and >= 0, got {}",
                self.tracking_cut
            )));
        }
        if self.max_steps == 0 {
            return Err(TransportError::ConfigError(
                "max_steps must be > 0".to_string(),
            ));
        }
        let msc = &self.msc;
        if msc.lambda_limit <= 0.0
            || !(0.0..1.0).contains(&msc.range_factor)
            || !(0.0..1.0).contains(&msc.safety_factor)
        {
            return Err(TransportError::ConfigError(format!(
                "invalid MSC options: {msc:?}"
            )));
        }
        let w = &self.wentzel;
        if w.screening_factor <= 0.0 || w.a_sq_factor < 0.0 || !(-1.0..=1.0).contains(&w.costheta_limit)
        {
            return Err(TransportError::ConfigError(format!(
                "invalid Wentzel options: {w:?}"
            )));
        }
        Ok(())
    }
}
