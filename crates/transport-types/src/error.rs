// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

/// Setup-time failures. The per-track hot path never produces these:
/// it reports through `Action::Failed` and `TrackStatus::Errored`.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid parameter table '{table}': {message}")]
    InvalidParams { table: String, message: String },

    #[error("Grid error: {0}")]
    GridError(String),

    #[error("Physics constraint violated: {0}")]
    PhysicsViolation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    /// Shorthand for an `InvalidParams` error on the named table.
    pub fn invalid(table: &str, message: impl Into<String>) -> Self {
        TransportError::InvalidParams {
            table: table.to_string(),
            message: message.into(),
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;
