use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Insufficient data: need {required} candles, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No configuration for instrument: {0}")]
    ConfigurationMissing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Short machine-readable tag for a failed scoring call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureReason {
    Insufficient,
    Invalid,
    Unconfigured,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Insufficient => write!(f, "insufficient"),
            FailureReason::Invalid => write!(f, "invalid"),
            FailureReason::Unconfigured => write!(f, "unconfigured"),
        }
    }
}

impl Error {
    pub fn reason(&self) -> FailureReason {
        match self {
            Error::InsufficientData { .. } => FailureReason::Insufficient,
            Error::ConfigurationMissing(_) | Error::Config(_) => FailureReason::Unconfigured,
            Error::InvalidInput(_) | Error::Toml(_) => FailureReason::Invalid,
        }
    }
}
