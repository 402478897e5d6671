use thiserror::Error;

use crate::core::types::ColonyId;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown {kind} action code: {code}")]
    UnknownAction { kind: &'static str, code: u8 },

    #[error("Malformed {kind} actions: expected {expected}, got {got}")]
    ActionShape {
        kind: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Placement failed: {0}")]
    Placement(String),

    #[error("Colony not found: {0:?}")]
    UnknownColony(ColonyId),
}

pub type Result<T> = std::result::Result<T, SimError>;
