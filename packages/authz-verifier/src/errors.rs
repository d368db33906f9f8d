//! Error types for authz-verifier
//!
//! Hard errors exist only at the boundaries: loading configuration and
//! loading or validating a program model. The analysis itself never fails.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for verifier operations
#[derive(Debug, Error)]
pub enum VerifierError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed program model (dangling edge, missing entry block, ...)
    #[error("Model error: {0}")]
    Model(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl VerifierError {
    pub fn model(msg: impl Into<String>) -> Self {
        VerifierError::Model(msg.into())
    }
}

impl From<serde_json::Error> for VerifierError {
    fn from(e: serde_json::Error) -> Self {
        VerifierError::Serialization(e.to_string())
    }
}

/// Result type alias for verifier operations
pub type Result<T> = std::result::Result<T, VerifierError>;
