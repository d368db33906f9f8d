//! Configuration errors
//!
//! Raised while loading or validating a `VerifierConfig`; the analysis
//! itself never produces them.

use thiserror::Error;

/// Why a verifier configuration was rejected
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric field outside its accepted bounds
    #[error("'{field}' = {value} is outside {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Check calls read permission and object from the same argument
    #[error("check_argument_layout uses argument {index} for both permission and object")]
    ArgumentLayout { index: usize },

    /// Neither check nor require methods are configured
    #[error("No check or require methods configured; nothing would be verified")]
    NoCallMethods,

    #[error("Configuration file has no 'version' field; start it with 'version: 1'")]
    MissingVersion,

    #[error("Configuration version {found} is not supported (supported: {})", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("Unknown preset '{0}' (expected fast, balanced or thorough)")]
    UnknownPreset(String),

    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Range error carrying a remediation hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }
}
