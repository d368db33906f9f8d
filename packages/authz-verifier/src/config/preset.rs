//! Verifier presets
//!
//! A preset fixes the interprocedural descent depth; everything else starts
//! from the same defaults.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI/CD: one level of interprocedural descent
    Fast,

    /// Development: descent up to 4 calls deep
    #[default]
    Balanced,

    /// Security audit: descent up to 12 calls deep
    Thorough,
}

impl Preset {
    /// Interprocedural descent depth for this preset
    pub fn max_call_depth(&self) -> usize {
        match self {
            Self::Fast => 1,
            Self::Balanced => 4,
            Self::Thorough => 12,
        }
    }

    /// Case-insensitive
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
