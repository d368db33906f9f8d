//! Configuration I/O (YAML schema types)
//!
//! Loading and export logic lives in verifier_config.rs.

use super::verifier_config::{CheckArgumentLayout, RedirectStrategy};
use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    pub version: Option<u32>,

    /// Base preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Fine-grained overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ConfigOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_methods: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_methods: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_argument_layout: Option<CheckArgumentLayout>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_call_depth: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub interprocedural: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub infer_relation_from_member: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn_on_ambiguous_redirect: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_strategy: Option<RedirectStrategy>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_gathering: Option<bool>,
}
