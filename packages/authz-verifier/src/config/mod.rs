//! Configuration system
//!
//! Two levels, as in the rest of the pipeline tooling:
//! - Level 1: Preset (`fast`, `balanced`, `thorough`)
//! - Level 2: YAML overrides (`version: 1` schema) or builder calls
//!
//! # Examples
//!
//! ```rust,ignore
//! use authz_verifier::config::{Preset, VerifierConfig};
//!
//! let config = VerifierConfig::preset(Preset::Fast).with_max_call_depth(2);
//! let config = VerifierConfig::from_yaml_file(Path::new("authz.yaml"))?;
//! ```

pub mod error;
pub mod io;
pub mod preset;
pub mod verifier_config;

pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, ConfigOverrides};
pub use preset::Preset;
pub use verifier_config::{
    CheckArgumentLayout, RedirectStrategy, VerifierConfig, MAX_CALL_DEPTH_LIMIT,
};
