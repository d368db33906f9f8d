//! Verifier configuration
//!
//! Built from a [`Preset`] with builder overrides, or loaded from a
//! versioned YAML file.

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, ConfigOverrides};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Upper bound accepted for `max_call_depth`
pub const MAX_CALL_DEPTH_LIMIT: usize = 64;

/// Positions of the permission and object arguments of a check call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckArgumentLayout {
    pub permission_index: usize,
    pub object_index: usize,
}

impl Default for CheckArgumentLayout {
    /// `check(subject, permission, object)`
    fn default() -> Self {
        Self {
            permission_index: 1,
            object_index: 2,
        }
    }
}

/// How redirect-eligible call sites are rewritten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectStrategy {
    /// Retarget calls on the CFG only; spans stay in original coordinates
    Ir,

    /// Splice concrete type names into the source text, record location
    /// mappings, and retarget calls
    #[default]
    TextSplice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub preset: Preset,

    /// Method names treated as permission checks (`Name` or `Type.Name`)
    pub check_methods: Vec<String>,

    /// Method names treated as require-permission calls
    pub require_methods: Vec<String>,

    pub check_argument_layout: CheckArgumentLayout,

    /// Interprocedural descent depth (0..=64)
    pub max_call_depth: usize,

    pub interprocedural: bool,

    /// Derive `can_view` from a `CanView` member when no constant value is known
    pub infer_relation_from_member: bool,

    pub warn_on_ambiguous_redirect: bool,

    pub redirect_strategy: RedirectStrategy,

    /// Run per-file gathering on the rayon pool
    pub parallel_gathering: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl VerifierConfig {
    pub fn preset(preset: Preset) -> Self {
        Self {
            preset,
            check_methods: vec![
                "Check".to_string(),
                "CheckAsync".to_string(),
                "CheckPermission".to_string(),
            ],
            require_methods: vec![
                "Require".to_string(),
                "RequireAsync".to_string(),
                "RequirePermission".to_string(),
            ],
            check_argument_layout: CheckArgumentLayout::default(),
            max_call_depth: preset.max_call_depth(),
            interprocedural: true,
            infer_relation_from_member: true,
            warn_on_ambiguous_redirect: true,
            redirect_strategy: RedirectStrategy::default(),
            parallel_gathering: cfg!(feature = "parallel"),
        }
    }

    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_interprocedural(mut self, enabled: bool) -> Self {
        self.interprocedural = enabled;
        self
    }

    pub fn with_redirect_strategy(mut self, strategy: RedirectStrategy) -> Self {
        self.redirect_strategy = strategy;
        self
    }

    pub fn with_check_methods(mut self, methods: &[&str]) -> Self {
        self.check_methods = methods.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_require_methods(mut self, methods: &[&str]) -> Self {
        self.require_methods = methods.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_argument_layout(mut self, layout: CheckArgumentLayout) -> Self {
        self.check_argument_layout = layout;
        self
    }

    pub fn with_parallel_gathering(mut self, enabled: bool) -> Self {
        self.parallel_gathering = enabled;
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_call_depth > MAX_CALL_DEPTH_LIMIT {
            return Err(ConfigError::range_with_hint(
                "max_call_depth",
                self.max_call_depth,
                0,
                MAX_CALL_DEPTH_LIMIT,
                "The thorough preset uses 12.",
            ));
        }

        let layout = self.check_argument_layout;
        if layout.permission_index == layout.object_index {
            return Err(ConfigError::ArgumentLayout {
                index: layout.permission_index,
            });
        }

        if self.check_methods.is_empty() && self.require_methods.is_empty() {
            return Err(ConfigError::NoCallMethods);
        }

        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        match file.version {
            None => return Err(ConfigError::MissingVersion),
            Some(1) => {}
            Some(found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: vec![1],
                })
            }
        }

        let preset = match file.preset {
            Some(name) => Preset::from_str(&name)?,
            None => Preset::default(),
        };

        let mut config = Self::preset(preset);
        if let Some(overrides) = file.overrides {
            config.apply(overrides);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            preset: Some(self.preset.to_string()),
            overrides: Some(ConfigOverrides {
                check_methods: Some(self.check_methods.clone()),
                require_methods: Some(self.require_methods.clone()),
                check_argument_layout: Some(self.check_argument_layout),
                max_call_depth: Some(self.max_call_depth),
                interprocedural: Some(self.interprocedural),
                infer_relation_from_member: Some(self.infer_relation_from_member),
                warn_on_ambiguous_redirect: Some(self.warn_on_ambiguous_redirect),
                redirect_strategy: Some(self.redirect_strategy),
                parallel_gathering: Some(self.parallel_gathering),
            }),
        };

        Ok(serde_yaml::to_string(&file)?)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(v) = overrides.check_methods {
            self.check_methods = v;
        }
        if let Some(v) = overrides.require_methods {
            self.require_methods = v;
        }
        if let Some(v) = overrides.check_argument_layout {
            self.check_argument_layout = v;
        }
        if let Some(v) = overrides.max_call_depth {
            self.max_call_depth = v;
        }
        if let Some(v) = overrides.interprocedural {
            self.interprocedural = v;
        }
        if let Some(v) = overrides.infer_relation_from_member {
            self.infer_relation_from_member = v;
        }
        if let Some(v) = overrides.warn_on_ambiguous_redirect {
            self.warn_on_ambiguous_redirect = v;
        }
        if let Some(v) = overrides.redirect_strategy {
            self.redirect_strategy = v;
        }
        if let Some(v) = overrides.parallel_gathering {
            self.parallel_gathering = v;
        }
    }
}
