//! Call classification

use crate::config::VerifierConfig;
use crate::shared::models::{CallSite, MethodId};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    /// Establishes a permission on an object
    Check,
    /// Demands permissions already proven
    Require,
    Other,
}

/// Matches call targets against the configured check/require method names
///
/// A configured name matches either the simple method name (`Check`) or the
/// qualified `Type.Method` form. Check wins when a name is configured as both.
#[derive(Debug, Clone, Default)]
pub struct CallClassifier {
    check: FxHashSet<String>,
    require: FxHashSet<String>,
}

impl CallClassifier {
    pub fn new<I, J, S, T>(check: I, require: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            check: check.into_iter().map(Into::into).collect(),
            require: require.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &VerifierConfig) -> Self {
        Self::new(
            config.check_methods.iter().cloned(),
            config.require_methods.iter().cloned(),
        )
    }

    pub fn classify(&self, target: &MethodId) -> CallKind {
        if Self::matches(&self.check, target) {
            CallKind::Check
        } else if Self::matches(&self.require, target) {
            CallKind::Require
        } else {
            CallKind::Other
        }
    }

    /// Classify a call site by its resolved target, falling back to the
    /// declared target when redirection moved the call off the configured type
    pub fn classify_site(&self, site: &CallSite) -> CallKind {
        match self.classify(&site.target) {
            CallKind::Other => match &site.original_target {
                Some(declared) => self.classify(declared),
                None => CallKind::Other,
            },
            kind => kind,
        }
    }

    fn matches(names: &FxHashSet<String>, target: &MethodId) -> bool {
        names.contains(&target.name) || names.contains(&target.to_string())
    }
}
