//! Abstract Location
//!
//! Analysis-time stand-in for the runtime object(s) a reference may denote.
//! Identities come from the alias oracle; two references that may alias
//! resolve to the same location.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable, ordered location identity (e.g. `SecretsController.Get::secret`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbstractLocation(String);

impl AbstractLocation {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Summary location for the elements of this collection
    pub fn element(&self) -> AbstractLocation {
        AbstractLocation(format!("{}[*]", self.0))
    }

    pub fn is_element_summary(&self) -> bool {
        self.0.ends_with("[*]")
    }

    /// Collection location this element summary belongs to
    pub fn element_base(&self) -> Option<AbstractLocation> {
        self.0
            .strip_suffix("[*]")
            .map(|base| AbstractLocation(base.to_string()))
    }
}

impl fmt::Display for AbstractLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of locations a reference may denote
pub type LocationSet = BTreeSet<AbstractLocation>;
