//! Verification report
//!
//! ```text
//! VerificationReport
//! ├── diagnostics: Vec<Diagnostic>       (original coordinates, sorted)
//! ├── entry_points: Vec<EntryPointReport>
//! ├── gathering: GatheringStats
//! ├── redirects: RedirectMap
//! └── substitutions / retargeted_calls / duration_ms
//! ```

use crate::errors::Result;
use crate::features::authz_flow::{Diagnostic, PropagationStats, Severity};
use crate::features::redirection::{GatheringStats, RedirectMap};
use crate::shared::models::MethodId;
use serde::Serialize;

/// Per-entry-point result
#[derive(Debug, Clone, Serialize)]
pub struct EntryPointReport {
    pub method: MethodId,
    pub file: String,
    /// AUTHZ001 diagnostics raised while analyzing this entry point
    pub diagnostics: usize,
    pub stats: PropagationStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub diagnostics: Vec<Diagnostic>,
    pub entry_points: Vec<EntryPointReport>,
    pub gathering: GatheringStats,
    pub redirects: RedirectMap,

    /// Text substitutions made by redirection
    pub substitutions: usize,

    pub retargeted_calls: usize,

    pub duration_ms: u64,
}

impl VerificationReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
