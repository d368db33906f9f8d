/*
 * Authorization Diagnostics
 *
 * AUTHZ001  missing permission     (error)
 * AUTHZ002  possibly missing explicit redirect (warning)
 *
 * Spans are in the coordinates of the text the analysis saw until the
 * pipeline maps them back to original source and fills in line/column.
 */

use crate::features::permissions::{AbstractLocation, PermissionSet};
use crate::features::redirection::RedirectWarning;
use crate::shared::models::{LineColumn, MethodId, TextSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "AUTHZ001")]
    MissingPermission,

    #[serde(rename = "AUTHZ002")]
    AmbiguousRedirect,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::MissingPermission => "AUTHZ001",
            RuleId::AmbiguousRedirect => "AUTHZ002",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            RuleId::MissingPermission => Severity::Error,
            RuleId::AmbiguousRedirect => Severity::Warning,
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: RuleId,
    pub severity: Severity,
    pub file: String,
    pub span: TextSpan,
    pub position: LineColumn,
    pub message: String,

    /// Method containing the offending call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<MethodId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<AbstractLocation>,

    #[serde(default, skip_serializing_if = "PermissionSet::is_empty")]
    pub missing: PermissionSet,
}

pub fn missing_permission_message(location: &AbstractLocation, missing: &PermissionSet) -> String {
    format!(
        "Missing permission(s) {{{}}} on '{}': not proven on every path reaching this call",
        missing.to_comma_list(),
        location
    )
}

pub fn ambiguous_redirect_message(interface: &str, implementers: usize) -> String {
    format!(
        "Interface '{}' has {} implementations and no explicit redirect; calls through it are not followed",
        interface, implementers
    )
}

impl Diagnostic {
    pub fn missing_permission(
        file: impl Into<String>,
        span: TextSpan,
        method: &MethodId,
        location: &AbstractLocation,
        missing: PermissionSet,
    ) -> Self {
        let rule = RuleId::MissingPermission;
        Self {
            rule,
            severity: rule.default_severity(),
            file: file.into(),
            span,
            position: LineColumn::START,
            message: missing_permission_message(location, &missing),
            method: Some(method.clone()),
            location: Some(location.clone()),
            missing,
        }
    }

    pub fn ambiguous_redirect(warning: &RedirectWarning) -> Self {
        let rule = RuleId::AmbiguousRedirect;
        Self {
            rule,
            severity: rule.default_severity(),
            file: warning.file.clone().unwrap_or_default(),
            span: warning.span.unwrap_or_default(),
            position: LineColumn::START,
            message: ambiguous_redirect_message(&warning.interface, warning.implementer_count()),
            method: None,
            location: None,
            missing: PermissionSet::empty(),
        }
    }

    pub fn with_position(mut self, position: LineColumn) -> Self {
        self.position = position;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn sort_key(&self) -> (&str, usize, RuleId, &str) {
        (&self.file, self.span.start, self.rule, &self.message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}[{}]: {}",
            self.file, self.position, self.severity, self.rule, self.message
        )
    }
}

/// Sort by (file, offset, rule, message) and drop duplicates
pub fn normalize(diagnostics: &mut Vec<Diagnostic>) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    diagnostics.dedup_by(|a, b| a.sort_key() == b.sort_key());
}
