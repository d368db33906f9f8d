//! Diagnostic assertions

use authz_verifier::{Diagnostic, RuleId, VerificationReport};

pub fn missing_permission_diagnostics(report: &VerificationReport) -> Vec<&Diagnostic> {
    report
        .diagnostics
        .iter()
        .filter(|d| d.rule == RuleId::MissingPermission)
        .collect()
}

/// Missing permissions of each AUTHZ001 diagnostic, comma-joined
pub fn missing_lists(report: &VerificationReport) -> Vec<String> {
    missing_permission_diagnostics(report)
        .iter()
        .map(|d| d.missing.to_comma_list())
        .collect()
}

pub fn assert_clean(report: &VerificationReport) {
    assert!(
        report.diagnostics.is_empty(),
        "expected no diagnostics, got:\n{}",
        report
            .diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    );
}
