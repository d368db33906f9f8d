pub mod call_kind;
pub mod diagnostics;

pub use call_kind::{CallClassifier, CallKind};
pub use diagnostics::{normalize, Diagnostic, RuleId, Severity};
