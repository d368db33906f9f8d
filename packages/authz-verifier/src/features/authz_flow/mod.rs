//! Authorization flow analysis
//!
//! Hexagonal layout:
//! - domain/          - Call classification, diagnostics
//! - ports/           - SemanticModel, MethodResolver
//! - application/     - Operand resolution, initial state, propagation engine
//! - infrastructure/  - RelationTable (SemanticModel over the program model)
//!
//! The engine proves, per entry point, that every require call is dominated
//! on every path by check calls establishing the required permissions on
//! the same abstract location.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{
    build_initial_state, infer_relation, Frame, OperandResolver, PropagationEngine,
    PropagationOutcome, PropagationStats,
};
pub use domain::{normalize, CallClassifier, CallKind, Diagnostic, RuleId, Severity};
pub use infrastructure::RelationTable;
pub use ports::{MethodResolver, MethodView, SemanticModel};
