/*
 * Authz Flow Ports
 *
 * What the propagation engine needs from the host besides the CFG and the
 * alias oracle:
 * - SemanticModel: compile-time values of relation constants
 * - MethodResolver: callee bodies for interprocedural descent
 */

use crate::features::flow_graph::ControlFlowGraph;
use crate::shared::models::{MethodId, Parameter};

/// Symbol-level queries against the host's semantic model
pub trait SemanticModel: Send + Sync {
    /// Value of a relation constant (`Relations.CanView` → `can_view`)
    fn relation_constant(&self, owner: Option<&str>, member: &str) -> Option<String>;
}

/// Analyzable body of a method
pub struct MethodView<'a> {
    pub id: &'a MethodId,
    pub file: &'a str,
    pub parameters: &'a [Parameter],
    pub cfg: &'a dyn ControlFlowGraph,
}

/// Call target → body lookup; `None` for abstract or external methods
pub trait MethodResolver {
    fn resolve(&self, id: &MethodId) -> Option<MethodView<'_>>;
}
