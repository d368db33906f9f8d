/*
 * Flow Graph Ports
 *
 * The CFG collaborator the dataflow engine consumes. Any host CFG builder
 * can stand behind this trait; `BlockGraph` is the bundled petgraph
 * implementation.
 */

use crate::shared::models::{CfgEdgeKind, Operation};
use std::fmt;

/// Dense node handle, valid for the graph that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Control flow graph over basic blocks
///
/// Node ids are dense in `0..node_count()`. `successors` and `predecessors`
/// return each neighbour once, in ascending id order, so traversals are
/// deterministic.
pub trait ControlFlowGraph {
    fn entry(&self) -> NodeId;

    fn exit(&self) -> NodeId;

    fn node_count(&self) -> usize;

    fn successors(&self, node: NodeId) -> Vec<NodeId>;

    fn predecessors(&self, node: NodeId) -> Vec<NodeId>;

    /// Operations of the block, in execution order
    fn operations(&self, node: NodeId) -> &[Operation];

    fn edge_kind(&self, from: NodeId, to: NodeId) -> Option<CfgEdgeKind>;

    /// Block label as named in the source model
    fn label(&self, node: NodeId) -> &str;

    fn nodes(&self) -> Vec<NodeId> {
        (0..self.node_count() as u32).map(NodeId).collect()
    }

    fn is_back_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edge_kind(from, to) == Some(CfgEdgeKind::LoopBack)
    }
}
