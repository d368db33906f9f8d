/*
 * Block Graph
 *
 * petgraph-backed CFG built from a method's `CfgModel`.
 *
 * - Nodes carry the basic block (label + operations)
 * - Edges carry the CFG edge kind
 * - Node ids follow block declaration order
 *
 * Construction validates the model: unique block labels, known entry/exit,
 * no dangling edges.
 */

use crate::errors::{Result, VerifierError};
use crate::features::flow_graph::ports::{ControlFlowGraph, NodeId};
use crate::shared::models::{CallSite, CfgBlock, CfgEdgeKind, CfgModel, MethodId, Operation};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
pub struct BlockGraph {
    method: MethodId,
    graph: DiGraph<CfgBlock, CfgEdgeKind>,
    /// Block label to petgraph NodeIndex mapping
    node_map: FxHashMap<String, NodeIndex>,
    entry: NodeIndex,
    exit: NodeIndex,
}

impl BlockGraph {
    pub fn from_model(method: &MethodId, model: &CfgModel) -> Result<Self> {
        let mut graph = DiGraph::with_capacity(model.blocks.len(), model.edges.len());
        let mut node_map = FxHashMap::default();

        for block in &model.blocks {
            if node_map.contains_key(&block.id) {
                return Err(VerifierError::model(format!(
                    "{}: duplicate block '{}'",
                    method, block.id
                )));
            }
            let idx = graph.add_node(block.clone());
            node_map.insert(block.id.clone(), idx);
        }

        let lookup = |label: &str, role: &str| {
            node_map.get(label).copied().ok_or_else(|| {
                VerifierError::model(format!("{}: {} block '{}' not found", method, role, label))
            })
        };

        let entry = lookup(&model.entry, "entry")?;
        let exit = lookup(&model.exit, "exit")?;

        for edge in &model.edges {
            let from = lookup(&edge.source, "edge source")?;
            let to = lookup(&edge.target, "edge target")?;
            graph.add_edge(from, to, edge.kind);
        }

        Ok(Self {
            method: method.clone(),
            graph,
            node_map,
            entry,
            exit,
        })
    }

    pub fn method(&self) -> &MethodId {
        &self.method
    }

    pub fn node_by_label(&self, label: &str) -> Option<NodeId> {
        self.node_map.get(label).map(|idx| NodeId(idx.index() as u32))
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Copy of the graph with every operation passed through `f`
    pub fn map_operations(&self, mut f: impl FnMut(&Operation) -> Operation) -> BlockGraph {
        let graph = self.graph.map(
            |_, block| CfgBlock::new(block.id.clone(), block.operations.iter().map(&mut f).collect()),
            |_, kind| *kind,
        );
        BlockGraph {
            method: self.method.clone(),
            graph,
            node_map: self.node_map.clone(),
            entry: self.entry,
            exit: self.exit,
        }
    }

    /// Every call site, in block order
    pub fn call_sites(&self) -> impl Iterator<Item = &CallSite> {
        self.graph
            .node_weights()
            .flat_map(|block| block.operations.iter())
            .filter_map(|op| match op {
                Operation::Call(site) => Some(site),
                _ => None,
            })
    }

    fn neighbours(&self, node: NodeId, direction: Direction) -> Vec<NodeId> {
        let mut out: Vec<NodeId> = self
            .graph
            .neighbors_directed(NodeIndex::new(node.index()), direction)
            .map(|idx| NodeId(idx.index() as u32))
            .collect();
        out.sort_unstable();
        out.dedup();
        out
    }
}

impl ControlFlowGraph for BlockGraph {
    fn entry(&self) -> NodeId {
        NodeId(self.entry.index() as u32)
    }

    fn exit(&self) -> NodeId {
        NodeId(self.exit.index() as u32)
    }

    fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    fn successors(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbours(node, Direction::Outgoing)
    }

    fn predecessors(&self, node: NodeId) -> Vec<NodeId> {
        self.neighbours(node, Direction::Incoming)
    }

    fn operations(&self, node: NodeId) -> &[Operation] {
        self.graph
            .node_weight(NodeIndex::new(node.index()))
            .map(|block| block.operations.as_slice())
            .unwrap_or(&[])
    }

    fn edge_kind(&self, from: NodeId, to: NodeId) -> Option<CfgEdgeKind> {
        self.graph
            .find_edge(NodeIndex::new(from.index()), NodeIndex::new(to.index()))
            .map(|e| self.graph[e])
    }

    fn label(&self, node: NodeId) -> &str {
        self.graph
            .node_weight(NodeIndex::new(node.index()))
            .map(|block| block.id.as_str())
            .unwrap_or("")
    }
}
