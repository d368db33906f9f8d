//! Control Flow Graph types
//!
//! Serializable CFG description as delivered by the host's CFG builder.
//! `features::flow_graph` turns this into a traversable graph.

use super::expression::Operation;
use serde::{Deserialize, Serialize};

/// CFG edge kind (control flow edge types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CfgEdgeKind {
    /// Sequential execution (fall-through)
    #[default]
    Sequential,
    /// True branch of conditional
    TrueBranch,
    /// False branch of conditional
    FalseBranch,
    /// Loop back edge
    LoopBack,
    /// Loop exit edge
    LoopExit,
    /// Exception handler edge
    Exception,
}

impl CfgEdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CfgEdgeKind::Sequential => "SEQUENTIAL",
            CfgEdgeKind::TrueBranch => "TRUE",
            CfgEdgeKind::FalseBranch => "FALSE",
            CfgEdgeKind::LoopBack => "LOOP_BACK",
            CfgEdgeKind::LoopExit => "LOOP_EXIT",
            CfgEdgeKind::Exception => "EXCEPTION",
        }
    }
}

/// CFG edge connecting two basic blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgEdge {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: CfgEdgeKind,
}

impl CfgEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: CfgEdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }
}

/// CFG basic block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgBlock {
    pub id: String,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl CfgBlock {
    pub fn new(id: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            id: id.into(),
            operations,
        }
    }

    pub fn empty(id: impl Into<String>) -> Self {
        Self::new(id, Vec::new())
    }
}

/// Whole-method CFG description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfgModel {
    pub entry: String,
    pub exit: String,
    pub blocks: Vec<CfgBlock>,
    #[serde(default)]
    pub edges: Vec<CfgEdge>,
}
