//! Ports for alias resolution
//!
//! The dataflow engine asks one question: which abstract location(s) may a
//! reference denote at a program point. Implementations range from the
//! bundled flow-insensitive union-find oracle to a full points-to analysis.

use crate::features::flow_graph::NodeId;
use crate::features::permissions::LocationSet;
use crate::shared::models::MethodId;

/// Reference shape the oracle can resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    Parameter(String),
    Local(String),
    /// Elements of the referenced collection
    ElementOf(Box<Reference>),
}

impl Reference {
    pub fn parameter(name: impl Into<String>) -> Self {
        Reference::Parameter(name.into())
    }

    pub fn local(name: impl Into<String>) -> Self {
        Reference::Local(name.into())
    }

    pub fn element_of(inner: Reference) -> Self {
        Reference::ElementOf(Box::new(inner))
    }
}

/// Operation position inside a method's CFG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramPoint {
    pub node: NodeId,
    pub operation: usize,
}

impl ProgramPoint {
    pub fn new(node: NodeId, operation: usize) -> Self {
        Self { node, operation }
    }
}

/// Points-to / alias oracle
///
/// References that may alias must resolve to the same location. An empty
/// result means "unknown" and the caller skips the reference.
pub trait AliasOracle: Send + Sync {
    fn locations(&self, method: &MethodId, reference: &Reference, point: ProgramPoint)
        -> LocationSet;
}
