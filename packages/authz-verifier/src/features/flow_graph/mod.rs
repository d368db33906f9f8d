//! Flow graph
//!
//! CFG port consumed by the dataflow engine, the petgraph-backed
//! `BlockGraph`, and traversal orders.

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::reverse_postorder;
pub use infrastructure::BlockGraph;
pub use ports::{ControlFlowGraph, NodeId};
