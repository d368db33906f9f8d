pub mod block_graph;

pub use block_graph::BlockGraph;
