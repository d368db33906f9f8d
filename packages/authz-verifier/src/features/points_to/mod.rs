//! Points-to / alias resolution
//!
//! `AliasOracle` is the port the dataflow engine resolves references
//! through; `UnionFindAliasOracle` is the bundled implementation.

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{UnionFind, UnionFindAliasOracle};
pub use ports::{AliasOracle, ProgramPoint, Reference};
