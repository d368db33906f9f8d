pub mod gathering;

pub use gathering::{GatheringIndex, GatheringStats, InterfaceDecl};
