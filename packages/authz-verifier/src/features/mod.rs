//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/         - Pure logic (no external dependencies)
//! - ports/          - Interface definitions (traits)
//! - application/    - Use cases
//! - infrastructure/ - Concrete implementations

pub mod authz_flow;
pub mod flow_graph;
pub mod permissions;
pub mod points_to;

// Dependency-injection redirection (gathering → redirect map → rewrite)
pub mod redirection;
