//! Dependency-injection redirection
//!
//! Gathering discovers interfaces and their implementers across all files
//! (in parallel); the redirect map picks the sole concrete implementation
//! per interface; the call resolver rewrites call sites and records the
//! text edits so diagnostics can be mapped back to original source.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{CallResolver, RewrittenFile};
pub use domain::{LocationMapping, RedirectMap, RedirectWarning, SourceLocationRemapper};
pub use infrastructure::{GatheringIndex, GatheringStats, InterfaceDecl};
