//! Permissions
//!
//! Immutable permission sets and the authorization lattice the dataflow
//! engine propagates. Values are shared between CFG edges without locks.

pub mod domain;

pub use domain::{AbstractLocation, AuthorizationLattice, LocationSet, Permission, PermissionSet};
