//! Permission domain: tokens, sets, locations, and the lattice over them

pub mod abstract_location;
pub mod lattice;
pub mod permission_set;

pub use abstract_location::{AbstractLocation, LocationSet};
pub use lattice::AuthorizationLattice;
pub use permission_set::{Permission, PermissionSet};
