//! Common test utilities for authz-verifier
//!
//! Builders for program models and CFGs, plus diagnostic assertions shared
//! by the integration tests.

#![allow(dead_code)]

mod assertions;
mod builders;

pub use assertions::*;
pub use builders::*;
