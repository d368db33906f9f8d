//! Pipeline orchestration

pub mod prepared;
pub mod report;
pub mod verifier;

pub use prepared::PreparedProgram;
pub use report::{EntryPointReport, VerificationReport};
pub use verifier::AuthzVerifier;
