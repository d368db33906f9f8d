/*
 * Authz Verifier - Authorization Dataflow Verification
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (program model, CFG model, spans)
 * - features/    : Vertical slices (permissions → flow_graph → points_to → redirection → authz_flow)
 * - pipeline/    : Orchestration and reporting
 * - config/      : Presets and YAML configuration
 *
 * Analysis:
 * - Must-dataflow over a permission lattice; meet at confluences
 * - Rayon-parallel gathering, single-threaded propagation per entry point
 * - Diagnostics mapped back to original source through recorded text edits
 */

#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{Preset, RedirectStrategy, VerifierConfig};
pub use errors::{Result, VerifierError};
pub use features::authz_flow::{Diagnostic, RuleId, Severity};
pub use features::permissions::{AbstractLocation, AuthorizationLattice, Permission, PermissionSet};
pub use pipeline::{AuthzVerifier, VerificationReport};
pub use shared::models::ProgramModel;
