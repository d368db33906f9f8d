//! Shared models for the verifier

pub mod models;
