//! Domain layer containing the triage engine and its types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, confidence, timestamps, errors)
//! - `catalog` - Question definitions and the validated, shared catalog
//! - `triage` - Scoring, selection, abstention and the session orchestrator

pub mod catalog;
pub mod foundation;
pub mod triage;
