//! Application layer - Services that orchestrate domain operations over ports.

mod triage_service;

pub use triage_service::{RegisterAnswerCommand, TriageService};
