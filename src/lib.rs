//! Adaptive Triage - Clinical triage decision engine
//!
//! This crate selects the next clinical question to ask, keeps a running risk
//! score and classification as answers arrive, and decides when a session can
//! stop and whether its result should be qualified (abstention).
//!
//! # Layers
//!
//! - `domain` - Catalog, scoring, selection, abstention and the session orchestrator
//! - `ports` / `adapters` - Session storage and catalog loading
//! - `application` - `TriageService`, the async entry point for collaborators
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
