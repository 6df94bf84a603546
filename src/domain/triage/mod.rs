//! Triage Module - The adaptive triage engine.
//!
//! # Components
//!
//! - `TriageState` - Answers, running score, risk tier, confidence, emergency flag
//! - `ScoringEngine` / `CriticalSignalDetector` - Score deltas, classification, escalation
//! - `AdaptiveSelector` - Mandatory-first, information-gain ranked question selection
//! - `AbstentionPolicy` - Whether a finished classification should be qualified
//! - `TriageSession` - Orchestrates one session through `register_answer`
//!
//! Everything here is pure computation over in-memory state; sessions share
//! the catalog read-only and never share mutable data.

mod abstention;
mod classification;
mod scoring;
mod selector;
mod session;
mod state;

pub use abstention::{
    AbstentionDecision, AbstentionPolicy, AbstentionReason, ABSTENTION_CONFIDENCE, MIN_ANSWERS,
};
pub use classification::{Classification, RiskTier};
pub use scoring::{
    CriticalSignalDetector, ScoringEngine, CRITICAL_SCORE, HIGH_SCORE, MEDIUM_SCORE,
};
pub use selector::{AdaptiveSelector, SelectionDecision, STOP_CONFIDENCE};
pub use session::{AnswerOutcome, PostEmergencyPolicy, TriageSession, TriageSummary};
pub use state::{RecordedAnswer, TriageState};
