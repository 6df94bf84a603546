//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the triage domain.

mod confidence;
mod errors;
mod ids;
mod timestamp;

pub use confidence::Confidence;
pub use errors::{
    ConfigurationError, ErrorCode, StateError, StorageError, TriageError, ValidationError,
};
pub use ids::{QuestionId, SessionId};
pub use timestamp::Timestamp;
