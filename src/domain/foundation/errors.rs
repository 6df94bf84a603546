//! Error types for the domain layer.
//!
//! Three families, matching when they can surface:
//! - [`ConfigurationError`] only while a catalog is being built, before any session exists.
//! - [`ValidationError`] synchronously on a bad request (unknown question, bad value, no session).
//! - [`StateError`] when a request is well-formed but the session can no longer accept it.

use std::fmt;
use thiserror::Error;

use super::{QuestionId, SessionId};

/// Errors caused by a malformed request against a well-formed catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: f64,
        max: f64,
        actual: f64,
    },

    #[error("Unknown question: {0}")]
    UnknownQuestion(QuestionId),

    #[error("Answer for '{question_id}' must be {expected}, got {actual}")]
    AnswerOutOfDomain {
        question_id: QuestionId,
        expected: String,
        actual: String,
    },

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: f64, max: f64, actual: f64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an out-of-domain answer error.
    pub fn answer_out_of_domain(
        question_id: &QuestionId,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ValidationError::AnswerOutOfDomain {
            question_id: question_id.clone(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

/// Catalog inconsistencies detected while constructing a [`QuestionCatalog`].
///
/// `owner` names the catalog entry carrying the defect: a question id, or a
/// positional label such as `correlations[1]` for non-question entries.
///
/// [`QuestionCatalog`]: crate::domain::catalog::QuestionCatalog
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Catalog contains no questions")]
    EmptyCatalog,

    #[error("Question id cannot be blank")]
    BlankQuestionId,

    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(QuestionId),

    #[error("{owner} references unknown question '{referenced}'")]
    UnknownReference { owner: String, referenced: QuestionId },

    #[error("Question '{0}' lists itself as a dependency")]
    SelfDependency(QuestionId),

    #[error("Circular dependency: {}", format_cycle(.0))]
    CircularDependency(Vec<QuestionId>),

    #[error("{owner} has an invalid predicate on '{field}': {reason}")]
    InvalidPredicate {
        owner: String,
        field: QuestionId,
        reason: String,
    },

    #[error("{owner} has an empty '{combinator}' predicate")]
    EmptyCombinator {
        owner: String,
        combinator: &'static str,
    },

    #[error("{owner} has probability {value} outside [0, 1]")]
    ProbabilityOutOfRange { owner: String, value: f64 },

    #[error("{owner} has non-finite probability delta {value}")]
    NonFiniteDelta { owner: String, value: f64 },

    #[error("Question '{question_id}' has negative impact weight {value}")]
    NegativeImpact { question_id: QuestionId, value: f64 },

    #[error("Question '{question_id}' has incompatible scoring: {reason}")]
    IncompatibleScoring {
        question_id: QuestionId,
        reason: String,
    },

    #[error("Question '{question_id}' cannot be a critical signal: {reason}")]
    InvalidCriticalSignal {
        question_id: QuestionId,
        reason: String,
    },

    #[error("Question '{question_id}' has an invalid answer domain: {reason}")]
    InvalidAnswerDomain {
        question_id: QuestionId,
        reason: String,
    },

    #[error("Failed to parse {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("Failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}

fn format_cycle(cycle: &[QuestionId]) -> String {
    cycle
        .iter()
        .map(QuestionId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Requests that are well-formed but rejected by the session's current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("Session is in emergency mode; answer to '{question_id}' rejected")]
    EmergencyLocked { question_id: QuestionId },
}

/// Failures of the session store behind the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Session already exists: {0}")]
    DuplicateSession(SessionId),
}

/// Any error surfaced by the triage engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl TriageError {
    /// Returns the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            TriageError::Validation(err) => match err {
                ValidationError::EmptyField { .. } => ErrorCode::EmptyField,
                ValidationError::OutOfRange { .. } => ErrorCode::OutOfRange,
                ValidationError::UnknownQuestion(_) => ErrorCode::UnknownQuestion,
                ValidationError::AnswerOutOfDomain { .. } => ErrorCode::AnswerOutOfDomain,
                ValidationError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            },
            TriageError::Configuration(_) => ErrorCode::CatalogInvalid,
            TriageError::State(StateError::EmergencyLocked { .. }) => ErrorCode::EmergencyLocked,
            TriageError::Storage(StorageError::DuplicateSession(_)) => ErrorCode::DuplicateSession,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    EmptyField,
    OutOfRange,
    UnknownQuestion,
    AnswerOutOfDomain,

    // Not found errors
    SessionNotFound,

    // Configuration errors
    CatalogInvalid,

    // State errors
    EmergencyLocked,

    // Storage errors
    DuplicateSession,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::UnknownQuestion => "UNKNOWN_QUESTION",
            ErrorCode::AnswerOutOfDomain => "ANSWER_OUT_OF_DOMAIN",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::CatalogInvalid => "CATALOG_INVALID",
            ErrorCode::EmergencyLocked => "EMERGENCY_LOCKED",
            ErrorCode::DuplicateSession => "DUPLICATE_SESSION",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("question_id");
        assert_eq!(format!("{}", err), "Field 'question_id' cannot be empty");
    }

    #[test]
    fn validation_error_out_of_range_displays_correctly() {
        let err = ValidationError::out_of_range("idade", 0.0, 120.0, 150.0);
        assert_eq!(
            format!("{}", err),
            "Field 'idade' must be between 0 and 120, got 150"
        );
    }

    #[test]
    fn circular_dependency_lists_the_chain() {
        let err = ConfigurationError::CircularDependency(vec![
            QuestionId::from("a"),
            QuestionId::from("b"),
            QuestionId::from("a"),
        ]);
        assert_eq!(format!("{}", err), "Circular dependency: a -> b -> a");
    }

    #[test]
    fn triage_error_maps_to_codes() {
        let err: TriageError = ValidationError::UnknownQuestion(QuestionId::from("x")).into();
        assert_eq!(err.code(), ErrorCode::UnknownQuestion);

        let err: TriageError = StateError::EmergencyLocked {
            question_id: QuestionId::from("choque"),
        }
        .into();
        assert_eq!(err.code(), ErrorCode::EmergencyLocked);

        let err: TriageError = ConfigurationError::EmptyCatalog.into();
        assert_eq!(err.code(), ErrorCode::CatalogInvalid);

        let err: TriageError = StorageError::DuplicateSession(SessionId::new()).into();
        assert_eq!(err.code(), ErrorCode::DuplicateSession);

        let err: TriageError = ValidationError::empty_field("question_id").into();
        assert_eq!(err.code(), ErrorCode::EmptyField);
    }

    #[test]
    fn triage_error_is_transparent() {
        let err: TriageError = ValidationError::SessionNotFound(
            "550e8400-e29b-41d4-a716-446655440000".parse().unwrap(),
        )
        .into();
        assert_eq!(
            err.to_string(),
            "Session not found: 550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::SessionNotFound), "SESSION_NOT_FOUND");
        assert_eq!(format!("{}", ErrorCode::EmergencyLocked), "EMERGENCY_LOCKED");
    }
}
