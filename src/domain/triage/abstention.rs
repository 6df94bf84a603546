//! Abstention Policy - Whether a classification should be qualified.
//!
//! Abstaining is a successful outcome: the classification is still produced,
//! annotated with the reason it should not be relied on without a clinician.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::TriageState;
use crate::domain::catalog::{AnswerSource, AnswerValue, QuestionCatalog};

/// Answers required before any classification is trusted.
pub const MIN_ANSWERS: usize = 4;
/// Confidence below which the engine abstains.
pub const ABSTENTION_CONFIDENCE: f64 = 0.60;

/// Why the engine abstained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbstentionReason {
    InsufficientInformation,
    LowConfidence,
    AtypicalPresentation,
}

impl AbstentionReason {
    pub fn message(&self) -> &'static str {
        match self {
            AbstentionReason::InsufficientInformation => "insufficient information",
            AbstentionReason::LowConfidence => "confidence too low",
            AbstentionReason::AtypicalPresentation => {
                "atypical presentation: requires direct evaluation"
            }
        }
    }
}

impl fmt::Display for AbstentionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Result of `should_abstain`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstentionDecision {
    pub abstain: bool,
    pub reason: Option<AbstentionReason>,
}

impl AbstentionDecision {
    pub fn proceed() -> Self {
        Self {
            abstain: false,
            reason: None,
        }
    }

    pub fn abstain(reason: AbstentionReason) -> Self {
        Self {
            abstain: true,
            reason: Some(reason),
        }
    }

    /// Human-readable reason, if abstaining.
    pub fn message(&self) -> Option<&'static str> {
        self.reason.map(|r| r.message())
    }
}

/// Post-hoc evaluation; the first matching rule wins.
pub struct AbstentionPolicy;

impl AbstentionPolicy {
    pub fn evaluate(state: &TriageState, catalog: &QuestionCatalog) -> AbstentionDecision {
        if state.answered_count() < MIN_ANSWERS {
            return AbstentionDecision::abstain(AbstentionReason::InsufficientInformation);
        }
        if state.confidence().value() < ABSTENTION_CONFIDENCE {
            return AbstentionDecision::abstain(AbstentionReason::LowConfidence);
        }
        if Self::is_atypical(state, catalog) {
            return AbstentionDecision::abstain(AbstentionReason::AtypicalPresentation);
        }
        AbstentionDecision::proceed()
    }

    /// Alarm signs reported while fever is denied or was never asked.
    fn is_atypical(state: &TriageState, catalog: &QuestionCatalog) -> bool {
        let Some(pattern) = catalog.atypical_presentation() else {
            return false;
        };
        let fever = state.answer(pattern.fever_question.as_str()).and_then(AnswerValue::as_bool);
        fever != Some(true)
            && pattern
                .alarm_questions
                .iter()
                .any(|id| state.answer(id.as_str()).is_some_and(AnswerValue::is_positive))
    }
}
