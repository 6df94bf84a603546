//! Per-session triage state.

use serde::Serialize;

use super::{Classification, RiskTier};
use crate::domain::catalog::{AnswerSource, AnswerValue};
use crate::domain::foundation::{Confidence, QuestionId, Timestamp};

/// A stored answer together with the score delta it contributed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordedAnswer {
    pub question_id: QuestionId,
    pub value: AnswerValue,
    /// Cached so a re-answer replaces rather than accumulates.
    pub delta: f64,
    pub answered_at: Timestamp,
}

/// Mutable state of one triage session.
///
/// # Invariants
///
/// - each question appears at most once in `answers`; re-answering keeps its
///   original position and replaces value and delta
/// - `score`, `risk_tier` and `confidence` are only written by the scoring
///   engine's full recompute, never patched
/// - `emergency` never goes from `true` back to `false`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageState {
    answers: Vec<RecordedAnswer>,
    score: f64,
    risk_tier: RiskTier,
    confidence: Confidence,
    critical_signals: Vec<QuestionId>,
    emergency: bool,
}

impl TriageState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self {
            answers: Vec::new(),
            score: 0.0,
            risk_tier: RiskTier::Undetermined,
            confidence: Confidence::ZERO,
            critical_signals: Vec::new(),
            emergency: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Answers in the order they were first given.
    pub fn answers(&self) -> &[RecordedAnswer] {
        &self.answers
    }

    pub fn recorded(&self, question_id: &str) -> Option<&RecordedAnswer> {
        self.answers.iter().find(|a| a.question_id.as_str() == question_id)
    }

    /// Answered question ids, in first-answered order.
    pub fn answered_ids(&self) -> Vec<&QuestionId> {
        self.answers.iter().map(|a| &a.question_id).collect()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn risk_tier(&self) -> RiskTier {
        self.risk_tier
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    /// Critical signals detected, in detection order.
    pub fn critical_signals(&self) -> &[QuestionId] {
        &self.critical_signals
    }

    pub fn is_emergency(&self) -> bool {
        self.emergency
    }

    pub fn classification(&self) -> Classification {
        Classification {
            risk_tier: self.risk_tier,
            score: self.score,
            confidence: self.confidence,
            emergency: self.emergency,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations (scoring engine only)
    // ─────────────────────────────────────────────────────────────────────────

    /// Stores or overwrites an answer. Returns the replaced answer, if any.
    pub(crate) fn record_answer(
        &mut self,
        question_id: QuestionId,
        value: AnswerValue,
        delta: f64,
    ) -> Option<RecordedAnswer> {
        let answered_at = Timestamp::now();
        match self.answers.iter_mut().find(|a| a.question_id == question_id) {
            Some(existing) => {
                let previous = existing.clone();
                existing.value = value;
                existing.delta = delta;
                existing.answered_at = answered_at;
                Some(previous)
            }
            None => {
                self.answers.push(RecordedAnswer {
                    question_id,
                    value,
                    delta,
                    answered_at,
                });
                None
            }
        }
    }

    /// Adds a critical signal and latches emergency mode.
    ///
    /// Returns true if this call switched the session into emergency mode.
    pub(crate) fn flag_critical_signal(&mut self, question_id: &QuestionId) -> bool {
        if !self.critical_signals.contains(question_id) {
            self.critical_signals.push(question_id.clone());
        }
        let escalated = !self.emergency;
        self.emergency = true;
        escalated
    }

    pub(crate) fn set_classification(
        &mut self,
        score: f64,
        risk_tier: RiskTier,
        confidence: Confidence,
    ) {
        self.score = score;
        self.risk_tier = risk_tier;
        self.confidence = confidence;
    }
}

impl Default for TriageState {
    fn default() -> Self {
        Self::new()
    }
}

impl AnswerSource for TriageState {
    fn answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.recorded(question_id).map(|a| &a.value)
    }
}
