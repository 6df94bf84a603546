//! Triage session - owns one `TriageState` and its single mutation entry point.
//!
//! `register_answer` composes the engine: validate, score, detect critical
//! signals, select the next question, and evaluate abstention once the
//! session can finish. Every other operation is a read-only query.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{
    AbstentionDecision, AbstentionPolicy, AdaptiveSelector, Classification,
    CriticalSignalDetector, ScoringEngine, SelectionDecision, TriageState,
};
use crate::domain::catalog::{AnswerValue, Question, QuestionCatalog};
use crate::domain::foundation::{
    QuestionId, SessionId, StateError, Timestamp, TriageError, ValidationError,
};

/// What to do with answers that arrive after emergency mode is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostEmergencyPolicy {
    /// Refuse the answer with `StateError::EmergencyLocked`.
    #[default]
    Reject,
    /// Store and score the answer; the session stays CRITICAL and terminal.
    Record,
}

/// Result of one `register_answer` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerOutcome {
    /// State after the answer was applied.
    pub state: TriageState,
    pub classification: Classification,
    /// Score delta cached for this answer. It counts toward the score only
    /// while the question's activation holds.
    pub delta: f64,
    pub next_question: Option<Question>,
    pub can_finish: bool,
    /// Unanswered questions whose activation currently holds.
    pub remaining_questions: usize,
    /// True if this answer switched the session into emergency mode.
    pub escalated: bool,
    /// Evaluated only when the session can finish.
    pub abstention: Option<AbstentionDecision>,
}

/// Final record of a session for persistence and logging collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriageSummary {
    pub session_id: SessionId,
    pub started_at: Timestamp,
    pub total_answered: usize,
    pub answered_ids: Vec<QuestionId>,
    pub final_score: f64,
    pub classification: Classification,
    pub critical_signals: Vec<QuestionId>,
    pub abstention: AbstentionDecision,
}

/// One triage session.
///
/// # Invariants
///
/// - state changes only through `register_answer` and `reset`
/// - answers are validated against the catalog before anything is stored
/// - with `PostEmergencyPolicy::Reject`, nothing changes after emergency mode
#[derive(Debug, Clone)]
pub struct TriageSession {
    id: SessionId,
    catalog: Arc<QuestionCatalog>,
    policy: PostEmergencyPolicy,
    state: TriageState,
    started_at: Timestamp,
}

impl TriageSession {
    /// Starts an empty session over a shared catalog.
    pub fn new(id: SessionId, catalog: Arc<QuestionCatalog>, policy: PostEmergencyPolicy) -> Self {
        Self {
            id,
            catalog,
            policy,
            state: TriageState::new(),
            started_at: Timestamp::now(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn catalog(&self) -> &Arc<QuestionCatalog> {
        &self.catalog
    }

    pub fn policy(&self) -> PostEmergencyPolicy {
        self.policy
    }

    pub fn state(&self) -> &TriageState {
        &self.state
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies one answer and reports what comes next.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptyField` if the question id is blank
    /// - `ValidationError::UnknownQuestion` if the id is not in the catalog
    /// - `ValidationError::OutOfRange` / `AnswerOutOfDomain` for a value outside
    ///   the question's domain
    /// - `StateError::EmergencyLocked` if emergency mode is set and the policy
    ///   is `Reject`
    pub fn register_answer(
        &mut self,
        question_id: &str,
        value: AnswerValue,
    ) -> Result<AnswerOutcome, TriageError> {
        let question_id = QuestionId::try_new(question_id)?;
        let catalog = Arc::clone(&self.catalog);
        let question = catalog
            .get(question_id.as_str())
            .ok_or(ValidationError::UnknownQuestion(question_id))?;
        question.domain.validate(&question.id, &value)?;

        if self.state.is_emergency() && self.policy == PostEmergencyPolicy::Reject {
            return Err(StateError::EmergencyLocked {
                question_id: question.id.clone(),
            }
            .into());
        }

        let escalated = CriticalSignalDetector::inspect(&mut self.state, question, &value);
        let delta = ScoringEngine::update(&mut self.state, &catalog, question, value);

        let decision = AdaptiveSelector::decide(&self.state, &catalog);
        let next_question = decision.question().cloned();
        let can_finish = next_question.is_none();

        Ok(AnswerOutcome {
            state: self.state.clone(),
            classification: self.state.classification(),
            delta,
            next_question,
            can_finish,
            remaining_questions: AdaptiveSelector::remaining(&self.state, &catalog),
            escalated,
            abstention: can_finish.then(|| AbstentionPolicy::evaluate(&self.state, &catalog)),
        })
    }

    /// Discards every answer; the session id and catalog are kept.
    pub fn reset(&mut self) {
        self.state = TriageState::new();
        self.started_at = Timestamp::now();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn next_question(&self) -> Option<&Question> {
        AdaptiveSelector::next(&self.state, &self.catalog)
    }

    /// Selector outcome including the rule that decided it.
    pub fn selection(&self) -> SelectionDecision<'_> {
        AdaptiveSelector::decide(&self.state, &self.catalog)
    }

    pub fn can_finish(&self) -> bool {
        self.next_question().is_none()
    }

    pub fn classify(&self) -> Classification {
        self.state.classification()
    }

    pub fn should_abstain(&self) -> AbstentionDecision {
        AbstentionPolicy::evaluate(&self.state, &self.catalog)
    }

    pub fn remaining_questions(&self) -> usize {
        AdaptiveSelector::remaining(&self.state, &self.catalog)
    }

    pub fn summary(&self) -> TriageSummary {
        TriageSummary {
            session_id: self.id,
            started_at: self.started_at,
            total_answered: self.state.answered_count(),
            answered_ids: self.state.answered_ids().into_iter().cloned().collect(),
            final_score: self.state.score(),
            classification: self.state.classification(),
            critical_signals: self.state.critical_signals().to_vec(),
            abstention: self.should_abstain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::dengue_catalog;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::triage::{AbstentionReason, RiskTier};

    fn session(policy: PostEmergencyPolicy) -> TriageSession {
        TriageSession::new(SessionId::new(), dengue_catalog().unwrap(), policy)
    }

    #[test]
    fn new_session_asks_age_first() {
        let s = session(PostEmergencyPolicy::Reject);
        assert_eq!(s.next_question().unwrap().id.as_str(), "idade");
        assert_eq!(s.classify().risk_tier, RiskTier::Undetermined);
        assert!(!s.can_finish());
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut s = session(PostEmergencyPolicy::Reject);
        let err = s.register_answer("temperatura", AnswerValue::Number(39.0)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UnknownQuestion);
        assert_eq!(s.state().answered_count(), 0);
    }

    #[test]
    fn blank_question_id_is_rejected() {
        let mut s = session(PostEmergencyPolicy::Reject);
        let err = s.register_answer("  ", AnswerValue::Boolean(true)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyField);
        assert_eq!(s.state().answered_count(), 0);
    }

    #[test]
    fn gated_answers_stop_scoring_when_the_gate_closes() {
        let mut s = session(PostEmergencyPolicy::Reject);
        s.register_answer("tem_hemograma", AnswerValue::Boolean(true)).unwrap();
        let outcome = s.register_answer("plaquetas", AnswerValue::Number(42_000.0)).unwrap();
        assert_eq!(outcome.state.score(), 3.0);

        let outcome = s.register_answer("tem_hemograma", AnswerValue::Boolean(false)).unwrap();
        assert_eq!(outcome.state.score(), 0.0);
        assert_eq!(outcome.state.recorded("plaquetas").unwrap().delta, 3.0);
        assert_eq!(outcome.state.answered_count(), 2);

        // Reopening the gate restores the cached contribution.
        let outcome = s.register_answer("tem_hemograma", AnswerValue::Boolean(true)).unwrap();
        assert_eq!(outcome.state.score(), 3.0);
    }

    #[test]
    fn pregnancy_scores_only_for_female_patients() {
        let mut s = session(PostEmergencyPolicy::Reject);
        s.register_answer("sexo", AnswerValue::from("Masculino")).unwrap();
        let outcome = s.register_answer("gestante", AnswerValue::Boolean(true)).unwrap();
        assert_eq!(outcome.delta, 2.0);
        assert_eq!(outcome.state.score(), 0.0);

        let outcome = s.register_answer("sexo", AnswerValue::from("Feminino")).unwrap();
        assert_eq!(outcome.state.score(), 2.0);
    }

    #[test]
    fn out_of_domain_values_are_rejected() {
        let mut s = session(PostEmergencyPolicy::Reject);

        let err = s.register_answer("idade", AnswerValue::Number(150.0)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::OutOfRange);

        let err = s.register_answer("choque", AnswerValue::from("sim")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AnswerOutOfDomain);

        let err = s.register_answer("sexo", AnswerValue::from("Outro")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AnswerOutOfDomain);

        assert_eq!(s.state().answered_count(), 0);
    }

    #[test]
    fn shock_escalates_and_finishes() {
        let mut s = session(PostEmergencyPolicy::Reject);
        s.register_answer("idade", AnswerValue::Number(70.0)).unwrap();
        let outcome = s.register_answer("choque", AnswerValue::Boolean(true)).unwrap();

        assert!(outcome.escalated);
        assert!(outcome.can_finish);
        assert!(outcome.next_question.is_none());
        assert_eq!(outcome.classification.risk_tier, RiskTier::Critical);
        assert_eq!(outcome.classification.confidence.value(), 0.95);
        assert!(outcome.classification.emergency);
        assert_eq!(
            outcome.abstention.and_then(|a| a.reason),
            Some(AbstentionReason::InsufficientInformation)
        );
    }

    #[test]
    fn reject_policy_locks_after_emergency() {
        let mut s = session(PostEmergencyPolicy::Reject);
        s.register_answer("choque", AnswerValue::Boolean(true)).unwrap();
        let before = s.state().clone();

        let err = s.register_answer("cefaleia", AnswerValue::Boolean(true)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmergencyLocked);
        assert_eq!(s.state(), &before);
    }

    #[test]
    fn record_policy_stores_but_stays_critical() {
        let mut s = session(PostEmergencyPolicy::Record);
        s.register_answer("choque", AnswerValue::Boolean(true)).unwrap();
        let outcome = s.register_answer("choque", AnswerValue::Boolean(false)).unwrap();

        assert!(!outcome.escalated);
        assert!(outcome.state.is_emergency());
        assert_eq!(outcome.state.score(), 0.0);
        assert_eq!(outcome.classification.risk_tier, RiskTier::Critical);
        assert!(outcome.next_question.is_none());
    }

    #[test]
    fn reset_discards_state_but_keeps_identity() {
        let mut s = session(PostEmergencyPolicy::Reject);
        let id = *s.id();
        s.register_answer("choque", AnswerValue::Boolean(true)).unwrap();

        s.reset();

        assert_eq!(s.id(), &id);
        assert!(!s.state().is_emergency());
        assert_eq!(s.state().answered_count(), 0);
        assert_eq!(s.next_question().unwrap().id.as_str(), "idade");
    }

    #[test]
    fn remaining_questions_track_activation() {
        let mut s = session(PostEmergencyPolicy::Reject);
        // gestante and plaquetas are gated
        assert_eq!(s.remaining_questions(), 23);

        let outcome = s.register_answer("sexo", AnswerValue::from("Feminino")).unwrap();
        assert_eq!(outcome.remaining_questions, 23);

        let outcome = s.register_answer("tem_hemograma", AnswerValue::Boolean(true)).unwrap();
        assert_eq!(outcome.remaining_questions, 23);
    }

    #[test]
    fn summary_reports_final_state() {
        let mut s = session(PostEmergencyPolicy::Reject);
        s.register_answer("idade", AnswerValue::Number(35.0)).unwrap();
        s.register_answer("febre_presente", AnswerValue::Boolean(true)).unwrap();

        let summary = s.summary();
        assert_eq!(summary.session_id, *s.id());
        assert_eq!(summary.total_answered, 2);
        assert_eq!(
            summary.answered_ids,
            vec![QuestionId::from("idade"), QuestionId::from("febre_presente")]
        );
        assert_eq!(summary.classification.risk_tier, RiskTier::Low);
        assert!(summary.abstention.abstain);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["classification"]["risk_tier"], "LOW");
        assert_eq!(json["abstention"]["reason"], "insufficient_information");
    }

    #[test]
    fn policy_parses_lowercase() {
        let policy: PostEmergencyPolicy = serde_json::from_str("\"record\"").unwrap();
        assert_eq!(policy, PostEmergencyPolicy::Record);
        assert_eq!(PostEmergencyPolicy::default(), PostEmergencyPolicy::Reject);
    }
}
