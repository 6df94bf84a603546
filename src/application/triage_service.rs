//! TriageService - Session lifecycle and answer handling over the store.
//!
//! Every operation locks only the addressed session, so answers to one
//! session apply in order while other sessions run concurrently. The catalog
//! is shared read-only by all of them.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::catalog::{AnswerValue, Question, QuestionCatalog};
use crate::domain::foundation::{SessionId, TriageError, ValidationError};
use crate::domain::triage::{
    AbstentionDecision, AnswerOutcome, Classification, PostEmergencyPolicy, TriageSession,
    TriageState, TriageSummary,
};
use crate::ports::{SessionStore, SharedSession};

/// Command to register one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterAnswerCommand {
    pub session_id: SessionId,
    pub question_id: String,
    pub value: AnswerValue,
}

/// Application service for triage sessions.
pub struct TriageService {
    store: Arc<dyn SessionStore>,
    catalog: Arc<QuestionCatalog>,
    policy: PostEmergencyPolicy,
}

impl TriageService {
    pub fn new(
        store: Arc<dyn SessionStore>,
        catalog: Arc<QuestionCatalog>,
        policy: PostEmergencyPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            policy,
        }
    }

    pub fn catalog(&self) -> &Arc<QuestionCatalog> {
        &self.catalog
    }

    /// Opens a new, empty session.
    pub async fn start_session(&self) -> Result<SessionId, TriageError> {
        let id = SessionId::new();
        let session = TriageSession::new(id, Arc::clone(&self.catalog), self.policy);
        self.store.insert(session).await?;
        info!(session_id = %id, policy = ?self.policy, "triage session started");
        Ok(id)
    }

    /// Applies one answer to a session.
    pub async fn register_answer(
        &self,
        cmd: RegisterAnswerCommand,
    ) -> Result<AnswerOutcome, TriageError> {
        let shared = self.session(&cmd.session_id).await?;
        let mut session = shared.lock().await;

        let outcome = match session.register_answer(&cmd.question_id, cmd.value) {
            Ok(outcome) => outcome,
            Err(err) => {
                debug!(
                    session_id = %cmd.session_id,
                    question_id = %cmd.question_id,
                    error = %err,
                    "answer rejected"
                );
                return Err(err);
            }
        };

        debug!(
            session_id = %cmd.session_id,
            question_id = %cmd.question_id,
            delta = outcome.delta,
            score = outcome.classification.score,
            risk_tier = %outcome.classification.risk_tier,
            confidence = %outcome.classification.confidence,
            next_question = outcome.next_question.as_ref().map(|q| q.id.as_str()),
            selection = session.selection().label(),
            "answer registered"
        );

        if outcome.escalated {
            warn!(
                session_id = %cmd.session_id,
                critical_signal = %cmd.question_id,
                "critical signal detected, session escalated to emergency"
            );
        }
        if let Some(reason) = outcome.abstention.and_then(|a| a.reason) {
            warn!(session_id = %cmd.session_id, reason = %reason, "classification abstained");
        }

        Ok(outcome)
    }

    /// The question the selector would ask next.
    pub async fn get_next_question(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Question>, TriageError> {
        let shared = self.session(session_id).await?;
        let session = shared.lock().await;
        Ok(session.next_question().cloned())
    }

    pub async fn classify(&self, session_id: &SessionId) -> Result<Classification, TriageError> {
        let shared = self.session(session_id).await?;
        let session = shared.lock().await;
        Ok(session.classify())
    }

    pub async fn should_abstain(
        &self,
        session_id: &SessionId,
    ) -> Result<AbstentionDecision, TriageError> {
        let shared = self.session(session_id).await?;
        let session = shared.lock().await;
        Ok(session.should_abstain())
    }

    /// Snapshot of the session's current state.
    pub async fn state(&self, session_id: &SessionId) -> Result<TriageState, TriageError> {
        let shared = self.session(session_id).await?;
        let session = shared.lock().await;
        Ok(session.state().clone())
    }

    pub async fn summary(&self, session_id: &SessionId) -> Result<TriageSummary, TriageError> {
        let shared = self.session(session_id).await?;
        let session = shared.lock().await;
        Ok(session.summary())
    }

    /// Discards every answer; the session stays open under the same id.
    pub async fn reset(&self, session_id: &SessionId) -> Result<(), TriageError> {
        let shared = self.session(session_id).await?;
        shared.lock().await.reset();
        info!(session_id = %session_id, "triage session reset");
        Ok(())
    }

    /// Drops the session entirely.
    pub async fn close_session(&self, session_id: &SessionId) -> Result<(), TriageError> {
        if !self.store.remove(session_id).await? {
            return Err(ValidationError::SessionNotFound(*session_id).into());
        }
        info!(session_id = %session_id, "triage session closed");
        Ok(())
    }

    async fn session(&self, session_id: &SessionId) -> Result<SharedSession, TriageError> {
        self.store
            .get(session_id)
            .await?
            .ok_or_else(|| ValidationError::SessionNotFound(*session_id).into())
    }
}
