//! Adaptive Selector - Picks the next question or signals completion.
//!
//! Selection runs in a fixed order: emergency stop, mandatory-safety
//! questions in declaration order, early stop on sufficient confidence, then
//! information-gain ranking over the remaining eligible questions.
//!
//! Information gain is approximated with a discrete entropy proxy: the
//! current uncertainty is a step function of session confidence, and the
//! expected post-answer uncertainty depends on how strongly each answer
//! branch moves the score.

use super::TriageState;
use crate::domain::catalog::{AnswerSource, Question, QuestionCatalog};

/// Confidence at which questioning may stop once mandatory questions are done.
pub const STOP_CONFIDENCE: f64 = 0.85;

const MIN_PROBABILITY: f64 = 0.05;
const MAX_PROBABILITY: f64 = 0.95;

/// Why the selector returned what it returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionDecision<'a> {
    /// Emergency mode: no further questions.
    Emergency,
    /// An eligible mandatory-safety question is still unanswered.
    Mandatory(&'a Question),
    /// Tier is CRITICAL: stop and escalate.
    CriticalRisk,
    /// Confidence reached the stop threshold.
    SufficientConfidence,
    /// Highest-utility non-mandatory question.
    Ranked { question: &'a Question, utility: f64 },
    /// No eligible question remains.
    Exhausted,
}

impl<'a> SelectionDecision<'a> {
    /// The question to ask, if any.
    pub fn question(&self) -> Option<&'a Question> {
        match self {
            SelectionDecision::Mandatory(q) => Some(q),
            SelectionDecision::Ranked { question, .. } => Some(question),
            SelectionDecision::Emergency
            | SelectionDecision::CriticalRisk
            | SelectionDecision::SufficientConfidence
            | SelectionDecision::Exhausted => None,
        }
    }

    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            SelectionDecision::Emergency => "emergency",
            SelectionDecision::Mandatory(_) => "mandatory",
            SelectionDecision::CriticalRisk => "critical_risk",
            SelectionDecision::SufficientConfidence => "sufficient_confidence",
            SelectionDecision::Ranked { .. } => "ranked",
            SelectionDecision::Exhausted => "exhausted",
        }
    }
}

/// Pure next-question selection.
pub struct AdaptiveSelector;

impl AdaptiveSelector {
    /// The next question to ask, or `None` when the session can finish.
    pub fn next<'a>(state: &TriageState, catalog: &'a QuestionCatalog) -> Option<&'a Question> {
        Self::decide(state, catalog).question()
    }

    /// Runs the full selection procedure and reports which rule decided.
    pub fn decide<'a>(state: &TriageState, catalog: &'a QuestionCatalog) -> SelectionDecision<'a> {
        if state.is_emergency() {
            return SelectionDecision::Emergency;
        }

        if let Some(question) = catalog
            .questions()
            .iter()
            .filter(|q| q.is_mandatory())
            .find(|q| Self::is_pending(q, state, catalog))
        {
            return SelectionDecision::Mandatory(question);
        }

        if state.risk_tier().is_critical() {
            return SelectionDecision::CriticalRisk;
        }
        if state.confidence().value() >= STOP_CONFIDENCE {
            return SelectionDecision::SufficientConfidence;
        }

        Self::rank(state, catalog)
            .into_iter()
            .fold(None, |best: Option<(&Question, f64)>, (question, utility)| match best {
                // Strict comparison keeps the earlier question on ties.
                Some((_, best_utility)) if utility <= best_utility => best,
                _ => Some((question, utility)),
            })
            .map_or(SelectionDecision::Exhausted, |(question, utility)| {
                SelectionDecision::Ranked { question, utility }
            })
    }

    /// Scaled utility of every pending non-mandatory question, in declaration order.
    pub fn rank<'a>(state: &TriageState, catalog: &'a QuestionCatalog) -> Vec<(&'a Question, f64)> {
        let current = Self::current_entropy(state);
        catalog
            .questions()
            .iter()
            .filter(|q| !q.is_mandatory() && Self::is_pending(q, state, catalog))
            .map(|q| (q, Self::utility(q, current, state, catalog)))
            .collect()
    }

    /// Unanswered questions whose activation currently holds, in any tier.
    pub fn remaining(state: &TriageState, catalog: &QuestionCatalog) -> usize {
        catalog
            .questions()
            .iter()
            .filter(|q| Self::is_pending(q, state, catalog))
            .count()
    }

    fn is_pending(question: &Question, state: &TriageState, catalog: &QuestionCatalog) -> bool {
        !state.is_answered(question.id.as_str()) && catalog.activation_satisfied(question, state)
    }

    fn utility(
        question: &Question,
        current_entropy: f64,
        state: &TriageState,
        catalog: &QuestionCatalog,
    ) -> f64 {
        let gain = (current_entropy - Self::expected_entropy(question, state, catalog)).max(0.0);
        gain * question.tier.utility_multiplier()
    }

    /// Uncertainty proxy derived from session confidence.
    pub fn current_entropy(state: &TriageState) -> f64 {
        let confidence = state.confidence().value();
        if confidence >= 0.95 {
            0.1
        } else if confidence >= 0.85 {
            0.3
        } else if confidence >= 0.70 {
            0.6
        } else {
            1.0
        }
    }

    /// Base probability of a positive answer shifted by every correlation
    /// rule whose condition holds, clamped to [0.05, 0.95].
    pub fn adjusted_probability(
        question: &Question,
        state: &TriageState,
        catalog: &QuestionCatalog,
    ) -> f64 {
        let shift: f64 = catalog
            .correlations()
            .iter()
            .filter(|rule| rule.applies_to(&question.id) && rule.when.evaluate(state))
            .map(|rule| rule.delta)
            .sum();
        (question.base_probability + shift).clamp(MIN_PROBABILITY, MAX_PROBABILITY)
    }

    /// Probability-weighted uncertainty left after answering `question`.
    pub fn expected_entropy(
        question: &Question,
        state: &TriageState,
        catalog: &QuestionCatalog,
    ) -> f64 {
        let p = Self::adjusted_probability(question, state, catalog);
        let positive = Self::branch_entropy(question.scoring.branch_impact(true));
        let negative = Self::branch_entropy(question.scoring.branch_impact(false));
        p * positive + (1.0 - p) * negative
    }

    fn branch_entropy(impact: f64) -> f64 {
        if impact >= 3.0 {
            0.2
        } else if impact >= 1.0 {
            0.5
        } else {
            0.8
        }
    }
}
