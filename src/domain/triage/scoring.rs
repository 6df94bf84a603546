//! Scoring Engine - Score deltas, risk tiers and confidence.
//!
//! Scores are additive: each answer contributes a non-negative delta, cached
//! on the stored answer. After every change the session score is re-summed
//! over the full answer set in catalog declaration order, so the same answer
//! map yields a bit-identical score whatever order it arrived in. Answers to
//! questions whose activation no longer holds stay recorded but are left out
//! of the sum.

use super::{RiskTier, TriageState};
use crate::domain::catalog::{AnswerValue, Question, QuestionCatalog, ScoreImpact};
use crate::domain::foundation::Confidence;

/// Score at or above which a session is CRITICAL.
pub const CRITICAL_SCORE: f64 = 10.0;
/// Score at or above which a session is HIGH.
pub const HIGH_SCORE: f64 = 6.0;
/// Score at or above which a session is MEDIUM.
pub const MEDIUM_SCORE: f64 = 3.0;

const CRITICAL_CONFIDENCE: f64 = 0.95;
const HIGH_CONFIDENCE: f64 = 0.85;
const MEDIUM_CONFIDENCE: f64 = 0.80;
const LOW_BASE_CONFIDENCE: f64 = 0.50;
const LOW_CONFIDENCE_PER_ANSWER: f64 = 0.05;
const LOW_CONFIDENCE_CAP: f64 = 0.90;

const AGE_EXTREME_PENALTY: f64 = 1.5;
const AGE_UNDER_FIVE_PENALTY: f64 = 1.0;
const SYMPTOM_ONSET_CRITICAL_WINDOW: (f64, f64) = (3.0, 7.0);
const SYMPTOM_ONSET_PENALTY: f64 = 1.0;

/// Platelet bands as (exclusive upper bound, penalty), checked in order.
const PLATELET_BANDS: [(f64, f64); 3] = [(50_000.0, 3.0), (100_000.0, 2.0), (150_000.0, 1.0)];

/// Pure scoring functions.
pub struct ScoringEngine;

impl ScoringEngine {
    /// Score contribution of `value` as an answer to `question`.
    ///
    /// Negative boolean answers contribute nothing; a value of the wrong type
    /// for the rule also contributes nothing (domains are validated upstream).
    pub fn answer_delta(question: &Question, value: &AnswerValue) -> f64 {
        match &question.scoring {
            ScoreImpact::Boolean { positive, .. } => {
                if value.is_positive() {
                    *positive
                } else {
                    0.0
                }
            }
            ScoreImpact::Age => value.as_number().map_or(0.0, Self::age_delta),
            ScoreImpact::PlateletCount => value.as_number().map_or(0.0, Self::platelet_delta),
            ScoreImpact::SymptomOnset => value.as_number().map_or(0.0, Self::symptom_onset_delta),
            ScoreImpact::Neutral => 0.0,
        }
    }

    fn age_delta(age: f64) -> f64 {
        let mut delta = 0.0;
        if age < 1.0 || age > 65.0 {
            delta += AGE_EXTREME_PENALTY;
        }
        if age < 5.0 {
            delta += AGE_UNDER_FIVE_PENALTY;
        }
        delta
    }

    fn platelet_delta(count: f64) -> f64 {
        PLATELET_BANDS
            .iter()
            .find(|(upper, _)| count < *upper)
            .map_or(0.0, |(_, penalty)| *penalty)
    }

    fn symptom_onset_delta(days: f64) -> f64 {
        let (from, to) = SYMPTOM_ONSET_CRITICAL_WINDOW;
        if (from..=to).contains(&days) {
            SYMPTOM_ONSET_PENALTY
        } else {
            0.0
        }
    }

    /// Stores (or overwrites) the answer with its delta, then recomputes.
    ///
    /// Returns the delta cached for this answer.
    pub fn update(
        state: &mut TriageState,
        catalog: &QuestionCatalog,
        question: &Question,
        value: AnswerValue,
    ) -> f64 {
        let delta = Self::answer_delta(question, &value);
        state.record_answer(question.id.clone(), value, delta);
        Self::recompute(state, catalog);
        delta
    }

    /// Rebuilds score, tier and confidence from the full answer set.
    pub fn recompute(state: &mut TriageState, catalog: &QuestionCatalog) {
        let answers: &TriageState = state;
        let score: f64 = catalog
            .questions()
            .iter()
            .filter(|q| catalog.activation_satisfied(q, answers))
            .filter_map(|q| answers.recorded(q.id.as_str()))
            .map(|a| a.delta)
            .sum();
        let (tier, confidence) =
            Self::classify(score, state.is_emergency(), state.answered_count());
        state.set_classification(score, tier, confidence);
    }

    /// Maps (score, emergency flag, answered count) to tier and confidence.
    pub fn classify(score: f64, emergency: bool, answered: usize) -> (RiskTier, Confidence) {
        if emergency {
            return (RiskTier::Critical, Confidence::new(CRITICAL_CONFIDENCE));
        }
        if answered == 0 {
            return (RiskTier::Undetermined, Confidence::ZERO);
        }
        if score >= CRITICAL_SCORE {
            (RiskTier::Critical, Confidence::new(CRITICAL_CONFIDENCE))
        } else if score >= HIGH_SCORE {
            (RiskTier::High, Confidence::new(HIGH_CONFIDENCE))
        } else if score >= MEDIUM_SCORE {
            (RiskTier::Medium, Confidence::new(MEDIUM_CONFIDENCE))
        } else {
            let coverage = LOW_BASE_CONFIDENCE + LOW_CONFIDENCE_PER_ANSWER * answered as f64;
            (RiskTier::Low, Confidence::new(coverage.min(LOW_CONFIDENCE_CAP)))
        }
    }
}

/// Critical-signal detection: escalates a session to emergency mode.
pub struct CriticalSignalDetector;

impl CriticalSignalDetector {
    /// Flags `question` if it is a critical signal answered positively.
    ///
    /// Returns true if this answer switched the session into emergency mode.
    pub fn inspect(state: &mut TriageState, question: &Question, value: &AnswerValue) -> bool {
        if question.critical && value.is_positive() {
            state.flag_critical_signal(&question.id)
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::dengue_catalog;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn delta(id: &str, value: impl Into<AnswerValue>) -> f64 {
        let catalog = dengue_catalog().unwrap();
        ScoringEngine::answer_delta(catalog.get(id).unwrap(), &value.into())
    }

    #[test]
    fn boolean_positive_adds_weight_negative_adds_nothing() {
        assert_eq!(delta("dor_abdominal_intensa", true), 3.0);
        assert_eq!(delta("dor_abdominal_intensa", false), 0.0);
        // The negative branch weight of fever never reaches the score.
        assert_eq!(delta("febre_presente", false), 0.0);
    }

    #[test]
    fn age_penalties() {
        assert_eq!(delta("idade", 35.0), 0.0);
        assert_eq!(delta("idade", 70.0), 1.5);
        assert_eq!(delta("idade", 65.0), 0.0);
        assert_eq!(delta("idade", 3.0), 1.0);
        assert_eq!(delta("idade", 0.5), 2.5);
    }

    #[test]
    fn platelet_bands() {
        assert_eq!(delta("plaquetas", 42_000.0), 3.0);
        assert_eq!(delta("plaquetas", 50_000.0), 2.0);
        assert_eq!(delta("plaquetas", 99_999.0), 2.0);
        assert_eq!(delta("plaquetas", 100_000.0), 1.0);
        assert_eq!(delta("plaquetas", 149_999.0), 1.0);
        assert_eq!(delta("plaquetas", 150_000.0), 0.0);
        assert_eq!(delta("plaquetas", 250_000.0), 0.0);
    }

    #[test]
    fn symptom_onset_window_is_inclusive() {
        assert_eq!(delta("dias_sintomas", 2.0), 0.0);
        assert_eq!(delta("dias_sintomas", 3.0), 1.0);
        assert_eq!(delta("dias_sintomas", 7.0), 1.0);
        assert_eq!(delta("dias_sintomas", 8.0), 0.0);
    }

    #[test]
    fn neutral_questions_score_nothing() {
        assert_eq!(delta("sexo", "Feminino"), 0.0);
    }

    #[test]
    fn classify_thresholds() {
        assert_eq!(ScoringEngine::classify(10.0, false, 5).0, RiskTier::Critical);
        assert_eq!(ScoringEngine::classify(9.99, false, 5).0, RiskTier::High);
        assert_eq!(ScoringEngine::classify(6.0, false, 5).0, RiskTier::High);
        assert_eq!(ScoringEngine::classify(3.0, false, 5).0, RiskTier::Medium);
        assert_eq!(ScoringEngine::classify(2.9, false, 5).0, RiskTier::Low);
    }

    #[test]
    fn low_confidence_grows_with_answers_and_caps() {
        let (_, c) = ScoringEngine::classify(0.0, false, 3);
        assert!(approx(c.value(), 0.65));
        let (_, c) = ScoringEngine::classify(0.0, false, 20);
        assert!(approx(c.value(), 0.90));
    }

    #[test]
    fn emergency_overrides_score() {
        let (tier, c) = ScoringEngine::classify(0.0, true, 1);
        assert_eq!(tier, RiskTier::Critical);
        assert!(approx(c.value(), 0.95));
    }

    #[test]
    fn nothing_answered_is_undetermined() {
        assert_eq!(
            ScoringEngine::classify(0.0, false, 0),
            (RiskTier::Undetermined, Confidence::ZERO)
        );
    }

    #[test]
    fn update_replaces_cached_delta_on_re_answer() {
        let catalog = dengue_catalog().unwrap();
        let mut state = TriageState::new();
        let alarm = catalog.get("vomitos_persistentes").unwrap();
        let symptom = catalog.get("cefaleia").unwrap();

        ScoringEngine::update(&mut state, &catalog, symptom, AnswerValue::Boolean(true));
        ScoringEngine::update(&mut state, &catalog, alarm, AnswerValue::Boolean(true));
        assert!(approx(state.score(), 3.3));
        assert_eq!(state.risk_tier(), RiskTier::Medium);

        ScoringEngine::update(&mut state, &catalog, alarm, AnswerValue::Boolean(false));
        assert!(approx(state.score(), 0.3));
        assert_eq!(state.risk_tier(), RiskTier::Low);
        assert!(approx(state.confidence().value(), 0.60));
    }

    #[test]
    fn recompute_skips_answers_behind_a_closed_gate() {
        let catalog = dengue_catalog().unwrap();
        let mut state = TriageState::new();
        let sexo = catalog.get("sexo").unwrap();
        let gestante = catalog.get("gestante").unwrap();

        ScoringEngine::update(&mut state, &catalog, sexo, AnswerValue::from("Masculino"));
        let delta = ScoringEngine::update(&mut state, &catalog, gestante, AnswerValue::Boolean(true));
        assert_eq!(delta, 2.0);
        assert_eq!(state.score(), 0.0);
        assert!(approx(state.confidence().value(), 0.60));

        ScoringEngine::update(&mut state, &catalog, sexo, AnswerValue::from("Feminino"));
        assert_eq!(state.score(), 2.0);
    }

    #[test]
    fn detector_only_fires_on_positive_critical_signals() {
        let catalog = dengue_catalog().unwrap();
        let mut state = TriageState::new();
        let choque = catalog.get("choque").unwrap();
        let alarm = catalog.get("dor_abdominal_intensa").unwrap();

        assert!(!CriticalSignalDetector::inspect(&mut state, alarm, &AnswerValue::Boolean(true)));
        assert!(!CriticalSignalDetector::inspect(&mut state, choque, &AnswerValue::Boolean(false)));
        assert!(!state.is_emergency());

        assert!(CriticalSignalDetector::inspect(&mut state, choque, &AnswerValue::Boolean(true)));
        assert!(state.is_emergency());
        assert_eq!(state.critical_signals(), &[choque.id.clone()]);
    }
}
