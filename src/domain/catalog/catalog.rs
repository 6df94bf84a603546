//! The immutable question catalog and its load-time validation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    ActivationPredicate, AnswerSource, AtypicalPresentation, CorrelationRule, PriorTable,
    PriorityTier, Question, ScoreImpact,
};
use crate::domain::foundation::{ConfigurationError, QuestionId};

/// Serialized form of a catalog, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDefinition {
    pub questions: Vec<Question>,
    #[serde(default)]
    pub correlations: Vec<CorrelationRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub atypical_presentation: Option<AtypicalPresentation>,
}

impl CatalogDefinition {
    /// Parses a YAML catalog document.
    pub fn from_yaml_str(source_name: &str, yaml: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigurationError::Parse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Replaces base probabilities with externally computed population priors.
    ///
    /// # Errors
    ///
    /// - `UnknownReference` if a prior names a question not in the definition
    /// - `ProbabilityOutOfRange` if a prior lies outside [0, 1]
    pub fn apply_priors(&mut self, priors: &PriorTable) -> Result<(), ConfigurationError> {
        for (id, probability) in priors.iter() {
            if !(0.0..=1.0).contains(&probability) {
                return Err(ConfigurationError::ProbabilityOutOfRange {
                    owner: format!("priors[{}]", id),
                    value: probability,
                });
            }
            let question = self
                .questions
                .iter_mut()
                .find(|q| &q.id == id)
                .ok_or_else(|| ConfigurationError::UnknownReference {
                    owner: "priors".to_string(),
                    referenced: id.clone(),
                })?;
            question.base_probability = probability;
        }
        Ok(())
    }
}

/// Read-only registry of questions, shared by every session.
///
/// # Invariants
///
/// - question ids are unique and non-blank
/// - every predicate, dependency, correlation target and atypical-presentation
///   reference names a question in the catalog, with a compatible answer domain
/// - the graph of dependencies and predicate references is acyclic
/// - critical signals are mandatory-safety boolean questions
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
    index: HashMap<QuestionId, usize>,
    correlations: Vec<CorrelationRule>,
    atypical_presentation: Option<AtypicalPresentation>,
}

impl QuestionCatalog {
    /// Validates a definition and builds the catalog.
    ///
    /// # Errors
    ///
    /// Any [`ConfigurationError`]; the catalog is never partially built.
    pub fn new(definition: CatalogDefinition) -> Result<Self, ConfigurationError> {
        let CatalogDefinition {
            questions,
            correlations,
            atypical_presentation,
        } = definition;

        if questions.is_empty() {
            return Err(ConfigurationError::EmptyCatalog);
        }

        let mut index = HashMap::with_capacity(questions.len());
        for (position, question) in questions.iter().enumerate() {
            if question.id.as_str().trim().is_empty() {
                return Err(ConfigurationError::BlankQuestionId);
            }
            if index.insert(question.id.clone(), position).is_some() {
                return Err(ConfigurationError::DuplicateQuestion(question.id.clone()));
            }
        }

        let catalog = Self {
            questions,
            index,
            correlations,
            atypical_presentation,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parses and validates a YAML catalog document.
    pub fn from_yaml_str(source_name: &str, yaml: &str) -> Result<Self, ConfigurationError> {
        Self::new(CatalogDefinition::from_yaml_str(source_name, yaml)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Looks up a question by id.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.index.get(id).map(|&i| &self.questions[i])
    }

    /// All questions in declaration order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Declaration position of a question.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Questions of one tier, in declaration order.
    pub fn list_by_tier(&self, tier: PriorityTier) -> Vec<&Question> {
        self.questions.iter().filter(|q| q.tier == tier).collect()
    }

    /// Questions whose positive answer triggers emergency mode.
    pub fn critical_signals(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.critical)
    }

    pub fn correlations(&self) -> &[CorrelationRule] {
        &self.correlations
    }

    pub fn atypical_presentation(&self) -> Option<&AtypicalPresentation> {
        self.atypical_presentation.as_ref()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// True when every dependency of `question` is answered and its
    /// activation predicate (if any) holds.
    pub fn activation_satisfied(&self, question: &Question, answers: &impl AnswerSource) -> bool {
        question
            .dependencies
            .iter()
            .all(|dep| answers.is_answered(dep.as_str()))
            && question
                .activation
                .as_ref()
                .map_or(true, |predicate| predicate.evaluate(answers))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    fn validate(&self) -> Result<(), ConfigurationError> {
        for question in &self.questions {
            self.validate_question(question)?;
        }
        for (i, rule) in self.correlations.iter().enumerate() {
            let owner = format!("correlations[{}]", i);
            if !rule.delta.is_finite() {
                return Err(ConfigurationError::NonFiniteDelta {
                    owner,
                    value: rule.delta,
                });
            }
            self.validate_predicate(&owner, &rule.when)?;
            for target in &rule.targets {
                self.require_known(&owner, target)?;
            }
        }
        if let Some(atypical) = &self.atypical_presentation {
            let owner = "atypical_presentation";
            for id in std::iter::once(&atypical.fever_question).chain(&atypical.alarm_questions) {
                let question = self.require_known(owner, id)?;
                if !question.domain.is_boolean() {
                    return Err(ConfigurationError::InvalidPredicate {
                        owner: owner.to_string(),
                        field: id.clone(),
                        reason: "must reference a boolean question".to_string(),
                    });
                }
            }
        }
        self.detect_cycles()
    }

    fn validate_question(&self, question: &Question) -> Result<(), ConfigurationError> {
        let id = &question.id;

        question.domain.check_definition(id)?;

        if !(0.0..=1.0).contains(&question.base_probability) {
            return Err(ConfigurationError::ProbabilityOutOfRange {
                owner: id.to_string(),
                value: question.base_probability,
            });
        }

        match &question.scoring {
            ScoreImpact::Boolean { positive, .. } => {
                if !question.domain.is_boolean() {
                    return Err(ConfigurationError::IncompatibleScoring {
                        question_id: id.clone(),
                        reason: "boolean weights on a non-boolean question".to_string(),
                    });
                }
                if !positive.is_finite() || *positive < 0.0 {
                    return Err(ConfigurationError::NegativeImpact {
                        question_id: id.clone(),
                        value: *positive,
                    });
                }
            }
            rule if rule.is_numeric_rule() => {
                if !question.domain.is_numeric() {
                    return Err(ConfigurationError::IncompatibleScoring {
                        question_id: id.clone(),
                        reason: "numeric scoring rule on a non-numeric question".to_string(),
                    });
                }
            }
            _ => {}
        }

        if question.critical {
            if !question.is_mandatory() {
                return Err(ConfigurationError::InvalidCriticalSignal {
                    question_id: id.clone(),
                    reason: "critical signals must be mandatory_safety".to_string(),
                });
            }
            if !question.domain.is_boolean() {
                return Err(ConfigurationError::InvalidCriticalSignal {
                    question_id: id.clone(),
                    reason: "critical signals must be boolean".to_string(),
                });
            }
        }

        for dependency in &question.dependencies {
            if dependency == id {
                return Err(ConfigurationError::SelfDependency(id.clone()));
            }
            self.require_known(id.as_str(), dependency)?;
        }

        if let Some(predicate) = &question.activation {
            self.validate_predicate(id.as_str(), predicate)?;
        }
        Ok(())
    }

    fn validate_predicate(
        &self,
        owner: &str,
        predicate: &ActivationPredicate,
    ) -> Result<(), ConfigurationError> {
        let mismatch = |field: &QuestionId, reason: String| ConfigurationError::InvalidPredicate {
            owner: owner.to_string(),
            field: field.clone(),
            reason,
        };

        match predicate {
            ActivationPredicate::Equals { field, value } => {
                let target = self.require_known(owner, field)?;
                if !target.domain.accepts(value) {
                    return Err(mismatch(
                        field,
                        format!("{} is not {}", value, target.domain.describe()),
                    ));
                }
            }
            ActivationPredicate::IsTrue { field } | ActivationPredicate::IsFalse { field } => {
                let target = self.require_known(owner, field)?;
                if !target.domain.is_boolean() {
                    return Err(mismatch(field, "boolean test on a non-boolean question".to_string()));
                }
            }
            ActivationPredicate::AtLeast { field, value } => {
                let target = self.require_known(owner, field)?;
                if !target.domain.is_numeric() || !value.is_finite() {
                    return Err(mismatch(field, "numeric threshold on a non-numeric question".to_string()));
                }
            }
            ActivationPredicate::And { predicates } | ActivationPredicate::Or { predicates } => {
                if predicates.is_empty() {
                    let combinator = match predicate {
                        ActivationPredicate::And { .. } => "and",
                        _ => "or",
                    };
                    return Err(ConfigurationError::EmptyCombinator {
                        owner: owner.to_string(),
                        combinator,
                    });
                }
                for inner in predicates {
                    self.validate_predicate(owner, inner)?;
                }
            }
        }
        Ok(())
    }

    fn require_known(&self, owner: &str, id: &QuestionId) -> Result<&Question, ConfigurationError> {
        self.get(id.as_str())
            .ok_or_else(|| ConfigurationError::UnknownReference {
                owner: owner.to_string(),
                referenced: id.clone(),
            })
    }

    /// Rejects cycles in the "must be answered before" graph formed by
    /// dependencies and activation predicate references.
    fn detect_cycles(&self) -> Result<(), ConfigurationError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            InProgress,
            Done,
        }

        let edges: Vec<Vec<usize>> = self
            .questions
            .iter()
            .map(|q| {
                let mut targets: Vec<usize> = q
                    .dependencies
                    .iter()
                    .chain(q.activation.iter().flat_map(|p| p.referenced_fields()))
                    .filter_map(|id| self.position(id.as_str()))
                    .collect();
                targets.sort_unstable();
                targets.dedup();
                targets
            })
            .collect();

        let mut marks = vec![Mark::Unvisited; self.questions.len()];
        let mut path: Vec<usize> = Vec::new();

        for start in 0..self.questions.len() {
            if marks[start] != Mark::Unvisited {
                continue;
            }
            // Iterative DFS: (node, next edge index)
            let mut stack = vec![(start, 0usize)];
            marks[start] = Mark::InProgress;
            path.push(start);

            while let Some((node, edge)) = stack.last_mut() {
                let node = *node;
                if let Some(&next) = edges[node].get(*edge) {
                    *edge += 1;
                    match marks[next] {
                        Mark::Unvisited => {
                            marks[next] = Mark::InProgress;
                            path.push(next);
                            stack.push((next, 0));
                        }
                        Mark::InProgress => {
                            let from = path.iter().position(|&n| n == next).unwrap_or(0);
                            let mut cycle: Vec<QuestionId> = path[from..]
                                .iter()
                                .map(|&n| self.questions[n].id.clone())
                                .collect();
                            cycle.push(self.questions[next].id.clone());
                            return Err(ConfigurationError::CircularDependency(cycle));
                        }
                        Mark::Done => {}
                    }
                } else {
                    marks[node] = Mark::Done;
                    path.pop();
                    stack.pop();
                }
            }
        }
        Ok(())
    }
}
