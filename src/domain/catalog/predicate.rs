//! Typed activation predicates over prior answers.
//!
//! Predicates gate whether a question may be asked, and also express the
//! conditions of correlation rules. They are checked for well-formedness when
//! the catalog is built; at runtime a predicate over a question that has not
//! been answered evaluates to `false`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::AnswerValue;
use crate::domain::foundation::QuestionId;

/// Read access to the answers recorded so far.
pub trait AnswerSource {
    /// Returns the current answer for `question_id`, if any.
    fn answer(&self, question_id: &str) -> Option<&AnswerValue>;

    /// Returns true if `question_id` has been answered.
    fn is_answered(&self, question_id: &str) -> bool {
        self.answer(question_id).is_some()
    }
}

impl AnswerSource for HashMap<QuestionId, AnswerValue> {
    fn answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.get(question_id)
    }
}

/// Condition over prior answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ActivationPredicate {
    /// Answer to `field` equals `value` exactly.
    Equals { field: QuestionId, value: AnswerValue },
    /// Boolean answer to `field` is `true`.
    IsTrue { field: QuestionId },
    /// Boolean answer to `field` is `false`.
    IsFalse { field: QuestionId },
    /// Numeric answer to `field` is `>= value`.
    AtLeast { field: QuestionId, value: f64 },
    And { predicates: Vec<ActivationPredicate> },
    Or { predicates: Vec<ActivationPredicate> },
}

impl ActivationPredicate {
    /// Evaluates the predicate against recorded answers.
    pub fn evaluate(&self, answers: &impl AnswerSource) -> bool {
        match self {
            ActivationPredicate::Equals { field, value } => {
                answers.answer(field.as_str()) == Some(value)
            }
            ActivationPredicate::IsTrue { field } => {
                answers.answer(field.as_str()).and_then(AnswerValue::as_bool) == Some(true)
            }
            ActivationPredicate::IsFalse { field } => {
                answers.answer(field.as_str()).and_then(AnswerValue::as_bool) == Some(false)
            }
            ActivationPredicate::AtLeast { field, value } => answers
                .answer(field.as_str())
                .and_then(AnswerValue::as_number)
                .is_some_and(|n| n >= *value),
            ActivationPredicate::And { predicates } => {
                predicates.iter().all(|p| p.evaluate(answers))
            }
            ActivationPredicate::Or { predicates } => {
                predicates.iter().any(|p| p.evaluate(answers))
            }
        }
    }

    /// Collects every question id this predicate reads.
    pub fn referenced_fields(&self) -> Vec<&QuestionId> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a QuestionId>) {
        match self {
            ActivationPredicate::Equals { field, .. }
            | ActivationPredicate::IsTrue { field }
            | ActivationPredicate::IsFalse { field }
            | ActivationPredicate::AtLeast { field, .. } => out.push(field),
            ActivationPredicate::And { predicates } | ActivationPredicate::Or { predicates } => {
                for p in predicates {
                    p.collect_fields(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers(pairs: &[(&str, AnswerValue)]) -> HashMap<QuestionId, AnswerValue> {
        pairs
            .iter()
            .map(|(k, v)| (QuestionId::from(*k), v.clone()))
            .collect()
    }

    #[test]
    fn equals_matches_exact_text() {
        let p = ActivationPredicate::Equals {
            field: QuestionId::from("sexo"),
            value: AnswerValue::from("Feminino"),
        };
        assert!(p.evaluate(&answers(&[("sexo", AnswerValue::from("Feminino"))])));
        assert!(!p.evaluate(&answers(&[("sexo", AnswerValue::from("Masculino"))])));
    }

    #[test]
    fn unanswered_field_fails_closed() {
        let empty = answers(&[]);
        let field = QuestionId::from("tem_hemograma");
        assert!(!ActivationPredicate::IsTrue { field: field.clone() }.evaluate(&empty));
        assert!(!ActivationPredicate::IsFalse { field: field.clone() }.evaluate(&empty));
        assert!(!ActivationPredicate::AtLeast { field, value: 60.0 }.evaluate(&empty));
    }

    #[test]
    fn is_false_requires_explicit_false() {
        let p = ActivationPredicate::IsFalse { field: QuestionId::from("febre_presente") };
        assert!(p.evaluate(&answers(&[("febre_presente", AnswerValue::Boolean(false))])));
        assert!(!p.evaluate(&answers(&[("febre_presente", AnswerValue::Boolean(true))])));
    }

    #[test]
    fn at_least_compares_numbers() {
        let p = ActivationPredicate::AtLeast { field: QuestionId::from("idade"), value: 60.0 };
        assert!(p.evaluate(&answers(&[("idade", AnswerValue::Number(60.0))])));
        assert!(!p.evaluate(&answers(&[("idade", AnswerValue::Number(59.5))])));
    }

    #[test]
    fn combinators_compose() {
        let or = ActivationPredicate::Or {
            predicates: vec![
                ActivationPredicate::IsTrue { field: QuestionId::from("a") },
                ActivationPredicate::IsTrue { field: QuestionId::from("b") },
            ],
        };
        let and = ActivationPredicate::And {
            predicates: vec![
                or.clone(),
                ActivationPredicate::IsFalse { field: QuestionId::from("c") },
            ],
        };
        let state = answers(&[
            ("b", AnswerValue::Boolean(true)),
            ("c", AnswerValue::Boolean(false)),
        ]);
        assert!(or.evaluate(&state));
        assert!(and.evaluate(&state));
        assert_eq!(
            and.referenced_fields(),
            vec![&QuestionId::from("a"), &QuestionId::from("b"), &QuestionId::from("c")]
        );
    }

    #[test]
    fn predicate_deserializes_from_yaml() {
        let yaml = "op: equals\nfield: sexo\nvalue: Feminino\n";
        let p: ActivationPredicate = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            p,
            ActivationPredicate::Equals {
                field: QuestionId::from("sexo"),
                value: AnswerValue::from("Feminino"),
            }
        );

        let yaml = "op: or\npredicates:\n  - op: is_true\n    field: a\n  - op: is_true\n    field: b\n";
        let p: ActivationPredicate = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.referenced_fields().len(), 2);
    }
}
