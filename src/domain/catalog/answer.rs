//! Typed answer values and their declared domains.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ConfigurationError, QuestionId, ValidationError};

/// A single answer as submitted by a collaborator.
///
/// Untagged so catalog files and case files can write plain scalars:
/// `true`, `42000`, `Feminino`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl AnswerValue {
    /// Returns the boolean payload, if this is a boolean answer.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AnswerValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric payload, if this is a numeric answer.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True only for a boolean `true`.
    pub fn is_positive(&self) -> bool {
        matches!(self, AnswerValue::Boolean(true))
    }

    fn kind(&self) -> &'static str {
        match self {
            AnswerValue::Boolean(_) => "boolean",
            AnswerValue::Number(_) => "number",
            AnswerValue::Text(_) => "text",
        }
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        AnswerValue::Boolean(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        AnswerValue::Number(value)
    }
}

impl From<u32> for AnswerValue {
    fn from(value: u32) -> Self {
        AnswerValue::Number(f64::from(value))
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        AnswerValue::Text(value.to_string())
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Boolean(b) => write!(f, "{}", b),
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// The set of values a question accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnswerDomain {
    Boolean,
    Numeric {
        min: f64,
        max: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
    },
    Choice {
        options: Vec<String>,
    },
}

impl AnswerDomain {
    /// Returns true if `value` belongs to this domain.
    pub fn accepts(&self, value: &AnswerValue) -> bool {
        match (self, value) {
            (AnswerDomain::Boolean, AnswerValue::Boolean(_)) => true,
            (AnswerDomain::Numeric { min, max, .. }, AnswerValue::Number(n)) => {
                n.is_finite() && *n >= *min && *n <= *max
            }
            (AnswerDomain::Choice { options }, AnswerValue::Text(s)) => {
                options.iter().any(|o| o == s)
            }
            _ => false,
        }
    }

    /// Validates an incoming answer for `question_id` against this domain.
    pub fn validate(
        &self,
        question_id: &QuestionId,
        value: &AnswerValue,
    ) -> Result<(), ValidationError> {
        if self.accepts(value) {
            return Ok(());
        }
        match (self, value) {
            (AnswerDomain::Numeric { min, max, .. }, AnswerValue::Number(n)) if n.is_finite() => {
                Err(ValidationError::out_of_range(question_id.as_str(), *min, *max, *n))
            }
            _ => Err(ValidationError::answer_out_of_domain(
                question_id,
                self.describe(),
                format!("{} {}", value.kind(), value),
            )),
        }
    }

    /// Checks the domain definition itself at catalog load.
    pub fn check_definition(&self, question_id: &QuestionId) -> Result<(), ConfigurationError> {
        let invalid = |reason: &str| ConfigurationError::InvalidAnswerDomain {
            question_id: question_id.clone(),
            reason: reason.to_string(),
        };
        match self {
            AnswerDomain::Boolean => Ok(()),
            AnswerDomain::Numeric { min, max, .. } => {
                if !min.is_finite() || !max.is_finite() {
                    Err(invalid("numeric bounds must be finite"))
                } else if min > max {
                    Err(invalid("numeric min exceeds max"))
                } else {
                    Ok(())
                }
            }
            AnswerDomain::Choice { options } => {
                if options.is_empty() {
                    return Err(invalid("choice must list at least one option"));
                }
                let mut seen = std::collections::HashSet::new();
                if options.iter().any(|o| !seen.insert(o.as_str())) {
                    return Err(invalid("choice options must be unique"));
                }
                Ok(())
            }
        }
    }

    /// Human-readable description used in validation messages.
    pub fn describe(&self) -> String {
        match self {
            AnswerDomain::Boolean => "a boolean".to_string(),
            AnswerDomain::Numeric { min, max, unit } => match unit {
                Some(unit) => format!("a number in [{}, {}] {}", min, max, unit),
                None => format!("a number in [{}, {}]", min, max),
            },
            AnswerDomain::Choice { options } => format!("one of [{}]", options.join(", ")),
        }
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, AnswerDomain::Boolean)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, AnswerDomain::Numeric { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn age_domain() -> AnswerDomain {
        AnswerDomain::Numeric {
            min: 0.0,
            max: 120.0,
            unit: Some("anos".to_string()),
        }
    }

    #[test]
    fn answer_value_deserializes_plain_scalars() {
        let values: Vec<AnswerValue> = serde_json::from_str(r#"[true, 42000, "Feminino"]"#).unwrap();
        assert_eq!(values[0], AnswerValue::Boolean(true));
        assert_eq!(values[1], AnswerValue::Number(42000.0));
        assert_eq!(values[2], AnswerValue::Text("Feminino".to_string()));
    }

    #[test]
    fn numeric_domain_rejects_out_of_range_with_bounds() {
        let qid = QuestionId::from("idade");
        let err = age_domain()
            .validate(&qid, &AnswerValue::Number(-5.0))
            .unwrap_err();
        assert_eq!(err, ValidationError::out_of_range("idade", 0.0, 120.0, -5.0));
    }

    #[test]
    fn numeric_domain_rejects_non_finite() {
        let qid = QuestionId::from("idade");
        let result = age_domain().validate(&qid, &AnswerValue::Number(f64::NAN));
        assert!(matches!(result, Err(ValidationError::AnswerOutOfDomain { .. })));
    }

    #[test]
    fn boolean_domain_rejects_text() {
        let qid = QuestionId::from("choque");
        let err = AnswerDomain::Boolean
            .validate(&qid, &AnswerValue::from("sim"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Answer for 'choque' must be a boolean, got text \"sim\""
        );
    }

    #[test]
    fn choice_domain_accepts_listed_options_only() {
        let domain = AnswerDomain::Choice {
            options: vec!["Masculino".to_string(), "Feminino".to_string()],
        };
        assert!(domain.accepts(&AnswerValue::from("Feminino")));
        assert!(!domain.accepts(&AnswerValue::from("feminino")));
        assert!(!domain.accepts(&AnswerValue::Boolean(true)));
    }

    #[test]
    fn domain_definitions_are_checked() {
        let qid = QuestionId::from("q");
        let inverted = AnswerDomain::Numeric { min: 10.0, max: 1.0, unit: None };
        assert!(inverted.check_definition(&qid).is_err());

        let duplicated = AnswerDomain::Choice {
            options: vec!["a".to_string(), "a".to_string()],
        };
        assert!(duplicated.check_definition(&qid).is_err());

        assert!(age_domain().check_definition(&qid).is_ok());
    }

    #[test]
    fn domain_deserializes_from_tagged_yaml() {
        let yaml = "kind: numeric\nmin: 0\nmax: 30\nunit: dias\n";
        let domain: AnswerDomain = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            domain,
            AnswerDomain::Numeric { min: 0.0, max: 30.0, unit: Some("dias".to_string()) }
        );
    }
}
