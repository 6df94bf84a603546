//! Population priors supplied by the epidemiological aggregation step.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ConfigurationError, QuestionId};

/// Question id → probability of a positive answer in the population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorTable(BTreeMap<QuestionId, f64>);

impl PriorTable {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (QuestionId, f64)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    /// Parses a JSON object of priors.
    pub fn from_json_str(source_name: &str, json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).map_err(|e| parse_error(source_name, e))
    }

    /// Parses a YAML mapping of priors.
    pub fn from_yaml_str(source_name: &str, yaml: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(yaml).map_err(|e| parse_error(source_name, e))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, f64)> {
        self.0.iter().map(|(id, p)| (id, *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn parse_error(source_name: &str, err: impl std::fmt::Display) -> ConfigurationError {
    ConfigurationError::Parse {
        source_name: source_name.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_json_priors() {
        let priors =
            PriorTable::from_json_str("priors.json", r#"{"febre_presente": 0.9, "choque": 0.01}"#)
                .unwrap();
        assert_eq!(priors.len(), 2);
        let collected: Vec<_> = priors.iter().collect();
        assert_eq!(collected[0], (&QuestionId::from("choque"), 0.01));
    }

    #[test]
    fn parses_yaml_priors() {
        let priors = PriorTable::from_yaml_str("priors.yaml", "diabetes: 0.14\n").unwrap();
        assert_eq!(priors.iter().next(), Some((&QuestionId::from("diabetes"), 0.14)));
    }

    #[test]
    fn reports_parse_failures_with_source() {
        let err = PriorTable::from_json_str("priors.json", "[1, 2]").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::Parse { ref source_name, .. } if source_name == "priors.json"
        ));
    }
}
