//! Built-in dengue triage catalog.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::{CatalogDefinition, QuestionCatalog};
use crate::domain::foundation::ConfigurationError;

const DENGUE_CATALOG_YAML: &str = include_str!("../../../catalogs/dengue.yaml");

static DENGUE_CATALOG: OnceCell<Arc<QuestionCatalog>> = OnceCell::new();

/// Parsed but unvalidated dengue definition, for callers that apply priors first.
pub fn dengue_definition() -> Result<CatalogDefinition, ConfigurationError> {
    CatalogDefinition::from_yaml_str("built-in dengue catalog", DENGUE_CATALOG_YAML)
}

/// The built-in dengue catalog, validated once per process and shared.
pub fn dengue_catalog() -> Result<Arc<QuestionCatalog>, ConfigurationError> {
    DENGUE_CATALOG
        .get_or_try_init(|| QuestionCatalog::new(dengue_definition()?).map(Arc::new))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{PriorityTier, ScoreImpact};

    #[test]
    fn built_in_catalog_is_valid() {
        let catalog = dengue_catalog().unwrap();
        assert_eq!(catalog.len(), 25);
    }

    #[test]
    fn built_in_catalog_is_shared() {
        let a = dengue_catalog().unwrap();
        let b = dengue_catalog().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn critical_signals_are_the_four_severity_signs() {
        let catalog = dengue_catalog().unwrap();
        let ids: Vec<_> = catalog.critical_signals().map(|q| q.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "choque",
                "sangramento_grave",
                "alteracao_consciencia",
                "insuficiencia_respiratoria"
            ]
        );
    }

    #[test]
    fn mandatory_questions_keep_declaration_order() {
        let catalog = dengue_catalog().unwrap();
        let ids: Vec<_> = catalog
            .list_by_tier(PriorityTier::MandatorySafety)
            .iter()
            .map(|q| q.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec![
                "idade",
                "sexo",
                "febre_presente",
                "dias_sintomas",
                "choque",
                "sangramento_grave",
                "alteracao_consciencia",
                "insuficiencia_respiratoria"
            ]
        );
    }

    #[test]
    fn weights_are_carried_exactly() {
        let catalog = dengue_catalog().unwrap();
        assert_eq!(
            catalog.get("sangramento_mucosas").unwrap().scoring,
            ScoreImpact::Boolean { positive: 3.5, negative: 0.0 }
        );
        assert_eq!(
            catalog.get("febre_presente").unwrap().scoring,
            ScoreImpact::Boolean { positive: 0.3, negative: -0.5 }
        );
        assert_eq!(catalog.get("plaquetas").unwrap().scoring, ScoreImpact::PlateletCount);
        assert_eq!(catalog.get("hipertensao").unwrap().base_probability, 0.25);
        assert_eq!(catalog.correlations().len(), 3);
    }
}
