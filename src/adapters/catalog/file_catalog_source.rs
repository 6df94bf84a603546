//! File-based Catalog Source Adapter
//!
//! Reads a YAML catalog (or falls back to the built-in dengue catalog) and an
//! optional priors file, then validates the result once.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::domain::catalog::{
    dengue_catalog, dengue_definition, CatalogDefinition, PriorTable, QuestionCatalog,
};
use crate::domain::foundation::ConfigurationError;
use crate::ports::CatalogSource;

/// Catalog loaded from disk, or the built-in one.
#[derive(Debug, Clone, Default)]
pub struct FileCatalogSource {
    catalog_path: Option<PathBuf>,
    priors_path: Option<PathBuf>,
}

impl FileCatalogSource {
    /// The built-in dengue catalog.
    pub fn embedded() -> Self {
        Self::default()
    }

    /// A YAML catalog file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            catalog_path: Some(path.as_ref().to_path_buf()),
            priors_path: None,
        }
    }

    /// Builder: override base probabilities from a priors file
    /// (`.json`, otherwise parsed as YAML).
    pub fn with_priors<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.priors_path = Some(path.as_ref().to_path_buf());
        self
    }

    async fn read(path: &Path) -> Result<String, ConfigurationError> {
        fs::read_to_string(path)
            .await
            .map_err(|e| ConfigurationError::Io {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
    }

    async fn load_definition(&self) -> Result<CatalogDefinition, ConfigurationError> {
        match &self.catalog_path {
            Some(path) => {
                let yaml = Self::read(path).await?;
                CatalogDefinition::from_yaml_str(&path.display().to_string(), &yaml)
            }
            None => dengue_definition(),
        }
    }

    async fn load_priors(path: &Path) -> Result<PriorTable, ConfigurationError> {
        let text = Self::read(path).await?;
        let source_name = path.display().to_string();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            PriorTable::from_json_str(&source_name, &text)
        } else {
            PriorTable::from_yaml_str(&source_name, &text)
        }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn load(&self) -> Result<Arc<QuestionCatalog>, ConfigurationError> {
        if self.catalog_path.is_none() && self.priors_path.is_none() {
            return dengue_catalog();
        }

        let mut definition = self.load_definition().await?;
        if let Some(path) = &self.priors_path {
            let priors = Self::load_priors(path).await?;
            definition.apply_priors(&priors)?;
        }
        QuestionCatalog::new(definition).map(Arc::new)
    }

    fn describe(&self) -> String {
        let catalog = self
            .catalog_path
            .as_ref()
            .map_or_else(|| "built-in dengue catalog".to_string(), |p| p.display().to_string());
        match &self.priors_path {
            Some(priors) => format!("{} with priors from {}", catalog, priors.display()),
            None => catalog,
        }
    }
}
