//! Catalog configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::adapters::FileCatalogSource;

/// Where the question catalog and priors come from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogConfig {
    /// YAML catalog file; the built-in dengue catalog when unset
    pub path: Option<PathBuf>,

    /// Population priors file (`.json` or `.yaml`)
    pub priors_path: Option<PathBuf>,
}

impl CatalogConfig {
    /// Build the catalog source described by this configuration
    pub fn source(&self) -> FileCatalogSource {
        let source = match &self.path {
            Some(path) => FileCatalogSource::from_path(path),
            None => FileCatalogSource::embedded(),
        };
        match &self.priors_path {
            Some(priors) => source.with_priors(priors),
            None => source,
        }
    }

    /// Validate that referenced files exist
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.path {
            if !path.is_file() {
                return Err(ValidationError::CatalogNotFound(path.clone()));
            }
        }
        if let Some(path) = &self.priors_path {
            if !path.is_file() {
                return Err(ValidationError::PriorsNotFound(path.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::CatalogSource;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_uses_embedded_catalog() {
        let config = CatalogConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.source().describe(), "built-in dengue catalog");
    }

    #[test]
    fn test_missing_catalog_file_fails_validation() {
        let config = CatalogConfig {
            path: Some(PathBuf::from("/nonexistent/catalog.yaml")),
            priors_path: None,
        };
        assert!(matches!(config.validate(), Err(ValidationError::CatalogNotFound(_))));
    }

    #[test]
    fn test_missing_priors_file_fails_validation() {
        let config = CatalogConfig {
            path: None,
            priors_path: Some(PathBuf::from("/nonexistent/priors.json")),
        };
        assert!(matches!(config.validate(), Err(ValidationError::PriorsNotFound(_))));
    }

    #[test]
    fn test_existing_files_pass_validation() {
        let catalog = NamedTempFile::new().unwrap();
        let priors = NamedTempFile::new().unwrap();
        let config = CatalogConfig {
            path: Some(catalog.path().to_path_buf()),
            priors_path: Some(priors.path().to_path_buf()),
        };
        assert!(config.validate().is_ok());
        assert!(config.source().describe().contains("with priors from"));
    }
}
