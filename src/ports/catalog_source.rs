//! Catalog source port.
//!
//! The catalog is loaded once at process start and shared read-only by every
//! session. Sources differ only in where the definition and priors come from.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::catalog::QuestionCatalog;
use crate::domain::foundation::ConfigurationError;

/// Port for loading the question catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Loads, applies priors to, and validates the catalog.
    ///
    /// # Errors
    ///
    /// Any `ConfigurationError`, including unreadable files.
    async fn load(&self) -> Result<Arc<QuestionCatalog>, ConfigurationError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}
