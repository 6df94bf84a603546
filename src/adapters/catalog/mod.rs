//! Catalog Adapters
//!
//! Implementations of the CatalogSource port.
//!
//! - **FileCatalogSource** - YAML catalog on disk or the built-in dengue
//!   catalog, with optional priors from a JSON or YAML file

mod file_catalog_source;

pub use file_catalog_source::FileCatalogSource;
