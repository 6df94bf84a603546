//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the triage engine and the outside world. Adapters implement these ports.
//!
//! - `SessionStore` - Keeps live sessions, one async mutex per session
//! - `CatalogSource` - Loads the question catalog and optional priors

mod catalog_source;
mod session_store;

pub use catalog_source::CatalogSource;
pub use session_store::{SessionStore, SharedSession};
