//! Adapters - Implementations of port interfaces.
//!
//! - `catalog` - Catalog loading from disk or the built-in definition
//! - `storage` - Live session storage

pub mod catalog;
pub mod storage;

pub use catalog::FileCatalogSource;
pub use storage::InMemorySessionStore;
