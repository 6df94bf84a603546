//! Catalog module - The immutable registry of clinical questions.
//!
//! # Components
//!
//! - `QuestionCatalog` - Validated, read-only question registry shared by all sessions
//! - `Question` / `PriorityTier` / `ScoreImpact` - Question definitions
//! - `ActivationPredicate` - Typed gating conditions over prior answers
//! - `AnswerValue` / `AnswerDomain` - Typed answers and the values a question accepts
//! - `PriorTable` - External population priors overriding base probabilities
//!
//! Every consistency check runs when the catalog is built, so a session never
//! discovers a catalog defect mid-triage.

mod answer;
#[allow(clippy::module_inception)]
mod catalog;
mod dengue;
mod predicate;
mod priors;
mod question;

pub use answer::{AnswerDomain, AnswerValue};
pub use catalog::{CatalogDefinition, QuestionCatalog};
pub use dengue::{dengue_catalog, dengue_definition};
pub use predicate::{ActivationPredicate, AnswerSource};
pub use priors::PriorTable;
pub use question::{AtypicalPresentation, CorrelationRule, PriorityTier, Question, ScoreImpact};
