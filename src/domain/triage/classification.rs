//! Risk tiers and the compact classification handed to collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Confidence;

/// Ordinal risk classification: `Low < Medium < High < Critical`.
///
/// `Undetermined` sorts below every assessed tier and only appears before
/// the first answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskTier {
    #[default]
    Undetermined,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn is_critical(&self) -> bool {
        matches!(self, RiskTier::Critical)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Undetermined => "UNDETERMINED",
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        };
        write!(f, "{}", s)
    }
}

/// Result of `classify`: what report generation and persistence consume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub risk_tier: RiskTier,
    pub score: f64,
    pub confidence: Confidence,
    pub emergency: bool,
}
