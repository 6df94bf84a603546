//! Question definitions and the catalog-level rules that accompany them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ActivationPredicate, AnswerDomain};
use crate::domain::foundation::QuestionId;

/// How a question participates in the adaptive flow.
///
/// Declared in descending order of precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    /// Always asked when its activation holds; never ranked.
    MandatorySafety,
    HighDiscrimination,
    MediumDiscrimination,
    LowDiscrimination,
    /// Only for refinement.
    Optional,
}

impl PriorityTier {
    /// All tiers in precedence order.
    pub fn all() -> &'static [PriorityTier] {
        &[
            PriorityTier::MandatorySafety,
            PriorityTier::HighDiscrimination,
            PriorityTier::MediumDiscrimination,
            PriorityTier::LowDiscrimination,
            PriorityTier::Optional,
        ]
    }

    /// Scale applied to a candidate's information gain during ranking.
    pub fn utility_multiplier(&self) -> f64 {
        match self {
            PriorityTier::HighDiscrimination => 1.5,
            PriorityTier::Optional => 0.5,
            PriorityTier::MandatorySafety
            | PriorityTier::MediumDiscrimination
            | PriorityTier::LowDiscrimination => 1.0,
        }
    }

    pub fn is_mandatory(&self) -> bool {
        matches!(self, PriorityTier::MandatorySafety)
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriorityTier::MandatorySafety => "MANDATORY_SAFETY",
            PriorityTier::HighDiscrimination => "HIGH_DISCRIMINATION",
            PriorityTier::MediumDiscrimination => "MEDIUM_DISCRIMINATION",
            PriorityTier::LowDiscrimination => "LOW_DISCRIMINATION",
            PriorityTier::Optional => "OPTIONAL",
        };
        write!(f, "{}", s)
    }
}

/// Outcome → score mapping of a question.
///
/// Boolean questions carry their weights directly. Numeric questions use one
/// of the banded clinical rules, whose bands live in the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ScoreImpact {
    Boolean {
        positive: f64,
        /// Only informs selection; a negative answer never changes the score.
        #[serde(default)]
        negative: f64,
    },
    /// Age in years.
    Age,
    /// Platelets per mm³.
    PlateletCount,
    /// Days since symptom onset.
    SymptomOnset,
    /// Contributes nothing (demographics, gating questions).
    Neutral,
}

impl ScoreImpact {
    /// Impact assumed for a hypothetical positive or negative answer.
    ///
    /// Banded numeric rules have no single branch weight and report 0.
    pub fn branch_impact(&self, positive: bool) -> f64 {
        match self {
            ScoreImpact::Boolean { positive: p, negative: n } => {
                if positive {
                    *p
                } else {
                    *n
                }
            }
            ScoreImpact::Age
            | ScoreImpact::PlateletCount
            | ScoreImpact::SymptomOnset
            | ScoreImpact::Neutral => 0.0,
        }
    }

    /// True for the banded numeric rules.
    pub fn is_numeric_rule(&self) -> bool {
        matches!(
            self,
            ScoreImpact::Age | ScoreImpact::PlateletCount | ScoreImpact::SymptomOnset
        )
    }
}

fn default_group() -> String {
    "geral".to_string()
}

/// A clinical question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub tier: PriorityTier,
    /// Population probability of a positive answer.
    pub base_probability: f64,
    pub domain: AnswerDomain,
    pub scoring: ScoreImpact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<ActivationPredicate>,
    /// Questions that must be answered before this one becomes eligible.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<QuestionId>,
    #[serde(default = "default_group")]
    pub group: String,
    /// A positive answer escalates the session to emergency mode.
    #[serde(default)]
    pub critical: bool,
}

impl Question {
    pub fn is_mandatory(&self) -> bool {
        self.tier.is_mandatory()
    }
}

/// Shifts the positive-outcome probability of `targets` when `when` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationRule {
    pub when: ActivationPredicate,
    pub targets: Vec<QuestionId>,
    pub delta: f64,
}

impl CorrelationRule {
    pub fn applies_to(&self, question_id: &QuestionId) -> bool {
        self.targets.contains(question_id)
    }
}

/// Pattern that makes a classification unreliable: alarm signs reported
/// without the canonical fever finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtypicalPresentation {
    pub fever_question: QuestionId,
    pub alarm_questions: Vec<QuestionId>,
}
