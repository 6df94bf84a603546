//! Confidence value object (0.0-1.0 scale).
//!
//! This is session coverage confidence: how much of the triage picture has been
//! gathered. It has nothing to do with retrieval relevance scores produced by
//! narrative collaborators and must not be mixed with them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fraction between 0.0 and 1.0 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// No confidence (nothing answered yet).
    pub const ZERO: Self = Self(0.0);

    /// Creates a Confidence, clamping to the valid range. NaN maps to zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Returns the raw fraction.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.0 * 100.0)
    }
}
