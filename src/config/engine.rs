//! Engine configuration

use serde::Deserialize;

use crate::domain::triage::PostEmergencyPolicy;

/// Triage engine behavior
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Handling of answers that arrive after emergency mode (`reject` | `record`)
    #[serde(default)]
    pub post_emergency: PostEmergencyPolicy,
}
