//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::domain::DeskId;
use crate::queue::TieBreak;

/// # Example
/// ```
/// use turnstile_core::app::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{ "desks": [1, 2, 3], "tie_break": "round-robin" }"#).unwrap();
/// assert_eq!(config.desks.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Service desks, created at start-up and never removed.
    pub desks: Vec<DeskId>,

    pub tie_break: TieBreak,
}

impl Default for EngineConfig {
    /// Two desks, lowest index wins ties.
    fn default() -> Self {
        Self {
            desks: vec![DeskId::new(1), DeskId::new(2)],
            tie_break: TieBreak::LowestIndex,
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
