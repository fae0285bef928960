//! Bridge settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text shown for both stages when a payload cannot be decoded.
pub const DEFAULT_PLACEHOLDER: &str = "Error: Failed to parse compiler output.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Quiet period after the last edit before recompiling.
    pub debounce_ms: u64,
    /// Diagnostic text used when the payload is malformed.
    pub placeholder: String,
}

impl BridgeConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Load settings from a (possibly partial) JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1000,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}
