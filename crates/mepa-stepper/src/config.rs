//! Stepper settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepperConfig {
    /// Period between automatic steps while the run loop is active.
    pub run_interval_ms: u64,
    /// Keep at most this many output entries, dropping the oldest.
    pub max_output_entries: Option<usize>,
}

impl StepperConfig {
    pub fn run_interval(&self) -> Duration {
        // A zero period would make tokio's interval panic.
        Duration::from_millis(self.run_interval_ms.max(1))
    }

    /// Load settings from a (possibly partial) JSON document.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for StepperConfig {
    fn default() -> Self {
        Self {
            run_interval_ms: 300,
            max_output_entries: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StepperConfig::default();
        assert_eq!(config.run_interval(), Duration::from_millis(300));
        assert_eq!(config.max_output_entries, None);
    }

    #[test]
    fn test_partial_document() {
        let config = StepperConfig::from_json(r#"{"max_output_entries": 16}"#).unwrap();
        assert_eq!(config.run_interval_ms, 300);
        assert_eq!(config.max_output_entries, Some(16));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = StepperConfig {
            run_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.run_interval(), Duration::from_millis(1));
    }
}
