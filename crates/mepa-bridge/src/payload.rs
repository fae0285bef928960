//! Compiler payload decoding
//!
//! The compiler answers with one JSON object per call:
//!
//! ```text
//! { "mepa": { "Ok": "INPP\n..." }, "optimized": { "Err": "line 3: ..." } }
//! ```
//!
//! `mepa` carries the plain translation and `optimized` the optimized one.
//! Each stage is decoded on its own, so one odd stage never hides the other.

use crate::error::BridgeError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::warn;

/// Payload key of the plain translation.
pub const TRANSLATION_KEY: &str = "mepa";
/// Payload key of the optimized translation.
pub const OPTIMIZED_KEY: &str = "optimized";

/// Result of one compilation stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageOutput {
    /// Generated instruction text
    Compiled(String),
    /// The stage's error message
    Failed(String),
    /// The stage produced nothing
    Missing,
    /// The payload could not be decoded; carries the diagnostic text
    Placeholder(String),
}

/// Wire shape of a single stage.
#[derive(Deserialize)]
enum StageResult {
    Ok(String),
    Err(String),
}

impl StageOutput {
    /// Text to show for this stage. Errors are shown verbatim.
    pub fn display_text(&self) -> &str {
        match self {
            StageOutput::Compiled(text)
            | StageOutput::Failed(text)
            | StageOutput::Placeholder(text) => text,
            StageOutput::Missing => "",
        }
    }

    /// Instruction text, only when the stage succeeded.
    pub fn instructions(&self) -> Option<&str> {
        match self {
            StageOutput::Compiled(text) => Some(text),
            _ => None,
        }
    }

    fn decode(key: &str, value: Option<JsonValue>) -> Self {
        let Some(value) = value else {
            return StageOutput::Missing;
        };
        match serde_json::from_value::<StageResult>(value) {
            Ok(StageResult::Ok(text)) => StageOutput::Compiled(text),
            Ok(StageResult::Err(message)) => StageOutput::Failed(message),
            Err(err) => {
                warn!(stage = key, error = %err, "unrecognised stage result");
                StageOutput::Missing
            }
        }
    }
}

/// Both stage results of one compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileReport {
    pub translation: StageOutput,
    pub optimized: StageOutput,
}

impl CompileReport {
    /// Report for a source with nothing to compile.
    pub fn empty() -> Self {
        Self {
            translation: StageOutput::Missing,
            optimized: StageOutput::Missing,
        }
    }

    /// Report used when the payload itself is unreadable.
    pub fn placeholder(text: &str) -> Self {
        Self {
            translation: StageOutput::Placeholder(text.to_string()),
            optimized: StageOutput::Placeholder(text.to_string()),
        }
    }

    /// Decode a raw compiler payload.
    pub fn from_payload(raw: &str) -> Result<Self, BridgeError> {
        let payload: JsonValue = serde_json::from_str(raw)?;
        let JsonValue::Object(mut stages) = payload else {
            return Err(BridgeError::NotAnObject);
        };

        Ok(Self {
            translation: StageOutput::decode(TRANSLATION_KEY, stages.remove(TRANSLATION_KEY)),
            optimized: StageOutput::decode(OPTIMIZED_KEY, stages.remove(OPTIMIZED_KEY)),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.translation == StageOutput::Missing && self.optimized == StageOutput::Missing
    }
}

impl Default for CompileReport {
    fn default() -> Self {
        Self::empty()
    }
}
