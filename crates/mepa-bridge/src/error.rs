//! Error types for the compiler bridge

use thiserror::Error;

/// Problems decoding a compiler payload or scheduling a compilation
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The payload is not valid JSON
    #[error("malformed compiler payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Valid JSON, but not an object keyed by stage
    #[error("compiler payload is not an object")]
    NotAnObject,

    /// Debounced compilation needs a tokio runtime to schedule on
    #[error("no tokio runtime to schedule compilation on")]
    NoRuntime,
}
