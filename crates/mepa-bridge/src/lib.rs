//! MEPA compiler bridge
//!
//! Adapter around the external compiler that turns source programs into MEPA
//! instruction text. The compiler itself is opaque: it hands back a JSON
//! payload with one result per stage, which this crate decodes into a
//! `CompileReport` without ever failing the caller.
//!
//! # Modules
//!
//! - `bridge`: the `CompilerBackend` seam and the fail-safe `CompilerBridge`
//! - `payload`: payload decoding and per-stage results
//! - `debounce`: recompilation after a quiet period of edits
//! - `config`: bridge settings
//! - `error`: decoding and scheduling errors

pub mod bridge;
pub mod config;
pub mod debounce;
pub mod error;
pub mod payload;

// Re-export main types
pub use bridge::{CompilerBackend, CompilerBridge};
pub use config::BridgeConfig;
pub use debounce::CompileDebouncer;
pub use error::BridgeError;
pub use payload::{CompileReport, StageOutput};
