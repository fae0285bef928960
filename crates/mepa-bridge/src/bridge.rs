//! Fail-safe wrapper around the external compiler

use crate::config::BridgeConfig;
use crate::payload::{CompileReport, StageOutput};
use tracing::{debug, error};

/// Reported for the translation when the backend itself fails.
pub const BACKEND_FAILED: &str = "Compilation failed inside the compiler backend.";
/// Reported for the optimized translation when the backend itself fails.
pub const OPTIMIZATION_SKIPPED: &str = "Optimization failed due to compilation error.";

/// A trait that abstracts the capability to compile a source program.
/// This keeps the bridge independent of how the compiler is hosted.
pub trait CompilerBackend: Send + Sync + 'static {
    /// Compile `source` and return the raw JSON payload.
    fn compile(&self, source: &str) -> Result<String, anyhow::Error>;
}

impl<F> CompilerBackend for F
where
    F: Fn(&str) -> Result<String, anyhow::Error> + Send + Sync + 'static,
{
    fn compile(&self, source: &str) -> Result<String, anyhow::Error> {
        self(source)
    }
}

/// Runs a backend and always produces a displayable report.
pub struct CompilerBridge<B> {
    backend: B,
    config: BridgeConfig,
}

impl<B: CompilerBackend> CompilerBridge<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, BridgeConfig::default())
    }

    pub fn with_config(backend: B, config: BridgeConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Compile a source program.
    ///
    /// Blank sources are not sent to the backend. Backend failures and
    /// unreadable payloads are folded into the report; this never fails.
    pub fn compile(&self, source: &str) -> CompileReport {
        if source.trim().is_empty() {
            return CompileReport::empty();
        }

        debug!(bytes = source.len(), "compiling");
        let raw = match self.backend.compile(source) {
            Ok(raw) => raw,
            Err(err) => {
                error!(error = %err, "compiler backend failed");
                return CompileReport {
                    translation: StageOutput::Failed(BACKEND_FAILED.to_string()),
                    optimized: StageOutput::Failed(OPTIMIZATION_SKIPPED.to_string()),
                };
            }
        };

        match CompileReport::from_payload(&raw) {
            Ok(report) => report,
            Err(err) => {
                error!(error = %err, "failed to parse compiler output");
                CompileReport::placeholder(&self.config.placeholder)
            }
        }
    }
}
