//! Recompilation after a quiet period
//!
//! Every edit resubmits the whole source. Only the last submission inside
//! the debounce window reaches the compiler; earlier pending ones are
//! cancelled. Reports are published on a `watch` channel so readers always
//! see the latest one.

use crate::bridge::{CompilerBackend, CompilerBridge};
use crate::error::BridgeError;
use crate::payload::CompileReport;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Debounced front end of a `CompilerBridge`.
pub struct CompileDebouncer<B> {
    bridge: Arc<CompilerBridge<B>>,
    reports: Arc<watch::Sender<CompileReport>>,
    pending: Option<JoinHandle<()>>,
}

impl<B: CompilerBackend> CompileDebouncer<B> {
    pub fn new(bridge: CompilerBridge<B>) -> Self {
        let (reports, _) = watch::channel(CompileReport::empty());
        Self {
            bridge: Arc::new(bridge),
            reports: Arc::new(reports),
            pending: None,
        }
    }

    /// Receiver of compile reports, starting from the latest one.
    pub fn subscribe(&self) -> watch::Receiver<CompileReport> {
        self.reports.subscribe()
    }

    /// Latest published report.
    pub fn latest(&self) -> CompileReport {
        self.reports.borrow().clone()
    }

    /// Whether a compilation is still waiting for its quiet period.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Submit the current source text.
    ///
    /// A blank source clears both outputs right away. Anything else is
    /// scheduled on the current tokio runtime; without one the submission
    /// fails with `BridgeError::NoRuntime` and nothing is pending.
    pub fn submit(&mut self, source: impl Into<String>) -> Result<(), BridgeError> {
        self.cancel();

        let source = source.into();
        if source.trim().is_empty() {
            self.reports.send_replace(CompileReport::empty());
            return Ok(());
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| BridgeError::NoRuntime)?;
        let bridge = Arc::clone(&self.bridge);
        let reports = Arc::clone(&self.reports);
        let delay = bridge.config().debounce();
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let report = bridge.compile(&source);
            reports.send_replace(report);
        }));
        Ok(())
    }

    /// Drop the pending compilation, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl<B> Drop for CompileDebouncer<B> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
