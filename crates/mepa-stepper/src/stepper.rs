//! Public control surface
//!
//! `Stepper` holds at most one live session and serialises every trigger
//! against it. Manual steps and input submissions take the session lock
//! with `try_lock` and are rejected with `StepperError::StepInFlight` if a
//! timer tick holds it; a tick that finds the lock taken is skipped.

use crate::config::StepperConfig;
use crate::driver;
use crate::error::StepperError;
use crate::events::{Publisher, StepperEvents};
use crate::gate;
use crate::listing::Listing;
use crate::projector::ViewModel;
use crate::run_loop::{self, StopReason};
use crate::session::{Lifecycle, Session, SessionId};
use mepa_types::sync::{shared, Arc, MutexGuard, Shared};
use mepa_types::{Cell, MachineFactory, StepOutcome};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::debug;

pub struct Stepper<F: MachineFactory> {
    factory: F,
    config: StepperConfig,
    slot: Shared<Option<Session<F::Machine>>>,
    next_id: AtomicU64,
    publisher: Publisher,
}

impl<F: MachineFactory> Stepper<F> {
    /// Create a stepper and the receiver of its events.
    pub fn new(factory: F, config: StepperConfig) -> (Self, StepperEvents) {
        let (publisher, events) = Publisher::new();
        let stepper = Self {
            factory,
            config,
            slot: shared(None),
            next_id: AtomicU64::new(1),
            publisher,
        };
        (stepper, events)
    }

    pub fn config(&self) -> &StepperConfig {
        &self.config
    }

    /// Start a new session for `instructions`, replacing the current one.
    ///
    /// The previous session is terminated first, so its output is gone even
    /// if the new machine fails to start.
    pub fn create_session(&self, instructions: &str) -> Result<SessionId, StepperError> {
        let mut slot = self.slot.lock();
        if let Some(previous) = slot.as_mut() {
            previous.terminate();
        }
        *slot = None;

        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(session = %id, "constructing session");
        match Session::create(
            id,
            &self.factory,
            instructions,
            &self.config,
            self.publisher.clone(),
        ) {
            Ok(session) => {
                *slot = Some(session);
                Ok(id)
            }
            Err(err) => {
                self.publisher.publish(ViewModel::default());
                Err(err)
            }
        }
    }

    /// Terminate the current session. Idempotent.
    pub fn terminate(&self) -> bool {
        self.slot
            .lock()
            .as_mut()
            .is_some_and(|session| session.terminate())
    }

    /// Advance the current session by one instruction.
    ///
    /// Rejected while the run loop is active. While waiting for input this
    /// re-reports `Blocked`; the value has to come through `submit_input`.
    pub fn step(&self) -> Result<StepOutcome, StepperError> {
        let mut guard = self.try_lock()?;
        let session = guard.as_mut().ok_or(StepperError::NoSession)?;
        if session.run_loop().is_active() {
            return Err(StepperError::RunLoopActive);
        }
        driver::step(session, None)
    }

    /// Offer a value to the input gate.
    ///
    /// `Ok(None)` means the submission was rejected and nothing changed;
    /// otherwise the value was consumed by exactly one step.
    pub fn submit_input(&self, raw: &str) -> Result<Option<StepOutcome>, StepperError> {
        let mut guard = self.try_lock()?;
        gate::submit(guard.as_mut().ok_or(StepperError::NoSession)?, raw)
    }

    /// Start the run loop if it is stopped, stop it if it is running.
    ///
    /// Returns whether the loop is running afterwards.
    pub fn toggle_run(&self) -> Result<bool, StepperError> {
        let mut guard = self.slot.lock();
        let session = guard.as_mut().ok_or(StepperError::NoSession)?;
        if session.stop_run_loop(StopReason::Requested) {
            return Ok(false);
        }
        run_loop::start(
            Arc::downgrade(&self.slot),
            session,
            self.config.run_interval(),
        )?;
        Ok(true)
    }

    /// Start the run loop. `Ok(false)` if it was already running.
    pub fn start_run(&self) -> Result<bool, StepperError> {
        let mut guard = self.slot.lock();
        let session = guard.as_mut().ok_or(StepperError::NoSession)?;
        run_loop::start(
            Arc::downgrade(&self.slot),
            session,
            self.config.run_interval(),
        )
    }

    /// Stop the run loop. Returns whether it was running.
    pub fn stop_run(&self) -> bool {
        self.slot
            .lock()
            .as_mut()
            .is_some_and(|session| session.stop_run_loop(StopReason::Requested))
    }

    pub fn is_running(&self) -> bool {
        self.with_session(|session| session.run_loop().is_active())
            .unwrap_or(false)
    }

    pub fn awaiting_input(&self) -> bool {
        self.with_session(|session| session.gate().is_open())
            .unwrap_or(false)
    }

    /// Values printed so far by the current session.
    pub fn output(&self) -> Vec<Cell> {
        self.with_session(|session| session.output().entries().to_vec())
            .unwrap_or_default()
    }

    pub fn fault(&self) -> Option<String> {
        self.with_session(|session| session.fault().map(str::to_string))
            .flatten()
    }

    pub fn session_id(&self) -> Option<SessionId> {
        self.with_session(|session| session.id())
    }

    pub fn lifecycle(&self) -> Option<Lifecycle> {
        self.with_session(|session| session.lifecycle())
    }

    /// Instruction listing of the current session.
    pub fn listing(&self) -> Option<Listing> {
        self.with_session(|session| Listing::new(session.instructions()))
    }

    /// Latest view model.
    pub fn view(&self) -> ViewModel {
        self.publisher.latest()
    }

    /// Receiver that sees every republished view model.
    pub fn subscribe_view(&self) -> watch::Receiver<ViewModel> {
        self.publisher.subscribe()
    }

    fn try_lock(&self) -> Result<MutexGuard<'_, Option<Session<F::Machine>>>, StepperError> {
        self.slot.try_lock().ok_or(StepperError::StepInFlight)
    }

    fn with_session<R>(&self, f: impl FnOnce(&Session<F::Machine>) -> R) -> Option<R> {
        self.slot.lock().as_ref().map(f)
    }
}

impl<F: MachineFactory> Drop for Stepper<F> {
    fn drop(&mut self) {
        if let Some(session) = self.slot.lock().as_mut() {
            session.terminate();
        }
    }
}
