//! Run-loop scheduler
//!
//! While active, a tokio task ticks at a fixed period and advances the
//! session once per tick. It stops itself on a pending read, a fault or
//! program completion. Each start is tagged with a generation so a task that
//! outlives its `stop` can never step the session again.

use crate::driver;
use crate::error::StepperError;
use crate::events::StepperEvent;
use crate::session::{Session, SessionId};
use mepa_types::sync::Mutex;
use mepa_types::{Machine, StepOutcome};
use std::ops::ControlFlow;
use std::sync::Weak;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Slot holding the live session of a stepper.
pub(crate) type SessionSlot<M> = Mutex<Option<Session<M>>>;

/// Why the run loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Stopped by the user
    Requested,
    /// A read instruction needs a value
    AwaitingInput,
    /// The machine faulted
    Fault,
    /// The program ran to completion
    Finished,
    /// The session was terminated or replaced
    SessionEnded,
}

/// Timer state of one session. At most one task at a time.
#[derive(Debug, Default)]
pub(crate) struct RunLoop {
    task: Option<JoinHandle<()>>,
    generation: u64,
}

impl RunLoop {
    pub(crate) fn is_active(&self) -> bool {
        self.task.is_some()
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn attach(&mut self, task: JoinHandle<()>) {
        debug_assert!(self.task.is_none());
        self.task = Some(task);
    }

    /// Cancel the timer task. Returns whether one was active.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

impl Drop for RunLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Start the run loop of `session`, which must live in `slot`.
///
/// Returns `Ok(false)` if it was already running.
pub(crate) fn start<M: Machine>(
    slot: Weak<SessionSlot<M>>,
    session: &mut Session<M>,
    period: Duration,
) -> Result<bool, StepperError> {
    if session.run_loop().is_active() {
        return Ok(false);
    }
    session.ensure_steppable()?;
    if session.gate().is_open() {
        return Err(StepperError::AwaitingInput);
    }
    let runtime = tokio::runtime::Handle::try_current().map_err(|_| StepperError::NoRuntime)?;

    let id = session.id();
    let generation = session.run_loop_mut().next_generation();
    let task = runtime.spawn(async move {
        let mut ticks = tokio::time::interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            if run_tick(&slot, id, generation).is_break() {
                break;
            }
        }
        debug!(session = %id, generation, "run loop task exited");
    });
    session.run_loop_mut().attach(task);

    info!(session = %id, period_ms = period.as_millis() as u64, "run loop started");
    session.emit(StepperEvent::RunLoopStarted);
    Ok(true)
}

/// One timer tick against the shared slot.
fn run_tick<M: Machine>(
    slot: &Weak<SessionSlot<M>>,
    id: SessionId,
    generation: u64,
) -> ControlFlow<()> {
    let Some(shared) = slot.upgrade() else {
        return ControlFlow::Break(());
    };
    let Some(mut guard) = shared.try_lock() else {
        debug!(session = %id, "step in flight, deferring tick");
        return ControlFlow::Continue(());
    };
    let Some(session) = guard.as_mut() else {
        return ControlFlow::Break(());
    };
    if session.id() != id
        || !session.run_loop().is_active()
        || session.run_loop().generation() != generation
    {
        return ControlFlow::Break(());
    }

    match tick(session) {
        ControlFlow::Continue(()) => ControlFlow::Continue(()),
        ControlFlow::Break(reason) => {
            session.stop_run_loop(reason);
            ControlFlow::Break(())
        }
    }
}

/// Check for a pending fault, then advance once with no input.
pub(crate) fn tick<M: Machine>(session: &mut Session<M>) -> ControlFlow<StopReason> {
    if let Some(message) = session.unrecorded_fault() {
        session.record_fault(message);
        return ControlFlow::Break(StopReason::Fault);
    }

    match driver::step(session, None) {
        Ok(StepOutcome::Blocked) => ControlFlow::Break(StopReason::AwaitingInput),
        Ok(StepOutcome::Fault(_)) => ControlFlow::Break(StopReason::Fault),
        Ok(_) if session.is_halted() => ControlFlow::Break(StopReason::Finished),
        Ok(_) => ControlFlow::Continue(()),
        Err(StepperError::Halted) => ControlFlow::Break(StopReason::Finished),
        Err(StepperError::Faulted(_)) => ControlFlow::Break(StopReason::Fault),
        Err(err) => {
            warn!(session = %session.id(), error = %err, "run loop cannot step");
            ControlFlow::Break(StopReason::SessionEnded)
        }
    }
}
