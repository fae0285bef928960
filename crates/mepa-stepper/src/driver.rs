//! Step driver
//!
//! Advances the machine by one instruction and keeps the session consistent
//! with the outcome: output is logged, the input gate follows `Blocked`,
//! faults are recorded once, and the view is republished after every
//! outcome except a fault.

use crate::error::StepperError;
use crate::events::StepperEvent;
use crate::run_loop::StopReason;
use crate::session::Session;
use mepa_types::{Cell, Machine, StepOutcome};
use tracing::debug;

/// Advance `session` by one instruction.
///
/// `input` answers a pending read and is `None` otherwise. Callers must not
/// issue further steps after a `Fault` outcome; the session rejects them.
pub(crate) fn step<M: Machine>(
    session: &mut Session<M>,
    input: Option<Cell>,
) -> Result<StepOutcome, StepperError> {
    session.ensure_steppable()?;

    let outcome = StepOutcome::from_advance(session.machine_mut()?.advance(input));
    match &outcome {
        StepOutcome::Produced(value) => {
            session.gate_mut().close();
            session.record_output(*value);
        }
        StepOutcome::Advanced => session.gate_mut().close(),
        StepOutcome::Blocked => {
            // Automatic stepping never runs past a pending read.
            session.stop_run_loop(StopReason::AwaitingInput);
            if !session.gate().is_open() {
                debug!(session = %session.id(), "waiting for input");
                session.gate_mut().open();
                session.emit(StepperEvent::AwaitingInput);
            }
        }
        StepOutcome::Fault(message) => {
            session.record_fault(message.clone());
            session.stop_run_loop(StopReason::Fault);
            return Ok(outcome);
        }
    }

    session.refresh_view();
    if session.is_halted() {
        debug!(session = %session.id(), "program finished");
        session.stop_run_loop(StopReason::Finished);
    }
    Ok(outcome)
}
