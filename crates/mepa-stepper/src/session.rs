//! Execution sessions
//!
//! A session is one run of one compiled program. It exclusively owns the
//! machine handle: the handle is built in `Session::create` and dropped in
//! `Session::terminate`, and nothing else constructs or disposes it.

use crate::config::StepperConfig;
use crate::error::StepperError;
use crate::events::{Publisher, StepperEvent};
use crate::gate::InputGate;
use crate::output::OutputLog;
use crate::projector::{project, ViewModel};
use crate::run_loop::{RunLoop, StopReason};
use mepa_types::{Cell, Machine, MachineFactory};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Identifies a session within one stepper. Increases monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub(crate) u64);

impl SessionId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// The machine is being built and checked for load faults
    Constructing,
    /// Accepting steps
    Ready,
    /// Torn down explicitly; the machine is gone
    Terminated,
}

pub(crate) struct Session<M> {
    id: SessionId,
    /// Instruction text the machine was built from. Never changes.
    instructions: Arc<str>,
    machine: Option<M>,
    lifecycle: Lifecycle,
    output: OutputLog,
    gate: InputGate,
    run_loop: RunLoop,
    /// First fault reported for this session
    fault: Option<String>,
    view: ViewModel,
    publisher: Publisher,
}

impl<M: Machine> Session<M> {
    /// Build the machine for `instructions` and check it for load faults.
    ///
    /// A machine that reports a fault right away is disposed and never
    /// becomes part of a session.
    pub(crate) fn create<F>(
        id: SessionId,
        factory: &F,
        instructions: &str,
        config: &StepperConfig,
        publisher: Publisher,
    ) -> Result<Self, StepperError>
    where
        F: MachineFactory<Machine = M>,
    {
        let mut session = Self {
            id,
            instructions: Arc::from(instructions),
            machine: Some(factory.build(instructions)),
            lifecycle: Lifecycle::Constructing,
            output: OutputLog::new(config.max_output_entries),
            gate: InputGate::default(),
            run_loop: RunLoop::default(),
            fault: None,
            view: ViewModel::default(),
            publisher,
        };

        if let Some(message) = session.machine.as_ref().and_then(Machine::fault) {
            error!(session = %id, %message, "machine failed to start");
            return Err(StepperError::Construction(message));
        }

        session.lifecycle = Lifecycle::Ready;
        session.refresh_view();
        info!(
            session = %id,
            lines = session.instructions.lines().count(),
            "session ready"
        );
        session.publisher.emit(StepperEvent::SessionStarted(id));
        Ok(session)
    }
}

impl<M: Machine> Session<M> {
    pub(crate) fn id(&self) -> SessionId {
        self.id
    }

    pub(crate) fn instructions(&self) -> &str {
        &self.instructions
    }

    pub(crate) fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub(crate) fn output(&self) -> &OutputLog {
        &self.output
    }

    pub(crate) fn gate(&self) -> &InputGate {
        &self.gate
    }

    pub(crate) fn run_loop(&self) -> &RunLoop {
        &self.run_loop
    }

    pub(crate) fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Latest published view model.
    #[cfg(test)]
    pub(crate) fn view(&self) -> &ViewModel {
        &self.view
    }

    pub(crate) fn is_halted(&self) -> bool {
        self.machine.as_ref().is_some_and(Machine::is_halted)
    }

    /// Fail unless the session can take another step.
    pub(crate) fn ensure_steppable(&self) -> Result<(), StepperError> {
        if self.lifecycle != Lifecycle::Ready {
            return Err(StepperError::Terminated(self.id));
        }
        if let Some(message) = &self.fault {
            return Err(StepperError::Faulted(message.clone()));
        }
        if self.is_halted() {
            return Err(StepperError::Halted);
        }
        Ok(())
    }

    /// Tear the session down: cancel the run loop, then drop the machine.
    ///
    /// Returns false if the session was already terminated.
    pub(crate) fn terminate(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Terminated {
            return false;
        }
        self.stop_run_loop(StopReason::SessionEnded);
        self.machine = None;
        self.gate.close();
        self.lifecycle = Lifecycle::Terminated;
        info!(session = %self.id, "session terminated");
        self.publisher.emit(StepperEvent::SessionTerminated(self.id));
        true
    }

    pub(crate) fn gate_mut(&mut self) -> &mut InputGate {
        &mut self.gate
    }

    pub(crate) fn run_loop_mut(&mut self) -> &mut RunLoop {
        &mut self.run_loop
    }

    pub(crate) fn machine_mut(&mut self) -> Result<&mut M, StepperError> {
        let id = self.id;
        self.machine.as_mut().ok_or(StepperError::Terminated(id))
    }

    /// A fault the machine reports that has not been recorded yet.
    pub(crate) fn unrecorded_fault(&self) -> Option<String> {
        if self.fault.is_some() {
            return None;
        }
        self.machine.as_ref().and_then(Machine::fault)
    }

    pub(crate) fn emit(&self, event: StepperEvent) {
        self.publisher.emit(event);
    }

    pub(crate) fn record_output(&mut self, value: Cell) {
        self.output.push(value);
        self.publisher.emit(StepperEvent::Output(value));
    }

    /// Record a fault. Only the first one is kept and surfaced.
    pub(crate) fn record_fault(&mut self, message: String) {
        if self.fault.is_some() {
            return;
        }
        warn!(session = %self.id, %message, "machine fault");
        self.gate.close();
        self.fault = Some(message.clone());
        self.publisher.emit(StepperEvent::Fault(message));
    }

    /// Re-read the machine state and publish a fresh view model.
    pub(crate) fn refresh_view(&mut self) {
        let Some(machine) = self.machine.as_ref() else {
            return;
        };
        self.view = project(&machine.snapshot(), self.output.entries());
        self.publisher.publish(self.view.clone());
    }

    /// Stop the run loop if it is active. Returns whether it was.
    pub(crate) fn stop_run_loop(&mut self, reason: StopReason) -> bool {
        if !self.run_loop.cancel() {
            return false;
        }
        info!(session = %self.id, ?reason, "run loop stopped");
        self.publisher.emit(StepperEvent::RunLoopStopped(reason));
        true
    }
}
