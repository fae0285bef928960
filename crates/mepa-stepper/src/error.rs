//! Error types for the stepper

use crate::session::SessionId;
use thiserror::Error;

/// Halting conditions and rejected triggers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepperError {
    /// The machine reported a fault right after construction
    #[error("machine failed to start: {0}")]
    Construction(String),

    /// No session has been created yet
    #[error("no active session")]
    NoSession,

    /// The session was torn down
    #[error("session {0} has been terminated")]
    Terminated(SessionId),

    /// The machine faulted; a new session is required
    #[error("machine fault: {0}")]
    Faulted(String),

    /// The program ran to completion
    #[error("program has finished")]
    Halted,

    /// Another advancement of the same machine is in progress
    #[error("a step is already in flight")]
    StepInFlight,

    /// Manual stepping is not allowed while the run loop is active
    #[error("run loop is active")]
    RunLoopActive,

    /// The machine is waiting for a value through the input gate
    #[error("waiting for input")]
    AwaitingInput,

    /// The run loop needs a tokio runtime to schedule its timer
    #[error("no tokio runtime available to schedule the run loop")]
    NoRuntime,
}
