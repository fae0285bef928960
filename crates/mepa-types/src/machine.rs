//! The Machine Handle seam
//!
//! A `Machine` is one running instance of a compiled MEPA program. Its
//! instruction semantics are opaque to this workspace; the controller only
//! constructs it, inspects it for faults, advances it and reads snapshots.

use crate::snapshot::Snapshot;
use crate::Cell;
use thiserror::Error;

/// Conditions a machine may signal from `advance`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdvanceError {
    /// The current instruction reads a value and none was supplied.
    #[error("missing input")]
    MissingInput,

    /// Any other machine-reported failure.
    #[error("{0}")]
    Fault(String),
}

/// One stateful execution unit for a compiled program.
///
/// Implementations wrap whatever actually executes the instructions (an
/// embedded interpreter, a foreign module, a recording). `Send` is required
/// because the run loop advances the machine from a timer task.
pub trait Machine: Send + 'static {
    /// Report why the machine is unusable, if it is.
    ///
    /// Must be queried right after construction: a machine can be built
    /// successfully and still carry a load-time fault.
    fn fault(&self) -> Option<String>;

    /// Execute one instruction.
    ///
    /// `input` is consumed by a read instruction; it is `None` unless the
    /// caller is answering a previous `AdvanceError::MissingInput`.
    /// Returns `Ok(Some(value))` when the instruction printed a value.
    fn advance(&mut self, input: Option<Cell>) -> Result<Option<Cell>, AdvanceError>;

    /// Current observable state.
    fn snapshot(&self) -> Snapshot;

    /// Whether the program ran to completion.
    fn is_halted(&self) -> bool {
        false
    }
}

/// Builds machines from instruction text.
pub trait MachineFactory: Send + Sync + 'static {
    type Machine: Machine;

    fn build(&self, instructions: &str) -> Self::Machine;
}

impl<M, F> MachineFactory for F
where
    M: Machine,
    F: Fn(&str) -> M + Send + Sync + 'static,
{
    type Machine = M;

    fn build(&self, instructions: &str) -> M {
        self(instructions)
    }
}
