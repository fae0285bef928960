//! Step outcome types

use crate::machine::AdvanceError;
use crate::Cell;
use serde::{Deserialize, Serialize};

/// Result of one advancement of a machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    /// The instruction printed a value
    Produced(Cell),
    /// Moved forward with no output
    Advanced,
    /// Waiting for an input value before the instruction can run
    Blocked,
    /// Non-recoverable machine condition
    Fault(String),
}

impl StepOutcome {
    /// Fold the raw result of `Machine::advance` into an outcome.
    pub fn from_advance(result: Result<Option<Cell>, AdvanceError>) -> Self {
        match result {
            Ok(Some(value)) => StepOutcome::Produced(value),
            Ok(None) => StepOutcome::Advanced,
            Err(AdvanceError::MissingInput) => StepOutcome::Blocked,
            Err(AdvanceError::Fault(message)) => StepOutcome::Fault(message),
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, StepOutcome::Fault(_))
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, StepOutcome::Blocked)
    }
}
