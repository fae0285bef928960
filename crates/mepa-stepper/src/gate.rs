//! Input gate
//!
//! The gate is open exactly while the last step came back `Blocked`. A
//! submission that parses as an integer closes it and is handed to one
//! step; anything else is dropped and the gate stays as it was.

use crate::driver;
use crate::error::StepperError;
use crate::session::Session;
use mepa_types::{Cell, Machine, StepOutcome};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputGate {
    open: bool,
}

impl InputGate {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn open(&mut self) {
        self.open = true;
    }

    pub(crate) fn close(&mut self) {
        self.open = false;
    }
}

/// Parse a submitted value.
///
/// Surrounding whitespace is ignored. Accepts an optional sign followed by
/// ASCII digits; decimals, trailing text and out-of-range values are
/// rejected.
pub fn parse_input(raw: &str) -> Option<Cell> {
    let text = raw.trim();
    let digits = text.strip_prefix(&['+', '-'][..]).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Offer `raw` to the gate of `session`.
///
/// Returns `Ok(None)` when the submission is rejected (gate closed or not a
/// number); the session is left untouched in that case. Otherwise returns
/// the outcome of the step the value was forwarded to.
pub(crate) fn submit<M: Machine>(
    session: &mut Session<M>,
    raw: &str,
) -> Result<Option<StepOutcome>, StepperError> {
    if !session.gate().is_open() {
        debug!(session = %session.id(), "input submitted while not waiting, ignored");
        return Ok(None);
    }
    let Some(value) = parse_input(raw) else {
        debug!(session = %session.id(), input = raw, "rejected non-numeric input");
        return Ok(None);
    };

    session.gate_mut().close();
    match driver::step(session, Some(value)) {
        Ok(outcome) => Ok(Some(outcome)),
        Err(err) => {
            // Nothing was advanced; keep waiting for a value.
            session.gate_mut().open();
            Err(err)
        }
    }
}
