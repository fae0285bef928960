//! Raw machine state

use crate::Cell;
use serde::{Deserialize, Serialize};

/// Observable machine state at one point in time.
///
/// Field aliases accept the compact `{ i, s, m, d }` layout used by the
/// MEPA machine's own state dump.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Index into the instruction listing.
    #[serde(alias = "i")]
    pub instruction_pointer: usize,

    /// Boundary between live and unallocated memory cells.
    #[serde(alias = "s")]
    pub stack_pointer: usize,

    /// Data memory (M). Fixed length for a session.
    #[serde(alias = "m", default)]
    pub memory: Vec<Cell>,

    /// Display registers (D).
    #[serde(alias = "d", default)]
    pub display: Vec<Cell>,
}

impl Snapshot {
    /// Whether the memory cell at `index` holds a live value.
    pub fn is_live(&self, index: usize) -> bool {
        index <= self.stack_pointer
    }
}
