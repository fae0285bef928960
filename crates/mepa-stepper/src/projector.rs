//! Snapshot to view model projection
//!
//! `project` is a pure function: the same snapshot and output always give
//! the same view, so rendering can be tested without a live machine.

use mepa_types::{Cell, Snapshot};
use serde::{Deserialize, Serialize};

/// One memory cell as it should be rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryCell {
    pub value: Cell,
    /// False for cells above the stack top; their values are stale.
    pub in_bounds: bool,
}

/// Render-ready machine state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewModel {
    /// Line of the instruction listing to highlight
    pub instruction_pointer: usize,
    pub stack_pointer: usize,
    pub memory: Vec<MemoryCell>,
    pub display: Vec<Cell>,
    pub output: Vec<Cell>,
}

/// Build the view model for a snapshot and the session's output so far.
pub fn project(snapshot: &Snapshot, output: &[Cell]) -> ViewModel {
    let memory = snapshot
        .memory
        .iter()
        .enumerate()
        .map(|(index, &value)| MemoryCell {
            value,
            in_bounds: snapshot.is_live(index),
        })
        .collect();

    ViewModel {
        instruction_pointer: snapshot.instruction_pointer,
        stack_pointer: snapshot.stack_pointer,
        memory,
        display: snapshot.display.clone(),
        output: output.to_vec(),
    }
}

impl ViewModel {
    /// Values of the live memory cells.
    pub fn live_memory(&self) -> impl Iterator<Item = Cell> + '_ {
        self.memory
            .iter()
            .filter(|cell| cell.in_bounds)
            .map(|cell| cell.value)
    }
}
