//! Per-session output log

use mepa_types::Cell;

/// Values printed by the program, in the order they were produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputLog {
    entries: Vec<Cell>,
    capacity: Option<usize>,
}

impl OutputLog {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, value: Cell) {
        self.entries.push(value);
        if let Some(capacity) = self.capacity {
            if self.entries.len() > capacity {
                let excess = self.entries.len() - capacity;
                self.entries.drain(..excess);
            }
        }
    }

    pub fn entries(&self) -> &[Cell] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
