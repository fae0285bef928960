//! MEPA shared types
//!
//! Data model shared by the compiler bridge and the stepping controller.
//! The MEPA machine itself is an external collaborator: this crate only
//! describes the seam it is driven through.
//!
//! # Modules
//!
//! - `machine`: the `Machine` handle seam and its construction factory
//! - `snapshot`: raw machine state as reported after each transition
//! - `outcome`: the closed result of one advancement
//! - `sync`: lock aliases used by the controller

pub mod machine;
pub mod outcome;
pub mod snapshot;
pub mod sync;

/// A single numeric cell of memory, display, input or output.
pub type Cell = i64;

// Re-exports
pub use machine::{AdvanceError, Machine, MachineFactory};
pub use outcome::StepOutcome;
pub use snapshot::Snapshot;
