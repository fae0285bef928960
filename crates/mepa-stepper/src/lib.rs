//! MEPA interactive stepper
//!
//! Owns a running instance of a compiled MEPA program and drives it one
//! instruction at a time, either on demand or from a cancellable run loop.
//! Read instructions suspend the program until a value is supplied through
//! the input gate, and every transition republishes a render-ready view of
//! the machine.
//!
//! # Architecture
//!
//! One `Session` aggregate per program run holds the machine handle, the
//! output log, the input gate and the run-loop state. `Stepper` keeps the
//! live session behind a `parking_lot::Mutex`; user triggers and timer ticks
//! both go through it, so at most one advancement is in flight.
//!
//! # Modules
//!
//! - `session`: session construction, lifecycle and teardown
//! - `driver`: single-step advancement and outcome bookkeeping
//! - `gate`: input parsing and the waiting-for-input state
//! - `run_loop`: periodic stepping on a tokio timer
//! - `projector`: snapshot to view model
//! - `listing`: instruction listing with the current line marked
//! - `stepper`: the public control surface
//! - `events`: notifications published to observers
//! - `output`: the per-session output log
//! - `config`: stepper settings
//! - `error`: error types
//!
//! Sessions are only reachable through `Stepper`:
//!
//! ```compile_fail
//! use mepa_stepper::session::Session;
//! ```

pub mod config;
mod driver;
pub mod error;
pub mod events;
pub mod gate;
pub mod listing;
pub mod output;
pub mod projector;
mod run_loop;
mod session;
pub mod stepper;

// Re-export main types
pub use config::StepperConfig;
pub use error::StepperError;
pub use events::{StepperEvent, StepperEvents};
pub use gate::parse_input;
pub use listing::Listing;
pub use projector::{project, MemoryCell, ViewModel};
pub use run_loop::StopReason;
pub use session::{Lifecycle, SessionId};
pub use stepper::Stepper;

pub use mepa_types::{AdvanceError, Cell, Machine, MachineFactory, Snapshot, StepOutcome};
