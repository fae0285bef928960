//! Scripted machines and common setup for controller tests.

use crate::config::StepperConfig;
use crate::events::{Publisher, StepperEvent, StepperEvents};
use crate::session::{Session, SessionId};
use crate::stepper::Stepper;
use mepa_types::sync::Mutex;
use mepa_types::{AdvanceError, Cell, Machine, MachineFactory, Snapshot};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const MEMORY_CELLS: usize = 8;

/// One scripted instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Nop,
    Print(Cell),
    /// Push the supplied input
    Read,
    /// Print the top of the stack
    PrintTop,
    /// Read a value and print it in one instruction
    Echo,
    /// Fail when executed
    Fail(&'static str),
    /// Execute fine but leave the machine reporting a fault
    Corrupt(&'static str),
}

/// Records what the controller asked of the machines it built.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    advances: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<Option<Cell>>>>,
}

impl Probe {
    pub fn advances(&self) -> usize {
        self.advances.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<Option<Cell>> {
        self.inputs.lock().clone()
    }
}

pub struct ScriptedMachine {
    ops: Vec<Op>,
    pc: usize,
    sp: usize,
    memory: Vec<Cell>,
    load_fault: Option<String>,
    latent_fault: Option<String>,
    probe: Probe,
}

impl ScriptedMachine {
    pub fn new(ops: Vec<Op>, probe: Probe) -> Self {
        Self {
            ops,
            pc: 0,
            sp: 0,
            memory: vec![0; MEMORY_CELLS],
            load_fault: None,
            latent_fault: None,
            probe,
        }
    }

    pub fn with_load_fault(mut self, message: &str) -> Self {
        self.load_fault = Some(message.to_string());
        self
    }

    fn push(&mut self, value: Cell) {
        if self.sp + 1 < self.memory.len() {
            self.sp += 1;
        }
        self.memory[self.sp] = value;
    }
}

impl Machine for ScriptedMachine {
    fn fault(&self) -> Option<String> {
        self.load_fault.clone().or_else(|| self.latent_fault.clone())
    }

    fn advance(&mut self, input: Option<Cell>) -> Result<Option<Cell>, AdvanceError> {
        self.probe.advances.fetch_add(1, Ordering::SeqCst);
        self.probe.inputs.lock().push(input);

        let Some(op) = self.ops.get(self.pc).copied() else {
            return Err(AdvanceError::Fault("program has ended".to_string()));
        };
        let printed = match op {
            Op::Nop => None,
            Op::Print(value) => Some(value),
            Op::Read => {
                self.push(input.ok_or(AdvanceError::MissingInput)?);
                None
            }
            Op::PrintTop => Some(self.memory[self.sp]),
            Op::Echo => {
                let value = input.ok_or(AdvanceError::MissingInput)?;
                self.push(value);
                Some(value)
            }
            Op::Fail(message) => return Err(AdvanceError::Fault(message.to_string())),
            Op::Corrupt(message) => {
                self.latent_fault = Some(message.to_string());
                None
            }
        };
        self.pc += 1;
        Ok(printed)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            instruction_pointer: self.pc,
            stack_pointer: self.sp,
            memory: self.memory.clone(),
            display: vec![0],
        }
    }

    fn is_halted(&self) -> bool {
        self.pc >= self.ops.len()
    }
}

pub fn factory(ops: Vec<Op>) -> (impl MachineFactory<Machine = ScriptedMachine>, Probe) {
    let probe = Probe::default();
    let shared = probe.clone();
    let factory = move |_: &str| ScriptedMachine::new(ops.clone(), shared.clone());
    (factory, probe)
}

/// Factory whose machines fail to load with `message`.
pub fn failing_factory(message: &'static str) -> impl MachineFactory<Machine = ScriptedMachine> {
    move |_: &str| ScriptedMachine::new(vec![Op::Nop], Probe::default()).with_load_fault(message)
}

/// A bare session, outside of any stepper.
pub fn session_with(ops: Vec<Op>) -> (Session<ScriptedMachine>, Probe) {
    let (factory, probe) = factory(ops);
    let (publisher, _events) = Publisher::new();
    let session = Session::create(
        SessionId(1),
        &factory,
        "INPP",
        &StepperConfig::default(),
        publisher,
    )
    .expect("scripted machine should start");
    (session, probe)
}

/// A stepper with one session already created.
pub fn stepper_with(
    ops: Vec<Op>,
) -> (
    Stepper<impl MachineFactory<Machine = ScriptedMachine>>,
    StepperEvents,
    Probe,
) {
    let (factory, probe) = factory(ops);
    let (stepper, events) = Stepper::new(factory, StepperConfig::default());
    stepper
        .create_session("INPP\nPARA")
        .expect("scripted machine should start");
    (stepper, events, probe)
}

/// Everything emitted so far.
pub fn drain(events: &mut StepperEvents) -> Vec<StepperEvent> {
    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    seen
}

pub fn nops(count: usize) -> Vec<Op> {
    vec![Op::Nop; count]
}
