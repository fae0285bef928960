//! Notifications published to observers

use crate::projector::ViewModel;
use crate::run_loop::StopReason;
use crate::session::SessionId;
use mepa_types::Cell;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

/// Notable transitions of the live session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepperEvent {
    SessionStarted(SessionId),
    SessionTerminated(SessionId),
    /// The program printed a value
    Output(Cell),
    /// A read instruction is waiting on the input gate
    AwaitingInput,
    /// Emitted once per session
    Fault(String),
    RunLoopStarted,
    RunLoopStopped(StopReason),
}

/// Receiving end of the event stream.
pub type StepperEvents = mpsc::UnboundedReceiver<StepperEvent>;

/// Publishes view models and events. Shared by every session of a stepper.
#[derive(Clone)]
pub(crate) struct Publisher {
    view: Arc<watch::Sender<ViewModel>>,
    events: mpsc::UnboundedSender<StepperEvent>,
}

impl Publisher {
    pub(crate) fn new() -> (Self, StepperEvents) {
        let (view, _) = watch::channel(ViewModel::default());
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                view: Arc::new(view),
                events,
            },
            receiver,
        )
    }

    pub(crate) fn emit(&self, event: StepperEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    pub(crate) fn publish(&self, view: ViewModel) {
        self.view.send_replace(view);
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.view.subscribe()
    }

    pub(crate) fn latest(&self) -> ViewModel {
        self.view.borrow().clone()
    }
}
