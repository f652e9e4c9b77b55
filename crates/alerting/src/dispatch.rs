//! Bounded event queue with a background consumer

use attention::EngagementEvent;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::DispatchError;

/// A collaborator that consumes engine events (session logger, challenge
/// trigger, UI overlay). A failing sink is logged and skipped; it can
/// never abort tick processing or starve the other sinks.
pub trait EventSink: Send {
    /// Short name used in failure logs
    fn name(&self) -> &'static str;

    fn on_event(&mut self, event: &EngagementEvent) -> Result<(), DispatchError>;
}

/// Fire-and-forget handle the tick loop publishes events through
#[derive(Clone)]
pub struct Dispatcher {
    tx: mpsc::Sender<EngagementEvent>,
}

impl Dispatcher {
    /// Spawn the consumer task draining the queue into the given sinks.
    /// Returns the dispatch handle and the consumer's join handle; the
    /// consumer exits once every `Dispatcher` clone is dropped.
    pub fn spawn(
        sinks: Vec<Box<dyn EventSink>>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(capacity.max(1));
        info!(capacity, sinks = sinks.len(), "starting event dispatcher");

        let handle = tokio::spawn(async move {
            let mut sinks = sinks;
            while let Some(event) = rx.recv().await {
                for sink in sinks.iter_mut() {
                    if let Err(e) = sink.on_event(&event) {
                        warn!(sink = sink.name(), error = %e, "event sink failed");
                    }
                }
            }
            debug!("event queue closed, dispatcher exiting");
        });

        (Self { tx }, handle)
    }

    /// Enqueue an event without blocking. A full queue drops the event
    /// with a warning rather than stalling the tick loop.
    pub fn dispatch(&self, event: EngagementEvent) -> Result<(), DispatchError> {
        match self.tx.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                warn!(?dropped, "event queue full, dropping event");
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => Err(DispatchError::QueueClosed),
        }
    }
}
