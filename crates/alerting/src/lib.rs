//! Alerting and Event Dispatch
//!
//! Decouples the synchronous tick loop from slow collaborators (session
//! logger, challenge UI). Events are handed off through a bounded queue
//! drained by a background consumer, so a blocked popup can never stall
//! real-time signal fusion. Challenge triggers are coalesced to bound the
//! number of outstanding prompts.

mod challenge;
mod dispatch;

pub use challenge::{score_for_attempt, ChallengeLauncher, ChallengeTrigger};
pub use dispatch::{Dispatcher, EventSink};

use thiserror::Error;

/// Dispatch error types
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Event queue full")]
    QueueFull,

    #[error("Event queue closed")]
    QueueClosed,

    #[error("Sink failure: {0}")]
    Sink(String),

    #[error("Challenge launch failed: {0}")]
    Launch(String),
}
