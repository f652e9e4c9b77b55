//! Session Log
//!
//! Persists one record per tracking session: start/end timestamps, the
//! ordered distraction entries, and the cumulative engagement points.
//! Entries accumulate in memory and the record is written as a single
//! JSON file at session end.

mod logger;
mod record;

pub use logger::{SessionLogger, SharedLogger};
pub use record::{DistractionEntry, SessionRecord};

use thiserror::Error;

/// Session log errors
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Lock error: {0}")]
    Lock(String),
}
