//! Session logger implementation

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use alerting::{DispatchError, EventSink};
use attention::EngagementEvent;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::record::{DistractionEntry, SessionRecord};
use crate::LogError;

/// Accumulates one session's record in memory and writes it as a single
/// JSON file at session end. Engine timestamps are session-relative
/// seconds; the logger anchors them to the wall clock captured at
/// session start.
pub struct SessionLogger {
    record: SessionRecord,
    path: PathBuf,
}

impl SessionLogger {
    /// Open a logger anchored at the current wall clock
    pub fn create(log_dir: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::create_at(log_dir, Utc::now())
    }

    /// Open a logger anchored at an explicit start time (deterministic
    /// file naming for replays and tests)
    pub fn create_at(log_dir: impl AsRef<Path>, started_at: DateTime<Utc>) -> Result<Self, LogError> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!(
            "session_{}.json",
            started_at.format("%Y-%m-%d_%H-%M-%S")
        ));
        info!(path = %path.display(), "starting session log");
        Ok(Self {
            record: SessionRecord::new(started_at),
            path,
        })
    }

    /// Append one distraction entry at a session-relative timestamp
    pub fn log_distraction(&mut self, kind: &str, at_s: f64) {
        debug!(kind, at_s, "logging distraction");
        self.record.distractions.push(DistractionEntry {
            time: self.record.start_time + at_s,
            kind: kind.to_string(),
        });
    }

    /// Credit engagement points earned from a solved challenge
    pub fn add_points(&mut self, points: u64) {
        self.record.engagement_points += points;
    }

    pub fn record(&self) -> &SessionRecord {
        &self.record
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stamp the end time and write the record to disk
    pub fn end_session(&mut self, ended_at_s: f64) -> Result<(), LogError> {
        self.record.end_time = Some(self.record.start_time + ended_at_s);
        let file = fs::File::create(&self.path)?;
        serde_json::to_writer_pretty(file, &self.record)?;
        info!(
            path = %self.path.display(),
            distractions = self.record.distractions.len(),
            points = self.record.engagement_points,
            "session log written"
        );
        Ok(())
    }
}

impl EventSink for SessionLogger {
    fn name(&self) -> &'static str {
        "session-log"
    }

    fn on_event(&mut self, event: &EngagementEvent) -> Result<(), DispatchError> {
        self.log_distraction(event.label(), event.at_s());
        Ok(())
    }
}

/// Thread-safe handle for a logger that sits behind the dispatcher while
/// the driver keeps access for points and session teardown
#[derive(Clone)]
pub struct SharedLogger {
    inner: Arc<Mutex<SessionLogger>>,
}

impl SharedLogger {
    pub fn new(logger: SessionLogger) -> Self {
        Self {
            inner: Arc::new(Mutex::new(logger)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionLogger>, LogError> {
        self.inner
            .lock()
            .map_err(|e| LogError::Lock(e.to_string()))
    }

    pub fn add_points(&self, points: u64) -> Result<(), LogError> {
        self.lock()?.add_points(points);
        Ok(())
    }

    pub fn snapshot(&self) -> Result<SessionRecord, LogError> {
        Ok(self.lock()?.record().clone())
    }

    pub fn end_session(&self, ended_at_s: f64) -> Result<(), LogError> {
        self.lock()?.end_session(ended_at_s)
    }
}

impl EventSink for SharedLogger {
    fn name(&self) -> &'static str {
        "session-log"
    }

    fn on_event(&mut self, event: &EngagementEvent) -> Result<(), DispatchError> {
        self.lock()
            .map_err(|e| DispatchError::Sink(e.to_string()))?
            .log_distraction(event.label(), event.at_s());
        Ok(())
    }
}
