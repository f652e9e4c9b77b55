//! Per-tick verdict returned to the caller

use serde::{Deserialize, Serialize};

use crate::event::{DistractionChannel, EngagementEvent};

/// Complete verdict for one processed frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameVerdict {
    /// Whether a face was observed this tick
    pub face_detected: bool,

    /// Iris outside the central aperture band
    pub eye_distracted: bool,

    /// Ear heights past the tilt threshold
    pub head_tilt_distracted: bool,

    /// Debounced gaze state (stable across single-frame noise)
    pub gaze_distracted: bool,

    /// Face absent longer than the idle timeout
    pub idle: bool,

    /// Aggregate verdict across all channels
    pub distracted: bool,

    /// Highest-priority active channel, for display and logging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<DistractionChannel>,

    /// Distracted seconds inside the trailing window
    pub rolling_distracted_s: f64,

    /// Window budget currently exceeded
    pub alert: bool,

    /// One-shot events produced by this tick's transitions
    pub events: Vec<EngagementEvent>,
}

impl FrameVerdict {
    pub fn is_engaged(&self) -> bool {
        !self.distracted
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }
}
