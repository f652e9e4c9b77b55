//! Distraction channels and engine events

use serde::{Deserialize, Serialize};

/// Cause of a distraction verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionChannel {
    /// Iris displaced from the central band of the eye aperture
    Eye,
    /// Ear heights diverging beyond the tilt threshold
    HeadTilt,
    /// Debounced gaze-angle classification
    Gaze,
    /// No face observed for longer than the idle timeout
    Idle,
}

impl DistractionChannel {
    /// Default precedence when several channels are active at once.
    /// Idle pre-empts all; debounced gaze outranks the raw per-frame
    /// eye and head signals.
    pub const DEFAULT_PRIORITY: [Self; 4] = [Self::Idle, Self::Gaze, Self::Eye, Self::HeadTilt];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eye => "eye",
            Self::HeadTilt => "head_tilt",
            Self::Gaze => "gaze",
            Self::Idle => "idle",
        }
    }
}

/// One-shot event emitted on a state transition. Transient: produced,
/// forwarded to collaborators, discarded - the engine never retains one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngagementEvent {
    /// A distraction channel became active this tick
    Distraction {
        channel: DistractionChannel,
        at_s: f64,
    },
    /// The subject crossed the idle timeout this tick
    Idle { at_s: f64 },
    /// Accumulated distracted time crossed the window budget this tick
    Alert { at_s: f64, distracted_s: f64 },
}

impl EngagementEvent {
    /// Tick timestamp the event was emitted at (session-relative seconds)
    pub fn at_s(&self) -> f64 {
        match self {
            Self::Distraction { at_s, .. } | Self::Idle { at_s } | Self::Alert { at_s, .. } => {
                *at_s
            }
        }
    }

    /// Stable label used by the session log
    pub fn label(&self) -> &'static str {
        match self {
            Self::Distraction { channel, .. } => channel.as_str(),
            Self::Idle { .. } => "idle",
            Self::Alert { .. } => "alert",
        }
    }

    /// Channel the event attributes, where one applies
    pub fn channel(&self) -> Option<DistractionChannel> {
        match self {
            Self::Distraction { channel, .. } => Some(*channel),
            Self::Idle { .. } => Some(DistractionChannel::Idle),
            Self::Alert { .. } => None,
        }
    }
}
