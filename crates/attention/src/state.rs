//! Session-scoped engagement state

use crate::config::EngineConfig;
use crate::debounce::GazeDebouncer;
use crate::idle::IdleTracker;
use crate::window::RollingDistractionWindow;

/// Latched boolean reporting its inactive-to-active edge, so sustained
/// conditions emit exactly one event per transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeFlag {
    active: bool,
}

impl EdgeFlag {
    /// Store the current activity, returning true only on a rising edge
    pub fn update(&mut self, active: bool) -> bool {
        let rose = active && !self.active;
        self.active = active;
        rose
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Previous-tick activity for the channels whose detectors are stateless.
/// The gaze channel needs no slot here: its memory is the debouncer,
/// which reports its own rising edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelActivity {
    pub eye: EdgeFlag,
    pub head_tilt: EdgeFlag,
    pub idle: EdgeFlag,
}

/// All state the engine mutates over a session: created at camera-open,
/// updated once per processed frame, discarded at camera-close. Owns no
/// external resources and is never shared between ticks.
#[derive(Debug, Clone)]
pub struct EngagementState {
    /// Hysteresis filter over the raw gaze classification
    pub gaze: GazeDebouncer,
    /// Elapsed-absence tracker
    pub idle: IdleTracker,
    /// Trailing distraction budget
    pub window: RollingDistractionWindow,
    /// Edge tracking for event emission
    pub activity: ChannelActivity,
    /// Edge tracking for the window alert
    pub alert: EdgeFlag,
}

impl EngagementState {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            gaze: GazeDebouncer::new(config.gaze_required),
            idle: IdleTracker::new(config.idle_timeout_s),
            window: RollingDistractionWindow::new(config.window_s, config.alert_budget_s),
            activity: ChannelActivity::default(),
            alert: EdgeFlag::default(),
        }
    }
}
