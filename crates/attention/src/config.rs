//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::event::DistractionChannel;
use crate::EngineError;

/// Thresholds for the stateless per-frame detectors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Lower bound of the central iris band (ratio of eye aperture)
    pub eye_band_low: f32,

    /// Upper bound of the central iris band
    pub eye_band_high: f32,

    /// Ear-height difference for head tilt (pixels; resolution-dependent)
    pub tilt_threshold_px: f32,

    /// Absolute yaw beyond which gaze counts as distracted (degrees)
    pub yaw_thresh_deg: f32,

    /// Pitch above which gaze counts as looking up (degrees)
    pub up_thresh_deg: f32,

    /// Pitch below the negated value counts as looking down (degrees)
    pub down_thresh_deg: f32,

    /// Nose offset from the eye midpoint for the coarse fallback (pixels)
    pub nose_offset_px: f32,

    /// Fold the nose-offset fallback into the eye channel, for extractors
    /// without iris refinement
    pub use_nose_fallback: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            eye_band_low: 0.3,
            eye_band_high: 0.7,
            tilt_threshold_px: 40.0,
            yaw_thresh_deg: 5.0,
            up_thresh_deg: 1.5,
            down_thresh_deg: 3.0,
            nose_offset_px: 40.0,
            use_nose_fallback: false,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-frame detector thresholds
    pub detector: DetectorConfig,

    /// Consecutive gaze votes required to flip the debounced gaze state
    pub gaze_required: u32,

    /// Seconds without a face before the subject counts as idle
    pub idle_timeout_s: f64,

    /// Trailing window over which distracted time is accumulated (seconds)
    pub window_s: f64,

    /// Distracted seconds within the window that raise an alert
    pub alert_budget_s: f64,

    /// Channel precedence when several are active at once; first active
    /// entry wins the primary slot
    pub channel_priority: Vec<DistractionChannel>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            gaze_required: 3,
            idle_timeout_s: 5.0,
            window_s: 60.0,
            alert_budget_s: 50.0,
            channel_priority: DistractionChannel::DEFAULT_PRIORITY.to_vec(),
        }
    }
}

impl EngineConfig {
    /// Create strict config (lower thresholds, faster escalation)
    pub fn strict() -> Self {
        Self {
            gaze_required: 2,
            idle_timeout_s: 3.0,
            alert_budget_s: 40.0,
            detector: DetectorConfig {
                tilt_threshold_px: 30.0,
                yaw_thresh_deg: 4.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Create lenient config (higher thresholds, slower escalation)
    pub fn lenient() -> Self {
        Self {
            gaze_required: 5,
            idle_timeout_s: 8.0,
            alert_budget_s: 55.0,
            detector: DetectorConfig {
                tilt_threshold_px: 55.0,
                yaw_thresh_deg: 8.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Load configuration from a file (TOML/YAML/JSON by extension),
    /// falling back to defaults for missing keys
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let loaded: Self = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Validate invariants the engine relies on
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.gaze_required == 0 {
            return Err(EngineError::Config("gaze_required must be >= 1".into()));
        }
        if self.idle_timeout_s <= 0.0 {
            return Err(EngineError::Config("idle_timeout_s must be positive".into()));
        }
        if self.window_s <= 0.0 {
            return Err(EngineError::Config("window_s must be positive".into()));
        }
        if self.alert_budget_s <= 0.0 || self.alert_budget_s > self.window_s {
            return Err(EngineError::Config(
                "alert_budget_s must be in (0, window_s]".into(),
            ));
        }
        let d = &self.detector;
        if !(0.0..1.0).contains(&d.eye_band_low) || d.eye_band_high <= d.eye_band_low
            || d.eye_band_high > 1.0
        {
            return Err(EngineError::Config(
                "eye band must satisfy 0 <= low < high <= 1".into(),
            ));
        }
        if self.channel_priority.is_empty() {
            return Err(EngineError::Config("channel_priority must not be empty".into()));
        }
        Ok(())
    }
}
