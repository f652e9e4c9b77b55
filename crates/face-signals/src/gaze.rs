//! Gaze estimate produced by the external regression model

use serde::{Deserialize, Serialize};

/// Gaze direction estimate in degrees, regressed from a face crop.
///
/// Positive yaw is gaze toward the subject's left; positive pitch is gaze
/// upward. When the face crop is degenerate the estimator contract is to
/// return [`GazeEstimate::NEUTRAL`] rather than fail the tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GazeEstimate {
    pub yaw_deg: f32,
    pub pitch_deg: f32,
}

impl GazeEstimate {
    /// Straight-ahead gaze, the fallback for degenerate face crops
    pub const NEUTRAL: Self = Self {
        yaw_deg: 0.0,
        pitch_deg: 0.0,
    };

    pub fn new(yaw_deg: f32, pitch_deg: f32) -> Self {
        Self { yaw_deg, pitch_deg }
    }

    pub fn is_neutral(&self) -> bool {
        self.yaw_deg == 0.0 && self.pitch_deg == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neutral() {
        assert!(GazeEstimate::NEUTRAL.is_neutral());
        assert!(GazeEstimate::default().is_neutral());
        assert!(!GazeEstimate::new(6.0, 0.0).is_neutral());
    }
}
