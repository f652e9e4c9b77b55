//! Stateless per-frame distraction detectors
//!
//! Pure functions from one observation to a boolean classification per
//! channel. All temporal smoothing lives upstream in the engine; nothing
//! here holds state, so every detector is unit-testable on synthetic
//! landmark fixtures.

use face_signals::{EyeLandmarks, FaceObservation, GazeEstimate};

use crate::config::DetectorConfig;

/// Guard for zero-width eye apertures
const APERTURE_EPSILON: f32 = 1e-6;

/// Iris position within the eye aperture as (x_ratio, y_ratio), each in
/// [0, 1] when the iris lies inside the aperture.
fn iris_ratios(eye: &EyeLandmarks) -> (f32, f32) {
    let (left, right) = eye.horizontal_extent();
    let (top, bottom) = eye.vertical_extent();
    let x_ratio = (eye.iris.x - left) / (right - left).max(APERTURE_EPSILON);
    let y_ratio = (eye.iris.y - top) / (bottom - top).max(APERTURE_EPSILON);
    (x_ratio, y_ratio)
}

/// True when the ratio falls strictly outside the central band; the band
/// edges themselves still count as focused.
fn outside_band(ratio: f32, low: f32, high: f32) -> bool {
    ratio < low || ratio > high
}

/// Iris displaced past the central band of either eye's aperture, in
/// either axis.
pub fn eye_position_distracted(obs: &FaceObservation, cfg: &DetectorConfig) -> bool {
    [&obs.left_eye, &obs.right_eye].into_iter().any(|eye| {
        let (x_ratio, y_ratio) = iris_ratios(eye);
        outside_band(x_ratio, cfg.eye_band_low, cfg.eye_band_high)
            || outside_band(y_ratio, cfg.eye_band_low, cfg.eye_band_high)
    })
}

/// Ear heights diverging beyond the pixel threshold. The threshold lives
/// in pixel space, so it scales with the configured frame height.
pub fn head_tilt_distracted(obs: &FaceObservation, cfg: &DetectorConfig) -> bool {
    let (_, left_y) = obs.left_ear.to_pixels(obs.frame_width, obs.frame_height);
    let (_, right_y) = obs.right_ear.to_pixels(obs.frame_width, obs.frame_height);
    (left_y - right_y).abs() > cfg.tilt_threshold_px
}

/// Raw per-frame gaze classification, before debouncing: yaw past the
/// lateral threshold, or pitch outside the asymmetric up/down range.
pub fn raw_gaze_distracted(gaze: GazeEstimate, cfg: &DetectorConfig) -> bool {
    gaze.yaw_deg.abs() > cfg.yaw_thresh_deg
        || gaze.pitch_deg > cfg.up_thresh_deg
        || gaze.pitch_deg < -cfg.down_thresh_deg
}

/// Coarse fallback for extractors without iris refinement: nose tip
/// displaced from the midpoint between the outer eye corners.
pub fn nose_offset_distracted(obs: &FaceObservation, cfg: &DetectorConfig) -> bool {
    let (nose_x, _) = obs.nose.to_pixels(obs.frame_width, obs.frame_height);
    let (left_x, _) = obs.left_eye.outer.to_pixels(obs.frame_width, obs.frame_height);
    let (right_x, _) = obs.right_eye.outer.to_pixels(obs.frame_width, obs.frame_height);
    let center_x = (left_x + right_x) / 2.0;
    (nose_x - center_x).abs() >= cfg.nose_offset_px
}
