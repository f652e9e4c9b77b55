//! Face observation types and frame geometry

use serde::{Deserialize, Serialize};

/// Normalized landmark point ([0, 1] per axis, origin at top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the face plane (extractor-defined scale)
    pub z: f32,
}

impl Point {
    /// Create a 2D landmark (z = 0)
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// De-normalize to pixel coordinates for the given frame size
    pub fn to_pixels(&self, width: u32, height: u32) -> (f32, f32) {
        (self.x * width as f32, self.y * height as f32)
    }
}

/// Named landmarks for one eye: the iris center plus the four aperture
/// boundary points the iris-ratio classifier measures against.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EyeLandmarks {
    /// Iris center
    pub iris: Point,
    /// Inner corner (toward the nose)
    pub inner: Point,
    /// Outer corner (toward the ear)
    pub outer: Point,
    /// Top lid
    pub top: Point,
    /// Bottom lid
    pub bottom: Point,
}

impl EyeLandmarks {
    /// Horizontal aperture extent as (left, right) in normalized x.
    /// Corner order is extractor-dependent, so min/max rather than
    /// trusting inner/outer orientation.
    pub fn horizontal_extent(&self) -> (f32, f32) {
        (
            self.inner.x.min(self.outer.x),
            self.inner.x.max(self.outer.x),
        )
    }

    /// Vertical aperture extent as (top, bottom) in normalized y
    pub fn vertical_extent(&self) -> (f32, f32) {
        (self.top.y.min(self.bottom.y), self.top.y.max(self.bottom.y))
    }
}

/// Normalized face bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceBox {
    /// Compute the box spanning a set of landmark points
    pub fn spanning(points: &[Point]) -> Self {
        if points.is_empty() {
            return Self::default();
        }
        let mut x_min = f32::MAX;
        let mut y_min = f32::MAX;
        let mut x_max = f32::MIN;
        let mut y_max = f32::MIN;
        for p in points {
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }
        Self {
            x: x_min,
            y: y_min,
            width: x_max - x_min,
            height: y_max - y_min,
        }
    }

    /// De-normalize to pixel coordinates as (x, y, w, h)
    pub fn to_pixels(&self, width: u32, height: u32) -> (f32, f32, f32, f32) {
        (
            self.x * width as f32,
            self.y * height as f32,
            self.width * width as f32,
            self.height * height as f32,
        )
    }

    /// A degenerate box (zero or negative extent) cannot be cropped for
    /// gaze regression; callers substitute a neutral estimate.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One tick's facial observation: the named landmark set the detectors
/// consume, plus frame geometry for de-normalization. Produced once per
/// tick by the external landmark extractor; absent entirely when no face
/// was detected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceObservation {
    /// Subject's left eye (frame-right in a mirrored selfie view)
    pub left_eye: EyeLandmarks,
    /// Subject's right eye
    pub right_eye: EyeLandmarks,
    /// Left ear (tragion) approximation
    pub left_ear: Point,
    /// Right ear (tragion) approximation
    pub right_ear: Point,
    /// Nose tip
    pub nose: Point,
    /// Face bounding box in normalized coordinates
    pub bbox: FaceBox,
    /// Source frame width in pixels
    pub frame_width: u32,
    /// Source frame height in pixels
    pub frame_height: u32,
}
