//! Idle detection from face absence

/// Tracks elapsed time since a face was last observed and declares idle
/// once it exceeds the timeout. No hysteresis: idle self-corrects the
/// instant a face reappears.
#[derive(Debug, Clone)]
pub struct IdleTracker {
    timeout_s: f64,
    /// None until the first tick seeds the session baseline, so the
    /// tracker never has to read a clock of its own.
    last_active_at: Option<f64>,
}

impl IdleTracker {
    pub fn new(timeout_s: f64) -> Self {
        Self {
            timeout_s,
            last_active_at: None,
        }
    }

    /// Record one tick's face presence. A session that opens with no face
    /// is measured from its first tick.
    pub fn observe(&mut self, face_present: bool, now_s: f64) {
        if face_present {
            self.last_active_at = Some(now_s);
        } else if self.last_active_at.is_none() {
            self.last_active_at = Some(now_s);
        }
    }

    /// True once the time since the last observed face exceeds the timeout
    pub fn is_idle(&self, now_s: f64) -> bool {
        match self.last_active_at {
            Some(t) => now_s - t > self.timeout_s,
            None => false,
        }
    }

    pub fn reset(&mut self) {
        self.last_active_at = None;
    }
}
