//! Rolling distraction budget over a trailing time window

use std::collections::VecDeque;
use tracing::warn;

/// Distracted span attributed to the tick interval that just completed.
/// Sub-tick transition boundaries are not modeled; the full `dt` is
/// credited to the interval's end timestamp.
#[derive(Debug, Clone, Copy)]
struct Segment {
    end_s: f64,
    duration_s: f64,
}

/// One tick's window output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSample {
    /// Distracted seconds accumulated over the trailing window
    pub rolling_s: f64,
    /// Running total is at or past the alert budget
    pub alert: bool,
}

/// Sliding-window accumulator answering "has the subject been distracted
/// for at least `budget_s` seconds out of the trailing `window_s`
/// seconds?" incrementally, via append + prune, without re-scanning
/// history.
#[derive(Debug, Clone)]
pub struct RollingDistractionWindow {
    window_s: f64,
    budget_s: f64,
    segments: VecDeque<Segment>,
    rolling_s: f64,
    prev_distracted: bool,
}

impl RollingDistractionWindow {
    pub fn new(window_s: f64, budget_s: f64) -> Self {
        Self {
            window_s,
            budget_s,
            segments: VecDeque::new(),
            rolling_s: 0.0,
            prev_distracted: false,
        }
    }

    /// Advance the window by one tick.
    ///
    /// The *previous* tick's flag decides whether the just-completed
    /// interval counts as distracted time; `currently_distracted` is
    /// stored for the next tick. `dt_s` is clamped to `[0, window_s]` so
    /// a clock anomaly or processing stall can never accumulate negative
    /// or runaway mass.
    pub fn update(&mut self, now_s: f64, dt_s: f64, currently_distracted: bool) -> WindowSample {
        if dt_s < 0.0 || dt_s > self.window_s {
            warn!(dt_s, "anomalous tick interval, clamping");
        }
        let dt = dt_s.clamp(0.0, self.window_s);

        if self.prev_distracted && dt > 0.0 {
            self.segments.push_back(Segment {
                end_s: now_s,
                duration_s: dt,
            });
            self.rolling_s += dt;
        }

        let cutoff = now_s - self.window_s;
        while let Some(front) = self.segments.front() {
            if front.end_s < cutoff {
                self.rolling_s -= front.duration_s;
                self.segments.pop_front();
            } else {
                break;
            }
        }
        if self.segments.is_empty() {
            // Clear float residue left by repeated subtraction
            self.rolling_s = 0.0;
        }

        self.prev_distracted = currently_distracted;
        WindowSample {
            rolling_s: self.rolling_s,
            alert: self.rolling_s >= self.budget_s,
        }
    }

    /// Distracted seconds currently inside the window
    pub fn rolling_seconds(&self) -> f64 {
        self.rolling_s
    }

    pub fn reset(&mut self) {
        self.segments.clear();
        self.rolling_s = 0.0;
        self.prev_distracted = false;
    }
}
