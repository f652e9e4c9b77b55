//! Distraction Classification Engine
//!
//! Fuses several noisy, independently-unreliable per-frame facial signals
//! into a stable, temporally-smoothed engagement verdict:
//! - Stateless eye-position and head-tilt classification
//! - Gaze distraction debounced with asymmetric hysteresis
//! - Idle detection from face absence
//! - Rolling distraction budget over a trailing window
//!
//! The engine consumes already-computed geometric signals; it never reads
//! pixels, runs inference, performs I/O, or blocks a tick. Events are
//! emitted exactly once per state transition and handed to the caller for
//! forwarding.

pub mod analysis;
pub mod config;
pub mod debounce;
pub mod detector;
pub mod event;
pub mod idle;
pub mod state;
pub mod window;

pub use analysis::FrameVerdict;
pub use config::{DetectorConfig, EngineConfig};
pub use debounce::GazeDebouncer;
pub use event::{DistractionChannel, EngagementEvent};
pub use idle::IdleTracker;
pub use state::EngagementState;
pub use window::{RollingDistractionWindow, WindowSample};

use face_signals::{FaceObservation, GazeEstimate};
use thiserror::Error;
use tracing::{debug, info};

/// Engine error types
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// One tick's inputs, assembled by the driver from the external extractors
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Session-relative timestamp of this tick (seconds)
    pub now_s: f64,

    /// Interval since the previous tick (seconds)
    pub dt_s: f64,

    /// Landmark observation; absent when no face was detected
    pub observation: Option<FaceObservation>,

    /// Gaze estimate for the observed face. The estimator contract is to
    /// produce [`GazeEstimate::NEUTRAL`] for a degenerate face crop, so a
    /// missing estimate is treated the same way.
    pub gaze: Option<GazeEstimate>,
}

/// The composition root: one owned [`EngagementState`] threaded through a
/// synchronous per-tick call, one verdict and event list out per tick.
pub struct EngagementEngine {
    config: EngineConfig,
    state: EngagementState,
}

impl EngagementEngine {
    /// Create an engine for a fresh session
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        info!(
            gaze_required = config.gaze_required,
            idle_timeout_s = config.idle_timeout_s,
            window_s = config.window_s,
            alert_budget_s = config.alert_budget_s,
            "creating engagement engine"
        );
        Ok(Self {
            state: EngagementState::new(&config),
            config,
        })
    }

    /// Process one tick. Always completes: an absent face or a degenerate
    /// crop is a normal state, not an error.
    pub fn tick(&mut self, input: &TickInput) -> FrameVerdict {
        let face_present = input.observation.is_some();
        let mut events = Vec::new();

        // Idle is defined purely by elapsed face absence
        self.state.idle.observe(face_present, input.now_s);
        let idle = self.state.idle.is_idle(input.now_s);
        if self.state.activity.idle.update(idle) {
            events.push(EngagementEvent::Idle { at_s: input.now_s });
        }

        // Per-frame channels exist only while a face is observed; without
        // one the debouncer holds its latched state untouched.
        let (eye, head_tilt, gaze_started) = match &input.observation {
            Some(obs) => {
                let mut eye = detector::eye_position_distracted(obs, &self.config.detector);
                if self.config.detector.use_nose_fallback {
                    eye = eye || detector::nose_offset_distracted(obs, &self.config.detector);
                }
                let head_tilt = detector::head_tilt_distracted(obs, &self.config.detector);
                let raw = detector::raw_gaze_distracted(
                    input.gaze.unwrap_or(GazeEstimate::NEUTRAL),
                    &self.config.detector,
                );
                (eye, head_tilt, self.state.gaze.update(raw))
            }
            None => (false, false, false),
        };
        let gaze = face_present && self.state.gaze.is_distracted();

        if gaze_started {
            events.push(EngagementEvent::Distraction {
                channel: DistractionChannel::Gaze,
                at_s: input.now_s,
            });
        }
        if self.state.activity.eye.update(eye) {
            events.push(EngagementEvent::Distraction {
                channel: DistractionChannel::Eye,
                at_s: input.now_s,
            });
        }
        if self.state.activity.head_tilt.update(head_tilt) {
            events.push(EngagementEvent::Distraction {
                channel: DistractionChannel::HeadTilt,
                at_s: input.now_s,
            });
        }

        let distracted = if face_present {
            gaze || eye || head_tilt || idle
        } else {
            idle
        };

        let sample = self
            .state
            .window
            .update(input.now_s, input.dt_s, distracted);
        if self.state.alert.update(sample.alert) {
            debug!(rolling_s = sample.rolling_s, "distraction budget exceeded");
            events.push(EngagementEvent::Alert {
                at_s: input.now_s,
                distracted_s: sample.rolling_s,
            });
        }

        FrameVerdict {
            face_detected: face_present,
            eye_distracted: eye,
            head_tilt_distracted: head_tilt,
            gaze_distracted: gaze,
            idle,
            distracted,
            primary: self.primary_channel(idle, gaze, eye, head_tilt),
            rolling_distracted_s: sample.rolling_s,
            alert: sample.alert,
            events,
        }
    }

    /// First active channel in the configured precedence order
    fn primary_channel(
        &self,
        idle: bool,
        gaze: bool,
        eye: bool,
        head_tilt: bool,
    ) -> Option<DistractionChannel> {
        self.config
            .channel_priority
            .iter()
            .copied()
            .find(|channel| match channel {
                DistractionChannel::Idle => idle,
                DistractionChannel::Gaze => gaze,
                DistractionChannel::Eye => eye,
                DistractionChannel::HeadTilt => head_tilt,
            })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &EngagementState {
        &self.state
    }

    /// Re-arm a fresh session (subject change, camera reopen)
    pub fn reset_state(&mut self) {
        self.state = EngagementState::new(&self.config);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_signals::{EyeLandmarks, FaceBox, Point};

    fn centered_eye() -> EyeLandmarks {
        EyeLandmarks {
            iris: Point::new(0.5, 0.5),
            inner: Point::new(0.0, 0.5),
            outer: Point::new(1.0, 0.5),
            top: Point::new(0.5, 0.0),
            bottom: Point::new(0.5, 1.0),
        }
    }

    /// Observation that trips no per-frame detector
    fn focused_observation() -> FaceObservation {
        FaceObservation {
            left_eye: centered_eye(),
            right_eye: centered_eye(),
            left_ear: Point::new(0.2, 0.5),
            right_ear: Point::new(0.8, 0.5),
            nose: Point::new(0.5, 0.6),
            bbox: FaceBox {
                x: 0.1,
                y: 0.1,
                width: 0.8,
                height: 0.8,
            },
            frame_width: 640,
            frame_height: 480,
        }
    }

    fn tick_at(now_s: f64, gaze: Option<GazeEstimate>) -> TickInput {
        TickInput {
            now_s,
            dt_s: 1.0,
            observation: Some(focused_observation()),
            gaze,
        }
    }

    fn faceless_tick_at(now_s: f64) -> TickInput {
        TickInput {
            now_s,
            dt_s: 1.0,
            observation: None,
            gaze: None,
        }
    }

    fn engine() -> EngagementEngine {
        EngagementEngine::new(EngineConfig::default()).unwrap()
    }

    fn gaze_events(verdicts: &[FrameVerdict]) -> Vec<f64> {
        verdicts
            .iter()
            .flat_map(|v| v.events.iter())
            .filter_map(|e| match e {
                EngagementEvent::Distraction {
                    channel: DistractionChannel::Gaze,
                    at_s,
                } => Some(*at_s),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_focused_subject_produces_no_events() {
        let mut engine = engine();
        for t in 1..=20 {
            let verdict = engine.tick(&tick_at(t as f64, Some(GazeEstimate::NEUTRAL)));
            assert!(verdict.is_engaged());
            assert!(!verdict.has_events());
            assert_eq!(verdict.primary, None);
        }
    }

    #[test]
    fn test_gaze_event_fires_on_third_tick_exactly_once() {
        let mut engine = engine();
        let away = Some(GazeEstimate::new(12.0, 0.0));
        let verdicts: Vec<_> = (1..=10)
            .map(|t| engine.tick(&tick_at(t as f64, away)))
            .collect();

        assert!(!verdicts[0].gaze_distracted);
        assert!(!verdicts[1].gaze_distracted);
        assert!(verdicts[2].gaze_distracted, "flips on the third vote");
        assert!(verdicts[9].gaze_distracted, "stays latched while sustained");
        assert_eq!(gaze_events(&verdicts), vec![3.0], "one event, at tick 3");
        assert_eq!(verdicts[2].primary, Some(DistractionChannel::Gaze));
    }

    #[test]
    fn test_single_focused_frame_does_not_clear_gaze() {
        let mut engine = engine();
        let away = Some(GazeEstimate::new(12.0, 0.0));
        for t in 1..=3 {
            engine.tick(&tick_at(t as f64, away));
        }
        let verdict = engine.tick(&tick_at(4.0, Some(GazeEstimate::NEUTRAL)));
        assert!(verdict.gaze_distracted);

        // Two more focused frames decrement to zero and clear
        engine.tick(&tick_at(5.0, Some(GazeEstimate::NEUTRAL)));
        let verdict = engine.tick(&tick_at(6.0, Some(GazeEstimate::NEUTRAL)));
        assert!(!verdict.gaze_distracted);
    }

    #[test]
    fn test_idle_event_fires_once_after_timeout() {
        let mut engine = engine();
        let mut idle_events = 0;
        let mut first_idle_tick = None;
        for t in 1..=12 {
            let verdict = engine.tick(&faceless_tick_at(t as f64));
            idle_events += verdict
                .events
                .iter()
                .filter(|e| matches!(e, EngagementEvent::Idle { .. }))
                .count();
            if verdict.idle && first_idle_tick.is_none() {
                first_idle_tick = Some(t);
                assert_eq!(verdict.primary, Some(DistractionChannel::Idle));
                assert!(verdict.distracted);
            }
        }
        // Baseline seeds at t=1; absence exceeds 5s strictly at t=7
        assert_eq!(first_idle_tick, Some(7));
        assert_eq!(idle_events, 1);
    }

    #[test]
    fn test_face_return_clears_idle_immediately() {
        let mut engine = engine();
        for t in 1..=8 {
            engine.tick(&faceless_tick_at(t as f64));
        }
        let verdict = engine.tick(&tick_at(9.0, Some(GazeEstimate::NEUTRAL)));
        assert!(!verdict.idle);
        assert!(verdict.is_engaged());
    }

    #[test]
    fn test_neutral_gaze_from_degenerate_crop_is_not_a_signal() {
        let mut engine = engine();
        // Estimator contract: degenerate crop yields the neutral vector.
        // A missing estimate must behave identically.
        for t in 1..=10 {
            let gaze = if t % 2 == 0 {
                Some(GazeEstimate::NEUTRAL)
            } else {
                None
            };
            let verdict = engine.tick(&tick_at(t as f64, gaze));
            assert!(!verdict.gaze_distracted);
            assert!(verdict.is_engaged());
        }
    }

    #[test]
    fn test_priority_order_selects_primary() {
        let mut engine = engine();
        // Trip eye and head tilt simultaneously
        let mut obs = focused_observation();
        obs.left_eye.iris = Point::new(0.1, 0.5);
        obs.right_ear = Point::new(0.8, 0.7);
        let input = TickInput {
            now_s: 1.0,
            dt_s: 1.0,
            observation: Some(obs.clone()),
            gaze: Some(GazeEstimate::NEUTRAL),
        };
        let verdict = engine.tick(&input);
        assert!(verdict.eye_distracted && verdict.head_tilt_distracted);
        assert_eq!(verdict.primary, Some(DistractionChannel::Eye));

        // The ordering is policy, not hardcoded
        let mut engine = EngagementEngine::new(EngineConfig {
            channel_priority: vec![DistractionChannel::HeadTilt, DistractionChannel::Eye],
            ..Default::default()
        })
        .unwrap();
        let verdict = engine.tick(&input);
        assert_eq!(verdict.primary, Some(DistractionChannel::HeadTilt));
    }

    #[test]
    fn test_sustained_distraction_raises_one_alert() {
        let mut engine = engine();
        let away = Some(GazeEstimate::new(12.0, 0.0));
        let mut alerts = Vec::new();
        for t in 1..=70 {
            let verdict = engine.tick(&tick_at(t as f64, away));
            for event in &verdict.events {
                if let EngagementEvent::Alert { at_s, .. } = event {
                    alerts.push(*at_s);
                }
            }
        }
        assert_eq!(alerts.len(), 1, "alert is edge-triggered");
        // Gaze latches at t=3; accrual starts the following interval and
        // reaches the 50s budget on the tick ending at t=53
        assert_eq!(alerts, vec![53.0]);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let inputs: Vec<TickInput> = (1..=40)
            .map(|t| {
                let now_s = t as f64 * 0.5;
                match t % 7 {
                    0 | 1 => faceless_tick_at(now_s),
                    2 => tick_at(now_s, Some(GazeEstimate::new(9.0, -4.0))),
                    _ => tick_at(now_s, Some(GazeEstimate::NEUTRAL)),
                }
            })
            .collect();

        let mut first = engine();
        let mut second = engine();
        for input in &inputs {
            assert_eq!(first.tick(input), second.tick(input));
        }
    }

    #[test]
    fn test_reset_state_rearms_the_session() {
        let mut engine = engine();
        let away = Some(GazeEstimate::new(12.0, 0.0));
        for t in 1..=10 {
            engine.tick(&tick_at(t as f64, away));
        }
        assert!(engine.state().gaze.is_distracted());

        engine.reset_state();
        assert!(!engine.state().gaze.is_distracted());
        let verdict = engine.tick(&tick_at(11.0, Some(GazeEstimate::NEUTRAL)));
        assert!(verdict.is_engaged());
        assert_eq!(verdict.rolling_distracted_s, 0.0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let result = EngagementEngine::new(EngineConfig {
            gaze_required: 0,
            ..Default::default()
        });
        assert!(matches!(result, Err(EngineError::Config(_))));
    }
}
