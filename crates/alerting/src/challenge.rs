//! Re-focus challenge triggering with coalescing

use attention::{DistractionChannel, EngagementEvent};
use tracing::{debug, info};

use crate::{DispatchError, EventSink};

/// Launches the out-of-process re-focus challenge UI. Implementations may
/// block; the trigger runs on the dispatcher's consumer task, never on
/// the tick loop.
pub trait ChallengeLauncher: Send {
    fn launch(&mut self, channel: DistractionChannel) -> Result<(), DispatchError>;
}

/// Event sink that converts engine events into challenge launches.
///
/// Overlapping triggers are coalesced: after a launch, further events
/// inside the cooldown window are dropped. This bounds the prompts a
/// distraction storm can spawn to one per cooldown.
pub struct ChallengeTrigger {
    launcher: Box<dyn ChallengeLauncher>,
    cooldown_s: f64,
    last_launched_at: Option<f64>,
}

impl ChallengeTrigger {
    pub const DEFAULT_COOLDOWN_S: f64 = 10.0;

    pub fn new(launcher: Box<dyn ChallengeLauncher>, cooldown_s: f64) -> Self {
        info!(cooldown_s, "creating challenge trigger");
        Self {
            launcher,
            cooldown_s,
            last_launched_at: None,
        }
    }

    fn in_cooldown(&self, at_s: f64) -> bool {
        match self.last_launched_at {
            Some(t) => at_s - t < self.cooldown_s,
            None => false,
        }
    }
}

impl EventSink for ChallengeTrigger {
    fn name(&self) -> &'static str {
        "challenge"
    }

    fn on_event(&mut self, event: &EngagementEvent) -> Result<(), DispatchError> {
        let at_s = event.at_s();
        if self.in_cooldown(at_s) {
            debug!(at_s, "challenge coalesced during cooldown");
            return Ok(());
        }

        // Alerts carry no single channel; attribute them to gaze, the
        // highest-confidence non-idle cause.
        let channel = event.channel().unwrap_or(DistractionChannel::Gaze);
        self.launcher.launch(channel)?;
        self.last_launched_at = Some(at_s);
        Ok(())
    }
}

/// Engagement points awarded for solving the challenge on a given
/// attempt (1-based). Later attempts earn less; floor of 50.
pub fn score_for_attempt(attempt: u32) -> u64 {
    match attempt {
        0 | 1 => 100,
        2 => 85,
        3 => 70,
        _ => 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct CountingLauncher {
        launches: Arc<Mutex<Vec<DistractionChannel>>>,
    }

    impl ChallengeLauncher for CountingLauncher {
        fn launch(&mut self, channel: DistractionChannel) -> Result<(), DispatchError> {
            self.launches.lock().unwrap().push(channel);
            Ok(())
        }
    }

    fn trigger_with_log() -> (ChallengeTrigger, Arc<Mutex<Vec<DistractionChannel>>>) {
        let launches = Arc::new(Mutex::new(Vec::new()));
        let trigger = ChallengeTrigger::new(
            Box::new(CountingLauncher {
                launches: launches.clone(),
            }),
            10.0,
        );
        (trigger, launches)
    }

    fn distraction(channel: DistractionChannel, at_s: f64) -> EngagementEvent {
        EngagementEvent::Distraction { channel, at_s }
    }

    #[test]
    fn test_overlapping_triggers_coalesce() {
        let (mut trigger, launches) = trigger_with_log();
        trigger
            .on_event(&distraction(DistractionChannel::Gaze, 1.0))
            .unwrap();
        trigger
            .on_event(&distraction(DistractionChannel::Eye, 2.0))
            .unwrap();
        trigger
            .on_event(&EngagementEvent::Idle { at_s: 5.0 })
            .unwrap();
        assert_eq!(launches.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_relaunches_after_cooldown() {
        let (mut trigger, launches) = trigger_with_log();
        trigger
            .on_event(&distraction(DistractionChannel::Gaze, 1.0))
            .unwrap();
        trigger
            .on_event(&distraction(DistractionChannel::HeadTilt, 11.0))
            .unwrap();
        let launches = launches.lock().unwrap();
        assert_eq!(
            *launches,
            vec![DistractionChannel::Gaze, DistractionChannel::HeadTilt]
        );
    }

    #[test]
    fn test_alert_launches_and_attributes_to_gaze() {
        let (mut trigger, launches) = trigger_with_log();
        trigger
            .on_event(&EngagementEvent::Alert {
                at_s: 60.0,
                distracted_s: 50.0,
            })
            .unwrap();
        assert_eq!(*launches.lock().unwrap(), vec![DistractionChannel::Gaze]);
    }

    #[test]
    fn test_launch_failure_propagates_to_dispatcher() {
        struct Broken;
        impl ChallengeLauncher for Broken {
            fn launch(&mut self, _channel: DistractionChannel) -> Result<(), DispatchError> {
                Err(DispatchError::Launch("display gone".into()))
            }
        }
        let mut trigger = ChallengeTrigger::new(Box::new(Broken), 10.0);
        assert!(trigger
            .on_event(&distraction(DistractionChannel::Gaze, 1.0))
            .is_err());
        // A failed launch leaves the cooldown unarmed
        assert!(!trigger.in_cooldown(1.5));
    }

    #[test]
    fn test_attempt_scores_decay_to_floor() {
        assert_eq!(score_for_attempt(1), 100);
        assert_eq!(score_for_attempt(2), 85);
        assert_eq!(score_for_attempt(3), 70);
        assert_eq!(score_for_attempt(4), 50);
        assert_eq!(score_for_attempt(12), 50);
    }
}
