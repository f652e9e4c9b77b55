//! Session record model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One distraction occurrence within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistractionEntry {
    /// Unix epoch seconds
    pub time: f64,
    /// Stable channel label: "eye", "head_tilt", "gaze", "idle", "alert"
    #[serde(rename = "type")]
    pub kind: String,
}

/// Append-only record of a tracking session, written once at session end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    /// Unix epoch seconds
    pub start_time: f64,
    /// Ordered distraction entries, oldest first
    pub distractions: Vec<DistractionEntry>,
    /// Cumulative points earned from re-focus challenges
    pub engagement_points: u64,
    /// Unix epoch seconds; absent until the session ends
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

impl SessionRecord {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            start_time: epoch_seconds(started_at),
            distractions: Vec::new(),
            engagement_points: 0,
            end_time: None,
        }
    }
}

/// Sub-second-precision epoch seconds
fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_serialized_shape_matches_log_format() {
        let started = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let mut record = SessionRecord::new(started);
        record.distractions.push(DistractionEntry {
            time: record.start_time + 12.5,
            kind: "gaze".into(),
        });
        record.engagement_points = 85;
        record.end_time = Some(record.start_time + 60.0);

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert!(json["start_time"].is_f64());
        assert_eq!(json["distractions"][0]["type"], "gaze");
        assert_eq!(json["engagement_points"], 85);
        assert!(json["end_time"].is_f64());
    }

    #[test]
    fn test_open_session_omits_end_time() {
        let record = SessionRecord::new(Utc::now());
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("end_time"));
    }
}
