use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DetectionResult;

/// A completed analysis as it appears in the session history list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub emotion_label: String,
    pub gesture_label: String,
    pub emotion_confidence: f64,
    pub gesture_confidence: f64,
}

impl HistoryEntry {
    pub fn from_results(
        emotion: &DetectionResult,
        gesture: &DetectionResult,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            emotion_label: emotion.label.clone(),
            gesture_label: gesture.label.clone(),
            emotion_confidence: emotion.confidence,
            gesture_confidence: gesture.confidence,
        }
    }
}
