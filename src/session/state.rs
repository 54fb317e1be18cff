use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{AnalysisPair, DetectionResult, HistoryEntry};

/// Everything one user session remembers: an append-only history log and the
/// pair currently on screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub id: String,
    pub created_at: DateTime<Utc>,
    history: Vec<HistoryEntry>,
    current: Option<AnalysisPair>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    pub fn with_id(id: String) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            history: Vec::new(),
            current: None,
        }
    }

    /// Appends a history entry stamped now.
    pub fn record(&mut self, emotion: &DetectionResult, gesture: &DetectionResult) -> &HistoryEntry {
        self.history
            .push(HistoryEntry::from_results(emotion, gesture, Utc::now()));
        &self.history[self.history.len() - 1]
    }

    /// Last `n` entries, most recent first.
    pub fn recent(&self, n: usize) -> Vec<HistoryEntry> {
        self.history.iter().rev().take(n).cloned().collect()
    }

    pub fn current(&self) -> Option<&AnalysisPair> {
        self.current.as_ref()
    }

    pub fn set_current(&mut self, emotion: DetectionResult, gesture: DetectionResult) {
        self.current = Some(AnalysisPair::new(emotion, gesture));
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Forgets history and the current pair; the id is kept.
    pub fn clear(&mut self) {
        self.history.clear();
        self.current = None;
    }
}
