use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DetectionKind {
    Emotion,
    Gesture,
}

/// One labeled, confidence-scored outcome returned to the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub kind: DetectionKind,
    pub label: String,
    pub emoji: String,
    pub confidence: f64,
    pub description: String,
    /// Semantic meaning of a gesture; always `None` for emotions.
    pub meaning: Option<String>,
}

impl DetectionResult {
    /// Label with its emoji, e.g. `"Angry 😠"`.
    pub fn display_label(&self) -> String {
        if self.emoji.is_empty() {
            self.label.clone()
        } else {
            format!("{} {}", self.label, self.emoji)
        }
    }

    /// Confidence rendered as a whole percentage, e.g. `"85%"`.
    pub fn confidence_percent(&self) -> String {
        format!("{:.0}%", self.confidence * 100.0)
    }
}

/// The emotion/gesture pair shown as the "current result".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPair {
    pub emotion: DetectionResult,
    pub gesture: DetectionResult,
}

impl AnalysisPair {
    pub fn new(emotion: DetectionResult, gesture: DetectionResult) -> Self {
        Self { emotion, gesture }
    }
}
