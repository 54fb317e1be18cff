//! Simulated text-to-speech: builds the sentence that would be spoken.

use serde::Serialize;

use crate::models::{AnalysisPair, DetectionResult};

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpeechPreview {
    pub caption: String,
    pub announcement: String,
}

/// `"Analysis complete. Emotion detected: {emotion}. Sign language gesture: {gesture}[, meaning {meaning}]."`
pub fn audio_caption(
    emotion: &DetectionResult,
    gesture: &DetectionResult,
    include_meaning: bool,
) -> String {
    let meaning = match (&gesture.meaning, include_meaning) {
        (Some(meaning), true) => format!(", meaning {meaning}"),
        _ => String::new(),
    };

    format!(
        "Analysis complete. Emotion detected: {}. Sign language gesture: {}{}.",
        emotion.display_label(),
        gesture.display_label(),
        meaning
    )
}

pub fn pair_caption(pair: &AnalysisPair, include_meaning: bool) -> String {
    audio_caption(&pair.emotion, &pair.gesture, include_meaning)
}

/// Stands in for audio playback.
pub fn simulate_speech(caption: &str) -> SpeechPreview {
    let announcement = format!("In the full version, this would say: '{caption}'");
    crate::log_info!("🔊 {}", announcement);
    SpeechPreview {
        caption: caption.to_string(),
        announcement,
    }
}
