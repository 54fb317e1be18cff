//! Fixed emotion and gesture vocabularies.
//!
//! Both tables are built once and never mutated. Order is insertion order and
//! only matters as the candidate list for random selection.

use std::sync::OnceLock;

use serde::Serialize;

use super::DetectionError;

/// Gesture bands reach this far below the base confidence.
pub const GESTURE_JITTER_BELOW: f64 = 0.10;
/// Gesture bands reach this far above the base confidence.
pub const GESTURE_JITTER_ABOVE: f64 = 0.05;

/// One candidate outcome with its confidence band.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionOutcome {
    pub label: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    /// Present for gestures only.
    pub meaning: Option<&'static str>,
    pub confidence_low: f64,
    pub confidence_high: f64,
}

impl DetectionOutcome {
    pub fn contains(&self, confidence: f64) -> bool {
        (self.confidence_low..=self.confidence_high).contains(&confidence)
    }
}

static EMOTIONS: [DetectionOutcome; 7] = [
    emotion("Happy", "😊", "Smiling face with raised cheeks", 0.80, 0.95),
    emotion("Sad", "😢", "Downturned mouth and lowered gaze", 0.70, 0.88),
    emotion("Angry", "😠", "Furrowed brows and tightened lips", 0.75, 0.92),
    emotion("Surprised", "😲", "Raised eyebrows and open mouth", 0.72, 0.90),
    emotion("Neutral", "😐", "Relaxed face with no strong expression", 0.65, 0.85),
    emotion("Disgust", "🤢", "Wrinkled nose and raised upper lip", 0.60, 0.80),
    emotion("Fear", "😨", "Widened eyes and stretched lips", 0.62, 0.82),
];

struct GestureSeed {
    label: &'static str,
    emoji: &'static str,
    description: &'static str,
    meaning: &'static str,
    base_confidence: f64,
}

const GESTURE_SEEDS: [GestureSeed; 8] = [
    GestureSeed {
        label: "Hello",
        emoji: "👋",
        description: "Open palm waved side to side",
        meaning: "a greeting",
        base_confidence: 0.87,
    },
    GestureSeed {
        label: "Thank You",
        emoji: "🙏",
        description: "Flat hand moved forward from the chin",
        meaning: "gratitude",
        base_confidence: 0.79,
    },
    GestureSeed {
        label: "I Love You",
        emoji: "🤟",
        description: "Thumb, index and little finger extended",
        meaning: "affection",
        base_confidence: 0.85,
    },
    GestureSeed {
        label: "Yes",
        emoji: "👍",
        description: "Closed fist nodded up and down",
        meaning: "agreement",
        base_confidence: 0.83,
    },
    GestureSeed {
        label: "No",
        emoji: "👎",
        description: "Index and middle finger snapped onto the thumb",
        meaning: "disagreement",
        base_confidence: 0.88,
    },
    GestureSeed {
        label: "Please",
        emoji: "🤲",
        description: "Flat hand circled on the chest",
        meaning: "a polite request",
        base_confidence: 0.80,
    },
    GestureSeed {
        label: "Help",
        emoji: "🆘",
        description: "Fist resting on an open palm, raised together",
        meaning: "a request for assistance",
        base_confidence: 0.78,
    },
    GestureSeed {
        label: "Stop",
        emoji: "✋",
        description: "Edge of one hand chopped onto the other palm",
        meaning: "an instruction to halt",
        base_confidence: 0.90,
    },
];

const fn emotion(
    label: &'static str,
    emoji: &'static str,
    description: &'static str,
    confidence_low: f64,
    confidence_high: f64,
) -> DetectionOutcome {
    DetectionOutcome {
        label,
        emoji,
        description,
        meaning: None,
        confidence_low,
        confidence_high,
    }
}

/// `[base - 0.10, base + 0.05]`, clamped to `[0, 1]`.
pub fn gesture_band(base_confidence: f64) -> (f64, f64) {
    (
        (base_confidence - GESTURE_JITTER_BELOW).clamp(0.0, 1.0),
        (base_confidence + GESTURE_JITTER_ABOVE).clamp(0.0, 1.0),
    )
}

pub fn emotions() -> &'static [DetectionOutcome] {
    &EMOTIONS
}

pub fn gestures() -> &'static [DetectionOutcome] {
    static GESTURES: OnceLock<Vec<DetectionOutcome>> = OnceLock::new();
    GESTURES.get_or_init(|| {
        GESTURE_SEEDS
            .iter()
            .map(|seed| {
                let (confidence_low, confidence_high) = gesture_band(seed.base_confidence);
                DetectionOutcome {
                    label: seed.label,
                    emoji: seed.emoji,
                    description: seed.description,
                    meaning: Some(seed.meaning),
                    confidence_low,
                    confidence_high,
                }
            })
            .collect()
    })
}

pub fn find_emotion(label: &str) -> Option<&'static DetectionOutcome> {
    emotions().iter().find(|outcome| outcome.label == label)
}

pub fn find_gesture(label: &str) -> Option<&'static DetectionOutcome> {
    gestures().iter().find(|outcome| outcome.label == label)
}

/// Checks a table is non-empty and every band satisfies `0 <= low <= high <= 1`.
pub fn validate_table(
    table: &'static str,
    outcomes: &[DetectionOutcome],
) -> Result<(), DetectionError> {
    if outcomes.is_empty() {
        return Err(DetectionError::configuration(table, "table is empty"));
    }

    for outcome in outcomes {
        let ordered = 0.0 <= outcome.confidence_low
            && outcome.confidence_low <= outcome.confidence_high
            && outcome.confidence_high <= 1.0;
        if !ordered {
            return Err(DetectionError::configuration(
                table,
                format!(
                    "'{}' has band [{}, {}]",
                    outcome.label, outcome.confidence_low, outcome.confidence_high
                ),
            ));
        }
    }

    Ok(())
}
