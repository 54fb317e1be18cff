//! Fixed demo scenarios for trying the assistant without an upload.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::detection::detector::{fixed_result, lookup};
use crate::detection::{tables, DetectionError};
use crate::models::{AnalysisPair, DetectionKind};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum DemoScenario {
    HappyHello,
    SurprisedThankYou,
    NeutralYes,
    AngryNo,
}

impl DemoScenario {
    pub const ALL: [DemoScenario; 4] = [
        DemoScenario::HappyHello,
        DemoScenario::SurprisedThankYou,
        DemoScenario::NeutralYes,
        DemoScenario::AngryNo,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            DemoScenario::HappyHello => "happy-hello",
            DemoScenario::SurprisedThankYou => "surprised-thank-you",
            DemoScenario::NeutralYes => "neutral-yes",
            DemoScenario::AngryNo => "angry-no",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DemoScenario::HappyHello => "Happy Person 👋",
            DemoScenario::SurprisedThankYou => "Surprised Expression 🙏",
            DemoScenario::NeutralYes => "Neutral Face 👍",
            DemoScenario::AngryNo => "Angry Gesture 👎",
        }
    }

    pub fn scenario(&self) -> &'static str {
        match self {
            DemoScenario::HappyHello => "Person smiling with hello gesture",
            DemoScenario::SurprisedThankYou => "Surprised expression with thank you gesture",
            DemoScenario::NeutralYes => "Neutral face with yes gesture",
            DemoScenario::AngryNo => "Angry expression with no gesture",
        }
    }

    /// `(emotion, confidence, gesture, confidence)`
    fn fixed(&self) -> (&'static str, f64, &'static str, f64) {
        match self {
            DemoScenario::HappyHello => ("Happy", 0.89, "Hello", 0.87),
            DemoScenario::SurprisedThankYou => ("Surprised", 0.82, "Thank You", 0.79),
            DemoScenario::NeutralYes => ("Neutral", 0.76, "Yes", 0.83),
            DemoScenario::AngryNo => ("Angry", 0.91, "No", 0.88),
        }
    }

    /// Emoji banner shown above the scenario, e.g. `"😠 👎"`.
    pub fn banner(&self) -> Result<String, DetectionError> {
        let pair = self.results()?;
        Ok(format!("{} {}", pair.emotion.emoji, pair.gesture.emoji))
    }

    /// The precomputed pair; no randomness involved.
    pub fn results(&self) -> Result<AnalysisPair, DetectionError> {
        let (emotion_label, emotion_confidence, gesture_label, gesture_confidence) = self.fixed();

        let emotion = lookup("emotions", tables::find_emotion(emotion_label), emotion_label)?;
        let gesture = lookup("gestures", tables::find_gesture(gesture_label), gesture_label)?;

        Ok(AnalysisPair::new(
            fixed_result(emotion, DetectionKind::Emotion, emotion_confidence),
            fixed_result(gesture, DetectionKind::Gesture, gesture_confidence),
        ))
    }
}

impl fmt::Display for DemoScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for DemoScenario {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let wanted = value.trim().to_ascii_lowercase();
        DemoScenario::ALL
            .into_iter()
            .find(|scenario| scenario.key() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = DemoScenario::ALL.iter().map(|s| s.key()).collect();
                anyhow!("unknown demo scenario '{value}' (expected one of {})", known.join(", "))
            })
    }
}
