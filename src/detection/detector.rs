use serde::{Deserialize, Serialize};

use super::image_meta::ImageDescriptor;
use super::random::RandomSource;
use super::tables::{self, DetectionOutcome};
use super::DetectionError;
use crate::models::{AnalysisPair, DetectionKind, DetectionResult};

const ENABLE_LOGS: bool = true;

/// Wide images read as "Happy".
pub const HAPPY_MIN_ASPECT: f64 = 1.2;
/// Tall images read as "Surprised".
pub const SURPRISED_MAX_ASPECT: f64 = 0.8;
/// Payloads above this many bytes read as "Hello".
pub const HELLO_MIN_BYTES: u64 = 1_000_000;

pub const HAPPY_CONFIDENCE: f64 = 0.85;
pub const SURPRISED_CONFIDENCE: f64 = 0.78;
pub const NEUTRAL_CONFIDENCE: f64 = 0.72;
pub const HELLO_CONFIDENCE: f64 = 0.82;
pub const THANK_YOU_CONFIDENCE: f64 = 0.75;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum DetectionMode {
    /// Derived from aspect ratio and byte length; same image, same result.
    #[default]
    RuleBased,
    /// Uniform pick over the tables; ignores the image entirely.
    Random,
}

impl DetectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMode::RuleBased => "ruleBased",
            DetectionMode::Random => "random",
        }
    }
}

/// How one detection call picks its outcome.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    Rules(&'a ImageDescriptor),
    Random,
}

pub struct MockDetector<R: RandomSource> {
    rng: R,
}

impl<R: RandomSource> MockDetector<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn detect_emotion(&mut self, selection: Selection<'_>) -> Result<DetectionResult, DetectionError> {
        match selection {
            Selection::Rules(image) => emotion_from_shape(image),
            Selection::Random => {
                random_pick(&mut self.rng, "emotions", tables::emotions(), DetectionKind::Emotion)
            }
        }
    }

    pub fn detect_gesture(&mut self, selection: Selection<'_>) -> Result<DetectionResult, DetectionError> {
        match selection {
            Selection::Rules(image) => gesture_from_size(image),
            Selection::Random => {
                random_pick(&mut self.rng, "gestures", tables::gestures(), DetectionKind::Gesture)
            }
        }
    }

    /// Emotion first, then gesture; the pair fails if either does.
    pub fn analyze(&mut self, selection: Selection<'_>) -> Result<AnalysisPair, DetectionError> {
        let emotion = self.detect_emotion(selection)?;
        let gesture = self.detect_gesture(selection)?;

        crate::log_debug!(
            "Detected {} ({:.2}) / {} ({:.2})",
            emotion.label,
            emotion.confidence,
            gesture.label,
            gesture.confidence
        );

        Ok(AnalysisPair::new(emotion, gesture))
    }
}

pub fn emotion_from_shape(image: &ImageDescriptor) -> Result<DetectionResult, DetectionError> {
    image.validate()?;
    let aspect_ratio = image.aspect_ratio();

    let (label, confidence) = if aspect_ratio > HAPPY_MIN_ASPECT {
        ("Happy", HAPPY_CONFIDENCE)
    } else if aspect_ratio < SURPRISED_MAX_ASPECT {
        ("Surprised", SURPRISED_CONFIDENCE)
    } else {
        ("Neutral", NEUTRAL_CONFIDENCE)
    };

    let outcome = lookup("emotions", tables::find_emotion(label), label)?;
    Ok(fixed_result(outcome, DetectionKind::Emotion, confidence))
}

pub fn gesture_from_size(image: &ImageDescriptor) -> Result<DetectionResult, DetectionError> {
    image.validate()?;

    let (label, confidence) = if image.byte_length > HELLO_MIN_BYTES {
        ("Hello", HELLO_CONFIDENCE)
    } else {
        ("Thank You", THANK_YOU_CONFIDENCE)
    };

    let outcome = lookup("gestures", tables::find_gesture(label), label)?;
    Ok(fixed_result(outcome, DetectionKind::Gesture, confidence))
}

/// Builds a result with a fixed confidence and no gesture meaning.
pub(crate) fn fixed_result(
    outcome: &DetectionOutcome,
    kind: DetectionKind,
    confidence: f64,
) -> DetectionResult {
    DetectionResult {
        kind,
        label: outcome.label.to_string(),
        emoji: outcome.emoji.to_string(),
        confidence,
        description: outcome.description.to_string(),
        meaning: None,
    }
}

pub(crate) fn lookup<'a>(
    table: &'static str,
    found: Option<&'a DetectionOutcome>,
    label: &str,
) -> Result<&'a DetectionOutcome, DetectionError> {
    found.ok_or_else(|| DetectionError::configuration(table, format!("missing entry '{label}'")))
}

fn random_pick<R: RandomSource + ?Sized>(
    rng: &mut R,
    table: &'static str,
    outcomes: &[DetectionOutcome],
    kind: DetectionKind,
) -> Result<DetectionResult, DetectionError> {
    if outcomes.is_empty() {
        return Err(DetectionError::configuration(table, "table is empty"));
    }

    let index = rng.pick_index(outcomes.len()).min(outcomes.len() - 1);
    let outcome = &outcomes[index];
    let confidence = rng
        .pick_confidence(outcome.confidence_low, outcome.confidence_high)
        .clamp(outcome.confidence_low, outcome.confidence_high);

    Ok(DetectionResult {
        kind,
        label: outcome.label.to_string(),
        emoji: outcome.emoji.to_string(),
        confidence,
        description: outcome.description.to_string(),
        meaning: outcome.meaning.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::image_meta::AcceptedFormat;
    use crate::detection::random::scripted::ScriptedSource;
    use crate::detection::random::std_source;

    fn image(width: u32, height: u32, bytes: u64) -> ImageDescriptor {
        ImageDescriptor::new(width, height, bytes, AcceptedFormat::Png)
    }

    #[test]
    fn wide_images_are_happy() {
        for (w, h) in [(1200, 800), (121, 100), (4000, 10)] {
            let result = emotion_from_shape(&image(w, h, 10)).unwrap();
            assert_eq!(result.label, "Happy");
            assert_eq!(result.confidence, 0.85);
        }
    }

    #[test]
    fn tall_images_are_surprised_and_square_ones_neutral() {
        let tall = emotion_from_shape(&image(70, 100, 10)).unwrap();
        assert_eq!((tall.label.as_str(), tall.confidence), ("Surprised", 0.78));

        for (w, h) in [(100, 100), (120, 100), (80, 100)] {
            let result = emotion_from_shape(&image(w, h, 10)).unwrap();
            assert_eq!((result.label.as_str(), result.confidence), ("Neutral", 0.72));
        }
    }

    #[test]
    fn byte_length_picks_gesture() {
        let big = gesture_from_size(&image(10, 10, 1_000_001)).unwrap();
        assert_eq!((big.label.as_str(), big.confidence), ("Hello", 0.82));

        let boundary = gesture_from_size(&image(10, 10, 1_000_000)).unwrap();
        assert_eq!((boundary.label.as_str(), boundary.confidence), ("Thank You", 0.75));
        assert!(boundary.meaning.is_none());
    }

    #[test]
    fn zero_height_never_divides() {
        let err = emotion_from_shape(&image(100, 0, 10)).unwrap_err();
        assert!(matches!(err, DetectionError::InvalidImage { .. }));

        let err = gesture_from_size(&image(100, 100, 0)).unwrap_err();
        assert!(matches!(err, DetectionError::InvalidImage { .. }));
    }

    #[test]
    fn rule_based_is_idempotent() {
        let mut detector = MockDetector::new(std_source(None));
        let upload = image(640, 900, 512_000);
        let first = detector.analyze(Selection::Rules(&upload)).unwrap();
        let second = detector.analyze(Selection::Rules(&upload)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn random_emotions_stay_in_band() {
        let mut detector = MockDetector::new(std_source(Some(42)));
        for _ in 0..10_000 {
            let result = detector.detect_emotion(Selection::Random).unwrap();
            let outcome = tables::find_emotion(&result.label).unwrap();
            assert!(outcome.contains(result.confidence), "{result:?}");
        }
    }

    #[test]
    fn random_gestures_carry_meaning_and_stay_in_band() {
        let mut detector = MockDetector::new(std_source(Some(3)));
        for _ in 0..1_000 {
            let result = detector.detect_gesture(Selection::Random).unwrap();
            let outcome = tables::find_gesture(&result.label).unwrap();
            assert!(outcome.contains(result.confidence));
            assert_eq!(result.meaning.as_deref(), outcome.meaning);
        }
    }

    #[test]
    fn scripted_source_gives_exact_outcomes() {
        let source = ScriptedSource::new(vec![2, 4], vec![1.0, 0.0]);
        let mut detector = MockDetector::new(source);
        let pair = detector.analyze(Selection::Random).unwrap();

        assert_eq!(pair.emotion.display_label(), "Angry 😠");
        assert!((pair.emotion.confidence - 0.92).abs() < 1e-9);
        assert_eq!(pair.gesture.display_label(), "No 👎");
        assert!((pair.gesture.confidence - 0.78).abs() < 1e-9);
    }

    #[test]
    fn empty_table_is_a_configuration_error() {
        let mut rng = std_source(Some(0));
        let err = random_pick(&mut rng, "emotions", &[], DetectionKind::Emotion).unwrap_err();
        assert!(err.is_configuration());
    }
}
