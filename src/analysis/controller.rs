use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use serde::Serialize;

use super::caption::{pair_caption, simulate_speech, SpeechPreview};
use crate::{
    demo::DemoScenario,
    detection::{
        std_source, DetectionMode, ImageDescriptor, MockDetector, RandomSource, Selection,
    },
    models::{AnalysisPair, HistoryEntry},
    session::{SessionRegistry, SessionState},
    settings::{AnalyzerSettings, SettingsStore},
};

const ENABLE_LOGS: bool = true;

type SharedSource = Box<dyn RandomSource + Send>;

/// What the UI shows after a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub session_id: String,
    pub mode: DetectionMode,
    #[serde(flatten)]
    pub pair: AnalysisPair,
    pub caption: String,
    pub history_len: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoReport {
    pub scenario: DemoScenario,
    pub title: String,
    pub description: String,
    pub banner: String,
    #[serde(flatten)]
    pub pair: AnalysisPair,
    pub caption: String,
}

/// Drives detection and per-session bookkeeping for every open session.
pub struct AnalysisController {
    registry: SessionRegistry,
    detector: Mutex<MockDetector<SharedSource>>,
    settings: Arc<SettingsStore>,
}

impl AnalysisController {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        let seed = settings.analyzer().rng_seed;
        Self::with_source(settings, Box::new(std_source(seed)))
    }

    /// Uses the given entropy instead of the configured one.
    pub fn with_source(settings: Arc<SettingsStore>, source: SharedSource) -> Self {
        Self {
            registry: SessionRegistry::new(),
            detector: Mutex::new(MockDetector::new(source)),
            settings,
        }
    }

    pub fn open_session(&self) -> Result<String> {
        self.registry.open()
    }

    pub fn close_session(&self, session_id: &str) -> Result<()> {
        self.registry.close(session_id)
    }

    /// "New session" button: forgets history and the current pair, keeps the id.
    pub fn reset_session(&self, session_id: &str) -> Result<()> {
        self.registry.with_session(session_id, SessionState::clear)?;
        crate::log_info!("Reset session {}", session_id);
        Ok(())
    }

    /// Saves new settings and reseeds the detector when `rng_seed` changed.
    pub fn apply_settings(&self, settings: AnalyzerSettings) -> Result<()> {
        let previous_seed = self.settings.analyzer().rng_seed;
        let seed = settings.rng_seed;
        self.settings.update_analyzer(settings)?;

        if seed != previous_seed {
            let mut detector = self
                .detector
                .lock()
                .map_err(|_| anyhow!("detector lock poisoned"))?;
            *detector = MockDetector::new(Box::new(std_source(seed)));
            crate::log_info!("Reseeded random source ({:?})", seed);
        }

        Ok(())
    }

    /// Reads upload metadata, then runs the configured mode over it.
    pub fn analyze_upload(
        &self,
        session_id: &str,
        bytes: &[u8],
        declared_format: Option<&str>,
    ) -> Result<AnalysisReport> {
        self.ensure_session(session_id)?;
        let image = ImageDescriptor::from_bytes(bytes, declared_format)?;
        self.analyze_descriptor(session_id, &image)
    }

    pub fn analyze_descriptor(
        &self,
        session_id: &str,
        image: &ImageDescriptor,
    ) -> Result<AnalysisReport> {
        let mode = self.settings.analyzer().detection_mode;
        let selection = match mode {
            DetectionMode::RuleBased => Selection::Rules(image),
            DetectionMode::Random => Selection::Random,
        };
        self.run(session_id, mode, selection)
    }

    /// Random pick with no image at all.
    pub fn analyze_random(&self, session_id: &str) -> Result<AnalysisReport> {
        self.run(session_id, DetectionMode::Random, Selection::Random)
    }

    /// Shows a fixed scenario. Replaces the current pair, leaves history alone.
    pub fn run_demo(&self, session_id: &str, scenario: DemoScenario) -> Result<DemoReport> {
        let pair = scenario.results()?;
        let caption = pair_caption(&pair, self.settings.analyzer().speak_gesture_meaning);

        self.registry.with_session(session_id, |state| {
            state.set_current(pair.emotion.clone(), pair.gesture.clone());
        })?;

        crate::log_info!("Session {} showing demo '{}'", session_id, scenario.key());

        Ok(DemoReport {
            scenario,
            title: scenario.title().to_string(),
            description: scenario.scenario().to_string(),
            banner: scenario.banner()?,
            pair,
            caption,
        })
    }

    pub fn current(&self, session_id: &str) -> Result<Option<AnalysisPair>> {
        self.registry
            .with_session(session_id, |state| state.current().cloned())
    }

    /// Most recent first; `limit` defaults to the configured history window.
    pub fn recent_history(&self, session_id: &str, limit: Option<usize>) -> Result<Vec<HistoryEntry>> {
        let n = limit.unwrap_or_else(|| self.settings.analyzer().history_window);
        self.registry.with_session(session_id, |state| state.recent(n))
    }

    pub fn speak(&self, session_id: &str) -> Result<SpeechPreview> {
        let pair = self
            .current(session_id)?
            .ok_or_else(|| anyhow!("nothing to speak yet; run an analysis first"))?;
        let caption = pair_caption(&pair, self.settings.analyzer().speak_gesture_meaning);
        Ok(simulate_speech(&caption))
    }

    fn run(
        &self,
        session_id: &str,
        mode: DetectionMode,
        selection: Selection<'_>,
    ) -> Result<AnalysisReport> {
        self.ensure_session(session_id)?;

        let pair = {
            let mut detector = self
                .detector
                .lock()
                .map_err(|_| anyhow!("detector lock poisoned"))?;
            detector.analyze(selection)?
        };

        let history_len = self.registry.with_session(session_id, |state| {
            state.set_current(pair.emotion.clone(), pair.gesture.clone());
            state.record(&pair.emotion, &pair.gesture);
            state.len()
        })?;

        let caption = pair_caption(&pair, self.settings.analyzer().speak_gesture_meaning);

        crate::log_info!(
            "Session {} [{}]: {} {} / {} {} ({} in history)",
            session_id,
            mode.as_str(),
            pair.emotion.display_label(),
            pair.emotion.confidence_percent(),
            pair.gesture.display_label(),
            pair.gesture.confidence_percent(),
            history_len
        );

        Ok(AnalysisReport {
            session_id: session_id.to_string(),
            mode,
            pair,
            caption,
            history_len,
        })
    }

    fn ensure_session(&self, session_id: &str) -> Result<()> {
        self.registry.with_session(session_id, |_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::random::scripted::ScriptedSource;
    use crate::detection::{AcceptedFormat, DetectionError};
    use tempfile::TempDir;

    fn controller(settings: AnalyzerSettings) -> (AnalysisController, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        store.update_analyzer(settings).unwrap();
        let source = ScriptedSource::new(vec![0, 2], vec![0.5, 0.5]);
        (
            AnalysisController::with_source(Arc::new(store), Box::new(source)),
            dir,
        )
    }

    #[test]
    fn wide_large_upload_is_happy_hello() {
        let (controller, _dir) = controller(AnalyzerSettings::default());
        let id = controller.open_session().unwrap();

        let image = ImageDescriptor::new(1200, 800, 2_000_000, AcceptedFormat::Jpeg);
        let report = controller.analyze_descriptor(&id, &image).unwrap();

        assert_eq!(report.pair.emotion.label, "Happy");
        assert_eq!(report.pair.emotion.confidence, 0.85);
        assert_eq!(report.pair.gesture.label, "Hello");
        assert_eq!(report.pair.gesture.confidence, 0.82);

        let history = controller.recent_history(&id, None).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].emotion_label, "Happy");
        assert_eq!(history[0].gesture_label, "Hello");
        assert_eq!(history[0].emotion_confidence, 0.85);
        assert_eq!(history[0].gesture_confidence, 0.82);
    }

    #[test]
    fn random_mode_ignores_image_shape() {
        let (controller, _dir) = controller(AnalyzerSettings {
            detection_mode: DetectionMode::Random,
            ..AnalyzerSettings::default()
        });
        let id = controller.open_session().unwrap();

        let image = ImageDescriptor::new(1200, 800, 2_000_000, AcceptedFormat::Png);
        let report = controller.analyze_descriptor(&id, &image).unwrap();

        assert_eq!(report.mode, DetectionMode::Random);
        assert_eq!(report.pair.emotion.label, "Happy");
        assert_eq!(report.pair.gesture.label, "I Love You");
        assert!(report.caption.ends_with(", meaning affection."));
    }

    #[test]
    fn invalid_image_keeps_session_alive() {
        let (controller, _dir) = controller(AnalyzerSettings::default());
        let id = controller.open_session().unwrap();

        let flat = ImageDescriptor::new(640, 0, 100, AcceptedFormat::Png);
        let err = controller.analyze_descriptor(&id, &flat).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DetectionError>(),
            Some(DetectionError::InvalidImage { .. })
        ));

        let ok = ImageDescriptor::new(640, 640, 100, AcceptedFormat::Png);
        let report = controller.analyze_descriptor(&id, &ok).unwrap();
        assert_eq!(report.pair.emotion.label, "Neutral");
        assert_eq!(report.history_len, 1);
    }

    #[test]
    fn demo_sets_current_without_history() {
        let (controller, _dir) = controller(AnalyzerSettings::default());
        let id = controller.open_session().unwrap();

        let report = controller.run_demo(&id, DemoScenario::AngryNo).unwrap();
        assert_eq!(report.banner, "😠 👎");

        let current = controller.current(&id).unwrap().unwrap();
        assert_eq!(current.emotion.display_label(), "Angry 😠");
        assert_eq!(current.gesture.confidence, 0.88);
        assert!(controller.recent_history(&id, Some(10)).unwrap().is_empty());
    }

    #[test]
    fn speak_needs_a_current_result() {
        let (controller, _dir) = controller(AnalyzerSettings::default());
        let id = controller.open_session().unwrap();
        assert!(controller.speak(&id).is_err());

        controller.run_demo(&id, DemoScenario::NeutralYes).unwrap();
        let preview = controller.speak(&id).unwrap();
        assert_eq!(
            preview.caption,
            "Analysis complete. Emotion detected: Neutral 😐. Sign language gesture: Yes 👍."
        );
    }

    #[test]
    fn history_window_limits_default_listing() {
        let (controller, _dir) = controller(AnalyzerSettings {
            history_window: 2,
            ..AnalyzerSettings::default()
        });
        let id = controller.open_session().unwrap();
        for width in [100, 200, 300] {
            let image = ImageDescriptor::new(width, 100, 10, AcceptedFormat::Png);
            controller.analyze_descriptor(&id, &image).unwrap();
        }

        let recent = controller.recent_history(&id, None).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].emotion_label, "Happy");
        assert_eq!(controller.recent_history(&id, Some(3)).unwrap()[2].emotion_label, "Neutral");
    }

    #[test]
    fn reset_clears_history_and_current_but_keeps_session() {
        let (controller, _dir) = controller(AnalyzerSettings::default());
        let id = controller.open_session().unwrap();
        let image = ImageDescriptor::new(500, 100, 10, AcceptedFormat::Png);
        controller.analyze_descriptor(&id, &image).unwrap();

        controller.reset_session(&id).unwrap();
        assert!(controller.recent_history(&id, None).unwrap().is_empty());
        assert!(controller.current(&id).unwrap().is_none());

        let report = controller.analyze_descriptor(&id, &image).unwrap();
        assert_eq!(report.history_len, 1);
        assert!(controller.reset_session("missing").is_err());
    }

    #[test]
    fn changing_seed_reseeds_detector() {
        let (left, _a) = controller(AnalyzerSettings::default());
        let (right, _b) = controller(AnalyzerSettings::default());
        let seeded = AnalyzerSettings {
            detection_mode: DetectionMode::Random,
            rng_seed: Some(7),
            ..AnalyzerSettings::default()
        };
        left.apply_settings(seeded.clone()).unwrap();
        right.apply_settings(seeded).unwrap();

        let l = left.open_session().unwrap();
        let r = right.open_session().unwrap();
        for _ in 0..20 {
            assert_eq!(
                left.analyze_random(&l).unwrap().pair,
                right.analyze_random(&r).unwrap().pair
            );
        }
    }

    #[test]
    fn rejected_settings_keep_detector() {
        let (controller, _dir) = controller(AnalyzerSettings::default());
        let broken = AnalyzerSettings {
            history_window: 0,
            rng_seed: Some(1),
            ..AnalyzerSettings::default()
        };
        assert!(controller.apply_settings(broken).is_err());
        assert_eq!(controller.settings.analyzer().rng_seed, None);
    }

    #[test]
    fn unknown_session_is_an_error() {
        let (controller, _dir) = controller(AnalyzerSettings::default());
        assert!(controller.analyze_random("missing").is_err());
        assert!(controller.current("missing").is_err());
    }
}
