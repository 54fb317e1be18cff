//! Commands the UI driver calls. Every failure comes back as an inline
//! message; none of them end the session.

use crate::{
    demo::DemoScenario,
    detection::{DetectionError, ImageDescriptor},
    models::{AnalysisPair, HistoryEntry},
    settings::AnalyzerSettings,
    AppState,
};

use super::{caption::SpeechPreview, AnalysisReport, DemoReport};

const ENABLE_LOGS: bool = true;

fn to_message(action: &str, err: anyhow::Error) -> String {
    let message = err.to_string();
    match err.downcast_ref::<DetectionError>() {
        Some(detection) if detection.is_configuration() => {
            crate::log_error!("{} failed: {}", action, message);
        }
        _ => {
            crate::log_warn!("{} failed: {}", action, message);
        }
    }
    message
}

pub fn open_session(state: &AppState) -> Result<String, String> {
    state
        .analysis
        .open_session()
        .map_err(|e| to_message("open_session", e))
}

pub fn close_session(state: &AppState, session_id: String) -> Result<(), String> {
    state
        .analysis
        .close_session(&session_id)
        .map_err(|e| to_message("close_session", e))
}

pub fn reset_session(state: &AppState, session_id: String) -> Result<(), String> {
    state
        .analysis
        .reset_session(&session_id)
        .map_err(|e| to_message("reset_session", e))
}

pub fn analyze_upload(
    state: &AppState,
    session_id: String,
    bytes: Vec<u8>,
    declared_format: Option<String>,
) -> Result<AnalysisReport, String> {
    state
        .analysis
        .analyze_upload(&session_id, &bytes, declared_format.as_deref())
        .map_err(|e| to_message("analyze_upload", e))
}

pub fn analyze_image(
    state: &AppState,
    session_id: String,
    image: ImageDescriptor,
) -> Result<AnalysisReport, String> {
    state
        .analysis
        .analyze_descriptor(&session_id, &image)
        .map_err(|e| to_message("analyze_image", e))
}

pub fn analyze_random(state: &AppState, session_id: String) -> Result<AnalysisReport, String> {
    state
        .analysis
        .analyze_random(&session_id)
        .map_err(|e| to_message("analyze_random", e))
}

pub fn run_demo(
    state: &AppState,
    session_id: String,
    scenario: DemoScenario,
) -> Result<DemoReport, String> {
    state
        .analysis
        .run_demo(&session_id, scenario)
        .map_err(|e| to_message("run_demo", e))
}

pub fn list_demo_scenarios() -> Vec<DemoScenario> {
    DemoScenario::ALL.to_vec()
}

pub fn get_current_result(
    state: &AppState,
    session_id: String,
) -> Result<Option<AnalysisPair>, String> {
    state
        .analysis
        .current(&session_id)
        .map_err(|e| to_message("get_current_result", e))
}

pub fn get_recent_history(
    state: &AppState,
    session_id: String,
    limit: Option<usize>,
) -> Result<Vec<HistoryEntry>, String> {
    state
        .analysis
        .recent_history(&session_id, limit)
        .map_err(|e| to_message("get_recent_history", e))
}

pub fn simulate_speech(state: &AppState, session_id: String) -> Result<SpeechPreview, String> {
    state
        .analysis
        .speak(&session_id)
        .map_err(|e| to_message("simulate_speech", e))
}

pub fn get_analyzer_settings(state: &AppState) -> AnalyzerSettings {
    state.settings.analyzer()
}

pub fn set_analyzer_settings(state: &AppState, settings: AnalyzerSettings) -> Result<(), String> {
    state
        .analysis
        .apply_settings(settings)
        .map_err(|e| to_message("set_analyzer_settings", e))
}
