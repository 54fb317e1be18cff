pub mod analysis;
pub mod demo;
pub mod detection;
pub mod models;
pub mod session;
pub mod settings;
pub mod utils;

use std::sync::Arc;

use anyhow::{Context, Result};

use analysis::AnalysisController;
use settings::SettingsStore;

/// Shared handles the UI driver passes into every command.
pub struct AppState {
    pub analysis: AnalysisController,
    pub settings: Arc<SettingsStore>,
}

impl AppState {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self {
            analysis: AnalysisController::new(Arc::clone(&settings)),
            settings,
        }
    }
}

/// Initialises logging and settings; the returned state is ready for commands.
pub fn run() -> Result<AppState> {
    // Reads RUST_LOG, defaults to info
    utils::logging::init();

    log::info!("ISL assistant starting up...");

    for (table, outcomes) in [
        ("emotions", detection::tables::emotions()),
        ("gestures", detection::tables::gestures()),
    ] {
        detection::tables::validate_table(table, outcomes)
            .with_context(|| format!("built-in {table} table failed validation"))?;
    }

    let settings = SettingsStore::from_env()?;
    let analyzer = settings.analyzer();
    log::info!(
        "Detection mode: {}, history window: {}",
        analyzer.detection_mode.as_str(),
        analyzer.history_window
    );

    Ok(AppState::new(Arc::new(settings)))
}
