use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::detection::DetectionMode;

const ENABLE_LOGS: bool = true;

/// Env var pointing at the settings file.
pub const SETTINGS_PATH_ENV: &str = "ISL_ASSISTANT_SETTINGS";
pub const DEFAULT_SETTINGS_FILE: &str = "isl_assistant_settings.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzerSettings {
    pub detection_mode: DetectionMode,
    /// How many history rows the UI shows by default.
    pub history_window: usize,
    /// Fixed seed for random mode; entropy when absent.
    pub rng_seed: Option<u64>,
    pub speak_gesture_meaning: bool,
}

impl AnalyzerSettings {
    pub fn validate(&self) -> Result<()> {
        if self.history_window == 0 {
            return Err(anyhow!("historyWindow must be at least 1"));
        }
        Ok(())
    }
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            detection_mode: DetectionMode::RuleBased,
            history_window: 5,
            rng_seed: None,
            speak_gesture_meaning: true,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AnalyzerSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str::<AnalyzerSettings>(&contents)
                .map_err(anyhow::Error::from)
                .and_then(|settings| settings.validate().map(|()| settings))
                .unwrap_or_else(|err| {
                    crate::log_warn!(
                        "Ignoring invalid settings at {}: {}",
                        path.display(),
                        err
                    );
                    AnalyzerSettings::default()
                })
        } else {
            AnalyzerSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    /// Resolves the path from `ISL_ASSISTANT_SETTINGS`, falling back to the
    /// working directory.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(SETTINGS_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn analyzer(&self) -> AnalyzerSettings {
        match self.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn update_analyzer(&self, settings: AnalyzerSettings) -> Result<()> {
        settings.validate()?;

        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("settings lock poisoned"))?;
        *guard = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &AnalyzerSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
