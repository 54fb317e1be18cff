pub mod caption;
pub mod commands;
pub mod controller;

pub use caption::{audio_caption, simulate_speech, SpeechPreview};
pub use controller::{AnalysisController, AnalysisReport, DemoReport};
