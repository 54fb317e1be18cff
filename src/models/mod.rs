pub mod detection;
pub mod history;

pub use detection::{AnalysisPair, DetectionKind, DetectionResult};
pub use history::HistoryEntry;
