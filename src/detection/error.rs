use thiserror::Error;

/// Failures of the mock detection pipeline.
///
/// None of these are fatal: the command layer renders them as an inline
/// message and the session carries on.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DetectionError {
    /// Non-positive dimensions or byte length, or metadata that makes no sense.
    #[error("Invalid image: {reason}")]
    InvalidImage { reason: String },

    /// Empty or malformed outcome table. Unreachable with the built-in tables.
    #[error("Detection table '{table}' is misconfigured: {reason}")]
    Configuration { table: &'static str, reason: String },

    /// Uploaded payload cannot be interpreted as an accepted image at all.
    #[error("Could not decode upload: {reason}")]
    Decode { reason: String },
}

impl DetectionError {
    pub fn invalid_image(reason: impl Into<String>) -> Self {
        Self::InvalidImage {
            reason: reason.into(),
        }
    }

    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn configuration(table: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            table,
            reason: reason.into(),
        }
    }

    /// Operator-facing errors get logged louder than user input mistakes.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
