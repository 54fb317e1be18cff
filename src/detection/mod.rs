//! Mock detection: fixed vocabularies plus rule-based and random selection.
//!
//! Nothing here looks at pixels. Rule-based mode reads only image metadata;
//! random mode reads nothing at all.

pub mod detector;
pub mod error;
pub mod image_meta;
pub mod random;
pub mod tables;

pub use detector::{DetectionMode, MockDetector, Selection};
pub use error::DetectionError;
pub use image_meta::{AcceptedFormat, ImageDescriptor};
pub use random::{std_source, RandomSource};
pub use tables::DetectionOutcome;
