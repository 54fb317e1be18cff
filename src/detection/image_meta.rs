//! Upload metadata: dimensions, byte length and container format.
//!
//! Only the header is read; pixels are never decoded.

use std::io::Cursor;

use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};

use super::DetectionError;

const ENABLE_LOGS: bool = true;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AcceptedFormat {
    Jpeg,
    Png,
}

impl AcceptedFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptedFormat::Jpeg => "JPEG",
            AcceptedFormat::Png => "PNG",
        }
    }

    /// Parses a file extension (`jpg`, `.PNG`) or MIME type (`image/jpeg`).
    pub fn from_declared(declared: &str) -> Result<Self, DetectionError> {
        let normalized = declared.trim().trim_start_matches('.').to_ascii_lowercase();
        let normalized = normalized
            .strip_prefix("image/")
            .unwrap_or(&normalized)
            .to_string();

        match normalized.as_str() {
            "jpg" | "jpeg" => Ok(AcceptedFormat::Jpeg),
            "png" => Ok(AcceptedFormat::Png),
            other => Err(DetectionError::decode(format!(
                "unsupported declared format '{other}' (expected jpg, jpeg or png)"
            ))),
        }
    }

    fn from_sniffed(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(AcceptedFormat::Jpeg),
            ImageFormat::Png => Some(AcceptedFormat::Png),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    pub width_px: u32,
    pub height_px: u32,
    pub byte_length: u64,
    /// Container format read from the file header.
    pub format: AcceptedFormat,
    /// What the uploader claimed, if anything; may disagree with `format`.
    pub declared_format: Option<AcceptedFormat>,
}

impl ImageDescriptor {
    pub fn new(
        width_px: u32,
        height_px: u32,
        byte_length: u64,
        format: AcceptedFormat,
    ) -> Self {
        Self {
            width_px,
            height_px,
            byte_length,
            format,
            declared_format: None,
        }
    }

    /// Reads metadata from an uploaded payload.
    ///
    /// The sniffed container decides `format`; a mismatching declaration is
    /// kept in `declared_format` and logged.
    pub fn from_bytes(bytes: &[u8], declared_format: Option<&str>) -> Result<Self, DetectionError> {
        if bytes.is_empty() {
            return Err(DetectionError::decode("upload is empty"));
        }

        let declared = declared_format
            .map(AcceptedFormat::from_declared)
            .transpose()?;

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|err| DetectionError::decode(err.to_string()))?;

        let sniffed = reader
            .format()
            .ok_or_else(|| DetectionError::decode("unrecognised image container"))?;
        let format = AcceptedFormat::from_sniffed(sniffed).ok_or_else(|| {
            DetectionError::decode(format!("{sniffed:?} uploads are not accepted"))
        })?;

        if let Some(declared) = declared {
            if declared != format {
                crate::log_warn!(
                    "Upload declared as {} but looks like {}; using {}",
                    declared.as_str(),
                    format.as_str(),
                    format.as_str()
                );
            }
        }

        let (width_px, height_px) = reader
            .into_dimensions()
            .map_err(|err| DetectionError::decode(err.to_string()))?;

        let descriptor = Self {
            declared_format: declared,
            ..Self::new(width_px, height_px, bytes.len() as u64, format)
        };
        descriptor.validate()?;

        crate::log_debug!(
            "Read upload metadata: {}x{} {} ({} bytes)",
            width_px,
            height_px,
            format.as_str(),
            descriptor.byte_length
        );

        Ok(descriptor)
    }

    /// Dimensions and byte length must all be positive.
    pub fn validate(&self) -> Result<(), DetectionError> {
        if self.width_px == 0 || self.height_px == 0 {
            return Err(DetectionError::invalid_image(format!(
                "image has zero area ({}x{})",
                self.width_px, self.height_px
            )));
        }
        if self.byte_length == 0 {
            return Err(DetectionError::invalid_image("image payload is empty"));
        }
        Ok(())
    }

    /// `width / height`; callers must `validate` first.
    pub fn aspect_ratio(&self) -> f64 {
        self.width_px as f64 / self.height_px as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    #[test]
    fn reads_png_dimensions_and_length() {
        let bytes = encode(30, 20, ImageFormat::Png);
        let descriptor = ImageDescriptor::from_bytes(&bytes, Some("png")).unwrap();
        assert_eq!(descriptor.width_px, 30);
        assert_eq!(descriptor.height_px, 20);
        assert_eq!(descriptor.byte_length, bytes.len() as u64);
        assert_eq!(descriptor.format, AcceptedFormat::Png);
        assert_eq!(descriptor.declared_format, Some(AcceptedFormat::Png));
    }

    #[test]
    fn sniffed_format_overrides_declared() {
        let bytes = encode(8, 8, ImageFormat::Jpeg);
        let descriptor = ImageDescriptor::from_bytes(&bytes, Some("image/png")).unwrap();
        assert_eq!(descriptor.format, AcceptedFormat::Jpeg);
        assert_eq!(descriptor.declared_format, Some(AcceptedFormat::Png));
    }

    #[test]
    fn undeclared_upload_records_no_declaration() {
        let bytes = encode(6, 3, ImageFormat::Png);
        let descriptor = ImageDescriptor::from_bytes(&bytes, None).unwrap();
        assert_eq!(descriptor.format, AcceptedFormat::Png);
        assert_eq!(descriptor.declared_format, None);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = ImageDescriptor::from_bytes(b"definitely not an image", None).unwrap_err();
        assert!(matches!(err, DetectionError::Decode { .. }));

        let err = ImageDescriptor::from_bytes(&[], None).unwrap_err();
        assert!(matches!(err, DetectionError::Decode { .. }));
    }

    #[test]
    fn unsupported_declared_format_is_rejected() {
        let bytes = encode(4, 4, ImageFormat::Png);
        let err = ImageDescriptor::from_bytes(&bytes, Some("gif")).unwrap_err();
        assert!(matches!(err, DetectionError::Decode { .. }));
    }

    #[test]
    fn declared_format_parsing() {
        assert_eq!(AcceptedFormat::from_declared(".JPG"), Ok(AcceptedFormat::Jpeg));
        assert_eq!(AcceptedFormat::from_declared("image/jpeg"), Ok(AcceptedFormat::Jpeg));
        assert_eq!(AcceptedFormat::from_declared("png"), Ok(AcceptedFormat::Png));
        assert!(AcceptedFormat::from_declared("bmp").is_err());
    }

    #[test]
    fn zero_height_is_invalid() {
        let descriptor = ImageDescriptor::new(100, 0, 10, AcceptedFormat::Png);
        assert!(matches!(
            descriptor.validate(),
            Err(DetectionError::InvalidImage { .. })
        ));
    }
}
