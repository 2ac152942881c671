//! Recognition request and response protocol.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// JSON request read from standard input, one per invocation.
///
/// Every field is optional at the schema level so that a missing image is
/// reported as a validation failure rather than a malformed envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationPayload {
    /// Base64-encoded image bytes (PNG, JPEG, ...).
    pub image_png_base64: Option<String>,
    pub locale: Option<String>,
    pub minimum_confidence: Option<f32>,
    pub recognition_level: Option<String>,
}

/// Speed/accuracy trade-off requested from the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionLevel {
    #[default]
    Accurate,
    Fast,
}

impl RecognitionLevel {
    /// Case-insensitive lookup of `"accurate"` or `"fast"`.
    pub fn from_identifier(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "accurate" => Some(RecognitionLevel::Accurate),
            "fast" => Some(RecognitionLevel::Fast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecognitionLevel::Accurate => "accurate",
            RecognitionLevel::Fast => "fast",
        }
    }
}

impl std::fmt::Display for RecognitionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated engine settings for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionConfiguration {
    pub locale_identifier: String,
    /// Observations below this confidence are dropped.
    pub minimum_confidence: f32,
    pub recognition_level: RecognitionLevel,
}

/// A request that passed validation, with its image decoded.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    pub image: DynamicImage,
    pub configuration: VisionConfiguration,
}

/// Tags attached to a successful response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrWarning {
    /// At least one observation fell below the confidence threshold.
    LowConfidenceFiltered,
    /// The response text is empty.
    NoTextDetected,
}

impl OcrWarning {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrWarning::LowConfidenceFiltered => "low_confidence_filtered",
            OcrWarning::NoTextDetected => "no_text_detected",
        }
    }
}

impl std::fmt::Display for OcrWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The sole output of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrResponse {
    /// Surviving lines joined by `\n`.
    pub text: String,
    pub warnings: Vec<OcrWarning>,
}

impl OcrResponse {
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().filter(|l| !l.is_empty())
    }
}
