//! Text recognition capability and the confidence filter.

mod filter;
mod replay;

#[cfg(feature = "native")]
mod pure_engine;

pub use filter::{filter_observations, FilteredText};
pub use replay::{ReplayRecognizer, StaticRecognizer};

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::RecognitionError;
use crate::models::request::VisionConfiguration;

/// One unit of text output by a recognition engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizedLine {
    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// A text recognition engine.
///
/// Implementations return lines in reading order. The order is preserved
/// through filtering and extraction.
pub trait TextRecognizer {
    /// Recognize text lines in `image`.
    fn recognize(
        &self,
        image: &DynamicImage,
        configuration: &VisionConfiguration,
    ) -> Result<Vec<RecognizedLine>, RecognitionError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(
        &self,
        image: &DynamicImage,
        configuration: &VisionConfiguration,
    ) -> Result<Vec<RecognizedLine>, RecognitionError> {
        (**self).recognize(image, configuration)
    }
}
