//! Recognizers that replay recorded observations.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::{RecognizedLine, TextRecognizer};
use crate::error::RecognitionError;
use crate::models::request::VisionConfiguration;

/// Replays observations from a JSON file instead of running a model.
///
/// The file holds an array of `{"text": ..., "confidence": ...}` objects and
/// is read on every call, so a missing or invalid file is a recognition
/// failure of that request.
#[derive(Debug, Clone)]
pub struct ReplayRecognizer {
    path: PathBuf,
}

impl ReplayRecognizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TextRecognizer for ReplayRecognizer {
    fn recognize(
        &self,
        image: &DynamicImage,
        configuration: &VisionConfiguration,
    ) -> Result<Vec<RecognizedLine>, RecognitionError> {
        let (width, height) = image.dimensions();
        info!(
            "Replaying observations from {} for {}x{} image ({} level)",
            self.path.display(),
            width,
            height,
            configuration.recognition_level
        );

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            RecognitionError::Observations(format!("{}: {}", self.path.display(), e))
        })?;
        let lines: Vec<RecognizedLine> = serde_json::from_str(&content).map_err(|e| {
            RecognitionError::Observations(format!("{}: {}", self.path.display(), e))
        })?;

        debug!("Replayed {} observations", lines.len());
        Ok(lines)
    }
}

/// In-memory recognizer returning fixed lines or a fixed failure.
#[derive(Debug, Clone)]
pub struct StaticRecognizer {
    outcome: Result<Vec<RecognizedLine>, String>,
}

impl StaticRecognizer {
    pub fn new(lines: Vec<RecognizedLine>) -> Self {
        Self { outcome: Ok(lines) }
    }

    /// A recognizer whose every call fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            outcome: Err(message.into()),
        }
    }
}

impl TextRecognizer for StaticRecognizer {
    fn recognize(
        &self,
        _image: &DynamicImage,
        _configuration: &VisionConfiguration,
    ) -> Result<Vec<RecognizedLine>, RecognitionError> {
        self.outcome
            .clone()
            .map_err(RecognitionError::Engine)
    }
}
