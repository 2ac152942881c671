//! Configuration structures for the recognition service and extractor.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::request::RecognitionLevel;
use crate::error::RcptError;

/// Main configuration for rcpt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// Recognition request defaults and engine tuning.
    pub recognition: RecognitionConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

/// Defaults applied to recognition requests and the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Locale used when a request does not name one.
    pub locale: String,

    /// Confidence threshold used when a request does not set one (0.0 - 1.0).
    pub minimum_confidence: f64,

    /// Recognition level used when a request does not set one.
    pub recognition_level: String,

    /// Maximum image dimension (longer side) for accurate recognition.
    pub max_image_size: u32,

    /// Maximum image dimension (longer side) for fast recognition.
    pub fast_max_image_size: u32,

    /// Keep `[UNK]` tokens emitted by the recognizer.
    pub keep_unk: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            locale: "en_US".to_string(),
            minimum_confidence: 0.3,
            recognition_level: "accurate".to_string(),
            max_image_size: 2048,
            fast_max_image_size: 1024,
            keep_unk: false,
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Locale for amounts when no currency symbol is found.
    /// `None` reads the process locale.
    pub default_locale: Option<String>,
}

/// Model file locations for the on-device engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// File names the engine needs, in load order.
    pub fn required_files(&self) -> [&str; 3] {
        [&self.detection_model, &self.recognition_model, &self.dictionary]
    }
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| RcptError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RcptError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values a file may carry that the types cannot rule out.
    pub fn validate(&self) -> crate::Result<()> {
        let recognition = &self.recognition;
        if !(0.0..=1.0).contains(&recognition.minimum_confidence) {
            return Err(RcptError::Config(format!(
                "recognition.minimum_confidence must be between 0.0 and 1.0, got {}",
                recognition.minimum_confidence
            )));
        }
        if RecognitionLevel::from_identifier(&recognition.recognition_level).is_none() {
            return Err(RcptError::Config(format!(
                "recognition.recognition_level must be 'accurate' or 'fast', got '{}'",
                recognition.recognition_level
            )));
        }
        if recognition.max_image_size == 0 || recognition.fast_max_image_size == 0 {
            return Err(RcptError::Config("image size limits must be positive".into()));
        }
        Ok(())
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_protocol() {
        let config = RcptConfig::default();
        assert_eq!(config.recognition.locale, "en_US");
        assert_eq!(config.recognition.minimum_confidence, 0.3);
        assert_eq!(config.recognition.recognition_level, "accurate");
        assert_eq!(config.extraction.default_locale, None);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: RcptConfig =
            serde_json::from_str(r#"{"recognition": {"minimum_confidence": 0.5}}"#).unwrap();
        assert_eq!(config.recognition.minimum_confidence, 0.5);
        assert_eq!(config.recognition.locale, "en_US");
        assert_eq!(config.models, ModelConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = RcptConfig::default();
        config.extraction.default_locale = Some("de_DE".into());
        config.save(&path).unwrap();

        assert_eq!(RcptConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_load_failures() {
        let dir = tempfile::tempdir().unwrap();

        let missing = RcptConfig::from_file(&dir.path().join("absent.json"));
        assert!(matches!(missing, Err(RcptError::Io(_))));

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ recognition").unwrap();
        let err = RcptConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, RcptError::Config(_)));
        assert!(err.to_string().starts_with("configuration error:"));
    }

    #[test]
    fn test_validate() {
        assert!(RcptConfig::default().validate().is_ok());

        let mut config = RcptConfig::default();
        config.recognition.minimum_confidence = 1.5;
        assert!(matches!(config.validate(), Err(RcptError::Config(_))));

        let mut config = RcptConfig::default();
        config.recognition.recognition_level = "FAST".into();
        assert!(config.validate().is_ok());
        config.recognition.recognition_level = "turbo".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_model_path() {
        let config = RcptConfig::default();
        assert_eq!(config.model_path("det.onnx"), PathBuf::from("models/det.onnx"));
        assert_eq!(config.models.required_files(), ["det.onnx", "latin_rec.onnx", "latin_dict.txt"]);
    }
}
