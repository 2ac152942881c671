//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::{imageops::FilterType, DynamicImage, GenericImageView};
use tracing::{debug, info};

use super::{RecognizedLine, TextRecognizer};
use crate::error::RecognitionError;
use crate::models::config::{ModelConfig, RecognitionConfig};
use crate::models::request::{RecognitionLevel, VisionConfiguration};

/// Rows closer than this many pixels are read as one line of text.
const ROW_HEIGHT: f32 = 20.0;

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct PureOcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
    max_image_size: u32,
    fast_max_image_size: u32,
    keep_unk: bool,
}

impl PureOcrEngine {
    /// Create an engine from the model files named in `models`.
    pub fn from_config(
        models: &ModelConfig,
        recognition: &RecognitionConfig,
    ) -> Result<Self, RecognitionError> {
        Self::from_dir(&models.model_dir, models, recognition)
    }

    /// Create an engine from model files in `model_dir`.
    pub fn from_dir(
        model_dir: &Path,
        models: &ModelConfig,
        recognition: &RecognitionConfig,
    ) -> Result<Self, RecognitionError> {
        let det_path = model_dir.join(&models.detection_model);
        let rec_path = model_dir.join(&models.recognition_model);
        let dict_path = model_dir.join(&models.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(RecognitionError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| RecognitionError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine,
            max_image_size: recognition.max_image_size,
            fast_max_image_size: recognition.fast_max_image_size,
            keep_unk: recognition.keep_unk,
        })
    }

    fn max_side(&self, level: RecognitionLevel) -> u32 {
        match level {
            RecognitionLevel::Accurate => self.max_image_size,
            RecognitionLevel::Fast => self.fast_max_image_size,
        }
    }
}

impl TextRecognizer for PureOcrEngine {
    fn recognize(
        &self,
        image: &DynamicImage,
        configuration: &VisionConfiguration,
    ) -> Result<Vec<RecognizedLine>, RecognitionError> {
        let start = Instant::now();
        let (width, height) = image.dimensions();
        let max_side = self.max_side(configuration.recognition_level);

        let scaled;
        let input = if width.max(height) > max_side {
            scaled = image.resize(max_side, max_side, FilterType::Lanczos3);
            debug!(
                "Downscaled {}x{} to {}x{}",
                width,
                height,
                scaled.width(),
                scaled.height()
            );
            &scaled
        } else {
            image
        };

        info!(
            "Processing image: {}x{} ({} level, {})",
            width, height, configuration.recognition_level, configuration.locale_identifier
        );

        let results = self
            .engine
            .run_from_image(input)
            .map_err(|e| RecognitionError::Engine(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let mut regions: Vec<Region> = results
            .iter()
            .map(|r| {
                let (left, top) = top_left(&r.bounding_box);
                let text = if self.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                Region {
                    left,
                    top,
                    line: RecognizedLine::new(text, r.confidence),
                }
            })
            .collect();

        sort_reading_order(&mut regions);

        info!(
            "OCR complete: {} lines in {}ms",
            regions.len(),
            start.elapsed().as_millis()
        );

        Ok(regions.into_iter().map(|r| r.line).collect())
    }
}

struct Region {
    left: f32,
    top: f32,
    line: RecognizedLine,
}

/// Sort top-to-bottom by row bucket, then left-to-right.
fn sort_reading_order(regions: &mut [Region]) {
    regions.sort_by(|a, b| {
        let row_a = (a.top / ROW_HEIGHT) as i32;
        let row_b = (b.top / ROW_HEIGHT) as i32;
        if row_a != row_b {
            row_a.cmp(&row_b)
        } else {
            a.left
                .partial_cmp(&b.left)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
}

/// Minimum x and y over the polygon's exterior.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32) {
    let (x, y) = polygon
        .exterior()
        .coords()
        .fold((f64::INFINITY, f64::INFINITY), |(x, y), c| {
            (x.min(c.x), y.min(c.y))
        });
    if x.is_finite() && y.is_finite() {
        (x as f32, y as f32)
    } else {
        (0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn region(text: &str, left: f32, top: f32) -> Region {
        Region {
            left,
            top,
            line: RecognizedLine::new(text, 1.0),
        }
    }

    #[test]
    fn test_reading_order() {
        let mut regions = vec![
            region("$15.35", 200.0, 101.0),
            region("Blue Bottle Coffee", 10.0, 5.0),
            region("Total", 10.0, 108.0),
        ];
        sort_reading_order(&mut regions);
        let texts: Vec<_> = regions.iter().map(|r| r.line.text.as_str()).collect();
        assert_eq!(texts, vec!["Blue Bottle Coffee", "Total", "$15.35"]);
    }

    #[test]
    fn test_missing_models_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let result = PureOcrEngine::from_dir(
            dir.path(),
            &ModelConfig::default(),
            &RecognitionConfig::default(),
        );
        assert!(matches!(result, Err(RecognitionError::ModelLoad(_))));
    }
}
