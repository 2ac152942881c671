//! Confidence filtering of recognized lines.

use tracing::debug;

use super::RecognizedLine;
use crate::models::request::{OcrResponse, OcrWarning};

/// Text surviving the confidence filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredText {
    pub text: String,
    pub warnings: Vec<OcrWarning>,
}

impl From<FilteredText> for OcrResponse {
    fn from(filtered: FilteredText) -> Self {
        OcrResponse {
            text: filtered.text,
            warnings: filtered.warnings,
        }
    }
}

/// Keep lines at or above `threshold`, in order, trimmed and non-empty.
///
/// Never fails: an empty result is reported with `NoTextDetected`.
pub fn filter_observations(observations: &[RecognizedLine], threshold: f32) -> FilteredText {
    let mut dropped = 0usize;
    let mut kept = Vec::with_capacity(observations.len());

    for observation in observations {
        if observation.confidence < threshold {
            dropped += 1;
            continue;
        }
        let text = observation.text.trim();
        if !text.is_empty() {
            kept.push(text);
        }
    }

    let text = kept.join("\n");
    let mut warnings = Vec::new();
    if dropped > 0 {
        debug!("Dropped {} of {} observations below {}", dropped, observations.len(), threshold);
        warnings.push(OcrWarning::LowConfidenceFiltered);
    }
    if text.trim().is_empty() {
        warnings.push(OcrWarning::NoTextDetected);
    }

    FilteredText { text, warnings }
}
