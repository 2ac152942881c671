//! Receipt field extraction module.

mod extractor;
pub mod rules;

pub use extractor::{detect_amount, ReceiptExtractor};

use crate::models::candidates::FieldCandidates;

/// Trait for receipt field extractors.
pub trait CandidateExtractor {
    /// Extract candidates from recognized lines, in reading order.
    fn extract(&self, lines: &[String]) -> FieldCandidates;

    /// Extract candidates from newline-separated text.
    fn extract_from_text(&self, text: &str) -> FieldCandidates {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        self.extract(&lines)
    }
}
