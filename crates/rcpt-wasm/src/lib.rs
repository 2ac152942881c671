//! WASM bindings for receipt field extraction.
//!
//! Recognition runs in the host (browser or Node.js); these bindings filter
//! its observations and extract receipt fields from the surviving text.

use std::str::FromStr;

use js_sys::Array;
use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use rcpt_core::receipt::rules::{self, LocaleFormat};
use rcpt_core::{
    AutoFillField, CandidateExtractor, FieldCandidates, OcrResponse, ReceiptExtractor,
    RecognizedLine,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn lines_from(array: &Array) -> Vec<String> {
    array.iter().filter_map(|v| v.as_string()).collect()
}

fn extractor_for(locale: Option<String>) -> ReceiptExtractor {
    match locale {
        Some(identifier) => ReceiptExtractor::new().with_locale(LocaleFormat::from_identifier(&identifier)),
        None => ReceiptExtractor::new(),
    }
}

/// Extract receipt field candidates from recognized lines.
///
/// Non-string entries are ignored. Amounts are returned as decimal strings.
#[wasm_bindgen]
pub fn extract_candidates(lines: &Array) -> Result<JsValue, JsValue> {
    to_js(&ReceiptExtractor::new().extract(&lines_from(lines)))
}

/// Extract receipt field candidates from newline-separated text.
#[wasm_bindgen]
pub fn extract_candidates_from_text(text: &str, locale: Option<String>) -> Result<JsValue, JsValue> {
    to_js(&extractor_for(locale).extract_from_text(text))
}

/// Apply the confidence filter to `[{text, confidence}]` observations.
///
/// Returns `{text, warnings}`.
#[wasm_bindgen]
pub fn filter_observations(observations: JsValue, threshold: f32) -> Result<JsValue, JsValue> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(JsValue::from_str(
            "minimum_confidence must be between 0.0 and 1.0",
        ));
    }
    let observations: Vec<RecognizedLine> = serde_wasm_bindgen::from_value(observations)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let response: OcrResponse = rcpt_core::filter_observations(&observations, threshold).into();
    to_js(&response)
}

/// Parse an amount under a locale (e.g. "de_DE"). Returns a decimal string.
#[wasm_bindgen]
pub fn parse_amount(text: &str, locale: &str) -> Option<String> {
    rules::parse_amount(text, &LocaleFormat::from_identifier(locale)).map(|d| d.to_string())
}

/// Format a decimal string currency-style under a locale.
#[wasm_bindgen]
pub fn format_amount(amount: &str, locale: &str) -> Result<String, JsValue> {
    let amount = Decimal::from_str(amount.trim())
        .map_err(|e| JsValue::from_str(&format!("invalid amount: {}", e)))?;
    Ok(rules::format_amount(amount, &LocaleFormat::from_identifier(locale)))
}

/// ISO 4217 code of the first currency symbol found, by priority.
#[wasm_bindgen]
pub fn detect_currency_code(lines: &Array) -> Option<String> {
    rules::detect_currency_code(&lines_from(lines)).map(str::to_string)
}

/// Receipt extractor class for browser use.
#[wasm_bindgen]
pub struct ReceiptExtractorJs {
    extractor: ReceiptExtractor,
}

#[wasm_bindgen]
impl ReceiptExtractorJs {
    /// Create an extractor; `locale` applies when no currency symbol is found.
    #[wasm_bindgen(constructor)]
    pub fn new(locale: Option<String>) -> Self {
        Self {
            extractor: extractor_for(locale),
        }
    }

    /// Fallback locale identifier.
    #[wasm_bindgen(getter)]
    pub fn locale(&self) -> String {
        self.extractor.fallback_locale().identifier.to_string()
    }

    /// Extract candidates from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.extract_from_text(text))
    }

    /// Extract candidates with the list of fields that were detected.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        #[derive(serde::Serialize)]
        struct ExtractResult {
            candidates: FieldCandidates,
            detected_fields: Vec<AutoFillField>,
            locale: String,
        }

        let candidates = self.extractor.extract_from_text(text);
        let output = ExtractResult {
            detected_fields: candidates.detected_fields(),
            candidates,
            locale: self.locale(),
        };

        to_js(&output)
    }
}

impl Default for ReceiptExtractorJs {
    fn default() -> Self {
        Self::new(None)
    }
}
