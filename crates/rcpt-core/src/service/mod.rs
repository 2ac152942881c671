//! One-shot recognition request pipeline.
//!
//! A request moves through read, decode, validate, recognize and respond.
//! Each step fails with exactly one [`ServiceError`] kind; the process
//! boundary maps that kind to an exit code.

use std::io::Read;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, info};

use crate::error::{RecognitionError, ServiceError};
use crate::models::config::RecognitionConfig;
use crate::models::request::{
    InvocationPayload, OcrResponse, PreparedRequest, RecognitionLevel, VisionConfiguration,
};
use crate::ocr::{filter_observations, TextRecognizer};

/// Locale used when neither the request nor the defaults name one.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Read the whole request body.
pub fn read_request(mut input: impl Read) -> Result<Vec<u8>, ServiceError> {
    let mut body = Vec::new();
    input
        .read_to_end(&mut body)
        .map_err(|e| ServiceError::Validation(format!("unable to read request body: {}", e)))?;
    if body.is_empty() {
        return Err(ServiceError::Validation("request body is empty".into()));
    }
    debug!("Read {} byte request", body.len());
    Ok(body)
}

/// Decode the JSON envelope.
pub fn decode_payload(body: &[u8]) -> Result<InvocationPayload, ServiceError> {
    serde_json::from_slice(body).map_err(|e| ServiceError::MalformedRequest(e.to_string()))
}

/// Validate a payload and decode its image.
///
/// Checks run in a fixed order and the first failure is returned. Absent
/// optional fields take their values from `defaults`.
pub fn prepare(
    payload: InvocationPayload,
    defaults: &RecognitionConfig,
) -> Result<PreparedRequest, ServiceError> {
    let encoded = payload
        .image_png_base64
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ServiceError::Validation("image_png_base64 must not be empty".into()))?;

    let bytes = STANDARD
        .decode(encoded)
        .map_err(|_| ServiceError::Validation("image_png_base64 is not valid base64".into()))?;

    let format = image::guess_format(&bytes).map_err(|_| {
        ServiceError::Validation("image data is not a recognized image format".into())
    })?;

    let image = image::load_from_memory_with_format(&bytes, format)
        .map_err(|_| ServiceError::Validation("unable to decode image data".into()))?;

    let minimum_confidence = payload
        .minimum_confidence
        .unwrap_or(defaults.minimum_confidence as f32);
    if !(0.0..=1.0).contains(&minimum_confidence) {
        return Err(ServiceError::Validation(
            "minimum_confidence must be between 0.0 and 1.0".into(),
        ));
    }

    let level = payload
        .recognition_level
        .as_deref()
        .unwrap_or(defaults.recognition_level.as_str());
    let recognition_level = RecognitionLevel::from_identifier(level).ok_or_else(|| {
        ServiceError::Validation("recognition_level must be 'accurate' or 'fast'".into())
    })?;

    let locale_identifier = [payload.locale.as_deref(), Some(defaults.locale.as_str())]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(DEFAULT_LOCALE)
        .to_string();

    debug!(
        "Prepared {:?} image, locale {}, confidence {}, level {}",
        format, locale_identifier, minimum_confidence, recognition_level
    );

    Ok(PreparedRequest {
        image,
        configuration: VisionConfiguration {
            locale_identifier,
            minimum_confidence,
            recognition_level,
        },
    })
}

/// Run recognition and the confidence filter.
pub fn perform(
    recognizer: &dyn TextRecognizer,
    request: &PreparedRequest,
) -> Result<OcrResponse, ServiceError> {
    let observations = recognizer.recognize(&request.image, &request.configuration)?;
    info!("Engine returned {} observations", observations.len());
    Ok(filter_observations(&observations, request.configuration.minimum_confidence).into())
}

/// Encode a response as pretty JSON with sorted keys.
pub fn encode_response(response: &OcrResponse) -> Result<String, ServiceError> {
    // serde_json::Value maps are ordered by key
    let value = serde_json::to_value(response)
        .map_err(|e| ServiceError::Internal(format!("unable to encode response: {}", e)))?;
    serde_json::to_string_pretty(&value)
        .map_err(|e| ServiceError::Internal(format!("unable to encode response: {}", e)))
}

/// Handle one request end to end and return the encoded response.
///
/// `engine_factory` runs only after the request is valid; its failure is
/// a recognition failure.
pub fn handle<F>(
    input: impl Read,
    defaults: &RecognitionConfig,
    engine_factory: F,
) -> Result<String, ServiceError>
where
    F: FnOnce(&VisionConfiguration) -> Result<Box<dyn TextRecognizer>, RecognitionError>,
{
    let body = read_request(input)?;
    let payload = decode_payload(&body)?;
    let request = prepare(payload, defaults)?;
    let engine = engine_factory(&request.configuration)?;
    let response = perform(engine.as_ref(), &request)?;
    encode_response(&response)
}
