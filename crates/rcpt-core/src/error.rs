//! Error types for the rcpt-core library.
//!
//! The extraction heuristics never fail; a missing answer is `None`. Errors
//! only exist at the recognition engine, the record stores, and the request
//! protocol boundary.

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a text recognition engine.
#[derive(Error, Debug)]
pub enum RecognitionError {
    /// Failed to load engine models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The engine failed while recognizing text.
    #[error("text recognition failed: {0}")]
    Engine(String),

    /// Recorded observations could not be read.
    #[error("failed to read observations: {0}")]
    Observations(String),
}

/// Classified failure of one recognition request.
///
/// Every variant maps to exactly one process exit code and one
/// single-line diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The request envelope could not be decoded into the payload schema.
    #[error("malformed_request: {0}")]
    MalformedRequest(String),

    /// A payload field is semantically invalid.
    #[error("validation_error: {0}")]
    Validation(String),

    /// The recognition engine failed.
    #[error("vision_error: {0}")]
    Recognition(String),

    /// Anything the pipeline did not anticipate.
    #[error("internal_error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceError::MalformedRequest(_) | ServiceError::Validation(_) => 2,
            ServiceError::Recognition(_) => 3,
            ServiceError::Internal(_) => 4,
        }
    }

    /// Stable kind tag, as used in the message prefix.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::MalformedRequest(_) => "malformed_request",
            ServiceError::Validation(_) => "validation_error",
            ServiceError::Recognition(_) => "vision_error",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<RecognitionError> for ServiceError {
    fn from(err: RecognitionError) -> Self {
        ServiceError::Recognition(err.to_string())
    }
}

/// Errors related to receipt and image storage.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record exists for the given id or token.
    #[error("not found: {0}")]
    NotFound(String),

    /// The draft or record is not acceptable.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backing storage failed.
    #[error("storage failure: {0}")]
    Backend(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
