//! Core library for receipt OCR.
//!
//! This crate provides:
//! - A one-shot recognition request protocol with classified failures
//! - Confidence filtering of recognized text lines
//! - Receipt field extraction (merchant, date, amounts, currency)
//! - Receipt record and image store interfaces

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod service;
pub mod store;

pub use error::{RcptError, RecognitionError, Result, ServiceError, StoreError};
pub use models::candidates::{AutoFillField, FieldCandidates};
pub use models::config::RcptConfig;
pub use models::receipt::{LineItem, Receipt, ReceiptDraft};
pub use models::request::{
    InvocationPayload, OcrResponse, OcrWarning, PreparedRequest, RecognitionLevel,
    VisionConfiguration,
};
pub use ocr::{
    filter_observations, FilteredText, RecognizedLine, ReplayRecognizer, StaticRecognizer,
    TextRecognizer,
};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use receipt::{CandidateExtractor, ReceiptExtractor};
pub use store::{ImageStore, MemoryImageStore, MemoryReceiptStore, ReceiptStore};
