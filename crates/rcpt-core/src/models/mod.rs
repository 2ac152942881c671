//! Data models for receipts, recognition requests and configuration.

pub mod candidates;
pub mod config;
pub mod receipt;
pub mod request;
