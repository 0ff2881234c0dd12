//! Capture Core Library
//!
//! Domain models, error types and configuration shared by every capture
//! ingestion component: storage, persistence, dispatch and the services that
//! coordinate them.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

pub use config::{CaptureConfig, DispatchConfig, StorageConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
