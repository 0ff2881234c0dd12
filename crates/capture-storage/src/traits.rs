//! Storage abstraction trait
//!
//! Defines the port every capture storage backend implements and the errors
//! it reports.

use async_trait::async_trait;
use capture_core::models::{StoredFile, UploadedFile};
use capture_core::AppError;
use thiserror::Error;

use crate::validation::ValidationError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid file: {0}")]
    InvalidFile(#[from] ValidationError),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage locator: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidFile(e) => AppError::InvalidInput(e.to_string()),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::NotFound(locator) => {
                AppError::NotFound(format!("Stored file not found: {}", locator))
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage port for capture files.
///
/// Implementations validate uploads before writing anything, name each stored
/// file uniquely so concurrent callers never contend on a destination, and
/// return a locator that later resolves back to the same bytes.
#[async_trait]
pub trait CaptureStorage: Send + Sync {
    /// Validate and persist a file, returning its locator.
    async fn store(&self, file: &UploadedFile) -> StorageResult<String>;

    /// Load a stored file. `NotFound` when nothing exists at the locator.
    async fn load(&self, locator: &str) -> StorageResult<StoredFile>;

    /// Remove a stored file. Deleting a missing file succeeds.
    async fn delete(&self, locator: &str) -> StorageResult<()>;

    async fn exists(&self, locator: &str) -> StorageResult<bool>;
}
