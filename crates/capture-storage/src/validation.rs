use capture_core::constants::{BYTES_PER_MB, VIDEO_CONTENT_TYPE_PREFIX};
use capture_core::models::UploadedFile;

/// Reasons an upload is refused before it reaches disk
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Empty or missing file")]
    EmptyFile,

    #[error("File too large: {size_mb} MB (max: {max_mb} MB)")]
    FileTooLarge { size_mb: u64, max_mb: u64 },

    #[error("Only video files are allowed (got: {0})")]
    InvalidContentType(String),
}

/// Upload validator for capture files.
///
/// Checks run in a fixed order: payload present, declared size within the
/// limit, declared media type is a video type.
#[derive(Debug, Clone)]
pub struct UploadValidator {
    max_size_mb: u64,
}

impl UploadValidator {
    pub fn new(max_size_mb: u64) -> Self {
        Self { max_size_mb }
    }

    pub fn validate(&self, file: &UploadedFile) -> Result<(), ValidationError> {
        if file.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        self.validate_size(file.size_bytes)?;
        self.validate_content_type(file.content_type.as_deref())
    }

    /// The declared size is truncated to whole megabytes before comparing, so a
    /// file exactly at the limit (or less than a megabyte over it) is accepted.
    pub fn validate_size(&self, size_bytes: u64) -> Result<(), ValidationError> {
        let size_mb = size_bytes / BYTES_PER_MB;
        if size_mb > self.max_size_mb {
            return Err(ValidationError::FileTooLarge {
                size_mb,
                max_mb: self.max_size_mb,
            });
        }
        Ok(())
    }

    pub fn validate_content_type(&self, content_type: Option<&str>) -> Result<(), ValidationError> {
        match content_type {
            Some(ct) if ct.to_lowercase().starts_with(VIDEO_CONTENT_TYPE_PREFIX) => Ok(()),
            Some(ct) => Err(ValidationError::InvalidContentType(ct.to_string())),
            None => Err(ValidationError::InvalidContentType("none".to_string())),
        }
    }
}
