use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[cfg(feature = "sqlx")]
use sqlx::FromRow;

use crate::constants::UPLOAD_SUCCESS_MESSAGE;
use crate::error::AppError;

/// Processing lifecycle of a capture.
///
/// `Pending` is assigned at construction, `Processing` once ingestion begins,
/// and `Completed` / `Failed` once the downstream processor (or an operator)
/// reports an outcome.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "capture_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl CaptureStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptureStatus::Pending => "pending",
            CaptureStatus::Processing => "processing",
            CaptureStatus::Completed => "completed",
            CaptureStatus::Failed => "failed",
        }
    }
}

impl Display for CaptureStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

/// Case-insensitive: `"COMPLETED"`, `"Completed"` and `"completed"` all parse.
impl FromStr for CaptureStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(CaptureStatus::Pending),
            "processing" => Ok(CaptureStatus::Processing),
            "completed" => Ok(CaptureStatus::Completed),
            "failed" => Ok(CaptureStatus::Failed),
            _ => Err(AppError::InvalidInput(format!(
                "Invalid capture status: {}",
                s
            ))),
        }
    }
}

/// One submitted media file and its processing state.
///
/// Only `status` and `updated_at` ever change after construction, and only
/// through [`CaptureRecord::transition_to`] and the helpers built on it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "sqlx", derive(FromRow))]
pub struct CaptureRecord {
    /// Assigned by the persistence port on first save.
    pub id: Option<i64>,
    pub owner_id: i64,
    pub owner_email: String,
    pub status: CaptureStatus,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaptureRecord {
    pub fn new(owner_id: i64, owner_email: impl Into<String>, location: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            owner_id,
            owner_email: owner_email.into(),
            status: CaptureStatus::Pending,
            location: location.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set any status from any other and refresh `updated_at`.
    pub fn transition_to(&mut self, status: CaptureStatus) {
        self.status = status;
        self.touch();
    }

    pub fn begin_processing(&mut self) {
        self.transition_to(CaptureStatus::Processing);
    }

    pub fn complete(&mut self) {
        self.transition_to(CaptureStatus::Completed);
    }

    pub fn fail(&mut self) {
        self.transition_to(CaptureStatus::Failed);
    }

    pub fn belongs_to(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    // updated_at never moves backwards, even if the wall clock does
    fn touch(&mut self) {
        let now = Utc::now();
        if now > self.updated_at {
            self.updated_at = now;
        }
    }
}

/// Capture as returned to callers. Only built from persisted records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptureResponse {
    pub id: i64,
    pub owner_id: i64,
    pub owner_email: String,
    pub status: CaptureStatus,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CaptureRecord> for CaptureResponse {
    type Error = AppError;

    fn try_from(record: CaptureRecord) -> Result<Self, Self::Error> {
        let id = record.id.ok_or_else(|| {
            AppError::Internal("Capture record has not been persisted".to_string())
        })?;
        Ok(CaptureResponse {
            id,
            owner_id: record.owner_id,
            owner_email: record.owner_email,
            status: record.status,
            location: record.location,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    pub message: String,
    pub captures: Vec<CaptureResponse>,
    pub total_files: usize,
}

impl UploadResponse {
    pub fn new(captures: Vec<CaptureResponse>, total_files: usize) -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
            captures,
            total_files,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn parse_status(&self) -> Result<CaptureStatus, AppError> {
        self.status.parse()
    }
}
