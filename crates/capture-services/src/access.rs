use std::sync::Arc;

use capture_core::models::{CaptureRecord, CaptureStatus, StoredFile};
use capture_core::AppError;
use capture_db::CaptureRepository;
use capture_storage::CaptureStorage;

/// Owner-checked reads and status updates on existing captures.
#[derive(Clone)]
pub struct CaptureAccessService {
    storage: Arc<dyn CaptureStorage>,
    repository: Arc<dyn CaptureRepository>,
}

impl CaptureAccessService {
    pub fn new(storage: Arc<dyn CaptureStorage>, repository: Arc<dyn CaptureRepository>) -> Self {
        Self {
            storage,
            repository,
        }
    }

    /// Fetch a capture on behalf of `requester_id`, who must own it.
    #[tracing::instrument(skip(self), fields(capture.id = capture_id, requester.id = requester_id))]
    pub async fn authorize_and_fetch(
        &self,
        capture_id: i64,
        requester_id: i64,
    ) -> Result<CaptureRecord, AppError> {
        let record = self.find(capture_id).await?;
        if !record.belongs_to(requester_id) {
            tracing::debug!(owner.id = record.owner_id, "Requester does not own capture");
            return Err(AppError::Unauthorized(
                "You do not have permission to access this capture".to_string(),
            ));
        }
        Ok(record)
    }

    /// Load the stored bytes of a capture owned by `requester_id`.
    ///
    /// Storage is only touched once ownership is established.
    pub async fn download(&self, capture_id: i64, requester_id: i64) -> Result<StoredFile, AppError> {
        let record = self.authorize_and_fetch(capture_id, requester_id).await?;
        let file = self.storage.load(&record.location).await?;
        Ok(file)
    }

    /// Move a capture to `status`. Any current status may move to any other.
    // Not owner-scoped: the downstream processor reports outcomes through this.
    #[tracing::instrument(skip(self), fields(capture.id = capture_id, status = %status))]
    pub async fn update_status(
        &self,
        capture_id: i64,
        status: CaptureStatus,
    ) -> Result<CaptureRecord, AppError> {
        let mut record = self.find(capture_id).await?;
        let previous = record.status;
        record.transition_to(status);
        let saved = self.repository.save(record).await?;

        tracing::info!(from = %previous, to = %saved.status, "Capture status updated");
        Ok(saved)
    }

    pub async fn list_for_owner(&self, owner_id: i64) -> Result<Vec<CaptureRecord>, AppError> {
        self.repository.find_by_owner(owner_id).await
    }

    async fn find(&self, capture_id: i64) -> Result<CaptureRecord, AppError> {
        self.repository
            .find_by_id(capture_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Capture not found with ID: {}", capture_id)))
    }
}
