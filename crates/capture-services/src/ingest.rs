//! Batch ingestion: store, record, persist and dispatch each file in order.

use std::sync::Arc;

use capture_core::models::{CaptureRecord, UploadedFile};
use capture_core::AppError;
use capture_db::CaptureRepository;
use capture_storage::CaptureStorage;
use capture_worker::CaptureDispatcher;

#[derive(Clone)]
pub struct IngestionService {
    storage: Arc<dyn CaptureStorage>,
    repository: Arc<dyn CaptureRepository>,
    dispatcher: Arc<dyn CaptureDispatcher>,
}

impl IngestionService {
    pub fn new(
        storage: Arc<dyn CaptureStorage>,
        repository: Arc<dyn CaptureRepository>,
        dispatcher: Arc<dyn CaptureDispatcher>,
    ) -> Self {
        Self {
            storage,
            repository,
            dispatcher,
        }
    }

    /// Ingest `files` for one owner, strictly in input order.
    ///
    /// The first failing file aborts the batch with [`AppError::BatchAborted`]
    /// naming that file. Files handled before it stay stored, persisted and
    /// dispatched.
    #[tracing::instrument(skip(self, owner_email, files), fields(owner.id = owner_id, files.count = files.len()))]
    pub async fn ingest(
        &self,
        owner_id: i64,
        owner_email: &str,
        files: &[UploadedFile],
    ) -> Result<Vec<CaptureRecord>, AppError> {
        let mut captures = Vec::with_capacity(files.len());

        for file in files {
            let capture = self
                .ingest_one(owner_id, owner_email, file)
                .await
                .map_err(|e| {
                    tracing::warn!(
                        error = %e,
                        file.name = %file.display_name(),
                        ingested = captures.len(),
                        "Batch aborted"
                    );
                    AppError::batch_aborted(file.display_name(), e)
                })?;
            captures.push(capture);
        }

        if !captures.is_empty() {
            tracing::info!(count = captures.len(), "Captures ingested");
        }
        Ok(captures)
    }

    async fn ingest_one(
        &self,
        owner_id: i64,
        owner_email: &str,
        file: &UploadedFile,
    ) -> Result<CaptureRecord, AppError> {
        let location = self.storage.store(file).await?;

        let mut record = CaptureRecord::new(owner_id, owner_email, location);
        record.begin_processing();
        let saved = self.repository.save(record).await?;

        let capture_id = saved.id.ok_or_else(|| {
            AppError::Internal("Repository returned a capture without an id".to_string())
        })?;
        self.dispatcher
            .notify(capture_id, saved.owner_id, &saved.owner_email, &saved.location);

        tracing::debug!(capture.id = capture_id, location = %saved.location, "Capture ingested");
        Ok(saved)
    }
}
