use async_trait::async_trait;
use capture_core::models::CaptureRecord;
use capture_core::AppError;

/// Durable store for capture records.
///
/// `save` is an upsert: a record without an id is inserted and assigned a
/// fresh one, a record with an id is updated in place. Only `status` and
/// `updated_at` are written on update, and updating an id with no stored row
/// fails with `NotFound` rather than inserting it. Concurrent saves of two new records
/// always receive distinct ids; concurrent updates of the same record are
/// last-write-wins.
#[async_trait]
pub trait CaptureRepository: Send + Sync {
    async fn save(&self, record: CaptureRecord) -> Result<CaptureRecord, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<CaptureRecord>, AppError>;

    /// Records owned by `owner_id`, ordered by ascending id.
    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<CaptureRecord>, AppError>;

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError>;

    /// All records, ordered by ascending id.
    async fn find_all(&self) -> Result<Vec<CaptureRecord>, AppError>;
}
