use async_trait::async_trait;
use capture_core::models::CaptureRecord;
use capture_core::AppError;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::repository::CaptureRepository;

/// Process-local capture store.
///
/// Ids come from an atomic counter so concurrent inserts never share one.
/// Records are kept in a `BTreeMap`, which gives ascending-id ordering for
/// the list queries.
#[derive(Clone, Default)]
pub struct InMemoryCaptureRepository {
    records: Arc<Mutex<BTreeMap<i64, CaptureRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryCaptureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> Result<MutexGuard<'_, BTreeMap<i64, CaptureRecord>>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::Internal("Capture store lock poisoned".to_string()))
    }
}

#[async_trait]
impl CaptureRepository for InMemoryCaptureRepository {
    async fn save(&self, mut record: CaptureRecord) -> Result<CaptureRecord, AppError> {
        let mut records = self.records()?;
        match record.id {
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                record.id = Some(id);
                records.insert(id, record.clone());
                Ok(record)
            }
            Some(id) => {
                let existing = records.get_mut(&id).ok_or_else(|| {
                    AppError::NotFound(format!("Capture not found with ID: {}", id))
                })?;
                existing.status = record.status;
                existing.updated_at = record.updated_at;
                Ok(existing.clone())
            }
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CaptureRecord>, AppError> {
        Ok(self.records()?.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<CaptureRecord>, AppError> {
        Ok(self
            .records()?
            .values()
            .filter(|r| r.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        self.records()?.remove(&id);
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<CaptureRecord>, AppError> {
        Ok(self.records()?.values().cloned().collect())
    }
}
