#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use capture_core::constants::BYTES_PER_MB;
use capture_core::models::{CaptureRecord, StoredFile, UploadedFile};
use capture_core::{AppError, StorageConfig};
use capture_db::{CaptureRepository, InMemoryCaptureRepository};
use capture_services::{CaptureAccessService, IngestionService};
use capture_storage::{CaptureStorage, LocalStorage, StorageResult};
use capture_worker::CaptureDispatcher;
use tempfile::TempDir;

/// Local storage that counts calls to each operation.
pub struct CountingStorage {
    inner: LocalStorage,
    pub stores: AtomicUsize,
    pub loads: AtomicUsize,
}

impl CountingStorage {
    pub fn stores(&self) -> usize {
        self.stores.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureStorage for CountingStorage {
    async fn store(&self, file: &UploadedFile) -> StorageResult<String> {
        self.stores.fetch_add(1, Ordering::SeqCst);
        self.inner.store(file).await
    }

    async fn load(&self, locator: &str) -> StorageResult<StoredFile> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(locator).await
    }

    async fn delete(&self, locator: &str) -> StorageResult<()> {
        self.inner.delete(locator).await
    }

    async fn exists(&self, locator: &str) -> StorageResult<bool> {
        self.inner.exists(locator).await
    }
}

/// In-memory repository that counts saves and can be told to fail them.
#[derive(Default)]
pub struct CountingRepository {
    pub inner: InMemoryCaptureRepository,
    saves: AtomicUsize,
    fail_saves: Mutex<bool>,
}

impl CountingRepository {
    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self) {
        *self.fail_saves.lock().unwrap() = true;
    }
}

#[async_trait]
impl CaptureRepository for CountingRepository {
    async fn save(&self, record: CaptureRecord) -> Result<CaptureRecord, AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if *self.fail_saves.lock().unwrap() {
            return Err(AppError::Internal("connection reset".to_string()));
        }
        self.inner.save(record).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CaptureRecord>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<CaptureRecord>, AppError> {
        self.inner.find_by_owner(owner_id).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        self.inner.delete_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<CaptureRecord>, AppError> {
        self.inner.find_all().await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub capture_id: i64,
    pub owner_id: i64,
    pub owner_email: String,
    pub location: String,
}

#[derive(Default)]
pub struct RecordingDispatcher {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl CaptureDispatcher for RecordingDispatcher {
    fn notify(&self, capture_id: i64, owner_id: i64, owner_email: &str, location: &str) {
        self.notifications.lock().unwrap().push(Notification {
            capture_id,
            owner_id,
            owner_email: owner_email.to_string(),
            location: location.to_string(),
        });
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub storage: Arc<CountingStorage>,
    pub repository: Arc<CountingRepository>,
    pub dispatcher: Arc<RecordingDispatcher>,
    pub ingestion: IngestionService,
    pub access: CaptureAccessService,
}

pub async fn harness(max_size_mb: u64) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let inner = LocalStorage::new(StorageConfig::new(dir.path(), max_size_mb))
        .await
        .unwrap();
    let storage = Arc::new(CountingStorage {
        inner,
        stores: AtomicUsize::new(0),
        loads: AtomicUsize::new(0),
    });
    let repository = Arc::new(CountingRepository::default());
    let dispatcher = Arc::new(RecordingDispatcher::default());

    let ingestion = IngestionService::new(storage.clone(), repository.clone(), dispatcher.clone());
    let access = CaptureAccessService::new(storage.clone(), repository.clone());

    Harness {
        dir,
        storage,
        repository,
        dispatcher,
        ingestion,
        access,
    }
}

pub fn video(name: &str, data: &[u8]) -> UploadedFile {
    UploadedFile::new(name, "video/mp4", data.to_vec())
}

pub fn one_mib_video(name: &str) -> UploadedFile {
    UploadedFile::new(name, "video/mp4", vec![7u8; BYTES_PER_MB as usize])
}
