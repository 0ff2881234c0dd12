use crate::keys::{generate_locator, validate_locator};
use crate::traits::{CaptureStorage, StorageError, StorageResult};
use crate::validation::UploadValidator;
use async_trait::async_trait;
use bytes::Bytes;
use capture_core::models::{StoredFile, UploadedFile};
use capture_core::StorageConfig;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage for capture files
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    validator: UploadValidator,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at `config.root_path`, creating the
    /// directory if it does not exist yet.
    pub async fn new(config: StorageConfig) -> StorageResult<Self> {
        let storage = LocalStorage {
            base_path: config.root_path,
            validator: UploadValidator::new(config.max_size_mb),
        };
        storage.ensure_root().await?;
        Ok(storage)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    async fn ensure_root(&self) -> StorageResult<()> {
        fs::create_dir_all(&self.base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                self.base_path.display(),
                e
            ))
        })
    }

    /// Convert a locator to a filesystem path, refusing anything that would
    /// resolve outside the storage root.
    fn locator_to_path(&self, locator: &str) -> StorageResult<PathBuf> {
        validate_locator(locator)?;

        let path = self.base_path.join(locator);

        if let (Ok(base), Ok(canonical)) = (self.base_path.canonicalize(), path.canonicalize()) {
            if canonical.strip_prefix(&base).is_err() {
                return Err(StorageError::InvalidKey(
                    "Locator resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }
}

#[async_trait]
impl CaptureStorage for LocalStorage {
    #[tracing::instrument(skip(self, file), fields(file.name = %file.display_name(), file.size = file.size_bytes))]
    async fn store(&self, file: &UploadedFile) -> StorageResult<String> {
        self.validator.validate(file)?;

        self.ensure_root().await?;

        let locator = generate_locator(file.extension());
        let path = self.locator_to_path(&locator)?;
        let start = std::time::Instant::now();

        let mut out = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        out.write_all(&file.data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        out.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            locator = %locator,
            size_bytes = file.data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage store successful"
        );

        Ok(locator)
    }

    async fn load(&self, locator: &str) -> StorageResult<StoredFile> {
        let path = self.locator_to_path(locator)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(locator.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            locator = %locator,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage load successful"
        );

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(locator)
            .to_string();

        Ok(StoredFile {
            locator: locator.to_string(),
            file_name,
            data: Bytes::from(data),
        })
    }

    async fn delete(&self, locator: &str) -> StorageResult<()> {
        let path = self.locator_to_path(locator)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), locator = %locator, "Local storage delete successful");

        Ok(())
    }

    async fn exists(&self, locator: &str) -> StorageResult<bool> {
        let path = self.locator_to_path(locator)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }
}
