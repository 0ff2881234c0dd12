use std::sync::Arc;

use anyhow::Context;
use capture_core::CaptureConfig;
use capture_db::{connect, run_migrations, CaptureRepository, InMemoryCaptureRepository, PgCaptureRepository};
use capture_storage::{CaptureStorage, LocalStorage};
use capture_worker::{CaptureDispatcher, DispatchQueue, LogSink};

use crate::access::CaptureAccessService;
use crate::ingest::IngestionService;

/// Ingestion and access services sharing one set of ports.
pub struct CaptureServices {
    pub ingestion: IngestionService,
    pub access: CaptureAccessService,
    dispatch_queue: Option<Arc<DispatchQueue>>,
}

impl CaptureServices {
    pub fn new(
        storage: Arc<dyn CaptureStorage>,
        repository: Arc<dyn CaptureRepository>,
        dispatcher: Arc<dyn CaptureDispatcher>,
    ) -> Self {
        Self {
            ingestion: IngestionService::new(storage.clone(), repository.clone(), dispatcher),
            access: CaptureAccessService::new(storage, repository),
            dispatch_queue: None,
        }
    }

    /// Build local storage, the configured repository and a dispatch queue
    /// feeding [`LogSink`]. Must be called inside a tokio runtime.
    pub async fn from_config(config: &CaptureConfig) -> anyhow::Result<Self> {
        let storage = LocalStorage::new(config.storage.clone())
            .await
            .context("Failed to initialize capture storage")?;
        tracing::info!(
            root = %storage.base_path().display(),
            max_size_mb = config.storage.max_size_mb,
            "Capture storage ready"
        );

        let repository: Arc<dyn CaptureRepository> = match &config.database_url {
            Some(url) => {
                let pool = connect(config, url).await?;
                run_migrations(&pool).await?;
                Arc::new(PgCaptureRepository::new(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, capture records are kept in memory");
                Arc::new(InMemoryCaptureRepository::new())
            }
        };

        let queue = Arc::new(DispatchQueue::new(&config.dispatch, Arc::new(LogSink)));

        let mut services = Self::new(Arc::new(storage), repository, queue.clone());
        services.dispatch_queue = Some(queue);
        Ok(services)
    }

    /// Drain pending dispatches. A no-op for services built with [`Self::new`].
    pub async fn shutdown(&self) {
        if let Some(queue) = &self.dispatch_queue {
            queue.shutdown().await;
        }
    }
}
