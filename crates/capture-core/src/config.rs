//! Configuration module
//!
//! Settings are read once from the environment (and `.env` via `dotenvy`) into
//! explicit structs that are handed to each component at construction. No
//! component reads the environment on its own.

use std::env;
use std::path::PathBuf;

use crate::constants::{MAX_DISPATCH_CONCURRENT, MAX_DISPATCH_QUEUE_SIZE};

const STORAGE_PATH: &str = "./uploads/captures";
const MAX_VIDEO_SIZE_MB: u64 = 100;
const DB_MAX_CONNECTIONS: u32 = 5;
const DB_TIMEOUT_SECS: u64 = 30;
const DISPATCH_QUEUE_SIZE: usize = 1000;
const DISPATCH_MAX_CONCURRENT: usize = 4;

/// Settings for the storage adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Base directory for stored files; created on first use if missing.
    pub root_path: PathBuf,
    /// Largest accepted upload, in whole megabytes (MiB).
    pub max_size_mb: u64,
}

impl StorageConfig {
    pub fn new(root_path: impl Into<PathBuf>, max_size_mb: u64) -> Self {
        Self {
            root_path: root_path.into(),
            max_size_mb,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(STORAGE_PATH, MAX_VIDEO_SIZE_MB)
    }
}

/// Settings for the dispatch worker pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Bound of the hand-off channel. A full queue drops the notification.
    pub queue_size: usize,
    pub max_concurrent: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_size: DISPATCH_QUEUE_SIZE,
            max_concurrent: DISPATCH_MAX_CONCURRENT,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub environment: String,
    /// When unset, records are kept in memory for the life of the process.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub storage: StorageConfig,
    pub dispatch: DispatchConfig,
}

impl CaptureConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let max_size_mb = match env::var("CAPTURE_MAX_VIDEO_SIZE_MB") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                anyhow::anyhow!("CAPTURE_MAX_VIDEO_SIZE_MB must be a whole number of megabytes")
            })?,
            Err(_) => MAX_VIDEO_SIZE_MB,
        };

        let storage = StorageConfig {
            root_path: env::var("CAPTURE_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(STORAGE_PATH)),
            max_size_mb,
        };

        let dispatch = DispatchConfig {
            queue_size: env::var("DISPATCH_QUEUE_SIZE")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(DISPATCH_QUEUE_SIZE)
                .max(1),
            max_concurrent: env::var("DISPATCH_MAX_CONCURRENT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(DISPATCH_MAX_CONCURRENT)
                .max(1),
        };

        let config = CaptureConfig {
            environment,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.trim().is_empty()),
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| DB_MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(DB_MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| DB_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(DB_TIMEOUT_SECS),
            storage,
            dispatch,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage.max_size_mb == 0 {
            return Err(anyhow::anyhow!(
                "CAPTURE_MAX_VIDEO_SIZE_MB must be greater than zero"
            ));
        }
        if self.storage.root_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("CAPTURE_STORAGE_PATH cannot be empty"));
        }
        if self.db_max_connections == 0 {
            return Err(anyhow::anyhow!("DB_MAX_CONNECTIONS must be greater than zero"));
        }
        if !(1..=MAX_DISPATCH_CONCURRENT).contains(&self.dispatch.max_concurrent) {
            return Err(anyhow::anyhow!(
                "DISPATCH_MAX_CONCURRENT must be between 1 and {}",
                MAX_DISPATCH_CONCURRENT
            ));
        }
        if !(1..=MAX_DISPATCH_QUEUE_SIZE).contains(&self.dispatch.queue_size) {
            return Err(anyhow::anyhow!(
                "DISPATCH_QUEUE_SIZE must be between 1 and {}",
                MAX_DISPATCH_QUEUE_SIZE
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            database_url: None,
            db_max_connections: DB_MAX_CONNECTIONS,
            db_timeout_seconds: DB_TIMEOUT_SECS,
            storage: StorageConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }
}
