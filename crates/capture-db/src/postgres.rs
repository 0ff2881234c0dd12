use anyhow::Context;
use async_trait::async_trait;
use capture_core::models::CaptureRecord;
use capture_core::{AppError, CaptureConfig};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use std::path::Path;
use std::time::Duration;

use crate::repository::CaptureRepository;

const CAPTURE_COLUMNS: &str = "id, owner_id, owner_email, status, location, created_at, updated_at";

/// Open a connection pool using the database settings from `config`.
pub async fn connect(config: &CaptureConfig, database_url: &str) -> anyhow::Result<PgPool> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connected successfully"
    );
    Ok(pool)
}

/// Apply the migrations shipped with this crate.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");
    Ok(())
}

#[derive(Clone)]
pub struct PgCaptureRepository {
    pool: PgPool,
}

impl PgCaptureRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, record: CaptureRecord) -> Result<CaptureRecord, AppError> {
        let query = format!(
            r#"
            INSERT INTO captures (owner_id, owner_email, status, location, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            CAPTURE_COLUMNS
        );
        let saved = sqlx::query_as::<Postgres, CaptureRecord>(&query)
            .bind(record.owner_id)
            .bind(&record.owner_email)
            .bind(record.status)
            .bind(&record.location)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(saved)
    }

    async fn update(&self, id: i64, record: CaptureRecord) -> Result<CaptureRecord, AppError> {
        let query = format!(
            r#"
            UPDATE captures
            SET status = $2, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            CAPTURE_COLUMNS
        );
        sqlx::query_as::<Postgres, CaptureRecord>(&query)
            .bind(id)
            .bind(record.status)
            .bind(record.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Capture not found with ID: {}", id)))
    }
}

#[async_trait]
impl CaptureRepository for PgCaptureRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "captures", db.operation = "save", capture.id = ?record.id))]
    async fn save(&self, record: CaptureRecord) -> Result<CaptureRecord, AppError> {
        match record.id {
            None => self.insert(record).await,
            Some(id) => self.update(id, record).await,
        }
    }

    #[tracing::instrument(skip(self), fields(db.table = "captures", db.operation = "select", db.record_id = id))]
    async fn find_by_id(&self, id: i64) -> Result<Option<CaptureRecord>, AppError> {
        let query = format!("SELECT {} FROM captures WHERE id = $1", CAPTURE_COLUMNS);
        let record = sqlx::query_as::<Postgres, CaptureRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(db.table = "captures", db.operation = "select", owner.id = owner_id))]
    async fn find_by_owner(&self, owner_id: i64) -> Result<Vec<CaptureRecord>, AppError> {
        let query = format!(
            "SELECT {} FROM captures WHERE owner_id = $1 ORDER BY id ASC",
            CAPTURE_COLUMNS
        );
        let records = sqlx::query_as::<Postgres, CaptureRecord>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    #[tracing::instrument(skip(self), fields(db.table = "captures", db.operation = "delete", db.record_id = id))]
    async fn delete_by_id(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM captures WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "captures", db.operation = "select"))]
    async fn find_all(&self) -> Result<Vec<CaptureRecord>, AppError> {
        let query = format!("SELECT {} FROM captures ORDER BY id ASC", CAPTURE_COLUMNS);
        let records = sqlx::query_as::<Postgres, CaptureRecord>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }
}
