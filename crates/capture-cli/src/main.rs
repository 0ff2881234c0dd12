//! Capture CLI: ingest, list, download and update captures from the shell.
//!
//! Configuration comes from the environment (see `CaptureConfig::from_env`).
//! Without DATABASE_URL records only live for the duration of one command.

use std::path::PathBuf;

use anyhow::Context;
use capture_cli::{read_upload, report_error};
use capture_core::models::{CaptureResponse, UpdateStatusRequest, UploadResponse};
use capture_core::{AppError, CaptureConfig};
use capture_services::{init_telemetry, CaptureServices};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "capture", about = "Capture ingestion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store and register one or more video files for an owner
    Ingest {
        /// Owner (user) id
        #[arg(long)]
        owner: i64,
        /// Owner contact email
        #[arg(long)]
        email: String,
        /// Override the media type guessed from each file extension
        #[arg(long)]
        content_type: Option<String>,
        /// Files to ingest, processed in the given order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// List an owner's captures
    List {
        #[arg(long)]
        owner: i64,
    },
    /// Write a capture's stored bytes to disk
    Download {
        /// Capture id
        id: i64,
        /// Requesting owner id
        #[arg(long)]
        owner: i64,
        /// Output path (defaults to the stored file name in the current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Set a capture's status (pending, processing, completed, failed)
    UpdateStatus {
        /// Capture id
        id: i64,
        status: String,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn to_responses(
    records: Vec<capture_core::models::CaptureRecord>,
) -> Result<Vec<CaptureResponse>, AppError> {
    records.into_iter().map(CaptureResponse::try_from).collect()
}

async fn run(services: &CaptureServices, command: Commands, production: bool) -> anyhow::Result<()> {
    let report = move |err: AppError| report_error(err, production);

    match command {
        Commands::Ingest {
            owner,
            email,
            content_type,
            files,
        } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(read_upload(path, content_type.as_deref()).await?);
            }
            let captures = services
                .ingestion
                .ingest(owner, &email, &uploads)
                .await
                .map_err(report)?;
            let response = UploadResponse::new(to_responses(captures).map_err(report)?, uploads.len());
            print_json(&response)?;
        }
        Commands::List { owner } => {
            let captures = services.access.list_for_owner(owner).await.map_err(report)?;
            print_json(&to_responses(captures).map_err(report)?)?;
        }
        Commands::Download { id, owner, output } => {
            let file = services.access.download(id, owner).await.map_err(report)?;
            let path = output.unwrap_or_else(|| PathBuf::from(&file.file_name));
            tokio::fs::write(&path, &file.data)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_json(&serde_json::json!({
                "id": id,
                "path": path.display().to_string(),
                "size_bytes": file.data.len(),
            }))?;
        }
        Commands::UpdateStatus { id, status } => {
            let status = UpdateStatusRequest { status }
                .parse_status()
                .map_err(report)?;
            let record = services.access.update_status(id, status).await.map_err(report)?;
            print_json(&CaptureResponse::try_from(record).map_err(report)?)?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry()?;
    let cli = Cli::parse();

    let config = CaptureConfig::from_env().context("Failed to load configuration")?;
    let services = CaptureServices::from_config(&config).await?;

    let result = run(&services, cli.command, config.is_production()).await;
    services.shutdown().await;
    result
}
