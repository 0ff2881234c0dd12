use std::path::Path;

use anyhow::Context;
use capture_core::models::UploadedFile;
use capture_core::{AppError, ErrorMetadata, LogLevel};

/// Guess a media type from a file extension. Unknown extensions map to
/// `application/octet-stream`, which the storage port then refuses.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("m4v") => "video/x-m4v",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("avi") => "video/x-msvideo",
        Some("mpeg") | Some("mpg") => "video/mpeg",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

/// Read a file from disk into an upload, keeping its file name.
pub async fn read_upload(path: &Path, content_type: Option<&str>) -> anyhow::Result<UploadedFile> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = content_type.unwrap_or_else(|| content_type_for(path));
    Ok(UploadedFile::new(name, content_type, data))
}

/// Log an application error at the level its metadata asks for and turn it
/// into a CLI failure.
///
/// The full error chain is only shown outside production and only for errors
/// that are not sensitive; otherwise the client message is used.
pub fn report_error(err: AppError, production: bool) -> anyhow::Error {
    let error_type = err.error_type();
    match err.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %err, error_type = error_type, "Command failed");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %err, error_type = error_type, "Command failed");
        }
        LogLevel::Error => {
            tracing::error!(error = %err, error_type = error_type, "Command failed");
        }
    }

    let message = if production || err.is_sensitive() {
        err.client_message()
    } else {
        err.detailed_message()
    };
    let mut out = format!(
        "{} ({}): {}",
        err.error_code(),
        err.http_status_code(),
        message
    );
    if let Some(action) = err.suggested_action() {
        out.push_str(&format!("\nHint: {}", action));
    }
    anyhow::anyhow!(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_extensions() {
        assert_eq!(content_type_for(Path::new("clip.mp4")), "video/mp4");
        assert_eq!(content_type_for(Path::new("CLIP.MOV")), "video/quicktime");
        assert_eq!(content_type_for(Path::new("dir/a.b.webm")), "video/webm");
    }

    #[test]
    fn test_non_video_extensions() {
        assert_eq!(content_type_for(Path::new("b.jpg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_read_upload_keeps_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        tokio::fs::write(&path, b"frames").await.unwrap();

        let upload = read_upload(&path, None).await.unwrap();
        assert_eq!(upload.display_name(), "clip.mp4");
        assert_eq!(upload.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(upload.size_bytes, 6);

        let forced = read_upload(&path, Some("video/webm")).await.unwrap();
        assert_eq!(forced.content_type.as_deref(), Some("video/webm"));
    }

    #[test]
    fn test_report_shows_detail_for_non_sensitive_errors_outside_production() {
        let err = AppError::batch_aborted(
            "b.jpg",
            AppError::InvalidInput("Only video files are allowed (got: image/jpeg)".to_string()),
        );
        let message = report_error(err, false).to_string();
        assert!(message.starts_with("INVALID_INPUT (400): "));
        assert!(message.contains("Caused by: Invalid input: Only video files are allowed"));
        assert!(message.contains("Hint: Check the uploaded file and try again"));
    }

    #[test]
    fn test_report_hides_detail_for_sensitive_errors() {
        let err = AppError::Storage("disk full at /var/captures".to_string());
        let message = report_error(err, false).to_string();
        assert!(message.starts_with("STORAGE_ERROR (500): Failed to access storage"));
        assert!(!message.contains("/var/captures"));
    }

    #[test]
    fn test_report_uses_client_message_in_production() {
        let err = AppError::batch_aborted(
            "b.jpg",
            AppError::InvalidInput("Only video files are allowed".to_string()),
        );
        let message = report_error(err, true).to_string();
        assert!(message.contains("Failed to process file b.jpg: Only video files are allowed"));
        assert!(!message.contains("Caused by"));
    }
}
