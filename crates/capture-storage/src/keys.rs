use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

/// Fresh collision-resistant name that keeps the original extension.
///
/// `extension` includes its leading dot, as returned by
/// `UploadedFile::extension`.
pub(crate) fn generate_locator(extension: Option<&str>) -> String {
    format!("{}{}", Uuid::new_v4(), sanitize_extension(extension))
}

// Extensions come from caller-supplied names; drop anything that could leave the root.
fn sanitize_extension(extension: Option<&str>) -> &str {
    match extension {
        Some(ext) if !ext.contains('/') && !ext.contains('\\') && ext != "." => ext,
        _ => "",
    }
}

pub(crate) fn validate_locator(locator: &str) -> StorageResult<()> {
    if locator.is_empty() {
        return Err(StorageError::InvalidKey("Locator is empty".to_string()));
    }
    if locator.contains("..") || locator.starts_with('/') || locator.starts_with('\\') {
        return Err(StorageError::InvalidKey(
            "Locator contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
