use bytes::Bytes;

/// A file as submitted by a caller, before it reaches storage.
///
/// `size_bytes` is the size the caller declared; the storage port validates
/// against it rather than against `data.len()`.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: Option<String>,
    pub content_type: Option<String>,
    pub size_bytes: u64,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        Self {
            original_name: Some(original_name.into()),
            content_type: Some(content_type.into()),
            size_bytes: data.len() as u64,
            data,
        }
    }

    /// Name used in error messages and logs.
    pub fn display_name(&self) -> &str {
        self.original_name.as_deref().unwrap_or("<unnamed>")
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extension of the original name including the leading dot, taken from
    /// the last `.`-delimited segment. `None` when the name has no dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.original_name.as_deref()?;
        name.rfind('.').map(|idx| &name[idx..])
    }
}

/// Bytes loaded back from storage by locator.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub locator: String,
    /// Final path segment of the locator, suitable for a download filename.
    pub file_name: String,
    pub data: Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_uses_last_segment() {
        let file = UploadedFile::new("holiday.final.mp4", "video/mp4", &b"x"[..]);
        assert_eq!(file.extension(), Some(".mp4"));
    }

    #[test]
    fn test_extension_absent() {
        let file = UploadedFile::new("README", "video/mp4", &b"x"[..]);
        assert_eq!(file.extension(), None);

        let mut unnamed = file.clone();
        unnamed.original_name = None;
        assert_eq!(unnamed.extension(), None);
        assert_eq!(unnamed.display_name(), "<unnamed>");
    }

    #[test]
    fn test_declared_size_defaults_to_payload_length() {
        let file = UploadedFile::new("a.mp4", "video/mp4", vec![0u8; 16]);
        assert_eq!(file.size_bytes, 16);
        assert!(!file.is_empty());
    }
}
