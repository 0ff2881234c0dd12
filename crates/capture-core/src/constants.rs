/// Bytes per size unit used for upload limits (MiB).
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Media type prefix every stored capture must declare.
pub const VIDEO_CONTENT_TYPE_PREFIX: &str = "video/";

/// Message returned to callers after a successful batch upload.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Upload completed successfully";

/// Upper bound for `DISPATCH_MAX_CONCURRENT`.
pub const MAX_DISPATCH_CONCURRENT: usize = 1024;

/// Upper bound for `DISPATCH_QUEUE_SIZE`.
pub const MAX_DISPATCH_QUEUE_SIZE: usize = 1_000_000;
