//! Capture Storage Library
//!
//! Storage port for capture uploads and its local filesystem adapter.
//!
//! # Locator format
//!
//! A locator is the generated file name relative to the configured root
//! directory: `{uuid}{.ext}`. Locators must not contain `..` or a leading `/`.
//! Name generation lives in the `keys` module.

pub(crate) mod keys;
pub mod local;
pub mod traits;
pub mod validation;

pub use local::LocalStorage;
pub use traits::{CaptureStorage, StorageError, StorageResult};
pub use validation::{UploadValidator, ValidationError};
