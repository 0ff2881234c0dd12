//! Data models for capture ingestion
//!
//! `capture` holds the tracked record and its lifecycle; `upload` holds the
//! transient file payloads that move between callers and the storage port.

mod capture;
mod upload;

pub use capture::*;
pub use upload::*;
