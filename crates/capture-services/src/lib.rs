//! Capture services
//!
//! [`IngestionService`] turns a batch of uploaded files into persisted,
//! dispatched capture records. [`CaptureAccessService`] guards reads by owner
//! and applies status updates. [`CaptureServices`] wires both to concrete
//! adapters from a [`capture_core::CaptureConfig`].

pub mod access;
pub mod ingest;
pub mod state;
pub mod telemetry;

pub use access::CaptureAccessService;
pub use ingest::IngestionService;
pub use state::CaptureServices;
pub use telemetry::init_telemetry;
