//! Capture dispatch
//!
//! Hands newly ingested captures to a downstream processing pipeline without
//! making the caller wait. [`DispatchQueue`] is the worker-pool implementation
//! of the [`CaptureDispatcher`] port; where the message finally goes is
//! decided by a [`ProcessingSink`].

pub mod message;
pub mod queue;
pub mod sink;

pub use message::ProcessingMessage;
pub use queue::{CaptureDispatcher, DispatchError, DispatchQueue};
pub use sink::{LogSink, ProcessingSink};
