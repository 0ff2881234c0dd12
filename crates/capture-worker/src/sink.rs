use async_trait::async_trait;

use crate::message::ProcessingMessage;
use crate::queue::DispatchError;

/// Final destination of a dispatched capture (a broker, a webhook, ...).
///
/// Called from a dispatch worker, never from the ingesting caller.
#[async_trait]
pub trait ProcessingSink: Send + Sync {
    async fn deliver(&self, message: &ProcessingMessage, payload: &str) -> Result<(), DispatchError>;
}

/// Sink that records each message in the log and nothing else.
///
/// Stands in for a real broker until one is wired up.
#[derive(Debug, Default, Clone)]
pub struct LogSink;

#[async_trait]
impl ProcessingSink for LogSink {
    async fn deliver(&self, message: &ProcessingMessage, payload: &str) -> Result<(), DispatchError> {
        tracing::info!(payload = %payload, "Message sent to processing queue");
        tracing::info!(capture.id = message.capture_id, "Processing hand-off completed");
        Ok(())
    }
}
