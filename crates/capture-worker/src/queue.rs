//! Dispatch queue: bounded hand-off channel feeding a worker pool.
//!
//! Callers never wait on the pool. A full or closed queue drops the
//! notification and logs it; nothing is retried and nothing is reported back.

use std::sync::{Arc, Mutex};

use capture_core::constants::{MAX_DISPATCH_CONCURRENT, MAX_DISPATCH_QUEUE_SIZE};
use capture_core::DispatchConfig;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;

use crate::message::ProcessingMessage;
use crate::sink::ProcessingSink;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Dispatch queue is full")]
    QueueFull,

    #[error("Dispatch queue is closed")]
    QueueClosed,

    #[error("Failed to serialize processing message: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Port for announcing a new capture to downstream processing.
///
/// `notify` returns as soon as the work is scheduled. Implementations absorb
/// every failure: the caller gets no acknowledgment and no error.
pub trait CaptureDispatcher: Send + Sync {
    fn notify(&self, capture_id: i64, owner_id: i64, owner_email: &str, location: &str);
}

pub struct DispatchQueue {
    tx: mpsc::Sender<ProcessingMessage>,
    shutdown_tx: mpsc::Sender<()>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DispatchQueue {
    /// Create the queue and spawn its worker pool on the current runtime.
    ///
    /// Out-of-range sizes are clamped to `1..=MAX_DISPATCH_QUEUE_SIZE` and
    /// `1..=MAX_DISPATCH_CONCURRENT`.
    pub fn new(config: &DispatchConfig, sink: Arc<dyn ProcessingSink>) -> Self {
        let queue_size = config.queue_size.clamp(1, MAX_DISPATCH_QUEUE_SIZE);
        let max_concurrent = config.max_concurrent.clamp(1, MAX_DISPATCH_CONCURRENT);
        if queue_size != config.queue_size || max_concurrent != config.max_concurrent {
            tracing::warn!(
                requested_queue_size = config.queue_size,
                requested_max_concurrent = config.max_concurrent,
                queue_size = queue_size,
                max_concurrent = max_concurrent,
                "Dispatch settings out of range, clamped"
            );
        }
        // MAX_DISPATCH_CONCURRENT fits in u32.
        let permits = u32::try_from(max_concurrent).unwrap_or(1);

        let (tx, rx) = mpsc::channel(queue_size);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let worker = tokio::spawn(async move {
            Self::worker_pool(rx, shutdown_rx, sink, permits).await;
        });

        tracing::info!(
            queue_size = queue_size,
            max_concurrent = max_concurrent,
            "Dispatch queue initialized with bounded channel"
        );

        Self {
            tx,
            shutdown_tx,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Enqueue a message without waiting. Fails fast when the queue is full.
    #[tracing::instrument(skip(self, message), fields(capture.id = message.capture_id))]
    pub fn submit(&self, message: ProcessingMessage) -> Result<(), DispatchError> {
        self.tx.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DispatchError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DispatchError::QueueClosed,
        })?;
        tracing::debug!("Processing message enqueued");
        Ok(())
    }

    /// Stop accepting messages, deliver what is already queued, and wait for
    /// in-flight deliveries to finish.
    pub async fn shutdown(&self) {
        tracing::info!("Initiating dispatch queue shutdown");
        let _ = self.shutdown_tx.send(()).await;

        let worker = self.worker.lock().ok().and_then(|mut w| w.take());
        if let Some(worker) = worker {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Dispatch worker pool terminated abnormally");
            }
        }
    }

    async fn worker_pool(
        mut rx: mpsc::Receiver<ProcessingMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
        sink: Arc<dyn ProcessingSink>,
        permits: u32,
    ) {
        let semaphore = Arc::new(Semaphore::new(permits as usize));

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    rx.close();
                    while let Some(message) = rx.recv().await {
                        Self::spawn_delivery(message, &semaphore, &sink).await;
                    }
                    break;
                }
                received = rx.recv() => match received {
                    Some(message) => Self::spawn_delivery(message, &semaphore, &sink).await,
                    None => break,
                },
            }
        }

        // Every permit back means every spawned delivery has finished.
        let _ = semaphore.acquire_many(permits).await;
        tracing::info!("Dispatch worker pool stopped");
    }

    async fn spawn_delivery(
        message: ProcessingMessage,
        semaphore: &Arc<Semaphore>,
        sink: &Arc<dyn ProcessingSink>,
    ) {
        let permit = match semaphore.clone().acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::error!(error = %e, capture.id = message.capture_id, "Dispatch worker unavailable");
                return;
            }
        };
        let sink = sink.clone();

        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = Self::deliver(&message, sink.as_ref()).await {
                tracing::error!(
                    error = %e,
                    capture.id = message.capture_id,
                    "Failed to deliver processing message"
                );
            }
        });
    }

    #[tracing::instrument(skip(message, sink), fields(capture.id = message.capture_id))]
    async fn deliver(message: &ProcessingMessage, sink: &dyn ProcessingSink) -> Result<(), DispatchError> {
        let payload = message.to_json()?;
        sink.deliver(message, &payload).await
    }
}

impl CaptureDispatcher for DispatchQueue {
    fn notify(&self, capture_id: i64, owner_id: i64, owner_email: &str, location: &str) {
        let message = ProcessingMessage::new(capture_id, owner_id, owner_email, location);
        if let Err(e) = self.submit(message) {
            tracing::warn!(
                error = %e,
                capture.id = capture_id,
                "Dispatch dropped, capture will not reach processing"
            );
        }
    }
}
