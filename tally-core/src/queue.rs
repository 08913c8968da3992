//! Bounded FIFO queue between the HTTP boundary and the worker pool.
//!
//! Built on a `tokio::sync::mpsc` channel. The single receiver sits behind a
//! mutex so any number of workers can share it; each request is handed to
//! exactly one of them, in global submission order.

use crate::config::OverflowPolicy;
use crate::model::UpdateRequest;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

/// A submission that could not be queued. The request is handed back so it
/// is never silently dropped.
#[derive(Debug, Error)]
pub enum EnqueueError {
    #[error("request queue is full")]
    QueueFull(UpdateRequest),

    #[error("request queue is closed")]
    Closed(UpdateRequest),
}

impl EnqueueError {
    pub fn into_request(self) -> UpdateRequest {
        match self {
            EnqueueError::QueueFull(req) | EnqueueError::Closed(req) => req,
        }
    }
}

/// Create a request queue holding at most `capacity` pending requests.
///
/// A capacity of zero is raised to one.
pub fn request_queue(
    capacity: usize,
    overflow: OverflowPolicy,
) -> (RequestSender, RequestReceiver) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        RequestSender { tx, overflow },
        RequestReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Submitting half of the queue. Clone one per producer.
#[derive(Debug, Clone)]
pub struct RequestSender {
    tx: mpsc::Sender<UpdateRequest>,
    overflow: OverflowPolicy,
}

impl RequestSender {
    /// Queue `req` if a slot is free, without waiting.
    pub fn try_enqueue(&self, req: UpdateRequest) -> Result<(), EnqueueError> {
        self.tx.try_send(req).map_err(|e| match e {
            mpsc::error::TrySendError::Full(req) => EnqueueError::QueueFull(req),
            mpsc::error::TrySendError::Closed(req) => EnqueueError::Closed(req),
        })
    }

    /// Queue `req`, waiting for a free slot if the queue is full.
    pub async fn enqueue(&self, req: UpdateRequest) -> Result<(), EnqueueError> {
        self.tx
            .send(req)
            .await
            .map_err(|mpsc::error::SendError(req)| EnqueueError::Closed(req))
    }

    /// Queue `req` following the configured [`OverflowPolicy`].
    pub async fn submit(&self, req: UpdateRequest) -> Result<(), EnqueueError> {
        match self.overflow {
            OverflowPolicy::Reject => self.try_enqueue(req),
            OverflowPolicy::Block => self.enqueue(req).await,
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consuming half of the queue, shared by every worker.
#[derive(Debug, Clone)]
pub struct RequestReceiver {
    rx: Arc<Mutex<mpsc::Receiver<UpdateRequest>>>,
}

impl RequestReceiver {
    /// Wait for the next request.
    ///
    /// Returns `None` once every [`RequestSender`] is dropped and the queue
    /// has been drained.
    pub async fn dequeue(&self) -> Option<UpdateRequest> {
        self.rx.lock().await.recv().await
    }
}
