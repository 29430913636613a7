//! # Activity Queue
//!
//! Typed queue messages replace free-form JSON bodies: a [`QueueMessage`] names
//! its queue and carries a text message, and is validated before dispatch.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum QueueError {
    #[error("Invalid queue message: {0}")]
    Invalid(String),

    #[error("Malformed queue payload: {0}")]
    Malformed(String),

    #[error("Queue unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    pub queue: String,
    pub message: String,
}

impl QueueMessage {
    pub fn new(queue: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            queue: queue.into(),
            message: message.into(),
        }
    }

    /// Both fields are required.
    pub fn validate(&self) -> Result<(), QueueError> {
        let missing = crate::model::blank_fields(&[
            ("queue", self.queue.as_str()),
            ("message", self.message.as_str()),
        ]);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(QueueError::Invalid(format!("missing {}", missing.join(", "))))
        }
    }

    /// Parses and validates a JSON request body.
    pub fn from_json(body: &str) -> Result<Self, QueueError> {
        let message: QueueMessage =
            serde_json::from_str(body).map_err(|e| QueueError::Malformed(e.to_string()))?;
        message.validate()?;
        Ok(message)
    }

    pub fn to_json(&self) -> Result<String, QueueError> {
        serde_json::to_string(self).map_err(|e| QueueError::Malformed(e.to_string()))
    }
}

#[async_trait]
pub trait MessageQueue: Send + Sync {
    async fn send(&self, message: QueueMessage) -> Result<(), QueueError>;
}

/// Sends and logs a failure instead of returning it.
pub async fn publish(queue: &dyn MessageQueue, message: QueueMessage) {
    let name = message.queue.clone();
    if let Err(e) = queue.send(message).await {
        warn!(queue = %name, error = %e, "Failed to publish activity");
    }
}

/// Named FIFO queues held in memory.
#[derive(Default)]
pub struct InMemoryQueue {
    queues: Mutex<HashMap<String, VecDeque<String>>>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pops the oldest message of `queue`.
    pub async fn receive(&self, queue: &str) -> Option<String> {
        self.queues.lock().await.get_mut(queue)?.pop_front()
    }

    pub async fn len(&self, queue: &str) -> usize {
        self.queues.lock().await.get(queue).map_or(0, VecDeque::len)
    }

    pub async fn is_empty(&self, queue: &str) -> bool {
        self.len(queue).await == 0
    }
}

#[async_trait]
impl MessageQueue for InMemoryQueue {
    async fn send(&self, message: QueueMessage) -> Result<(), QueueError> {
        message.validate()?;
        debug!(queue = %message.queue, "Enqueue");
        self.queues
            .lock()
            .await
            .entry(message.queue)
            .or_default()
            .push_back(message.message);
        Ok(())
    }
}
