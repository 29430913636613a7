//! # Framework Errors
//!
//! Errors raised by the actor runtime itself, independent of any entity type.
//! Entity errors travel boxed inside [`FrameworkError::EntityError`] and
//! [`FrameworkError::BatchRejected`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
    /// A batch operation was rolled back because one of its items failed.
    #[error("Batch rejected at item {index}: {source}")]
    BatchRejected {
        index: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
