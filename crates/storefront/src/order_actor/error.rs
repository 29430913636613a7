//! Error types for order lines and order status changes.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// No order line matched the lookup.
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Invalid order: {0}")]
    Validation(String),

    /// Fewer lines were changed than matched the selector.
    #[error("Partial update: {updated} of {expected} lines changed")]
    PartialUpdate { expected: usize, updated: usize },

    /// Order lines are never deleted in normal operation.
    #[error("Order lines cannot be deleted: {0}")]
    DeleteForbidden(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
