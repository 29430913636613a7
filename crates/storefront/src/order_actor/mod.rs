//! # Order Line Actor
//!
//! Persists order lines. Orders are written with the framework's all-or-nothing
//! batch create and re-statused with its atomic filtered update, so a reader never
//! sees half an order or half a status change.
//!
//! The actor needs no context: every line carries the ids it refers to, and the
//! checkout pipeline validates them before writing.

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::{OrderLine, OrderLineId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new order line actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<OrderLine>, ResourceClient<OrderLine>) {
    ResourceActor::new(buffer_size, OrderLineId::generate)
}
