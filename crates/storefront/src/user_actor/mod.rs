//! # User Actor
//!
//! Stores registered customers. Users have no custom actions; lookups by e-mail
//! go through a filtered list on the [`UserClient`](crate::clients::UserClient).

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::{User, UserId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, ResourceClient<User>) {
    ResourceActor::new(buffer_size, UserId::generate)
}
