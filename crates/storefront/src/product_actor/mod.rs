//! # Product Actor
//!
//! Owns the product catalog: create, update, delete and list through the generic
//! [`ResourceActor`], plus a `CheckStock` action that reads quantity on hand.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Product`]
//! - [`error`] - [`ProductError`]
//! - [`actions`] - [`ProductAction`] and [`ProductActionResult`]
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Usage
//!
//! ```rust
//! use rust_decimal::Decimal;
//! use storefront::clients::ProductClient;
//! use storefront::model::{Category, ProductCreate};
//! use storefront::product_actor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = product_actor::new(32);
//!     let client = ProductClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .create_product(ProductCreate {
//!             category: Category::Tools,
//!             name: "Hammer".to_string(),
//!             description: "Claw hammer".to_string(),
//!             price: Decimal::new(1999, 2),
//!             quantity: 12,
//!         })
//!         .await?;
//!
//!     assert_eq!(client.check_stock(id).await?, 12);
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::{Product, ProductId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Product actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ResourceClient<Product>) {
    ResourceActor::new(buffer_size, ProductId::generate)
}
