//! # Catalog Reader
//!
//! The product lookup contract consumed by the cart, checkout, invoice and history
//! code. [`ProductClient`](crate::clients::ProductClient) implements it over the
//! product actor; tests substitute fakes.

use crate::model::{Product, ProductId};
use crate::product_actor::ProductError;
use async_trait::async_trait;

/// Source of truth for product price and quantity on hand.
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// `Ok(None)` when the product does not exist.
    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, ProductError>;

    /// Takes `quantity` units off the stock level in one step, stopping at zero,
    /// and returns the level found before the change. No other field is written.
    /// A missing product is [`ProductError::NotFound`].
    async fn decrement_stock(&self, id: &ProductId, quantity: u32) -> Result<u32, ProductError>;

    async fn list_products(&self) -> Result<Vec<Product>, ProductError>;
}
