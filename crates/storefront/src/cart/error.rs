use thiserror::Error;

/// Why a cart change was refused.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Quantity must be at least 1")]
    ZeroQuantity,

    #[error("Cart already holds {0} of this product")]
    QuantityOverflow(u32),

    #[error("Catalog unavailable: {0}")]
    Catalog(String),
}
