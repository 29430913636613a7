use thiserror::Error;

/// Checkout failed and no order exists.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CheckoutError {
    /// Input rejected before anything was contacted.
    #[error("Invalid checkout: {0}")]
    Validation(String),

    /// The order store wrote fewer lines than the order has.
    #[error("Order only partially written: {written} of {expected} lines")]
    PartialWrite { expected: usize, written: usize },

    #[error("Order could not be written: {0}")]
    Persistence(String),
}

impl CheckoutError {
    /// Text for the customer.
    pub fn user_message(&self) -> &'static str {
        match self {
            CheckoutError::Validation(_) => {
                "Your order could not be placed: the cart is empty or incomplete."
            }
            CheckoutError::PartialWrite { .. } | CheckoutError::Persistence(_) => {
                "Your order could not be placed, please retry."
            }
        }
    }
}
