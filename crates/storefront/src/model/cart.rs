use super::{Category, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

string_id! {
    /// Identifies one shopping session; each session owns exactly one cart.
    SessionId
}

/// Product details captured when the product was added to a cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub name: String,
    pub category: Category,
    pub price: Decimal,
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category,
            price: product.price,
        }
    }
}

/// One product and quantity in a session's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl CartLine {
    /// Price captured at add time multiplied by the quantity.
    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Sum of every line total.
pub fn cart_total(lines: &[CartLine]) -> Decimal {
    lines.iter().map(CartLine::line_total).sum()
}
