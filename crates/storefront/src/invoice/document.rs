use crate::model::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItem {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl InvoiceItem {
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub number: u32,
    pub issued_at: DateTime<Utc>,
    pub shipping_address: Address,
    pub retailer_address: Address,
    pub items: Vec<InvoiceItem>,
    pub comments: String,
}

impl Invoice {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(InvoiceItem::subtotal).sum()
    }

    /// Plain-text rendering: header, both addresses, an item table, total, comments.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(72);
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Invoice #{}", self.number);
        let _ = writeln!(out, "Issue date: {}", self.issued_at.format("%d %B %Y"));
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "From:\n{}\n", self.retailer_address);
        let _ = writeln!(out, "Ship to:\n{}", self.shipping_address);
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "{:<4}{:<32}{:>12}{:>10}{:>14}",
            "#", "Product", "Unit price", "Quantity", "Subtotal"
        );
        for (index, item) in self.items.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<4}{:<32}{:>12}{:>10}{:>14}",
                index + 1,
                item.product_name,
                format_money(item.unit_price),
                item.quantity,
                format_money(item.subtotal())
            );
        }
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "{:>72}", format!("Total: {}", format_money(self.total())));
        let _ = writeln!(out, "\nComments\n{}", self.comments);
        out
    }
}

/// Two decimal places with a currency prefix.
pub fn format_money(amount: Decimal) -> String {
    format!("R {:.2}", amount.round_dp(2))
}
