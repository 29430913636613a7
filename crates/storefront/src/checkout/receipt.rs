use crate::model::{OrderId, OrderLine, ProductId, UserId};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Why a product's stock was not decremented as ordered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StockIssue {
    /// The product no longer exists in the catalog.
    ProductMissing,
    /// Fewer units were on hand than ordered; stock was set to zero.
    Oversold { requested: u32, available: u32 },
    /// The catalog could not apply the decrement.
    UpdateFailed(String),
}

impl fmt::Display for StockIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockIssue::ProductMissing => f.write_str("product missing from catalog"),
            StockIssue::Oversold {
                requested,
                available,
            } => write!(f, "oversold: requested {requested}, available {available}"),
            StockIssue::UpdateFailed(reason) => write!(f, "stock update failed: {reason}"),
        }
    }
}

/// A problem after the order was committed. The order stands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CheckoutWarning {
    Stock { product_id: ProductId, issue: StockIssue },
    InvoiceGeneration(String),
    InvoiceUpload(String),
}

impl fmt::Display for CheckoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutWarning::Stock { product_id, issue } => write!(f, "{product_id}: {issue}"),
            CheckoutWarning::InvoiceGeneration(reason) => {
                write!(f, "invoice not generated: {reason}")
            }
            CheckoutWarning::InvoiceUpload(reason) => write!(f, "invoice not stored: {reason}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    Placed,
    PlacedWithWarnings,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutReceipt {
    pub order_id: OrderId,
    pub user_id: UserId,
    pub lines: Vec<OrderLine>,
    pub grand_total: Decimal,
    /// Name of the stored invoice, when it was generated and stored.
    pub invoice_file: Option<String>,
    pub warnings: Vec<CheckoutWarning>,
    /// True when an earlier receipt was returned for a repeated idempotency key.
    pub replayed: bool,
}

impl CheckoutReceipt {
    pub fn outcome(&self) -> CheckoutOutcome {
        if self.warnings.is_empty() {
            CheckoutOutcome::Placed
        } else {
            CheckoutOutcome::PlacedWithWarnings
        }
    }

    pub fn invoice_delayed(&self) -> bool {
        self.warnings.iter().any(|w| {
            matches!(
                w,
                CheckoutWarning::InvoiceGeneration(_) | CheckoutWarning::InvoiceUpload(_)
            )
        })
    }

    pub fn stock_issues(&self) -> impl Iterator<Item = (&ProductId, &StockIssue)> {
        self.warnings.iter().filter_map(|w| match w {
            CheckoutWarning::Stock { product_id, issue } => Some((product_id, issue)),
            _ => None,
        })
    }

    /// Text for the customer. Stock problems are an operator concern and stay out of it.
    pub fn user_message(&self) -> &'static str {
        if self.invoice_delayed() {
            "Your order was placed. Your invoice is delayed and will be available later."
        } else {
            "Your order was placed."
        }
    }
}
