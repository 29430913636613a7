//! # Invoices
//!
//! [`InvoiceTrigger`] is what checkout calls once an order is committed.
//! [`InvoiceGenerator`] implements it by assembling an [`Invoice`] from the
//! customer, the order lines and the catalog, then rendering it as text.

pub mod document;

pub use document::{format_money, Invoice, InvoiceItem};

use crate::accounts::AccountReader;
use crate::catalog::CatalogReader;
use crate::model::{Address, OrderId, UserId};
use crate::persistence::OrderPersistence;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvoiceError {
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invoice data unavailable: {0}")]
    Lookup(String),
}

/// Produces the invoice document for a committed order.
#[async_trait]
pub trait InvoiceTrigger: Send + Sync {
    async fn generate(&self, user_id: &UserId, order_id: &OrderId) -> Result<Vec<u8>, InvoiceError>;
}

/// File name of an order's invoice inside the customer's directory.
pub fn invoice_file_name(order_id: &OrderId, suffix: &str) -> String {
    format!("{order_id}_invoice{suffix}")
}

pub struct InvoiceGenerator {
    accounts: Arc<dyn AccountReader>,
    orders: Arc<dyn OrderPersistence>,
    catalog: Arc<dyn CatalogReader>,
    retailer: Address,
}

impl InvoiceGenerator {
    pub fn new(
        accounts: Arc<dyn AccountReader>,
        orders: Arc<dyn OrderPersistence>,
        catalog: Arc<dyn CatalogReader>,
        retailer: Address,
    ) -> Self {
        Self {
            accounts,
            orders,
            catalog,
            retailer,
        }
    }

    /// Collects everything printed on the invoice.
    ///
    /// Unit prices come from the order lines, so the invoice total always equals
    /// what the customer was charged. A product deleted since the order is listed
    /// under its id.
    #[instrument(skip(self))]
    pub async fn assemble(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<Invoice, InvoiceError> {
        let user = self
            .accounts
            .get_user(user_id)
            .await
            .map_err(|e| InvoiceError::Lookup(e.to_string()))?
            .ok_or_else(|| InvoiceError::CustomerNotFound(user_id.to_string()))?;

        let lines = self
            .orders
            .get_by_order_and_user(order_id, user_id)
            .await
            .map_err(|e| InvoiceError::Lookup(e.to_string()))?;
        if lines.is_empty() {
            return Err(InvoiceError::OrderNotFound(order_id.to_string()));
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let product_name = match self.catalog.get_product(&line.product_id).await {
                Ok(Some(product)) => product.name,
                Ok(None) => line.product_id.to_string(),
                Err(e) => return Err(InvoiceError::Lookup(e.to_string())),
            };
            items.push(InvoiceItem {
                product_name,
                quantity: line.quantity,
                unit_price: line.total_price / Decimal::from(line.quantity.max(1)),
            });
        }

        let number = rand::thread_rng().gen_range(100_000..1_000_000);
        debug!(number, items = items.len(), "Invoice assembled");
        Ok(Invoice {
            number,
            issued_at: Utc::now(),
            shipping_address: user.shipping_address(),
            comments: format!(
                "Thank you for shopping with us!\nYour order ({order_id}) is being processed.\n\n\
                 For any inquiries, please contact our support team on {} or drop us a mail at {}",
                self.retailer.phone, self.retailer.email
            ),
            retailer_address: self.retailer.clone(),
            items,
        })
    }
}

#[async_trait]
impl InvoiceTrigger for InvoiceGenerator {
    async fn generate(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<Vec<u8>, InvoiceError> {
        let invoice = self.assemble(user_id, order_id).await.inspect_err(|e| {
            warn!(%user_id, %order_id, error = %e, "Invoice generation failed");
        })?;
        Ok(invoice.render().into_bytes())
    }
}
