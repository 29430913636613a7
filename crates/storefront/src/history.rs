//! # Order History
//!
//! Read-side views for customers and administrators. Every view derives its status
//! with [`aggregate_status`] at read time.

use crate::accounts::AccountReader;
use crate::catalog::CatalogReader;
use crate::images::ProductImages;
use crate::model::{AggregateStatus, ItemStatus, OrderId, OrderLine, ProductId, UserId};
use crate::order_actor::OrderError;
use crate::persistence::{GroupedOrders, OrderPersistence};
use crate::status::aggregate_status;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// One order in a customer's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub status: AggregateStatus,
    pub grand_total: Decimal,
}

impl OrderSummary {
    /// `None` for an empty group.
    pub fn from_lines(order_id: OrderId, lines: &[OrderLine]) -> Option<Self> {
        let order_date = lines.iter().map(|l| l.ordered_at).min()?;
        Some(Self {
            order_id,
            order_date,
            status: aggregate_status(lines.iter().map(|l| l.status)),
            grand_total: lines.iter().map(|l| l.total_price).sum(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetailLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub line_total: Decimal,
    pub status: ItemStatus,
    /// Whether the product still has a stored image.
    pub has_image: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    pub order_id: OrderId,
    pub order_date: DateTime<Utc>,
    pub status: AggregateStatus,
    pub grand_total: Decimal,
    /// Sorted by line total, cheapest first.
    pub lines: Vec<OrderDetailLine>,
}

/// One order in the administrator's overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminOrderSummary {
    pub customer_id: UserId,
    pub customer_name: String,
    #[serde(flatten)]
    pub summary: OrderSummary,
}

#[derive(Clone)]
pub struct OrderHistory {
    orders: Arc<dyn OrderPersistence>,
    catalog: Arc<dyn CatalogReader>,
    accounts: Arc<dyn AccountReader>,
    images: Option<ProductImages>,
}

impl OrderHistory {
    pub fn new(
        orders: Arc<dyn OrderPersistence>,
        catalog: Arc<dyn CatalogReader>,
        accounts: Arc<dyn AccountReader>,
    ) -> Self {
        Self {
            orders,
            catalog,
            accounts,
            images: None,
        }
    }

    /// Lets order details report which products have an image.
    pub fn with_images(mut self, images: ProductImages) -> Self {
        self.images = Some(images);
        self
    }

    /// The user's orders, newest first.
    #[instrument(skip(self))]
    pub async fn customer_history(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<OrderSummary>, OrderError> {
        let grouped = self.orders.get_by_user(user_id).await?;
        Ok(newest_first(grouped))
    }

    #[instrument(skip(self))]
    pub async fn order_details(
        &self,
        user_id: &UserId,
        order_id: &OrderId,
    ) -> Result<OrderDetails, OrderError> {
        let lines = self.orders.get_by_order_and_user(order_id, user_id).await?;
        let summary = OrderSummary::from_lines(order_id.clone(), &lines)
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;

        let mut detail_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let product = match self.catalog.get_product(&line.product_id).await {
                Ok(product) => product,
                Err(e) => {
                    warn!(product_id = %line.product_id, error = %e, "Product lookup failed");
                    None
                }
            };
            let has_image = match (&self.images, &product) {
                (Some(images), Some(product)) => images
                    .exists(product.category, &product.id)
                    .await
                    .unwrap_or_else(|e| {
                        warn!(product_id = %product.id, error = %e, "Image lookup failed");
                        false
                    }),
                _ => false,
            };
            let product_name = match product {
                Some(product) => product.name,
                None => line.product_id.to_string(),
            };
            detail_lines.push(OrderDetailLine {
                product_id: line.product_id,
                product_name,
                quantity: line.quantity,
                line_total: line.total_price,
                status: line.status,
                has_image,
            });
        }
        detail_lines.sort_by(|a, b| a.line_total.cmp(&b.line_total));

        Ok(OrderDetails {
            order_id: summary.order_id,
            order_date: summary.order_date,
            status: summary.status,
            grand_total: summary.grand_total,
            lines: detail_lines,
        })
    }

    /// Every order with its customer, newest first. Orders whose customer no longer
    /// exists are left out.
    #[instrument(skip(self))]
    pub async fn admin_overview(&self) -> Result<Vec<AdminOrderSummary>, OrderError> {
        let grouped = self.orders.get_all().await?;
        let mut overview = Vec::with_capacity(grouped.len());
        for (order_id, lines) in grouped {
            let Some(customer_id) = lines.first().map(|l| l.user_id.clone()) else {
                continue;
            };
            let customer = match self.accounts.get_user(&customer_id).await {
                Ok(Some(user)) => user,
                Ok(None) => {
                    debug!(%order_id, %customer_id, "Skipping order of unknown customer");
                    continue;
                }
                Err(e) => {
                    warn!(%order_id, %customer_id, error = %e, "Customer lookup failed");
                    continue;
                }
            };
            if let Some(summary) = OrderSummary::from_lines(order_id, &lines) {
                overview.push(AdminOrderSummary {
                    customer_id,
                    customer_name: customer.name,
                    summary,
                });
            }
        }
        overview.sort_by(|a, b| b.summary.order_date.cmp(&a.summary.order_date));
        Ok(overview)
    }
}

fn newest_first(grouped: GroupedOrders) -> Vec<OrderSummary> {
    let mut summaries: Vec<OrderSummary> = grouped
        .into_iter()
        .filter_map(|(order_id, lines)| OrderSummary::from_lines(order_id, &lines))
        .collect();
    summaries.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    summaries
}
