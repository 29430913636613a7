//! # Order Status
//!
//! [`aggregate_status`] derives one status for a multi-line order; it is pure and
//! is recomputed on every read. [`OrderStatusService`] applies administrative status
//! changes to one line or to a whole order.

use crate::model::{AggregateStatus, ItemStatus, OrderId, ProductId};
use crate::order_actor::OrderError;
use crate::persistence::{OrderPersistence, StatusSelector};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Derives an order's status from its line statuses.
///
/// The rules are checked in order: all pending, then any in progress, then all
/// shipped; anything else is mixed. An empty input counts as all pending.
pub fn aggregate_status<I>(statuses: I) -> AggregateStatus
where
    I: IntoIterator<Item = ItemStatus>,
{
    let (mut pending, mut in_progress, mut shipped) = (0usize, 0usize, 0usize);
    for status in statuses {
        match status {
            ItemStatus::Pending => pending += 1,
            ItemStatus::InProgress => in_progress += 1,
            ItemStatus::Shipped => shipped += 1,
        }
    }
    if in_progress == 0 && shipped == 0 {
        AggregateStatus::Pending
    } else if in_progress > 0 {
        AggregateStatus::InProgress
    } else if pending == 0 {
        AggregateStatus::Shipped
    } else {
        AggregateStatus::Mixed
    }
}

/// Administrative status changes over [`OrderPersistence`].
#[derive(Clone)]
pub struct OrderStatusService {
    orders: Arc<dyn OrderPersistence>,
}

impl OrderStatusService {
    pub fn new(orders: Arc<dyn OrderPersistence>) -> Self {
        Self { orders }
    }

    /// Sets the status of the one line of `order_id` holding `product_id`.
    #[instrument(skip(self))]
    pub async fn update_line_status(
        &self,
        order_id: &OrderId,
        product_id: &ProductId,
        status: ItemStatus,
    ) -> Result<(), OrderError> {
        let selector = StatusSelector::Line {
            order_id: order_id.clone(),
            product_id: product_id.clone(),
        };
        let expected = self
            .orders
            .get_by_order(order_id)
            .await?
            .iter()
            .filter(|line| selector.matches(line))
            .count();
        match expected {
            0 => return Err(OrderError::NotFound(format!("{order_id}/{product_id}"))),
            1 => {}
            n => {
                return Err(OrderError::Validation(format!(
                    "{n} lines of order {order_id} hold product {product_id}"
                )))
            }
        }
        self.apply(selector, status, expected).await
    }

    /// Sets the status of every line of `order_id` in one batch.
    #[instrument(skip(self))]
    pub async fn update_whole_order_status(
        &self,
        order_id: &OrderId,
        status: ItemStatus,
    ) -> Result<(), OrderError> {
        let expected = self.orders.get_by_order(order_id).await?.len();
        if expected == 0 {
            return Err(OrderError::NotFound(order_id.to_string()));
        }
        let selector = StatusSelector::Order {
            order_id: order_id.clone(),
        };
        self.apply(selector, status, expected).await
    }

    async fn apply(
        &self,
        selector: StatusSelector,
        status: ItemStatus,
        expected: usize,
    ) -> Result<(), OrderError> {
        let order_id = selector.order_id().clone();
        let updated = self.orders.update_status(selector, status).await?;
        match updated {
            0 => Err(OrderError::NotFound(order_id.to_string())),
            n if n < expected => {
                warn!(%order_id, expected, updated = n, "Partial status update");
                Err(OrderError::PartialUpdate {
                    expected,
                    updated: n,
                })
            }
            n => {
                info!(%order_id, updated = n, %status, "Status updated");
                Ok(())
            }
        }
    }
}
