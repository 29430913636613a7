//! # Order Persistence
//!
//! The storage contract for order lines. Batch writes report how far they got so a
//! checkout can tell a clean write from a partial one, and status updates report how
//! many lines changed.

use crate::model::{ItemStatus, OrderId, OrderLine, OrderLineCreate, OrderLineId, ProductId, UserId};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Order lines grouped by their order id.
pub type GroupedOrders = BTreeMap<OrderId, Vec<OrderLine>>;

/// Outcome of writing one order's lines.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchWrite {
    /// Every line was written; ids are in payload order.
    AllWritten { ids: Vec<OrderLineId> },
    /// Only `written` lines were stored.
    PartialFailure { written: usize },
    /// Nothing was stored.
    TotalFailure { reason: String },
}

/// Which order lines a status update applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSelector {
    /// The line of `order_id` that holds `product_id`.
    Line { order_id: OrderId, product_id: ProductId },
    /// Every line of `order_id`.
    Order { order_id: OrderId },
}

impl StatusSelector {
    pub fn matches(&self, line: &OrderLine) -> bool {
        match self {
            StatusSelector::Line { order_id, product_id } => {
                line.order_id == *order_id && line.product_id == *product_id
            }
            StatusSelector::Order { order_id } => line.order_id == *order_id,
        }
    }

    pub fn order_id(&self) -> &OrderId {
        match self {
            StatusSelector::Line { order_id, .. } | StatusSelector::Order { order_id } => order_id,
        }
    }
}

#[async_trait]
pub trait OrderPersistence: Send + Sync {
    /// Writes every line of one order or none of them.
    async fn create_batch(&self, lines: Vec<OrderLineCreate>) -> BatchWrite;

    async fn get_by_order_and_user(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
    ) -> Result<Vec<OrderLine>, OrderError>;

    async fn get_by_order(&self, order_id: &OrderId) -> Result<Vec<OrderLine>, OrderError>;

    async fn get_by_user(&self, user_id: &UserId) -> Result<GroupedOrders, OrderError>;

    async fn get_all(&self) -> Result<GroupedOrders, OrderError>;

    /// Sets `status` on every line the selector matches; returns how many changed.
    async fn update_status(
        &self,
        selector: StatusSelector,
        status: ItemStatus,
    ) -> Result<usize, OrderError>;
}

/// Groups lines by order id, each group in creation order.
pub fn group_by_order(lines: Vec<OrderLine>) -> GroupedOrders {
    let mut grouped = GroupedOrders::new();
    for line in lines {
        grouped.entry(line.order_id.clone()).or_default().push(line);
    }
    for group in grouped.values_mut() {
        group.sort_by_key(|line| line.ordered_at);
    }
    grouped
}
