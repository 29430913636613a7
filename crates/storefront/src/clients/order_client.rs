//! # Order Client
//!
//! Implements [`OrderPersistence`] over the order line actor.

use crate::model::{ItemStatus, OrderId, OrderLine, OrderLineCreate, OrderLineUpdate, UserId};
use crate::order_actor::OrderError;
use crate::persistence::{
    group_by_order, BatchWrite, GroupedOrders, OrderPersistence, StatusSelector,
};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Client for interacting with the order line actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<OrderLine>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<OrderLine>) -> Self {
        Self { inner }
    }

    async fn lines_where(
        &self,
        predicate: impl Fn(&OrderLine) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<OrderLine>, OrderError> {
        let mut lines = self.list(Filter::new(predicate)).await?;
        lines.sort_by_key(|line| line.ordered_at);
        Ok(lines)
    }
}

/// Every line must belong to one order and one user.
fn check_single_order(lines: &[OrderLineCreate]) -> Result<(), String> {
    let Some(first) = lines.first() else {
        return Err("an order needs at least one line".to_string());
    };
    if lines
        .iter()
        .any(|l| l.order_id != first.order_id || l.user_id != first.user_id)
    {
        return Err("all lines of an order must share one order id and one user id".to_string());
    }
    Ok(())
}

#[async_trait]
impl ActorClient<OrderLine> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<OrderLine> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[async_trait]
impl OrderPersistence for OrderClient {
    #[instrument(skip(self, lines), fields(count = lines.len()))]
    async fn create_batch(&self, lines: Vec<OrderLineCreate>) -> BatchWrite {
        if let Err(reason) = check_single_order(&lines) {
            warn!(%reason, "Rejected order batch");
            return BatchWrite::TotalFailure { reason };
        }
        let expected = lines.len();
        debug!("Sending request");
        match self.inner.create_batch(lines).await {
            Ok(ids) if ids.len() == expected => BatchWrite::AllWritten { ids },
            Ok(ids) => BatchWrite::PartialFailure { written: ids.len() },
            Err(e) => BatchWrite::TotalFailure {
                reason: e.to_string(),
            },
        }
    }

    async fn get_by_order_and_user(
        &self,
        order_id: &OrderId,
        user_id: &UserId,
    ) -> Result<Vec<OrderLine>, OrderError> {
        let (order_id, user_id) = (order_id.clone(), user_id.clone());
        self.lines_where(move |l| l.order_id == order_id && l.user_id == user_id)
            .await
    }

    async fn get_by_order(&self, order_id: &OrderId) -> Result<Vec<OrderLine>, OrderError> {
        let order_id = order_id.clone();
        self.lines_where(move |l| l.order_id == order_id).await
    }

    async fn get_by_user(&self, user_id: &UserId) -> Result<GroupedOrders, OrderError> {
        let user_id = user_id.clone();
        let lines = self.lines_where(move |l| l.user_id == user_id).await?;
        Ok(group_by_order(lines))
    }

    async fn get_all(&self) -> Result<GroupedOrders, OrderError> {
        let lines = self.lines_where(|_| true).await?;
        Ok(group_by_order(lines))
    }

    #[instrument(skip(self))]
    async fn update_status(
        &self,
        selector: StatusSelector,
        status: ItemStatus,
    ) -> Result<usize, OrderError> {
        debug!("Sending request");
        let updated = self
            .inner
            .update_where(
                Filter::new(move |l: &OrderLine| selector.matches(l)),
                OrderLineUpdate { status },
            )
            .await
            .map_err(Self::map_error)?;
        Ok(updated.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductId, UserId};
    use actor_framework::mock::MockClient;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn draft(order_id: &OrderId, user: &str) -> OrderLineCreate {
        OrderLineCreate {
            order_id: order_id.clone(),
            user_id: UserId::from(user),
            product_id: ProductId::generate(),
            quantity: 1,
            total_price: Decimal::TEN,
            status: ItemStatus::Pending,
            ordered_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_mixed_users_are_rejected_before_the_actor() {
        let mock = MockClient::<OrderLine>::new();
        let client = OrderClient::new(mock.client());
        let order = OrderId::generate();

        let write = client
            .create_batch(vec![draft(&order, "u-1"), draft(&order, "u-2")])
            .await;
        assert!(matches!(write, BatchWrite::TotalFailure { .. }));
        assert!(matches!(
            client.create_batch(Vec::new()).await,
            BatchWrite::TotalFailure { .. }
        ));
        mock.verify();
    }

    #[tokio::test]
    async fn test_short_id_list_is_a_partial_failure() {
        let mut mock = MockClient::<OrderLine>::new();
        mock.expect_create_batch()
            .return_ok(vec![crate::model::OrderLineId::generate()]);
        let client = OrderClient::new(mock.client());
        let order = OrderId::generate();

        let write = client
            .create_batch(vec![draft(&order, "u-1"), draft(&order, "u-1")])
            .await;
        assert_eq!(write, BatchWrite::PartialFailure { written: 1 });
        mock.verify();
    }

    #[tokio::test]
    async fn test_actor_failure_is_a_total_failure() {
        let mut mock = MockClient::<OrderLine>::new();
        mock.expect_create_batch()
            .return_err(FrameworkError::ActorClosed);
        let client = OrderClient::new(mock.client());
        let order = OrderId::generate();

        let write = client.create_batch(vec![draft(&order, "u-1")]).await;
        assert!(matches!(write, BatchWrite::TotalFailure { .. }));
        mock.verify();
    }
}
