//! # Cart Store
//!
//! One [`CartStore`] per shopping session, handed out by [`SessionCarts`].
//!
//! Reads return a [`CartSnapshot`]: an `Arc` of the line list at that moment.
//! Writers never touch a published list; they copy it, change the copy and swap it
//! in, so a snapshot taken before a write stays valid and unchanged.
//!
//! Cart changes publish a short activity message to the cart queue. Publishing is
//! best-effort and never changes the result of the cart operation.

pub mod error;
pub mod sessions;

pub use error::CartError;
pub use sessions::SessionCarts;

use crate::catalog::CatalogReader;
use crate::model::{cart_total, CartLine, ProductId, ProductSnapshot, SessionId};
use crate::queue::{publish, MessageQueue, QueueMessage};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// Immutable view of a cart's lines.
pub type CartSnapshot = Arc<Vec<CartLine>>;

/// A cart line together with its computed total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLineView {
    pub line: CartLine,
    pub line_total: Decimal,
}

/// Cart contents with per-line totals and the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub grand_total: Decimal,
}

impl CartView {
    pub fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            lines: lines
                .iter()
                .map(|line| CartLineView {
                    line: line.clone(),
                    line_total: line.line_total(),
                })
                .collect(),
            grand_total: cart_total(lines),
        }
    }
}

struct Activity {
    queue: Arc<dyn MessageQueue>,
    name: String,
}

pub struct CartStore {
    session: SessionId,
    catalog: Arc<dyn CatalogReader>,
    activity: Option<Activity>,
    lines: RwLock<CartSnapshot>,
}

impl CartStore {
    pub fn new(session: SessionId, catalog: Arc<dyn CatalogReader>) -> Self {
        Self {
            session,
            catalog,
            activity: None,
            lines: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Publishes cart activity to `queue_name`.
    pub fn with_activity(
        mut self,
        queue: Arc<dyn MessageQueue>,
        queue_name: impl Into<String>,
    ) -> Self {
        self.activity = Some(Activity {
            queue,
            name: queue_name.into(),
        });
        self
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    /// Adds `quantity` of a catalog product, accumulating onto an existing line.
    ///
    /// The product's name, category and price are captured on first add and kept
    /// for the life of the line.
    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn try_add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartLine, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        let product = self
            .catalog
            .get_product(product_id)
            .await
            .map_err(|e| CartError::Catalog(e.to_string()))?
            .ok_or_else(|| CartError::ProductNotFound(product_id.to_string()))?;

        let line = self
            .write(|lines| -> Result<CartLine, CartError> {
                match lines.iter_mut().find(|l| l.product_id == *product_id) {
                    Some(existing) => {
                        existing.quantity = existing
                            .quantity
                            .checked_add(quantity)
                            .ok_or(CartError::QuantityOverflow(existing.quantity))?;
                        Ok(existing.clone())
                    }
                    None => {
                        let line = CartLine {
                            product_id: product_id.clone(),
                            product: ProductSnapshot::from(&product),
                            quantity,
                        };
                        lines.push(line.clone());
                        Ok(line)
                    }
                }
            })
            .await?;
        debug!(quantity = line.quantity, "Added to cart");
        self.notify(format!(
            "Product {} (quantity {}) added to cart for session {}",
            product.name, quantity, self.session
        ))
        .await;
        Ok(line)
    }

    /// Returns false if the product does not exist or cannot be looked up.
    pub async fn add_to_cart(&self, product_id: &ProductId, quantity: u32) -> bool {
        match self.try_add_to_cart(product_id, quantity).await {
            Ok(_) => true,
            Err(e) => {
                warn!(session = %self.session, %product_id, error = %e, "Add to cart refused");
                false
            }
        }
    }

    /// Replaces the quantity of a line. Zero removes the line.
    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn edit_quantity(&self, product_id: &ProductId, new_quantity: u32) -> bool {
        if new_quantity == 0 {
            return self.remove_from_cart(product_id).await;
        }
        let edited = self
            .write(|lines| {
                let line = lines.iter_mut().find(|l| l.product_id == *product_id)?;
                line.quantity = new_quantity;
                Some(line.product.name.clone())
            })
            .await;
        match edited {
            Some(name) => {
                self.notify(format!(
                    "Quantity of {name} set to {new_quantity} in cart for session {}",
                    self.session
                ))
                .await;
                true
            }
            None => false,
        }
    }

    /// True only if a line was removed.
    #[instrument(skip(self), fields(session = %self.session))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> bool {
        let removed = self
            .write(|lines| {
                let index = lines.iter().position(|l| l.product_id == *product_id)?;
                Some(lines.remove(index))
            })
            .await;
        match removed {
            Some(line) => {
                self.notify(format!(
                    "Product {} removed from cart for session {}",
                    line.product.name, self.session
                ))
                .await;
                true
            }
            None => false,
        }
    }

    pub async fn clear_cart(&self) -> bool {
        *self.lines.write().await = Arc::new(Vec::new());
        debug!(session = %self.session, "Cart cleared");
        true
    }

    pub async fn items(&self) -> CartSnapshot {
        self.lines.read().await.clone()
    }

    pub async fn view(&self) -> CartView {
        CartView::from_lines(&self.items().await)
    }

    pub async fn grand_total(&self) -> Decimal {
        cart_total(&self.items().await)
    }

    /// Copies the current lines, applies `change` and publishes the copy only when
    /// `change` reports something.
    async fn write<R>(&self, change: impl FnOnce(&mut Vec<CartLine>) -> R) -> R
    where
        R: Changed,
    {
        let mut current = self.lines.write().await;
        let mut next = current.as_ref().clone();
        let result = change(&mut next);
        if result.changed() {
            *current = Arc::new(next);
        }
        result
    }

    async fn notify(&self, message: String) {
        if let Some(activity) = &self.activity {
            let message = QueueMessage::new(activity.name.clone(), message);
            publish(activity.queue.as_ref(), message).await;
        }
    }
}

trait Changed {
    fn changed(&self) -> bool;
}

impl<T> Changed for Option<T> {
    fn changed(&self) -> bool {
        self.is_some()
    }
}

impl<T, E> Changed for Result<T, E> {
    fn changed(&self) -> bool {
        self.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{product, FakeCatalog, RecordingQueue};
    use proptest::prelude::*;

    fn store(catalog: &Arc<FakeCatalog>) -> CartStore {
        CartStore::new(SessionId::from("s-1"), catalog.clone())
    }

    #[tokio::test]
    async fn repeated_add_accumulates_one_line() {
        let catalog = Arc::new(FakeCatalog::with(vec![product("a", "10.00", 5)]));
        let cart = store(&catalog);

        assert!(cart.add_to_cart(&"a".into(), 2).await);
        assert!(cart.add_to_cart(&"a".into(), 3).await);

        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[tokio::test]
    async fn overflowing_add_is_refused_and_keeps_the_line() {
        let catalog = Arc::new(FakeCatalog::with(vec![product("a", "10.00", 5)]));
        let cart = store(&catalog);
        assert!(cart.add_to_cart(&"a".into(), u32::MAX - 1).await);
        let before = cart.items().await;

        assert_eq!(
            cart.try_add_to_cart(&"a".into(), 2).await,
            Err(CartError::QuantityOverflow(u32::MAX - 1))
        );
        assert!(!cart.add_to_cart(&"a".into(), 2).await);

        let after = cart.items().await;
        assert_eq!(after[0].quantity, u32::MAX - 1);
        assert!(Arc::ptr_eq(&before, &after));
    }

    #[tokio::test]
    async fn unknown_product_or_zero_quantity_is_refused() {
        let catalog = Arc::new(FakeCatalog::with(vec![product("a", "10.00", 5)]));
        let cart = store(&catalog);

        assert!(!cart.add_to_cart(&"missing".into(), 1).await);
        assert_eq!(
            cart.try_add_to_cart(&"a".into(), 0).await,
            Err(CartError::ZeroQuantity)
        );
        catalog.fail_reads();
        assert!(matches!(
            cart.try_add_to_cart(&"a".into(), 1).await,
            Err(CartError::Catalog(_))
        ));
        assert!(cart.items().await.is_empty());
    }

    #[tokio::test]
    async fn price_is_captured_at_add_time() {
        let catalog = Arc::new(FakeCatalog::with(vec![product("a", "10.00", 5)]));
        let cart = store(&catalog);
        cart.add_to_cart(&"a".into(), 1).await;

        catalog.set_price("a", "99.00");
        cart.add_to_cart(&"a".into(), 1).await;

        assert_eq!(cart.grand_total().await, "20.00".parse::<Decimal>().unwrap());
    }

    #[tokio::test]
    async fn edit_to_zero_removes_the_line() {
        let catalog = Arc::new(FakeCatalog::with(vec![
            product("a", "10.00", 5),
            product("b", "5.00", 5),
        ]));
        let cart = store(&catalog);
        cart.add_to_cart(&"a".into(), 2).await;
        cart.add_to_cart(&"b".into(), 1).await;

        assert!(cart.edit_quantity(&"a".into(), 0).await);
        let items = cart.items().await;
        assert_eq!(items.len(), 1);
        assert!(items.iter().all(|l| l.product_id != ProductId::from("a")));

        assert!(cart.edit_quantity(&"b".into(), 7).await);
        assert_eq!(cart.items().await[0].quantity, 7);
        assert!(!cart.edit_quantity(&"a".into(), 3).await);
    }

    #[tokio::test]
    async fn removing_absent_product_leaves_cart_unchanged() {
        let catalog = Arc::new(FakeCatalog::with(vec![product("a", "10.00", 5)]));
        let cart = store(&catalog);
        cart.add_to_cart(&"a".into(), 2).await;
        let before = cart.items().await;

        assert!(!cart.remove_from_cart(&"b".into()).await);
        let after = cart.items().await;
        assert_eq!(before, after);
        assert!(Arc::ptr_eq(&before, &after));

        assert!(cart.remove_from_cart(&"a".into()).await);
        assert!(!cart.remove_from_cart(&"a".into()).await);
    }

    #[tokio::test]
    async fn snapshot_is_unaffected_by_later_writes() {
        let catalog = Arc::new(FakeCatalog::with(vec![product("a", "10.00", 5)]));
        let cart = store(&catalog);
        cart.add_to_cart(&"a".into(), 1).await;

        let snapshot = cart.items().await;
        cart.add_to_cart(&"a".into(), 4).await;
        assert!(cart.clear_cart().await);

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].quantity, 1);
        assert!(cart.items().await.is_empty());
    }

    #[tokio::test]
    async fn view_reports_line_and_grand_totals() {
        let catalog = Arc::new(FakeCatalog::with(vec![
            product("a", "10.00", 5),
            product("b", "5.00", 5),
        ]));
        let cart = store(&catalog);
        cart.add_to_cart(&"a".into(), 2).await;
        cart.add_to_cart(&"b".into(), 1).await;

        let view = cart.view().await;
        let totals: Vec<Decimal> = view.lines.iter().map(|l| l.line_total).collect();
        assert_eq!(totals, vec![Decimal::new(2000, 2), Decimal::new(500, 2)]);
        assert_eq!(view.grand_total, Decimal::new(2500, 2));
    }

    #[tokio::test]
    async fn cart_changes_are_published_and_queue_failures_ignored() {
        let catalog = Arc::new(FakeCatalog::with(vec![product("a", "10.00", 5)]));
        let queue = Arc::new(RecordingQueue::default());
        let cart = store(&catalog).with_activity(queue.clone(), "cart-activity");

        cart.add_to_cart(&"a".into(), 2).await;
        cart.edit_quantity(&"a".into(), 3).await;
        cart.remove_from_cart(&"a".into()).await;
        let sent = queue.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|m| m.queue == "cart-activity"));

        queue.fail();
        assert!(cart.add_to_cart(&"a".into(), 1).await);
    }

    proptest! {
        #[test]
        fn add_then_add_sums_quantities(q1 in 1u32..1000, q2 in 1u32..1000) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let lines = runtime.block_on(async {
                let catalog = Arc::new(FakeCatalog::with(vec![product("a", "1.50", 5)]));
                let cart = store(&catalog);
                cart.add_to_cart(&"a".into(), q1).await;
                cart.add_to_cart(&"a".into(), q2).await;
                cart.items().await
            });
            prop_assert_eq!(lines.len(), 1);
            prop_assert_eq!(lines[0].quantity, q1 + q2);
        }

        #[test]
        fn edit_zero_matches_remove(keep in 1u32..50, drop_qty in 1u32..50) {
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (edited, removed) = runtime.block_on(async {
                let catalog = Arc::new(FakeCatalog::with(vec![
                    product("a", "1.00", 5),
                    product("b", "2.00", 5),
                ]));
                let left = store(&catalog);
                let right = store(&catalog);
                for cart in [&left, &right] {
                    cart.add_to_cart(&"a".into(), keep).await;
                    cart.add_to_cart(&"b".into(), drop_qty).await;
                }
                left.edit_quantity(&"b".into(), 0).await;
                right.remove_from_cart(&"b".into()).await;
                (left.items().await, right.items().await)
            });
            prop_assert_eq!(edited, removed);
        }
    }
}
