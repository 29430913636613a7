//! Registry of per-session carts. Two sessions never share a [`CartStore`].

use super::CartStore;
use crate::catalog::CatalogReader;
use crate::model::SessionId;
use crate::queue::MessageQueue;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub struct SessionCarts {
    catalog: Arc<dyn CatalogReader>,
    queue: Arc<dyn MessageQueue>,
    cart_queue: String,
    carts: RwLock<HashMap<SessionId, Arc<CartStore>>>,
}

impl SessionCarts {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        queue: Arc<dyn MessageQueue>,
        cart_queue: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            queue,
            cart_queue: cart_queue.into(),
            carts: RwLock::new(HashMap::new()),
        }
    }

    /// The cart of `session`, created empty on first use.
    pub async fn cart(&self, session: &SessionId) -> Arc<CartStore> {
        if let Some(cart) = self.carts.read().await.get(session) {
            return cart.clone();
        }
        let mut carts = self.carts.write().await;
        carts
            .entry(session.clone())
            .or_insert_with(|| {
                debug!(%session, "Cart opened");
                Arc::new(
                    CartStore::new(session.clone(), self.catalog.clone())
                        .with_activity(self.queue.clone(), self.cart_queue.clone()),
                )
            })
            .clone()
    }

    /// Drops the session's cart. Returns false if the session had none.
    pub async fn end_session(&self, session: &SessionId) -> bool {
        let removed = self.carts.write().await.remove(session).is_some();
        if removed {
            debug!(%session, "Cart closed");
        }
        removed
    }

    pub async fn active_sessions(&self) -> usize {
        self.carts.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{product, FakeCatalog, RecordingQueue};

    fn registry() -> SessionCarts {
        SessionCarts::new(
            Arc::new(FakeCatalog::with(vec![product("a", "3.00", 9)])),
            Arc::new(RecordingQueue::default()),
            "cart-activity",
        )
    }

    #[tokio::test]
    async fn sessions_get_independent_carts() {
        let carts = registry();
        let alice = carts.cart(&SessionId::from("alice")).await;
        let bob = carts.cart(&SessionId::from("bob")).await;

        alice.add_to_cart(&"a".into(), 2).await;
        assert_eq!(alice.items().await.len(), 1);
        assert!(bob.items().await.is_empty());

        let alice_again = carts.cart(&SessionId::from("alice")).await;
        assert!(Arc::ptr_eq(&alice, &alice_again));
        assert_eq!(carts.active_sessions().await, 2);
    }

    #[tokio::test]
    async fn ended_session_starts_over_with_an_empty_cart() {
        let carts = registry();
        let session = SessionId::from("s");
        carts.cart(&session).await.add_to_cart(&"a".into(), 1).await;

        assert!(carts.end_session(&session).await);
        assert!(!carts.end_session(&session).await);
        assert!(carts.cart(&session).await.items().await.is_empty());
    }
}
