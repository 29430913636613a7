use crate::accounts::AccountReader;
use crate::cart::SessionCarts;
use crate::catalog::CatalogReader;
use crate::checkout::{Checkout, CheckoutSettings};
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::config::StorefrontConfig;
use crate::files::InMemoryFileStore;
use crate::history::OrderHistory;
use crate::images::ProductImages;
use crate::invoice::InvoiceGenerator;
use crate::persistence::OrderPersistence;
use crate::queue::InMemoryQueue;
use crate::status::OrderStatusService;
use crate::{order_actor, product_actor, user_actor};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// The running storefront: actors, their clients and the services built on them.
///
/// # Example
///
/// ```ignore
/// let store = Storefront::start(&StorefrontConfig::from_env()?);
/// let cart = store.carts.cart(&session).await;
/// cart.add_to_cart(&product_id, 2).await;
/// let receipt = store.checkout.checkout(CheckoutRequest::new(user_id), &cart).await?;
/// drop(cart);
/// store.shutdown().await?;
/// ```
pub struct Storefront {
    pub product_client: ProductClient,
    pub user_client: UserClient,
    pub order_client: OrderClient,
    pub carts: Arc<SessionCarts>,
    pub checkout: Arc<Checkout>,
    pub status: OrderStatusService,
    pub history: OrderHistory,
    pub files: Arc<InMemoryFileStore>,
    /// Product images, kept in `files` next to the invoices.
    pub images: ProductImages,
    pub queue: Arc<InMemoryQueue>,
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Spawns every actor and wires the services. Must be called inside a Tokio runtime.
    pub fn start(config: &StorefrontConfig) -> Self {
        info!(capacity = config.channel_capacity, "Starting storefront");

        let (product_actor, product_client) = product_actor::new(config.channel_capacity);
        let (user_actor, user_client) = user_actor::new(config.channel_capacity);
        let (order_actor, order_client) = order_actor::new(config.channel_capacity);

        let handles = vec![
            tokio::spawn(product_actor.run(())),
            tokio::spawn(user_actor.run(())),
            tokio::spawn(order_actor.run(())),
        ];

        let product_client = ProductClient::new(product_client);
        let user_client = UserClient::new(user_client);
        let order_client = OrderClient::new(order_client);

        let catalog: Arc<dyn CatalogReader> = Arc::new(product_client.clone());
        let accounts: Arc<dyn AccountReader> = Arc::new(user_client.clone());
        let orders: Arc<dyn OrderPersistence> = Arc::new(order_client.clone());
        let files = Arc::new(InMemoryFileStore::new());
        let queue = Arc::new(InMemoryQueue::new());
        let images = ProductImages::new(files.clone());

        let invoices = Arc::new(InvoiceGenerator::new(
            accounts.clone(),
            orders.clone(),
            catalog.clone(),
            config.retailer.clone(),
        ));
        let checkout = Arc::new(Checkout::new(
            catalog.clone(),
            orders.clone(),
            invoices,
            files.clone(),
            queue.clone(),
            CheckoutSettings {
                invoice_suffix: config.invoice_file_suffix.clone(),
                order_queue: config.order_queue.clone(),
                idempotency_window: config.idempotency_window,
            },
        ));

        Self {
            carts: Arc::new(SessionCarts::new(
                catalog.clone(),
                queue.clone(),
                config.cart_queue.clone(),
            )),
            checkout,
            status: OrderStatusService::new(orders.clone()),
            history: OrderHistory::new(orders, catalog, accounts).with_images(images.clone()),
            product_client,
            user_client,
            order_client,
            files,
            images,
            queue,
            handles,
        }
    }

    /// Drops every client and service, then waits for each actor to stop.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down storefront...");
        let Self {
            product_client,
            user_client,
            order_client,
            carts,
            checkout,
            status,
            history,
            handles,
            ..
        } = self;
        drop((product_client, user_client, order_client));
        drop((carts, checkout, status, history));

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }
        info!("Storefront shutdown complete");
        Ok(())
    }
}
